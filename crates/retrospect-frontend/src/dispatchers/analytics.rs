use wasm_bindgen::{JsCast, JsValue};

use retrospect::errors::HandlerError;
use retrospect::log::debug;
use retrospect::store::{Action, HandlerContext, HandlerGroup};

/// Thin wrapper over the third-party page-analytics global (`window.ga`).
///
/// The enabled flag is an accessor, not a captured bool: runtime config
/// may not be loaded yet when the client is constructed, so the flag is
/// re-read for every event.
pub struct AnalyticsClient {
    enabled: Box<dyn Fn() -> bool>,
}

impl AnalyticsClient {
    pub fn new(enabled: impl Fn() -> bool + 'static) -> Self {
        Self {
            enabled: Box::new(enabled),
        }
    }

    pub fn track(&self, category: &str, label: &str) -> Result<(), HandlerError> {
        if !(self.enabled)() {
            return Ok(());
        }

        let Some(window) = web_sys::window() else {
            return Ok(());
        };
        let ga = js_sys::Reflect::get(&window, &JsValue::from_str("ga"))
            .unwrap_or(JsValue::UNDEFINED);
        let Ok(ga) = ga.dyn_into::<js_sys::Function>() else {
            debug!(category, label, "analytics global missing, event dropped");
            return Ok(());
        };

        let args = js_sys::Array::of4(
            &JsValue::from_str("send"),
            &JsValue::from_str("event"),
            &JsValue::from_str(category),
            &JsValue::from_str(label),
        );
        ga.apply(&JsValue::NULL, &args)
            .map(|_| ())
            .map_err(|err| HandlerError::Analytics(format!("{err:?}")))
    }
}

/// The analytics handler group: a stateless observer. It forwards selected
/// actions to the analytics client and never touches application state.
pub struct AnalyticsHandler {
    client: AnalyticsClient,
}

impl AnalyticsHandler {
    pub fn new(client: AnalyticsClient) -> Self {
        Self { client }
    }
}

impl HandlerGroup for AnalyticsHandler {
    fn name(&self) -> &'static str {
        "analytics"
    }

    fn handle(
        &mut self,
        action: &Action,
        _ctx: &mut HandlerContext<'_>,
    ) -> Result<(), HandlerError> {
        match action {
            Action::ConfigReceived(_) => self.client.track("application", "config received"),
            Action::SessionUpdated(_) => self.client.track("session", "updated"),
            Action::Navigate(path) => self.client.track("navigation", path),
            _ => Ok(()),
        }
    }
}
