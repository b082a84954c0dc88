//! Lazily-read runtime configuration.
//!
//! The deployment injects a `window.RETROSPECT_CONFIG` object before the
//! WASM bundle loads. Values are read through accessors on every use and
//! never captured once, so a config script that runs late still wins.

use gloo_storage::{LocalStorage, Storage};
use wasm_bindgen::JsValue;

const CONFIG_GLOBAL: &str = "RETROSPECT_CONFIG";

/// Local-storage key the login flow writes the auth token under.
pub const AUTH_TOKEN_KEY: &str = "authToken";

fn global_field(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    let config = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)).ok()?;
    if config.is_undefined() || config.is_null() {
        return None;
    }
    js_sys::Reflect::get(&config, &JsValue::from_str(name)).ok()
}

/// The API base URL, falling back to same-origin `/api`.
pub fn api_base_url() -> String {
    if let Some(url) = global_field("api_base_url").and_then(|v| v.as_string()) {
        return url;
    }
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .map(|origin| format!("{origin}/api"))
        .unwrap_or_else(|| "/api".to_string())
}

/// Whether the analytics integration is enabled. Off unless the config
/// says otherwise.
pub fn analytics_enabled() -> bool {
    global_field("enable_analytics")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// The auth token, if the user has one. Ambient state owned by the login
/// flow; read on demand, never cached.
pub fn auth_token() -> Option<String> {
    LocalStorage::get::<String>(AUTH_TOKEN_KEY).ok()
}
