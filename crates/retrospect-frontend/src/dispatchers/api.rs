use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;

use retrospect::api::RetroApi;
use retrospect::errors::HandlerError;
use retrospect::log::{debug, info};
use retrospect::store::{Action, Dispatch, HandlerContext, HandlerGroup};

/// The api handler group: owns the config slice of state and performs the
/// config fetch when asked to.
pub struct ApiHandler {
    client: Rc<dyn RetroApi>,
    dispatch: Dispatch,
}

impl ApiHandler {
    pub fn new(client: Rc<dyn RetroApi>, dispatch: Dispatch) -> Self {
        Self { client, dispatch }
    }
}

impl HandlerGroup for ApiHandler {
    fn name(&self) -> &'static str {
        "api"
    }

    fn handle(
        &mut self,
        action: &Action,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<(), HandlerError> {
        match action {
            Action::RetrieveConfig => {
                let client = self.client.clone();
                let dispatch = self.dispatch.clone();
                spawn_local(async move {
                    match client.fetch_config().await {
                        Ok(config) => dispatch.send(Action::ConfigReceived(config)),
                        Err(err) => {
                            // The unreachable case already fired the
                            // client's not-found hook; nothing to retry.
                            debug!(%err, "config fetch failed");
                        }
                    }
                });
            }
            Action::ConfigReceived(config) => {
                info!(?config, "runtime config received");
                ctx.state_mut().config = Some(config.clone());
            }
            _ => {}
        }
        Ok(())
    }
}
