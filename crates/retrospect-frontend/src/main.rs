mod app;
mod components;
mod config;
mod dispatchers;
mod pages;
mod providers;
mod routes;

use std::rc::Rc;

use retrospect::api::{RetroApi, RetroClient};
use retrospect::store::{Action, Dispatch, MainHandler, NavigatorHandle, Store};

use app::{App, AppProps};
use dispatchers::{AnalyticsClient, AnalyticsHandler, ApiHandler};
use providers::api::ApiContext;

fn main() {
    retrospect::log::setup().expect("Failed to setup logging");

    // The dispatch handle has to exist before the store so the API client
    // can capture it for its not-found hook; it buffers until bound below.
    let dispatch = Dispatch::deferred();

    let client: Rc<dyn RetroApi> = Rc::new(RetroClient::new(config::api_base_url, config::auth_token, {
        let dispatch = dispatch.clone();
        move || dispatch.send(Action::ApiServerNotFound)
    }));

    let analytics = AnalyticsClient::new(config::analytics_enabled);
    let navigator = NavigatorHandle::new();

    // One store per application lifetime, built before the tree mounts and
    // torn down only on page unload. Handler groups observe every action
    // in this registration order.
    let store = Store::new();
    store.register(Box::new(MainHandler::new(navigator.clone())));
    store.register(Box::new(ApiHandler::new(client.clone(), dispatch.clone())));
    store.register(Box::new(AnalyticsHandler::new(analytics)));
    dispatch.bind(&store);

    yew::Renderer::<App>::with_props(AppProps {
        store,
        api: ApiContext { client },
        navigator,
    })
    .render();
}
