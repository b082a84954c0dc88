use gloo_events::EventListener;
use yew::prelude::*;
use yew_router::prelude::*;

use retrospect::data::ViewportState;
use retrospect::log::info;
use retrospect::store::{Action, NavigatorHandle, Store};

use crate::components::{Header, SessionWebsocket};
use crate::providers::api::{ApiContext, ApiProvider};
use crate::providers::{StoreProvider, ThemeProvider, use_store};
use crate::routes::{NavigatorBridge, Route, switch};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub store: Store,
    pub api: ApiContext,
    pub navigator: NavigatorHandle,
}

fn current_viewport() -> ViewportState {
    let width = web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .map(|w| w as u32)
        .unwrap_or(0);
    ViewportState::from_width(width)
}

/// Mount order contract: dispatch the config retrieval before anything
/// else, then start listening for resizes, then measure the viewport
/// immediately rather than waiting for the first resize event. The seams
/// (`measure`, `register_resize`) exist so the contract is checkable off
/// the browser; production wires them to `web_sys` and `EventListener`.
/// Returns the listener guard to drop on unmount.
fn mount_sequence<L>(
    store: &Store,
    measure: impl Fn() -> ViewportState + Clone + 'static,
    register_resize: impl FnOnce(Box<dyn Fn()>) -> L,
) -> L {
    store.dispatch(Action::RetrieveConfig);

    let listener = {
        let store = store.clone();
        let measure = measure.clone();
        register_resize(Box::new(move || {
            store.dispatch(Action::WindowSizeUpdated(measure()));
        }))
    };
    store.dispatch(Action::WindowSizeUpdated(measure()));
    listener
}

/// The composition root. The resize listener is released on unmount; the
/// store outlives remounts.
#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    {
        let store = props.store.clone();
        use_effect_with((), move |_| {
            info!("Application started");
            let window = web_sys::window().expect("no window in this environment");
            let listener = mount_sequence(&store, current_viewport, |on_resize| {
                EventListener::new(&window, "resize", move |_| on_resize())
            });
            move || drop(listener)
        });
    }

    html! {
        <ThemeProvider>
            <StoreProvider store={props.store.clone()}>
                <ApiProvider context={props.api.clone()}>
                    <BrowserRouter>
                        <NavigatorBridge handle={props.navigator.clone()} />
                        <div class="min-h-screen bg-gray-50 dark:bg-gray-900">
                            <Header />
                            <Switch<Route> render={switch} />
                            <ConnectedChannel />
                        </div>
                    </BrowserRouter>
                </ApiProvider>
            </StoreProvider>
        </ThemeProvider>
    }
}

/// Binds the live-session channel to the store: the websocket URL comes
/// from fetched config (absent until then), and every inbound session
/// payload becomes exactly one `SessionUpdated` dispatch.
#[function_component(ConnectedChannel)]
fn connected_channel() -> Html {
    let store = use_store();

    let url = store.state.config.as_ref().map(|c| c.websocket_url.clone());
    let on_session = {
        let dispatch = store.dispatch.clone();
        Callback::from(move |session| dispatch.emit(Action::SessionUpdated(session)))
    };

    html! { <SessionWebsocket {url} {on_session} /> }
}
