use yew::prelude::*;
use yew_router::prelude::*;

use retrospect::store::NavigatorHandle;

use crate::pages::{HomePage, RetroPage};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/retros/:id")]
    Retro { id: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <HomePage /> },
        Route::Retro { id } => html! { <RetroPage id={id} /> },
        Route::NotFound => html! { <div class="p-8">{ "404 Not Found" }</div> },
    }
}

#[derive(Properties, PartialEq)]
pub struct NavigatorBridgeProps {
    pub handle: NavigatorHandle,
}

/// Connects the store's navigation sink to the router.
///
/// The store is built before the router exists, so `Action::Navigate`
/// flows through a late-bound [`NavigatorHandle`]; this component binds it
/// once the router context is up. Renders nothing.
#[function_component(NavigatorBridge)]
pub fn navigator_bridge(props: &NavigatorBridgeProps) -> Html {
    let navigator = use_navigator();

    {
        let handle = props.handle.clone();
        use_effect_with(navigator, move |navigator| {
            if let Some(navigator) = navigator.clone() {
                handle.bind(move |path: &str| match Route::recognize(path) {
                    Some(route) => navigator.push(&route),
                    None => navigator.push(&Route::NotFound),
                });
            }
        });
    }

    html! {}
}
