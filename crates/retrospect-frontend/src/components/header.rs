use yew::prelude::*;

use retrospect::store::Action;

use crate::providers::theme::Theme;
use crate::providers::{use_store, use_theme};

/// Top bar: brand (navigates home through the store), the server-not-found
/// banner, and the theme toggle.
#[function_component(Header)]
pub fn header() -> Html {
    let store = use_store();
    let theme = use_theme();

    let go_home = {
        let dispatch = store.dispatch.clone();
        Callback::from(move |_| dispatch.emit(Action::Navigate("/".to_string())))
    };

    let toggle_theme = {
        let toggle = theme.toggle.clone();
        Callback::from(move |_| toggle.emit(()))
    };

    html! {
        <header class="flex items-center justify-between px-4 py-3 border-b border-gray-200 dark:border-gray-700">
            <button
                class="text-xl font-bold text-gray-900 dark:text-gray-100 cursor-pointer"
                onclick={go_home}
            >
                { "Retrospect" }
            </button>

            {
                if store.state.api_server_not_found {
                    html! {
                        <div class="px-3 py-1 bg-red-100 text-red-700 rounded text-sm">
                            { "Cannot reach the server. Retros will not load." }
                        </div>
                    }
                } else {
                    html! {}
                }
            }

            <button
                class="px-3 py-1 rounded border border-gray-300 dark:border-gray-600 text-sm"
                onclick={toggle_theme}
            >
                { match theme.theme {
                    Theme::Light => "Dark mode",
                    Theme::Dark => "Light mode",
                }}
            </button>
        </header>
    }
}
