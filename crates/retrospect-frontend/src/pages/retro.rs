use yew::prelude::*;

use retrospect::data::{ItemCategory, RetroItem, Session};
use retrospect::id::SessionId;
use retrospect::log::info;
use retrospect::store::Action;

use crate::providers::api::use_api;
use crate::providers::use_store;

#[derive(Properties, PartialEq)]
pub struct RetroProps {
    pub id: String,
}

/// A retro session.
///
/// Fetches the session once over HTTP for the initial render; afterwards
/// the live channel keeps the store's session slice current and this page
/// just renders it.
#[function_component(RetroPage)]
pub fn retro_page(props: &RetroProps) -> Html {
    let store = use_store();
    let api = use_api();
    let error_msg = use_state(|| None::<String>);

    {
        let client = api.client.clone();
        let dispatch = store.dispatch.clone();
        let error_msg = error_msg.clone();
        use_effect_with(props.id.clone(), move |id: &String| {
            let id = SessionId::from(id.as_str());
            wasm_bindgen_futures::spawn_local(async move {
                error_msg.set(None);
                match client.fetch_session(&id).await {
                    Ok(session) => {
                        info!(session = %session.id, "session loaded");
                        dispatch.emit(Action::SessionUpdated(session));
                    }
                    Err(err) => {
                        error_msg.set(Some(format!("Failed to load retro: {err}")));
                    }
                }
            });
        });
    }

    let session = store
        .state
        .session
        .as_ref()
        .filter(|s| s.id.as_str() == props.id);

    html! {
        <div class="p-8 max-w-4xl mx-auto">
            {
                if let Some(error) = error_msg.as_ref() {
                    html! {
                        <div class="bg-red-50 border border-red-200 rounded-lg p-6 text-red-700">
                            { error }
                        </div>
                    }
                } else if let Some(session) = session {
                    render_session(session, store.state.viewport.is_mobile_640)
                } else {
                    html! {
                        <div class="text-center py-12 text-gray-500">
                            { "Loading retro..." }
                        </div>
                    }
                }
            }
        </div>
    }
}

fn render_session(session: &Session, single_column: bool) -> Html {
    let columns = [
        ("Happy", ItemCategory::Happy),
        ("Meh", ItemCategory::Meh),
        ("Sad", ItemCategory::Sad),
    ];

    let layout = if single_column {
        "flex flex-col space-y-4"
    } else {
        "grid grid-cols-3 gap-4"
    };

    html! {
        <>
            <div class="mb-6 flex items-baseline justify-between">
                <h1 class="text-3xl font-bold text-gray-900 dark:text-gray-100">
                    { &session.name }
                </h1>
                <span class="text-sm text-gray-500">
                    { format!("{} here", session.participants.len()) }
                </span>
            </div>

            <div class={layout}>
                {
                    columns.iter().map(|(title, category)| {
                        let items: Vec<&RetroItem> = session
                            .items
                            .iter()
                            .filter(|item| item.category == *category)
                            .collect();
                        html! {
                            <div class="bg-white dark:bg-gray-800 rounded-lg p-4 shadow">
                                <h2 class="font-semibold mb-3 text-gray-700 dark:text-gray-200">
                                    { *title }
                                </h2>
                                {
                                    items.iter().map(|item| html! {
                                        <div class={classes!(
                                            "border-b", "border-gray-100", "py-2", "text-sm",
                                            item.done.then_some("line-through text-gray-400"),
                                        )}>
                                            { &item.description }
                                            {
                                                if item.votes > 0 {
                                                    html! {
                                                        <span class="ml-2 text-xs text-blue-600">
                                                            { format!("+{}", item.votes) }
                                                        </span>
                                                    }
                                                } else {
                                                    html! {}
                                                }
                                            }
                                        </div>
                                    }).collect::<Html>()
                                }
                            </div>
                        }
                    }).collect::<Html>()
                }
            </div>
        </>
    }
}
