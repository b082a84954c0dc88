use yew::prelude::*;

use retrospect::store::Action;

use crate::providers::use_store;

/// Landing page: join a retro by id. Navigation goes through the store so
/// the analytics group sees it too.
#[function_component(HomePage)]
pub fn home_page() -> Html {
    let store = use_store();
    let retro_id = use_state(String::new);

    let on_input = {
        let retro_id = retro_id.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                retro_id.set(input.value());
            }
        })
    };

    let join = {
        let retro_id = retro_id.clone();
        let dispatch = store.dispatch.clone();
        Callback::from(move |_| {
            let id = retro_id.trim().to_string();
            if !id.is_empty() {
                dispatch.emit(Action::Navigate(format!("/retros/{id}")));
            }
        })
    };

    // Stack the form on narrow screens
    let form_classes = if store.state.viewport.is_mobile_640 {
        "flex flex-col space-y-2"
    } else {
        "flex space-x-2"
    };

    html! {
        <div class="p-8 max-w-xl mx-auto">
            <h1 class="text-2xl font-bold mb-4 text-gray-900 dark:text-gray-100">
                { "Join a retro" }
            </h1>

            <div class={form_classes}>
                <input
                    type="text"
                    class="flex-1 px-3 py-2 border border-gray-300 rounded focus:outline-none focus:ring-2 focus:ring-blue-500"
                    placeholder="Retro id, e.g. Abc12345"
                    value={(*retro_id).clone()}
                    oninput={on_input}
                />
                <button
                    class="bg-blue-600 text-white px-4 py-2 rounded hover:bg-blue-700 cursor-pointer"
                    onclick={join}
                >
                    { "Join" }
                </button>
            </div>
        </div>
    }
}
