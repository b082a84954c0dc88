use std::rc::Rc;

use yew::prelude::*;

use retrospect::api::RetroApi;

/// Shares the singleton API client with the component tree. The client is
/// built once at bootstrap (its accessors track config and token changes
/// on their own), so pages only ever need this one handle.
#[derive(Clone)]
pub struct ApiContext {
    pub client: Rc<dyn RetroApi>,
}

impl PartialEq for ApiContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}

#[derive(Properties, PartialEq)]
pub struct ApiProviderProps {
    pub context: ApiContext,
    pub children: Children,
}

#[function_component(ApiProvider)]
pub fn api_provider(props: &ApiProviderProps) -> Html {
    html! {
        <ContextProvider<ApiContext> context={props.context.clone()}>
            {props.children.clone()}
        </ContextProvider<ApiContext>>
    }
}

#[hook]
pub fn use_api() -> ApiContext {
    use_context::<ApiContext>().expect("use_api must be used within an ApiProvider")
}
