use yew::prelude::*;

use retrospect::store::{Action, AppState, Store};

/// What components see of the store: the latest snapshot plus the single
/// dispatch entry point. State is never mutated directly.
#[derive(Clone, PartialEq)]
pub struct StoreContext {
    pub state: AppState,
    pub dispatch: Callback<Action>,
}

#[derive(Properties, PartialEq)]
pub struct StoreProviderProps {
    pub store: Store,
    pub children: Children,
}

/// Exposes the singleton store to the component tree.
///
/// Subscribes once on mount and unsubscribes on unmount; every dispatch
/// cycle pushes a fresh snapshot into context, which is what re-renders
/// the tree.
#[function_component(StoreProvider)]
pub fn store_provider(props: &StoreProviderProps) -> Html {
    let snapshot = use_state(|| props.store.snapshot());

    {
        let snapshot = snapshot.clone();
        let store = props.store.clone();
        use_effect_with((), move |_| {
            let id = store.subscribe(move |state| snapshot.set(state.clone()));
            move || store.unsubscribe(id)
        });
    }

    let dispatch = {
        let store = props.store.clone();
        Callback::from(move |action: Action| store.dispatch(action))
    };

    let context = StoreContext {
        state: (*snapshot).clone(),
        dispatch,
    };

    html! {
        <ContextProvider<StoreContext> context={context}>
            {props.children.clone()}
        </ContextProvider<StoreContext>>
    }
}

#[hook]
pub fn use_store() -> StoreContext {
    use_context::<StoreContext>().expect("use_store must be used within a StoreProvider")
}
