//! The client-side application store.
//!
//! A flux-style container: a single [`AppState`], mutated only through
//! [`Action`]s submitted to [`Store::dispatch`]. Registered
//! [`HandlerGroup`]s observe every action in registration order and update
//! disjoint slices of state; cross-slice effects happen only by enqueueing
//! further actions, never by one group calling another.
//!
//! Exactly one store exists per application lifetime. It is constructed in
//! `main()` before the component tree mounts and handed down explicitly;
//! nothing in this module reaches for a global.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::data::{Config, Session, ViewportState};
use crate::errors::HandlerError;
use crate::log::{error, warn};

/// Every message the store understands.
///
/// Replaces runtime-bound action creators with one typed entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Kick off the config fetch. Dispatched exactly once, on mount,
    /// before any other action.
    RetrieveConfig,
    /// The config fetch completed.
    ConfigReceived(Config),
    /// The API server was unreachable at the network level.
    ApiServerNotFound,
    /// The live-session channel delivered a session payload.
    SessionUpdated(Session),
    /// The window was resized (or just measured, at mount).
    WindowSizeUpdated(ViewportState),
    /// Request a client-side route change.
    Navigate(String),
}

/// The single application state.
///
/// Slices are owned by exactly one handler group each: `config` by the api
/// group, everything else by the main group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub config: Option<Config>,
    pub api_server_not_found: bool,
    pub session: Option<Session>,
    pub viewport: ViewportState,
}

/// What a handler group may touch while observing an action: the state,
/// and a queue of follow-up actions that run after the current one.
pub struct HandlerContext<'a> {
    state: &'a mut AppState,
    followups: &'a mut VecDeque<Action>,
}

impl HandlerContext<'_> {
    pub fn state(&self) -> &AppState {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        self.state
    }

    /// Enqueues a follow-up action. It is processed after the current
    /// action has been observed by all groups, in enqueue order.
    pub fn dispatch(&mut self, action: Action) {
        self.followups.push_back(action);
    }
}

/// A named group of reducers/effects reacting to dispatched actions.
///
/// Groups observe actions in registration order but must not depend on a
/// sibling's completion for correctness. A returned `Err` is logged and
/// does not stop the remaining groups from observing the action.
pub trait HandlerGroup {
    fn name(&self) -> &'static str;

    fn handle(
        &mut self,
        action: &Action,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<(), HandlerError>;
}

/// Handle for unsubscribing a store listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct StoreInner {
    state: RefCell<AppState>,
    handlers: RefCell<Vec<Box<dyn HandlerGroup>>>,
    queue: RefCell<VecDeque<Action>>,
    dispatching: Cell<bool>,
    subscribers: RefCell<Vec<(SubscriptionId, Rc<dyn Fn(&AppState)>)>>,
    next_subscription: Cell<u64>,
}

/// The application store. Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(AppState::default()),
                handlers: RefCell::new(Vec::new()),
                queue: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
                subscribers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    /// Registers a handler group. Groups observe actions in registration
    /// order; register before the first dispatch.
    pub fn register(&self, group: Box<dyn HandlerGroup>) {
        self.inner.handlers.borrow_mut().push(group);
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Submits an action.
    ///
    /// Re-entrant: a dispatch issued while another is in flight (from a
    /// channel callback, a handler follow-up, or a subscriber) is queued
    /// and processed in receipt order rather than recursing.
    pub fn dispatch(&self, action: Action) {
        self.inner.queue.borrow_mut().push_back(action);
        if self.inner.dispatching.get() {
            return;
        }
        self.inner.dispatching.set(true);

        // Alternate draining and notifying until subscribers stop
        // enqueueing. `dispatching` stays set through notification, so a
        // dispatch from a subscriber queues for the next round instead of
        // recursing; every subscriber in a round sees the same snapshot.
        loop {
            self.drain();

            let snapshot = self.snapshot();
            let subscribers: Vec<Rc<dyn Fn(&AppState)>> = self
                .inner
                .subscribers
                .borrow()
                .iter()
                .map(|(_, f)| f.clone())
                .collect();
            for notify in subscribers {
                notify(&snapshot);
            }

            if self.inner.queue.borrow().is_empty() {
                break;
            }
        }
        self.inner.dispatching.set(false);
    }

    fn drain(&self) {
        loop {
            let action = self.inner.queue.borrow_mut().pop_front();
            let Some(action) = action else {
                break;
            };

            let mut followups = VecDeque::new();
            {
                let mut handlers = self.inner.handlers.borrow_mut();
                let mut state = self.inner.state.borrow_mut();
                let mut ctx = HandlerContext {
                    state: &mut *state,
                    followups: &mut followups,
                };
                for group in handlers.iter_mut() {
                    if let Err(err) = group.handle(&action, &mut ctx) {
                        // Isolation contract: a failing group must not
                        // keep its siblings from observing the action.
                        error!(group = group.name(), %err, ?action, "handler group failed");
                    }
                }
            }
            self.inner.queue.borrow_mut().append(&mut followups);
        }
    }

    /// Registers a listener called with a state snapshot after every
    /// dispatch cycle. Must be released with [`Store::unsubscribe`] when
    /// the listening component goes away.
    pub fn subscribe(&self, f: impl Fn(&AppState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner.subscribers.borrow_mut().push((id, Rc::new(f)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .subscribers
            .borrow_mut()
            .retain(|(sub_id, _)| *sub_id != id);
    }

    fn downgrade(&self) -> Weak<StoreInner> {
        Rc::downgrade(&self.inner)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

// Identity comparison so the store can ride in component props
impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

enum DispatchTarget {
    /// Not yet pointed at a store; actions are held back.
    Unbound { buffered: Vec<Action> },
    Bound { store: Weak<StoreInner> },
}

/// A late-bound dispatch handle.
///
/// The API client needs a way to dispatch (its not-found hook) before the
/// store exists, and the store needs the API client; `Dispatch` breaks the
/// cycle with an explicit unbound state. Actions sent while unbound are
/// buffered and flushed, in order, when [`Dispatch::bind`] runs during
/// bootstrap.
#[derive(Clone)]
pub struct Dispatch {
    target: Rc<RefCell<DispatchTarget>>,
}

impl Dispatch {
    pub fn deferred() -> Self {
        Self {
            target: Rc::new(RefCell::new(DispatchTarget::Unbound {
                buffered: Vec::new(),
            })),
        }
    }

    /// Points the handle at the store and flushes anything buffered while
    /// unbound. Holds the store weakly; the handle never keeps it alive.
    pub fn bind(&self, store: &Store) {
        let buffered = {
            let mut target = self.target.borrow_mut();
            match std::mem::replace(
                &mut *target,
                DispatchTarget::Bound {
                    store: store.downgrade(),
                },
            ) {
                DispatchTarget::Unbound { buffered } => buffered,
                DispatchTarget::Bound { .. } => Vec::new(),
            }
        };
        for action in buffered {
            store.dispatch(action);
        }
    }

    pub fn send(&self, action: Action) {
        let store = {
            let mut target = self.target.borrow_mut();
            match &mut *target {
                DispatchTarget::Unbound { buffered } => {
                    buffered.push(action);
                    return;
                }
                DispatchTarget::Bound { store } => match store.upgrade() {
                    Some(inner) => Store { inner },
                    None => {
                        warn!("dispatch target gone; action dropped");
                        return;
                    }
                },
            }
        };
        store.dispatch(action);
    }
}

/// Late-bound navigation sink.
///
/// The router only exists once the component tree is up, but the store is
/// built first; the bootstrap binds the real navigator after mount.
#[derive(Clone)]
pub struct NavigatorHandle {
    inner: Rc<RefCell<Option<Box<dyn Fn(&str)>>>>,
}

impl NavigatorHandle {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(None)),
        }
    }

    pub fn bind(&self, navigate: impl Fn(&str) + 'static) {
        *self.inner.borrow_mut() = Some(Box::new(navigate));
    }

    pub fn navigate(&self, path: &str) {
        match &*self.inner.borrow() {
            Some(navigate) => navigate(path),
            None => warn!(path, "navigation requested before the router was ready"),
        }
    }
}

impl Default for NavigatorHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for NavigatorHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// The main handler group: owns the session, server-not-found, and
/// viewport slices, and forwards navigation requests to the router.
pub struct MainHandler {
    navigator: NavigatorHandle,
}

impl MainHandler {
    pub fn new(navigator: NavigatorHandle) -> Self {
        Self { navigator }
    }
}

impl HandlerGroup for MainHandler {
    fn name(&self) -> &'static str {
        "main"
    }

    fn handle(
        &mut self,
        action: &Action,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<(), HandlerError> {
        match action {
            Action::ApiServerNotFound => {
                ctx.state_mut().api_server_not_found = true;
            }
            Action::ConfigReceived(_) => {
                // The server answered, so any earlier not-found is stale.
                ctx.state_mut().api_server_not_found = false;
            }
            Action::SessionUpdated(session) => {
                ctx.state_mut().session = Some(session.clone());
            }
            Action::WindowSizeUpdated(viewport) => {
                ctx.state_mut().viewport = *viewport;
            }
            Action::Navigate(path) => {
                self.navigator.navigate(path);
            }
            Action::RetrieveConfig => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SessionId;

    fn session(name: &str) -> Session {
        Session {
            id: SessionId::from_string("S1234567".to_string()),
            name: name.to_string(),
            participants: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Records every action it sees; optionally fails on each one.
    struct Recorder {
        name: &'static str,
        seen: Rc<RefCell<Vec<(&'static str, Action)>>>,
        fail: bool,
    }

    impl HandlerGroup for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn handle(
            &mut self,
            action: &Action,
            _ctx: &mut HandlerContext<'_>,
        ) -> Result<(), HandlerError> {
            self.seen.borrow_mut().push((self.name, action.clone()));
            if self.fail {
                return Err(HandlerError::Other("boom".to_string()));
            }
            Ok(())
        }
    }

    fn store_with_main() -> Store {
        let store = Store::new();
        store.register(Box::new(MainHandler::new(NavigatorHandle::new())));
        store
    }

    #[test]
    fn test_groups_observe_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let store = Store::new();
        for name in ["main", "api", "analytics"] {
            store.register(Box::new(Recorder {
                name,
                seen: seen.clone(),
                fail: false,
            }));
        }

        store.dispatch(Action::RetrieveConfig);

        let order: Vec<&str> = seen.borrow().iter().map(|(name, _)| *name).collect();
        assert_eq!(order, vec!["main", "api", "analytics"]);
    }

    #[test]
    fn test_failing_group_does_not_starve_siblings() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let store = Store::new();
        store.register(Box::new(Recorder {
            name: "broken",
            seen: seen.clone(),
            fail: true,
        }));
        store.register(Box::new(MainHandler::new(NavigatorHandle::new())));
        store.register(Box::new(Recorder {
            name: "after",
            seen: seen.clone(),
            fail: false,
        }));

        store.dispatch(Action::ApiServerNotFound);

        // The state slice behind the failing group still updated
        assert!(store.snapshot().api_server_not_found);
        let order: Vec<&str> = seen.borrow().iter().map(|(name, _)| *name).collect();
        assert_eq!(order, vec!["broken", "after"]);
    }

    #[test]
    fn test_not_found_touches_only_its_flag() {
        let store = store_with_main();
        let before = store.snapshot();

        store.dispatch(Action::ApiServerNotFound);

        let after = store.snapshot();
        assert!(after.api_server_not_found);
        assert_eq!(after.config, before.config);
        assert_eq!(after.session, before.session);
        assert_eq!(after.viewport, before.viewport);
    }

    #[test]
    fn test_session_updates_apply_in_receipt_order() {
        let store = store_with_main();

        store.dispatch(Action::SessionUpdated(session("first")));
        store.dispatch(Action::SessionUpdated(session("second")));
        store.dispatch(Action::SessionUpdated(session("third")));

        let state = store.snapshot();
        assert_eq!(state.session.unwrap().name, "third");
    }

    #[test]
    fn test_each_session_message_is_one_update() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let store = store_with_main();
        store.register(Box::new(Recorder {
            name: "observer",
            seen: seen.clone(),
            fail: false,
        }));

        for name in ["a", "b", "c"] {
            store.dispatch(Action::SessionUpdated(session(name)));
        }

        let names: Vec<String> = seen
            .borrow()
            .iter()
            .filter_map(|(_, action)| match action {
                Action::SessionUpdated(s) => Some(s.name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_viewport_action_updates_slice() {
        let store = store_with_main();

        store.dispatch(Action::WindowSizeUpdated(ViewportState::from_width(500)));
        let state = store.snapshot();
        assert!(state.viewport.is_mobile_640);
        assert!(state.viewport.is_mobile_1030);

        store.dispatch(Action::WindowSizeUpdated(ViewportState::from_width(1200)));
        let state = store.snapshot();
        assert!(!state.viewport.is_mobile_640);
        assert!(!state.viewport.is_mobile_1030);
    }

    #[test]
    fn test_nested_dispatch_is_queued_fifo() {
        /// Re-dispatches one follow-up the first time it sees the
        /// not-found action.
        struct Chainer {
            fired: bool,
        }

        impl HandlerGroup for Chainer {
            fn name(&self) -> &'static str {
                "chainer"
            }

            fn handle(
                &mut self,
                action: &Action,
                ctx: &mut HandlerContext<'_>,
            ) -> Result<(), HandlerError> {
                if matches!(action, Action::ApiServerNotFound) && !self.fired {
                    self.fired = true;
                    ctx.dispatch(Action::SessionUpdated(session("from-followup")));
                }
                Ok(())
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let store = store_with_main();
        store.register(Box::new(Chainer { fired: false }));
        store.register(Box::new(Recorder {
            name: "observer",
            seen: seen.clone(),
            fail: false,
        }));

        store.dispatch(Action::ApiServerNotFound);

        // Follow-up ran after the triggering action, through the same
        // pipeline
        let kinds: Vec<String> = seen
            .borrow()
            .iter()
            .map(|(_, action)| format!("{:?}", std::mem::discriminant(action)))
            .collect();
        assert_eq!(kinds.len(), 2);
        assert_eq!(store.snapshot().session.unwrap().name, "from-followup");
        assert!(store.snapshot().api_server_not_found);
    }

    #[test]
    fn test_subscriber_notified_per_cycle_and_silent_after_unsubscribe() {
        let store = store_with_main();
        let notifications = Rc::new(RefCell::new(0u32));

        let id = store.subscribe({
            let notifications = notifications.clone();
            move |_state| *notifications.borrow_mut() += 1
        });

        store.dispatch(Action::ApiServerNotFound);
        store.dispatch(Action::SessionUpdated(session("x")));
        assert_eq!(*notifications.borrow(), 2);

        store.unsubscribe(id);
        store.dispatch(Action::ApiServerNotFound);
        assert_eq!(*notifications.borrow(), 2);
    }

    #[test]
    fn test_subscriber_dispatch_queues_for_the_next_round() {
        let store = store_with_main();

        // The first subscriber dispatches once, from inside its own
        // notification. That action must not recurse: the second
        // subscriber sees the pre-follow-up snapshot first, then a fresh
        // one in the next round.
        let fired = Rc::new(Cell::new(false));
        store.subscribe({
            let fired = fired.clone();
            let store = store.clone();
            move |_state| {
                if !fired.get() {
                    fired.set(true);
                    store.dispatch(Action::SessionUpdated(session("nested")));
                }
            }
        });

        let snapshots = Rc::new(RefCell::new(Vec::new()));
        store.subscribe({
            let snapshots = snapshots.clone();
            move |state: &AppState| {
                snapshots
                    .borrow_mut()
                    .push(state.session.as_ref().map(|s| s.name.clone()));
            }
        });

        store.dispatch(Action::ApiServerNotFound);

        assert_eq!(
            *snapshots.borrow(),
            vec![None, Some("nested".to_string())]
        );
        let state = store.snapshot();
        assert!(state.api_server_not_found);
        assert_eq!(state.session.unwrap().name, "nested");
    }

    #[test]
    fn test_deferred_dispatch_buffers_until_bound() {
        let dispatch = Dispatch::deferred();

        // Sent before any store exists, like the not-found hook captured
        // by the API client at construction time
        dispatch.send(Action::ApiServerNotFound);
        dispatch.send(Action::SessionUpdated(session("early")));

        let store = store_with_main();
        dispatch.bind(&store);

        let state = store.snapshot();
        assert!(state.api_server_not_found);
        assert_eq!(state.session.unwrap().name, "early");

        // Bound sends go straight through
        dispatch.send(Action::SessionUpdated(session("late")));
        assert_eq!(store.snapshot().session.unwrap().name, "late");
    }

    #[test]
    fn test_navigate_reaches_bound_router() {
        let navigator = NavigatorHandle::new();
        let store = Store::new();
        store.register(Box::new(MainHandler::new(navigator.clone())));

        let visited = Rc::new(RefCell::new(Vec::new()));
        navigator.bind({
            let visited = visited.clone();
            move |path: &str| visited.borrow_mut().push(path.to_string())
        });

        store.dispatch(Action::Navigate("/retros/Abc12345".to_string()));
        assert_eq!(visited.borrow().as_slice(), ["/retros/Abc12345"]);
    }

    #[test]
    fn test_config_received_clears_not_found() {
        let store = store_with_main();
        store.dispatch(Action::ApiServerNotFound);
        assert!(store.snapshot().api_server_not_found);

        store.dispatch(Action::ConfigReceived(Config {
            api_base_url: "/api".to_string(),
            websocket_url: "ws://localhost/cable".to_string(),
            enable_analytics: false,
        }));
        assert!(!store.snapshot().api_server_not_found);
    }
}
