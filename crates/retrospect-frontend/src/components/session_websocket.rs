use futures::channel::oneshot;
use futures::{FutureExt, Stream, StreamExt, select};
use gloo_net::websocket::{Message, WebSocketError, futures::WebSocket};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use retrospect::data::Session;
use retrospect::errors::ChannelError;
use retrospect::log::{info, warn};
use retrospect::serde_json;

use crate::components::ConnectionIndicator;

const RECONNECT_DELAY_MS: u32 = 3_000;

#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error(String),
}

#[derive(Properties, PartialEq)]
pub struct SessionWebsocketProps {
    /// Channel endpoint; absent until runtime config has been fetched.
    pub url: Option<String>,
    /// Invoked exactly once per inbound session payload, in receipt order.
    pub on_session: Callback<Session>,
}

/// The live-session channel.
///
/// Owns a websocket to the session endpoint and forwards every inbound
/// session payload to `on_session` with no buffering and no backpressure.
/// Malformed frames are logged and skipped. On error or close it retries
/// after a fixed delay; changing the URL or unmounting fires the cancel
/// channel, which tears the reader task down immediately and drops the
/// socket.
#[function_component(SessionWebsocket)]
pub fn session_websocket(props: &SessionWebsocketProps) -> Html {
    let connection = use_state(|| ConnectionState::Disconnected);

    {
        let connection = connection.clone();
        let on_session = props.on_session.clone();
        use_effect_with(props.url.clone(), move |url: &Option<String>| {
            let mut cancel_tx = None;
            if let Some(url) = url.clone() {
                let (tx, rx) = oneshot::channel();
                cancel_tx = Some(tx);
                spawn_local(run_channel(url, connection, on_session, rx));
            }
            move || {
                // Wakes the reader even while it is parked on the socket
                if let Some(tx) = cancel_tx {
                    let _ = tx.send(());
                }
            }
        });
    }

    html! { <ConnectionIndicator state={(*connection).clone()} /> }
}

enum PumpEnd {
    Cancelled,
    StreamEnded,
    Failed(String),
}

/// Forwards inbound frames to `on_session` until the stream ends, the
/// socket errors, or `cancel` fires. One emit per well-formed frame, in
/// receipt order; malformed frames are logged and skipped.
async fn pump_session_frames<S>(
    read: &mut S,
    mut cancel: &mut oneshot::Receiver<()>,
    on_session: &Callback<Session>,
) -> PumpEnd
where
    S: Stream<Item = Result<Message, WebSocketError>> + Unpin,
{
    loop {
        let frame = select! {
            frame = read.next().fuse() => frame,
            _ = cancel => return PumpEnd::Cancelled,
        };
        let Some(frame) = frame else {
            return PumpEnd::StreamEnded;
        };
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<Session>(&text) {
                Ok(session) => on_session.emit(session),
                Err(err) => {
                    let err = ChannelError::BadPayload(err);
                    warn!(%err, "skipping session frame");
                }
            },
            Ok(Message::Bytes(_)) => {
                // The session channel is text-only
            }
            Err(e) => return PumpEnd::Failed(format!("WebSocket error: {e:?}")),
        }
    }
}

async fn run_channel(
    url: String,
    connection: UseStateHandle<ConnectionState>,
    on_session: Callback<Session>,
    mut cancel: oneshot::Receiver<()>,
) {
    loop {
        connection.set(ConnectionState::Connecting);

        match WebSocket::open(&url) {
            Ok(ws) => {
                info!(%url, "session channel open");
                connection.set(ConnectionState::Connected);

                // Keep the write half alive or the socket closes under us
                let (_write, mut read) = ws.split();
                match pump_session_frames(&mut read, &mut cancel, &on_session).await {
                    // Returning drops both halves, which closes the socket
                    PumpEnd::Cancelled => return,
                    PumpEnd::StreamEnded => {}
                    PumpEnd::Failed(reason) => {
                        connection.set(ConnectionState::Error(reason));
                    }
                }
            }
            Err(e) => {
                connection.set(ConnectionState::Error(format!("Failed to connect: {e:?}")));
            }
        }

        connection.set(ConnectionState::Disconnected);
        select! {
            _ = TimeoutFuture::new(RECONNECT_DELAY_MS).fuse() => {}
            _ = &mut cancel => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::executor::block_on;
    use futures::stream;

    fn session_json(name: &str) -> String {
        format!(r#"{{"id": "S1234567", "name": "{name}"}}"#)
    }

    fn collect_names() -> (Callback<Session>, Rc<RefCell<Vec<String>>>) {
        let names = Rc::new(RefCell::new(Vec::new()));
        let on_session = {
            let names = names.clone();
            Callback::from(move |session: Session| names.borrow_mut().push(session.name))
        };
        (on_session, names)
    }

    #[test]
    fn test_each_frame_emits_once_in_receipt_order() {
        let frames: Vec<Result<Message, WebSocketError>> = vec![
            Ok(Message::Text(session_json("one"))),
            Ok(Message::Text(session_json("two"))),
            Ok(Message::Text(session_json("three"))),
        ];
        let mut read = stream::iter(frames);
        let (_tx, mut cancel) = oneshot::channel();
        let (on_session, names) = collect_names();

        let end = block_on(pump_session_frames(&mut read, &mut cancel, &on_session));

        assert!(matches!(end, PumpEnd::StreamEnded));
        assert_eq!(*names.borrow(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_malformed_frames_are_skipped() {
        let frames: Vec<Result<Message, WebSocketError>> = vec![
            Ok(Message::Text("not json".into())),
            Ok(Message::Text(session_json("good"))),
            Ok(Message::Bytes(vec![1, 2, 3])),
        ];
        let mut read = stream::iter(frames);
        let (_tx, mut cancel) = oneshot::channel();
        let (on_session, names) = collect_names();

        let end = block_on(pump_session_frames(&mut read, &mut cancel, &on_session));

        assert!(matches!(end, PumpEnd::StreamEnded));
        assert_eq!(*names.borrow(), vec!["good"]);
    }

    #[test]
    fn test_cancel_wakes_a_parked_reader() {
        // The stream never yields, so only the cancel channel can end the
        // pump. Before the fix a teardown could not reach a reader parked
        // here.
        let mut read = stream::pending::<Result<Message, WebSocketError>>();
        let (tx, mut cancel) = oneshot::channel();
        let _ = tx.send(());
        let (on_session, names) = collect_names();

        let end = block_on(pump_session_frames(&mut read, &mut cancel, &on_session));

        assert!(matches!(end, PumpEnd::Cancelled));
        assert!(names.borrow().is_empty());
    }

    #[test]
    fn test_dropped_cancel_sender_also_ends_the_pump() {
        let mut read = stream::pending::<Result<Message, WebSocketError>>();
        let (tx, mut cancel) = oneshot::channel::<()>();
        drop(tx);
        let (on_session, names) = collect_names();

        let end = block_on(pump_session_frames(&mut read, &mut cancel, &on_session));

        assert!(matches!(end, PumpEnd::Cancelled));
        assert!(names.borrow().is_empty());
    }

    #[test]
    fn test_socket_error_ends_the_pump_after_emitting() {
        let frames: Vec<Result<Message, WebSocketError>> = vec![
            Ok(Message::Text(session_json("good"))),
            Err(WebSocketError::ConnectionError),
        ];
        let mut read = stream::iter(frames);
        let (_tx, mut cancel) = oneshot::channel();
        let (on_session, names) = collect_names();

        let end = block_on(pump_session_frames(&mut read, &mut cancel, &on_session));

        assert!(matches!(end, PumpEnd::Failed(_)));
        assert_eq!(*names.borrow(), vec!["good"]);
    }
}
