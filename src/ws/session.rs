//! One connection's lifetime: open, handshake, read until close.

use std::fmt;
use std::time::Duration;

use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

use super::dispatch::{Dispatch, Dispatcher};
use super::messages::{ClientCommand, Handshake};
use crate::error::{ClientError, Result};

/// How long a closing handshake may take before the socket is dropped.
pub(crate) const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Lifecycle phase of the client's current connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Not started, or stopped.
    Disconnected,
    Connecting,
    /// Transport is open; the handshake has been (or is being) sent.
    Open,
    /// Previous connection is gone; a reconnect is pending.
    Closed,
}

impl ConnectionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionPhase::Disconnected => "disconnected",
            ConnectionPhase::Connecting => "connecting",
            ConnectionPhase::Open => "open",
            ConnectionPhase::Closed => "closed",
        }
    }
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a session ended without a transport error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionEnd {
    /// Server closed the socket or the stream ended.
    Closed,
    /// The server sent an error payload and we closed.
    ServerError(String),
    /// The client was asked to stop.
    Stopped,
}

/// Everything a session borrows from the supervisor.
pub(crate) struct Session<'a> {
    pub url: &'a Url,
    pub handshake: &'a Handshake,
    pub dispatcher: &'a Dispatcher,
    pub commands: &'a mut mpsc::UnboundedReceiver<ClientCommand>,
    pub phase: &'a watch::Sender<ConnectionPhase>,
    pub stop: &'a mut watch::Receiver<bool>,
}

/// Resolves once a stop was requested or the handle is gone.
pub(crate) async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}

/// Send our close frame and flush, giving up after [`CLOSE_TIMEOUT`] so a
/// peer that stopped reading cannot hold up the reconnect.
pub(crate) async fn close_sink<S>(sink: &mut S)
where
    S: Sink<Message> + Unpin,
{
    if tokio::time::timeout(CLOSE_TIMEOUT, sink.close()).await.is_err() {
        debug!("close handshake timed out");
    }
}

impl Session<'_> {
    /// Connect, send the handshake and process frames until the connection
    /// ends. Every return means the socket is closed or dropped.
    pub(crate) async fn run(self) -> Result<SessionEnd> {
        let Session {
            url,
            handshake,
            dispatcher,
            commands,
            phase,
            stop,
        } = self;

        phase.send_replace(ConnectionPhase::Connecting);
        debug!(%url, "connecting");

        let socket = tokio::select! {
            res = connect_async(url.as_str()) => match res {
                Ok((socket, _response)) => socket,
                Err(source) => {
                    return Err(ClientError::Connect {
                        url: url.to_string(),
                        source,
                    });
                }
            },
            _ = stop_requested(stop) => return Ok(SessionEnd::Stopped),
        };
        let (mut sink, mut stream) = socket.split();

        // Commands issued while no connection was open are not replayed.
        let mut stale = 0usize;
        while commands.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            debug!(stale, "discarded commands queued before open");
        }

        phase.send_replace(ConnectionPhase::Open);
        info!(%url, role = %handshake.role, "connected");

        let hello = handshake.to_json()?;
        sink.send(Message::Text(hello.into())).await?;

        loop {
            tokio::select! {
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Dispatch::Close(reason) = dispatcher.dispatch(text.as_str()) {
                            close_sink(&mut sink).await;
                            return Ok(SessionEnd::ServerError(reason));
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        debug!(?frame, "server sent close");
                        // Flushes tungstenite's queued close reply.
                        close_sink(&mut sink).await;
                        return Ok(SessionEnd::Closed);
                    }
                    // Binary frames carry nothing we render; ping/pong is
                    // answered by tungstenite.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        close_sink(&mut sink).await;
                        return Err(ClientError::Transport(e));
                    }
                    None => return Ok(SessionEnd::Closed),
                },
                Some(cmd) = commands.recv() => match cmd.to_json() {
                    Ok(json) => sink.send(Message::Text(json.into())).await?,
                    Err(e) => warn!(error = %e, "failed to encode command"),
                },
                _ = stop_requested(stop) => {
                    close_sink(&mut sink).await;
                    return Ok(SessionEnd::Stopped);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display() {
        assert_eq!(ConnectionPhase::Open.to_string(), "open");
        assert_eq!(ConnectionPhase::Disconnected.as_str(), "disconnected");
    }

    /// A sink whose close never completes.
    struct StuckSink;

    impl Sink<Message> for StuckSink {
        type Error = ();

        fn poll_ready(
            self: std::pin::Pin<&mut Self>,
            _: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::result::Result<(), ()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn start_send(self: std::pin::Pin<&mut Self>, _: Message) -> std::result::Result<(), ()> {
            Ok(())
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::result::Result<(), ()>> {
            std::task::Poll::Pending
        }

        fn poll_close(
            self: std::pin::Pin<&mut Self>,
            _: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::result::Result<(), ()>> {
            std::task::Poll::Pending
        }
    }

    #[tokio::test]
    async fn close_gives_up_on_a_stuck_peer() {
        let started = std::time::Instant::now();
        close_sink(&mut StuckSink).await;
        let elapsed = started.elapsed();
        assert!(elapsed >= CLOSE_TIMEOUT);
        assert!(elapsed < CLOSE_TIMEOUT * 3, "took {elapsed:?}");
    }

    #[tokio::test]
    async fn stop_requested_fires_on_signal_and_on_drop() {
        let (tx, mut rx) = watch::channel(false);
        tx.send_replace(true);
        stop_requested(&mut rx).await;

        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        stop_requested(&mut rx).await;
    }
}
