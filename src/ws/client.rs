//! The reconnecting view client.
//!
//! [`RealtimeViewClient::start`] spawns a supervisor task that owns the
//! connection and the reconnect timer, and returns a [`ClientHandle`] for
//! observing the phase, sending commands and stopping.
//!
//! ```rust,ignore
//! let view = Arc::new(MemoryView::new());
//! let config = ClientConfig::master("ws://localhost:8000").with_token(token);
//! let handle = RealtimeViewClient::new(config, view.clone()).start()?;
//! // ... later
//! handle.stop().await;
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use url::Url;

use super::dispatch::Dispatcher;
use super::messages::{ClientCommand, Handshake};
use super::session::{ConnectionPhase, Session, SessionEnd, stop_requested};
use crate::config::{ClientConfig, MIN_RECONNECT_DELAY};
use crate::error::{ClientError, Result};
use crate::view::View;

/// Owns one connection at a time and reconnects after every close.
pub struct RealtimeViewClient {
    config: ClientConfig,
    view: Arc<dyn View>,
}

impl RealtimeViewClient {
    pub fn new(config: ClientConfig, view: Arc<dyn View>) -> Self {
        RealtimeViewClient { config, view }
    }

    /// Spawn the supervisor on the current tokio runtime.
    ///
    /// Fails only if the configured server URL cannot be parsed.
    pub fn start(self) -> Result<ClientHandle> {
        let url = self.config.endpoint()?;
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (phase_tx, phase_rx) = watch::channel(ConnectionPhase::Disconnected);
        let (stop_tx, stop_rx) = watch::channel(false);

        let supervisor = Supervisor {
            url,
            handshake: Handshake::from_config(&self.config),
            dispatcher: Dispatcher::new(self.view, &self.config),
            reconnect_delay: self.config.reconnect_delay.max(MIN_RECONNECT_DELAY),
            commands: cmd_rx,
            phase: phase_tx,
            stop: stop_rx,
        };
        let task = tokio::spawn(supervisor.run());

        Ok(ClientHandle {
            cmd_tx,
            phase: phase_rx,
            stop: stop_tx,
            task: Some(task),
        })
    }
}

/// Control handle for a running client. Dropping it stops the client.
pub struct ClientHandle {
    cmd_tx: mpsc::UnboundedSender<ClientCommand>,
    phase: watch::Receiver<ConnectionPhase>,
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ClientHandle {
    /// Current connection phase.
    pub fn phase(&self) -> ConnectionPhase {
        *self.phase.borrow()
    }

    /// A receiver that observes every phase change.
    pub fn watch_phase(&self) -> watch::Receiver<ConnectionPhase> {
        self.phase.clone()
    }

    /// Send a command on the open connection.
    ///
    /// Nothing is queued for later: without an open connection this fails
    /// with [`ClientError::NotConnected`].
    pub fn send(&self, command: ClientCommand) -> Result<()> {
        if self.is_stopped() {
            return Err(ClientError::Stopped);
        }
        if self.phase() != ConnectionPhase::Open {
            return Err(ClientError::NotConnected);
        }
        self.cmd_tx.send(command).map_err(|_| ClientError::Stopped)
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow() || self.task.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Stop reconnecting, close any open connection and wait for the
    /// supervisor to exit.
    pub async fn stop(mut self) {
        self.stop.send_replace(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "client task ended abnormally");
            }
        }
    }
}

struct Supervisor {
    url: Url,
    handshake: Handshake,
    dispatcher: Dispatcher,
    reconnect_delay: Duration,
    commands: mpsc::UnboundedReceiver<ClientCommand>,
    phase: watch::Sender<ConnectionPhase>,
    stop: watch::Receiver<bool>,
}

impl Supervisor {
    /// The single reconnection path: every session end, whatever its cause,
    /// lands here and arms exactly one delayed retry.
    async fn run(mut self) {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            let end = Session {
                url: &self.url,
                handshake: &self.handshake,
                dispatcher: &self.dispatcher,
                commands: &mut self.commands,
                phase: &self.phase,
                stop: &mut self.stop,
            }
            .run()
            .await;

            match end {
                Ok(SessionEnd::Stopped) => break,
                Ok(SessionEnd::Closed) => info!(attempt, "connection closed"),
                Ok(SessionEnd::ServerError(reason)) => {
                    warn!(attempt, %reason, "connection closed after server error");
                }
                Err(e) => warn!(attempt, error = %e, "connection failed"),
            }

            self.phase.send_replace(ConnectionPhase::Closed);
            info!(
                delay_ms = self.reconnect_delay.as_millis() as u64,
                "reconnecting after delay"
            );

            tokio::select! {
                _ = tokio::time::sleep(self.reconnect_delay) => {}
                _ = stop_requested(&mut self.stop) => break,
            }
        }

        self.phase.send_replace(ConnectionPhase::Disconnected);
        info!("client stopped");
    }
}
