//! Inbound frame handling: decode one text frame and apply it to the view.
//!
//! Nothing here propagates an error past [`Dispatcher::dispatch`]: decode
//! failures are logged and dropped, and application errors are reported back
//! to the session as [`Dispatch::Close`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use super::messages::InboundEvent;
use crate::config::ClientConfig;
use crate::error::DecodeError;
use crate::view::render::{characters_content, player_info_content, players_content};
use crate::view::{Notice, RenderTarget, View};

/// What the session should do after a frame was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The view was updated by an event of this `type`.
    Applied(&'static str),
    /// Recognised but not for us, or an unknown `type`.
    Ignored,
    /// The frame could not be decoded and was dropped.
    Dropped,
    /// The server reported an error; the connection must be closed.
    Close(String),
}

/// A decoded frame, before it touches the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Payload with a truthy `error` field.
    ServerError(String),
    Event(InboundEvent),
    /// A JSON object without a string `type`.
    Untyped,
}

/// Routes decoded frames to render actions.
pub struct Dispatcher {
    view: Arc<dyn View>,
    selected_player: Option<String>,
}

impl Dispatcher {
    pub fn new(view: Arc<dyn View>, config: &ClientConfig) -> Self {
        Dispatcher {
            view,
            selected_player: config.player_id.clone(),
        }
    }

    /// Handle one raw text frame.
    pub fn dispatch(&self, raw: &str) -> Dispatch {
        match decode(raw) {
            Ok(Frame::ServerError(message)) => {
                error!(error = %message, "server reported an error, closing connection");
                Dispatch::Close(message)
            }
            Ok(Frame::Event(event)) => self.apply(event),
            Ok(Frame::Untyped) => {
                debug!("ignoring frame without a type");
                Dispatch::Ignored
            }
            Err(e) => {
                warn!(error = %e, "dropping inbound frame");
                Dispatch::Dropped
            }
        }
    }

    fn apply(&self, event: InboundEvent) -> Dispatch {
        let kind = event.kind();
        match event {
            InboundEvent::PlayersState { players } => {
                debug!(count = players.len(), "rendering players");
                self.view
                    .replace(RenderTarget::PlayersContainer, players_content(&players));
            }
            InboundEvent::CharactersList { characters } => {
                debug!(count = characters.len(), "rendering characters");
                self.view.replace(
                    RenderTarget::CharactersList,
                    characters_content(&characters),
                );
            }
            InboundEvent::NoCharacters { message } => {
                self.view.notify(Notice::Alert(message));
                self.view.reveal(RenderTarget::CreateCharacterButton);
            }
            InboundEvent::PlayerStateUpdate { player_id, state } => {
                if self.selected_player.as_deref() != Some(player_id.as_str()) {
                    debug!(player_id, "state update for another player");
                    return Dispatch::Ignored;
                }
                self.view
                    .replace(RenderTarget::PlayerInfo, player_info_content(&state));
            }
            InboundEvent::Redirect { url, message } => {
                self.view.notify(Notice::Redirect { url, message });
            }
            InboundEvent::Alert { message } => self.view.notify(Notice::Alert(message)),
            InboundEvent::GameStarted { lobby_id } => {
                self.view.notify(Notice::GameStarted { lobby_id });
            }
            InboundEvent::LobbyCreated {
                lobby_id,
                lobby_name,
            } => {
                self.view.notify(Notice::LobbyCreated {
                    lobby_id,
                    lobby_name,
                });
            }
            InboundEvent::GameEnded { message }
            | InboundEvent::LobbyDeleted { message }
            | InboundEvent::ReadyAck { message }
            | InboundEvent::UnreadyAck { message }
            | InboundEvent::LobbyDeletedAck { message } => {
                self.view.notify(Notice::Info(message));
            }
            InboundEvent::Error { message } => {
                warn!(reason = %message, "server rejected a command");
                self.view.notify(Notice::ServerError(message));
            }
            InboundEvent::Unknown => {
                debug!("ignoring unknown message type");
                return Dispatch::Ignored;
            }
        }
        Dispatch::Applied(kind)
    }
}

/// Decode a raw text frame.
pub fn decode(raw: &str) -> Result<Frame, DecodeError> {
    let value: Value = serde_json::from_str(raw).map_err(DecodeError::Json)?;
    let Value::Object(map) = &value else {
        return Err(DecodeError::NotAnObject);
    };

    if let Some(err) = map.get("error").filter(|v| is_truthy(v)) {
        let message = match err {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Ok(Frame::ServerError(message));
    }

    let Some(kind) = map.get("type").and_then(Value::as_str) else {
        return Ok(Frame::Untyped);
    };
    let kind = kind.to_string();

    serde_json::from_value(value)
        .map(Frame::Event)
        .map_err(|source| DecodeError::Payload { kind, source })
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
