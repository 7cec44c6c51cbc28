//! Real-time view client for the RPG lobby server.
//!
//! Connects to the server's `/ws` endpoint, identifies itself with a single
//! handshake and renders every push (player stats, character lists, state
//! updates, notices) into a [`view::View`]. Connections that close are
//! retried after a fixed delay until the client is stopped.

pub mod config;
pub mod error;
pub mod view;
pub mod ws;

pub use config::{ClientConfig, Role};
pub use error::{ClientError, DecodeError};
pub use view::{Content, MemoryView, Notice, RenderTarget, TerminalView, View};
pub use ws::{ClientCommand, ClientHandle, ConnectionPhase, RealtimeViewClient};
