//! WebSocket module — the live connection to the game server.
//!
//! - [`messages`]: Handshake, command and event wire types.
//! - [`dispatch`]: Decoding inbound frames into render actions.
//! - [`session`]: A single connection's lifetime.
//! - [`client`]: Supervisor with start/stop and fixed-delay reconnect.

pub mod client;
pub mod dispatch;
pub mod messages;
pub mod session;

pub use client::{ClientHandle, RealtimeViewClient};
pub use dispatch::{Dispatch, Dispatcher};
pub use messages::{ClientCommand, Handshake, InboundEvent};
pub use session::ConnectionPhase;
