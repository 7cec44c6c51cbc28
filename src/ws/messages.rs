//! Wire types for the game server's `/ws` endpoint.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::{ClientConfig, Role};

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// First frame on every connection, identifying the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "connect")]
pub struct Handshake {
    pub role: Role,
    /// Serialized as `null` when absent; the server expects the key.
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lobby_id: Option<String>,
}

impl Handshake {
    pub fn from_config(config: &ClientConfig) -> Self {
        Handshake {
            role: config.role,
            token: config.token.clone(),
            player_id: config.player_id.clone(),
            lobby_id: config.lobby_id.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Commands a view may send once its connection is open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    PlayerUpdate { player_id: String, state: Value },
    PlayerReady { lobby_id: String },
    PlayerUnready,
    CreateLobby { lobby_name: String },
    StartGame { lobby_id: String },
    EndGame { lobby_id: String },
    DeleteLobby { lobby_id: String },
}

impl ClientCommand {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// A server push, discriminated by its `type` field.
///
/// The generic `{"error": ...}` shape carries no tag and is detected before
/// this enum is consulted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    PlayersState {
        #[serde(default, deserialize_with = "ordered_entries")]
        players: Vec<(String, PlayerEntry)>,
    },
    CharactersList {
        #[serde(default)]
        characters: Vec<CharacterRecord>,
    },
    NoCharacters {
        #[serde(default)]
        message: String,
    },
    PlayerStateUpdate {
        player_id: String,
        #[serde(default)]
        state: Value,
    },
    Redirect {
        url: String,
        #[serde(default)]
        message: Option<String>,
    },
    Alert {
        #[serde(default)]
        message: String,
    },
    GameStarted {
        lobby_id: String,
    },
    GameEnded {
        #[serde(default)]
        message: String,
    },
    LobbyCreated {
        lobby_id: String,
        #[serde(default)]
        lobby_name: String,
    },
    LobbyDeleted {
        #[serde(default)]
        message: String,
    },
    ReadyAck {
        #[serde(default)]
        message: String,
    },
    UnreadyAck {
        #[serde(default)]
        message: String,
    },
    LobbyDeletedAck {
        #[serde(default)]
        message: String,
    },
    /// A rejected command; unlike the untagged error shape it is not fatal.
    Error {
        #[serde(default)]
        message: String,
    },
    #[serde(other)]
    Unknown,
}

impl InboundEvent {
    /// The `type` tag this variant decodes from.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::PlayersState { .. } => "players_state",
            InboundEvent::CharactersList { .. } => "characters_list",
            InboundEvent::NoCharacters { .. } => "no_characters",
            InboundEvent::PlayerStateUpdate { .. } => "player_state_update",
            InboundEvent::Redirect { .. } => "redirect",
            InboundEvent::Alert { .. } => "alert",
            InboundEvent::GameStarted { .. } => "game_started",
            InboundEvent::GameEnded { .. } => "game_ended",
            InboundEvent::LobbyCreated { .. } => "lobby_created",
            InboundEvent::LobbyDeleted { .. } => "lobby_deleted",
            InboundEvent::ReadyAck { .. } => "ready_ack",
            InboundEvent::UnreadyAck { .. } => "unready_ack",
            InboundEvent::LobbyDeletedAck { .. } => "lobby_deleted_ack",
            InboundEvent::Error { .. } => "error",
            InboundEvent::Unknown => "unknown",
        }
    }
}

/// Displayed stats of one character.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlayerStats {
    #[serde(default)]
    pub vida: Value,
    #[serde(default)]
    pub mana: Value,
    #[serde(default)]
    pub dinero: Value,
}

/// One `players_state` entry: either bare stats or the lobby server's
/// `{state, status, username}` wrapper.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PlayerEntry {
    Tracked {
        state: PlayerStats,
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        username: Option<String>,
    },
    Bare(PlayerStats),
}

impl PlayerEntry {
    pub fn stats(&self) -> &PlayerStats {
        match self {
            PlayerEntry::Tracked { state, .. } => state,
            PlayerEntry::Bare(stats) => stats,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CharacterRecord {
    #[serde(default)]
    pub player_id: Value,
    #[serde(flatten)]
    pub stats: PlayerStats,
}

/// Deserialize a JSON object into `(key, value)` pairs, keeping the order
/// the server wrote them in.
fn ordered_entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct Entries<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for Entries<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map keyed by player id")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, T>()? {
                out.push(entry);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(Entries(PhantomData))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
