use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use url::Url;

/// Path of the game server's WebSocket endpoint.
pub const WS_PATH: &str = "/ws";

/// Delay between a close event and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Lower bound on the reconnect delay; a zero delay would redial in a
/// tight loop against a refusing server.
pub const MIN_RECONNECT_DELAY: Duration = Duration::from_millis(1);

const DEFAULT_SERVER_URL: &str = "ws://localhost:8000";

/// Which view this client drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Lobby / game overseer.
    Master,
    /// A single participant.
    Player,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Master => "master",
            Role::Player => "player",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "master" => Ok(Role::Master),
            "player" => Ok(Role::Player),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Identity and reconnect policy injected into the client at construction.
///
/// The client only ever reads this; nothing it receives from the server
/// changes it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base server URL, e.g. `ws://localhost:8000`. `http`/`https` are
    /// accepted and mapped to `ws`/`wss`.
    pub server_url: String,
    pub role: Role,
    /// Opaque auth token, sent as `null` when absent.
    pub token: Option<String>,
    /// Locally selected character id (player views).
    pub player_id: Option<String>,
    pub lobby_id: Option<String>,
    /// Sent as a `username` query parameter when set.
    pub username: Option<String>,
    pub reconnect_delay: Duration,
}

impl ClientConfig {
    /// Config for a master view.
    pub fn master(server_url: impl Into<String>) -> Self {
        ClientConfig {
            server_url: server_url.into(),
            ..Default::default()
        }
    }

    /// Config for a player view bound to one character.
    pub fn player(server_url: impl Into<String>, player_id: impl Into<String>) -> Self {
        ClientConfig {
            server_url: server_url.into(),
            role: Role::Player,
            player_id: Some(player_id.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_lobby_id(mut self, lobby_id: impl Into<String>) -> Self {
        self.lobby_id = Some(lobby_id.into());
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay.max(MIN_RECONNECT_DELAY);
        self
    }

    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or
    /// unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        ClientConfig {
            server_url: non_empty("LIVE_VIEW_SERVER_URL")
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            role: non_empty("LIVE_VIEW_ROLE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(Role::Master),
            token: non_empty("LIVE_VIEW_TOKEN"),
            player_id: non_empty("LIVE_VIEW_PLAYER_ID"),
            lobby_id: non_empty("LIVE_VIEW_LOBBY_ID"),
            username: non_empty("LIVE_VIEW_USERNAME"),
            reconnect_delay: non_empty("LIVE_VIEW_RECONNECT_DELAY_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_RECONNECT_DELAY),
        }
    }

    /// Full WebSocket URL of the `/ws` endpoint.
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.server_url)?;

        let scheme = match url.scheme() {
            "http" => Some("ws"),
            "https" => Some("wss"),
            _ => None,
        };
        if let Some(scheme) = scheme {
            // http -> ws is always allowed between special schemes.
            let _ = url.set_scheme(scheme);
        }

        url.set_path(WS_PATH);
        url.set_query(None);
        if let Some(username) = &self.username {
            url.query_pairs_mut().append_pair("username", username);
        }
        Ok(url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: DEFAULT_SERVER_URL.to_string(),
            role: Role::Master,
            token: None,
            player_id: None,
            lobby_id: None,
            username: None,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}
