//! Render targets, the regions of the page a client may overwrite.
//!
//! - [`render`]: text formatting for each target.
//! - [`memory`]: in-memory page used by embedders and tests.
//! - [`terminal`]: stdout rendering for the binary.

pub mod memory;
pub mod render;
pub mod terminal;

use std::fmt;

pub use memory::MemoryView;
pub use terminal::TerminalView;

/// A named region owned by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    PlayersContainer,
    CharactersList,
    PlayerInfo,
    CreateCharacterButton,
}

impl RenderTarget {
    pub const ALL: [RenderTarget; 4] = [
        RenderTarget::PlayersContainer,
        RenderTarget::CharactersList,
        RenderTarget::PlayerInfo,
        RenderTarget::CreateCharacterButton,
    ];

    /// Stable element id.
    pub fn id(self) -> &'static str {
        match self {
            RenderTarget::PlayersContainer => "players-container",
            RenderTarget::CharactersList => "characters-list",
            RenderTarget::PlayerInfo => "player-info",
            RenderTarget::CreateCharacterButton => "create-character-btn",
        }
    }

    /// Whether the target is shown before anything reveals it.
    pub fn visible_by_default(self) -> bool {
        !matches!(self, RenderTarget::CreateCharacterButton)
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// New content for a target. Replaces whatever was there before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// One child row per line.
    Rows(Vec<String>),
    /// Plain text with no child rows.
    Text(String),
}

impl Content {
    pub fn rows(&self) -> &[String] {
        match self {
            Content::Rows(rows) => rows,
            Content::Text(_) => &[],
        }
    }
}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking notice the user has to acknowledge.
    Alert(String),
    /// The server wants the page to move elsewhere.
    Redirect { url: String, message: Option<String> },
    GameStarted { lobby_id: String },
    LobbyCreated { lobby_id: String, lobby_name: String },
    Info(String),
    /// A command was rejected by the server.
    ServerError(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Alert(msg) => write!(f, "alert: {msg}"),
            Notice::Redirect { url, message } => match message {
                Some(msg) => write!(f, "redirect to {url}: {msg}"),
                None => write!(f, "redirect to {url}"),
            },
            Notice::GameStarted { lobby_id } => write!(f, "game started in lobby {lobby_id}"),
            Notice::LobbyCreated {
                lobby_id,
                lobby_name,
            } => write!(f, "lobby created: {lobby_name} ({lobby_id})"),
            Notice::Info(msg) => f.write_str(msg),
            Notice::ServerError(msg) => write!(f, "server error: {msg}"),
        }
    }
}

/// The page a client renders into.
///
/// Called from a single task per client, in frame order.
pub trait View: Send + Sync {
    /// Replace all content of `target`.
    fn replace(&self, target: RenderTarget, content: Content);

    /// Make a hidden target visible.
    fn reveal(&self, target: RenderTarget);

    /// Surface a message to the user.
    fn notify(&self, notice: Notice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_ids_are_stable() {
        let ids: Vec<&str> = RenderTarget::ALL.iter().map(|t| t.id()).collect();
        assert_eq!(
            ids,
            [
                "players-container",
                "characters-list",
                "player-info",
                "create-character-btn"
            ]
        );
        assert!(!RenderTarget::CreateCharacterButton.visible_by_default());
    }

    #[test]
    fn text_content_has_no_rows() {
        assert!(Content::Text("x".into()).rows().is_empty());
        assert_eq!(Content::Rows(vec!["a".into()]).rows().len(), 1);
    }

    #[test]
    fn notice_display() {
        let n = Notice::Redirect {
            url: "/player".into(),
            message: None,
        };
        assert_eq!(n.to_string(), "redirect to /player");
        assert_eq!(
            Notice::ServerError("bad lobby".into()).to_string(),
            "server error: bad lobby"
        );
    }
}
