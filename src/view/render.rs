//! Text shapes for each render target.

use serde_json::Value;

use super::Content;
use crate::ws::messages::{CharacterRecord, PlayerEntry, PlayerStats};

/// Shown in `players-container` when nobody is connected.
pub const NO_ACTIVE_PLAYERS: &str = "No hay jugadores activos conectados.";

/// Render a stat the way the page prints it: strings unquoted, missing
/// values as `-`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn player_line(id: &str, stats: &PlayerStats) -> String {
    format!(
        "ID: {id} - Vida: {} - Mana: {} - Dinero: {}",
        display_value(&stats.vida),
        display_value(&stats.mana),
        display_value(&stats.dinero),
    )
}

pub fn character_line(record: &CharacterRecord) -> String {
    format!(
        "ID: {} - Vida: {} - Mana: {} - dinero {}",
        display_value(&record.player_id),
        display_value(&record.stats.vida),
        display_value(&record.stats.mana),
        display_value(&record.stats.dinero),
    )
}

/// `players-container` content for a `players_state` push.
pub fn players_content(players: &[(String, PlayerEntry)]) -> Content {
    if players.is_empty() {
        return Content::Text(NO_ACTIVE_PLAYERS.to_string());
    }
    Content::Rows(
        players
            .iter()
            .map(|(id, entry)| player_line(id, entry.stats()))
            .collect(),
    )
}

/// `characters-list` content for a `characters_list` push.
pub fn characters_content(characters: &[CharacterRecord]) -> Content {
    Content::Rows(characters.iter().map(character_line).collect())
}

/// `player-info` content: the state as indented JSON.
pub fn player_info_content(state: &Value) -> Content {
    let text = serde_json::to_string_pretty(state).unwrap_or_else(|_| state.to_string());
    Content::Text(text)
}
