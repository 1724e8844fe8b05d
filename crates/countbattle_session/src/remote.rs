//! Messages from the room server.

use countbattle_core::ScoringMode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A room state update. Every field is optional; absent fields leave local
/// state as it was and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteUpdate {
    /// Room the update belongs to.
    pub room_id: Option<String>,
    /// Server phase: `waiting`, `playing`, or anything else for finished.
    pub game_state: Option<String>,
    /// Everyone in the room with their scores.
    pub players: Option<Vec<PlayerStanding>>,
    /// Catalog record ids, in play order.
    pub board_sequence: Option<Vec<usize>>,
    /// Index into `board_sequence`.
    pub current_board: Option<usize>,
    /// Game start, unix millis.
    pub start_time: Option<i64>,
    /// Whether every player has finished.
    pub all_players_finished: Option<bool>,
    /// Room settings chosen by the creator.
    pub settings: Option<RoomSettingsPatch>,
}

impl RemoteUpdate {
    /// Parses one JSON message.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for text that is not an object of the
    /// expected shape.
    #[instrument(skip(json), fields(len = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let update: Self = serde_json::from_str(json)?;
        debug!(game_state = ?update.game_state, "Parsed remote update");
        Ok(update)
    }
}

/// One player as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStanding {
    /// Player id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Correct answers so far.
    #[serde(default)]
    pub score: i64,
    /// Whether the player has no boards left.
    #[serde(default)]
    pub finished: bool,
}

/// Room settings sent by the server; only present fields change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomSettingsPatch {
    /// Hard mode on or off.
    pub hard_mode: Option<bool>,
    /// Which count decides the answers.
    pub scoring_mode: Option<ScoringMode>,
    /// Seconds per board; zero means untimed.
    pub time_per_board: Option<u32>,
}

/// Where one player stands against the rest of the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    /// The player has the top score, possibly shared.
    pub is_winner: bool,
    /// More than one player has the top score.
    pub is_tie: bool,
    /// The player's score.
    pub score: i64,
    /// The top score in the room.
    pub highest_score: i64,
}

/// Ranks `player_id` among `players`. `None` when the player is not listed.
#[instrument(skip(players), fields(count = players.len()))]
pub fn standing_of(players: &[PlayerStanding], player_id: &str) -> Option<Standing> {
    let me = players.iter().find(|p| p.id == player_id)?;
    let highest_score = players.iter().map(|p| p.score).max()?;
    let leaders = players.iter().filter(|p| p.score == highest_score).count();
    Some(Standing {
        is_winner: me.score == highest_score,
        is_tie: leaders > 1,
        score: me.score,
        highest_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, score: i64) -> PlayerStanding {
        PlayerStanding {
            id: id.to_string(),
            name: id.to_uppercase(),
            score,
            finished: false,
        }
    }

    #[test]
    fn missing_fields_are_none_and_unknown_fields_ignored() {
        let update = RemoteUpdate::from_json(r#"{"gameState":"playing","creator":"p1"}"#).unwrap();
        assert_eq!(update.game_state.as_deref(), Some("playing"));
        assert!(update.players.is_none());
        assert!(update.settings.is_none());
    }

    #[test]
    fn settings_patch_reads_camel_case() {
        let update = RemoteUpdate::from_json(
            r#"{"settings":{"hardMode":true,"scoringMode":"area","timePerBoard":30}}"#,
        )
        .unwrap();
        let settings = update.settings.unwrap();
        assert_eq!(settings.hard_mode, Some(true));
        assert_eq!(settings.scoring_mode, Some(ScoringMode::Area));
        assert_eq!(settings.time_per_board, Some(30));
    }

    #[test]
    fn shared_top_score_is_a_tie() {
        let players = [player("a", 5), player("b", 5), player("c", 2)];
        let standing = standing_of(&players, "a").unwrap();
        assert!(standing.is_winner);
        assert!(standing.is_tie);
        assert!(!standing_of(&players, "c").unwrap().is_winner);
        assert!(standing_of(&players, "zz").is_none());
    }
}
