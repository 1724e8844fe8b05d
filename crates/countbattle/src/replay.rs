//! JSON-lines session scripts.
//!
//! Each non-blank line is one [`ReplayStep`]; lines starting with `#` are
//! comments. Steps are applied in order through [`SessionContext::handle`],
//! the same path live events take.

use countbattle_core::Answer;
use countbattle_session::{PinnedPhase, RemoteUpdate, SessionContext, SessionEvent};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayStep {
    /// Enter a room.
    Join {
        /// Room id.
        room: String,
        /// Player id.
        player: String,
    },
    /// A server message.
    Remote(RemoteUpdate),
    /// Show the current board.
    Begin,
    /// Answer the board on screen.
    Answer(Answer),
    /// Pin a screen.
    Pin(PinnedPhase),
    /// Release the pin.
    ClearPin,
    /// Open the summary.
    Summary,
    /// Back to the room lobby.
    Lobby,
    /// Start a new game.
    NewGame,
    /// Focus one board on the summary.
    Review(usize),
    /// Back to the summary grid.
    Grid,
    /// Leave the room.
    Leave,
}

impl ReplayStep {
    fn label(&self) -> String {
        match self {
            ReplayStep::Join { room, .. } => format!("join {}", room),
            ReplayStep::Remote(update) => {
                format!("remote {}", update.game_state.as_deref().unwrap_or("-"))
            }
            ReplayStep::Begin => "begin".to_string(),
            ReplayStep::Answer(answer) => format!("answer {}", answer),
            ReplayStep::Pin(pin) => format!("pin {}", pin),
            ReplayStep::ClearPin => "clear_pin".to_string(),
            ReplayStep::Summary => "summary".to_string(),
            ReplayStep::Lobby => "lobby".to_string(),
            ReplayStep::NewGame => "new_game".to_string(),
            ReplayStep::Review(index) => format!("review {}", index),
            ReplayStep::Grid => "grid".to_string(),
            ReplayStep::Leave => "leave".to_string(),
        }
    }
}

impl From<ReplayStep> for SessionEvent {
    fn from(step: ReplayStep) -> Self {
        match step {
            ReplayStep::Join { room, player } => SessionEvent::JoinRoom {
                room_id: room,
                player_id: player,
            },
            ReplayStep::Remote(update) => SessionEvent::Remote(update),
            ReplayStep::Begin => SessionEvent::BeginRound,
            ReplayStep::Answer(answer) => SessionEvent::Answer(answer),
            ReplayStep::Pin(pin) => SessionEvent::PinLocal(pin),
            ReplayStep::ClearPin => SessionEvent::ClearPin,
            ReplayStep::Summary => SessionEvent::EnterSummary,
            ReplayStep::Lobby => SessionEvent::ReturnToLobby,
            ReplayStep::NewGame => SessionEvent::StartNewGame,
            ReplayStep::Review(index) => SessionEvent::ReviewBoard(index),
            ReplayStep::Grid => SessionEvent::BackToGrid,
            ReplayStep::Leave => SessionEvent::LeaveRoom,
        }
    }
}

/// A script line that is not a step.
#[derive(Debug, Display, Error)]
#[display("Script line {line}: {source}")]
pub struct ReplayError {
    /// One-based line number.
    pub line: usize,
    /// Parse failure.
    pub source: serde_json::Error,
}

/// Parses a script, skipping blank lines and `#` comments.
#[instrument(skip(text), fields(len = text.len()))]
pub fn parse_script(text: &str) -> Result<Vec<ReplayStep>, ReplayError> {
    let steps = text
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| ReplayError {
                line: index + 1,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(steps = steps.len(), "Parsed replay script");
    Ok(steps)
}

/// Applies each step and returns one line per step with the resulting phase.
#[instrument(skip_all, fields(steps = steps.len()))]
pub fn replay(session: &mut SessionContext, steps: Vec<ReplayStep>) -> Vec<String> {
    let mut lines = Vec::with_capacity(steps.len());
    for (number, step) in steps.into_iter().enumerate() {
        let label = step.label();
        if session.handle(step.into()).is_break() {
            debug!("Session stopped early");
            break;
        }

        let phase = session.effective_phase();
        let line = match session.phase().pin() {
            Some(pin) => format!("{:>3} {:<16} {} (pinned {})", number + 1, label, phase, pin),
            None => format!("{:>3} {:<16} {}", number + 1, label, phase),
        };
        lines.push(line);
    }
    info!(history = session.ledger().history().len(), "Replay finished");
    lines
}
