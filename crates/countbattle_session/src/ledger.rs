//! Per-game board results and the history of finished games.

use chrono::{DateTime, Utc};
use countbattle_core::{Answer, Symmetry};
use derive_getters::Getters;
use derive_more::Display;
use derive_new::new;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Identifier of one playthrough: `<room>-<unix millis>-<9 base-36 chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameInstanceId(String);

impl GameInstanceId {
    /// Mints a fresh id for `room_id` at `now`.
    #[instrument(skip(rng))]
    pub fn mint<R: Rng + ?Sized>(room_id: &str, now: DateTime<Utc>, rng: &mut R) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
            .collect();
        Self(format!("{room_id}-{}-{suffix}", now.timestamp_millis()))
    }

    /// Wraps an existing id, e.g. one read back from a saved summary.
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Outcome of one board in one game.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct BoardResult {
    /// Position in the game's board sequence.
    board_index: usize,
    /// Catalog record shown.
    board_id: usize,
    /// What the player answered.
    chosen_answer: Answer,
    /// The right answer, as displayed.
    correct_answer: String,
    /// Black-minus-white difference under the active scoring mode.
    difference: i32,
    /// Seconds from the board appearing to the answer.
    time_taken: f64,
    /// Whether `chosen_answer` was right.
    is_correct: bool,
    /// Transform the board was shown under.
    symmetry: Symmetry,
}

/// Snapshot of a finished game.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    /// Game the results belong to.
    instance_id: GameInstanceId,
    /// Room the game was played in.
    room_id: String,
    /// When the game was finalized.
    finished_at: DateTime<Utc>,
    /// Results in board order.
    results: Vec<BoardResult>,
}

impl GameSummary {
    /// Number of correct answers.
    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_correct).count()
    }

    /// Share of correct answers, `0.0` for an empty game.
    pub fn accuracy(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            self.correct_count() as f64 / self.results.len() as f64
        }
    }

    /// Seconds spent across all boards.
    pub fn total_time(&self) -> f64 {
        self.results.iter().map(|r| r.time_taken).sum()
    }
}

/// Where the summary screen is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReviewCursor {
    /// The grid of all boards.
    #[default]
    Grid,
    /// One board, by index into the results being shown.
    Board(usize),
}

/// Ledger operation that cannot proceed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LedgerError {
    /// No game has been started.
    #[display("No game is in progress")]
    NoActiveGame,

    /// The game was already finalized.
    #[display("Game {instance_id} is already finalized")]
    AlreadyFinalized {
        /// The finalized game.
        instance_id: GameInstanceId,
    },

    /// No finished game has this id.
    #[display("No finished game with id {instance_id}")]
    UnknownGame {
        /// The requested id.
        instance_id: GameInstanceId,
    },

    /// A board index past the end of the results.
    #[display("Board {index} is out of range for {len} results")]
    BoardOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of results.
        len: usize,
    },
}

impl std::error::Error for LedgerError {}

#[derive(Debug, Clone)]
struct CurrentGame {
    instance_id: GameInstanceId,
    room_id: String,
    finalized: bool,
}

/// Results of the game in progress plus every game finalized so far.
///
/// The history is append-only: a finalized game is never replaced.
#[derive(Debug, Clone, Default)]
pub struct ResultsLedger {
    current: Option<CurrentGame>,
    results: Vec<BoardResult>,
    history: Vec<GameSummary>,
    viewing_summary: bool,
    review: ReviewCursor,
    historical: Option<GameInstanceId>,
}

impl ResultsLedger {
    /// An empty ledger with no game started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new game: mints its id, clears the results and resets the
    /// review cursors.
    #[instrument(skip(self, rng))]
    pub fn start_new_game<R: Rng + ?Sized>(&mut self, room_id: &str, rng: &mut R) -> GameInstanceId {
        let instance_id = GameInstanceId::mint(room_id, Utc::now(), rng);
        info!(%instance_id, "Starting new game");
        self.current = Some(CurrentGame {
            instance_id: instance_id.clone(),
            room_id: room_id.to_string(),
            finalized: false,
        });
        self.results.clear();
        self.viewing_summary = false;
        self.review = ReviewCursor::Grid;
        self.historical = None;
        instance_id
    }

    /// Appends a result to the game in progress.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NoActiveGame`] before any game starts, and
    /// [`LedgerError::AlreadyFinalized`] once the game is finalized.
    #[instrument(skip(self, result), fields(board_index = result.board_index))]
    pub fn record_result(&mut self, result: BoardResult) -> Result<(), LedgerError> {
        let current = self.current.as_ref().ok_or(LedgerError::NoActiveGame)?;
        if current.finalized {
            warn!(instance_id = %current.instance_id, "Result after finalize");
            return Err(LedgerError::AlreadyFinalized {
                instance_id: current.instance_id.clone(),
            });
        }
        debug!(is_correct = result.is_correct, "Recording board result");
        self.results.push(result);
        Ok(())
    }

    /// Freezes the game in progress and files it in the history.
    ///
    /// The results stay readable through [`ResultsLedger::current_results`]
    /// until the next game starts.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NoActiveGame`] before any game starts, and
    /// [`LedgerError::AlreadyFinalized`] on a second call.
    #[instrument(skip(self))]
    pub fn finalize_game(&mut self) -> Result<GameSummary, LedgerError> {
        let current = self.current.as_mut().ok_or(LedgerError::NoActiveGame)?;
        if current.finalized
            || self
                .history
                .iter()
                .any(|summary| summary.instance_id == current.instance_id)
        {
            return Err(LedgerError::AlreadyFinalized {
                instance_id: current.instance_id.clone(),
            });
        }
        current.finalized = true;

        let summary = GameSummary {
            instance_id: current.instance_id.clone(),
            room_id: current.room_id.clone(),
            finished_at: Utc::now(),
            results: self.results.clone(),
        };
        info!(
            instance_id = %summary.instance_id,
            correct = summary.correct_count(),
            boards = summary.results.len(),
            "Game finalized"
        );
        self.history.push(summary.clone());
        Ok(summary)
    }

    /// Id of the game in progress or last finalized.
    pub fn instance_id(&self) -> Option<&GameInstanceId> {
        self.current.as_ref().map(|c| &c.instance_id)
    }

    /// Whether the current game has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.current.as_ref().is_some_and(|c| c.finalized)
    }

    /// Results of the current game.
    pub fn current_results(&self) -> &[BoardResult] {
        &self.results
    }

    /// Finalized games, oldest first.
    pub fn history(&self) -> &[GameSummary] {
        &self.history
    }

    /// A finalized game by id.
    pub fn summary(&self, instance_id: &GameInstanceId) -> Option<&GameSummary> {
        self.history.iter().find(|s| &s.instance_id == instance_id)
    }

    /// Opens the summary screen on its grid.
    #[instrument(skip(self))]
    pub fn view_summary(&mut self) {
        self.viewing_summary = true;
        self.review = ReviewCursor::Grid;
    }

    /// Leaves the summary screen.
    pub fn close_summary(&mut self) {
        self.viewing_summary = false;
        self.review = ReviewCursor::Grid;
    }

    /// Whether the summary screen is open.
    pub fn viewing_summary(&self) -> bool {
        self.viewing_summary
    }

    /// Focuses one board of the results being shown.
    ///
    /// # Errors
    ///
    /// [`LedgerError::BoardOutOfRange`] past the last result.
    #[instrument(skip(self))]
    pub fn review_board(&mut self, index: usize) -> Result<&BoardResult, LedgerError> {
        let len = self.shown_results().len();
        if index >= len {
            return Err(LedgerError::BoardOutOfRange { index, len });
        }
        self.review = ReviewCursor::Board(index);
        Ok(&self.shown_results()[index])
    }

    /// Returns from a single board to the grid.
    pub fn back_to_grid(&mut self) {
        self.review = ReviewCursor::Grid;
    }

    /// Review position.
    pub fn review(&self) -> ReviewCursor {
        self.review
    }

    /// The result under review, if a single board is focused.
    pub fn reviewed_result(&self) -> Option<&BoardResult> {
        match self.review {
            ReviewCursor::Grid => None,
            ReviewCursor::Board(index) => self.shown_results().get(index),
        }
    }

    /// Shows a finalized game instead of the current one.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownGame`] when no finalized game has that id.
    #[instrument(skip(self))]
    pub fn view_historical(&mut self, instance_id: &GameInstanceId) -> Result<&GameSummary, LedgerError> {
        let index = self
            .history
            .iter()
            .position(|s| &s.instance_id == instance_id)
            .ok_or_else(|| LedgerError::UnknownGame {
                instance_id: instance_id.clone(),
            })?;
        self.historical = Some(instance_id.clone());
        self.review = ReviewCursor::Grid;
        Ok(&self.history[index])
    }

    /// Returns to the current game's results.
    pub fn close_historical(&mut self) {
        self.historical = None;
        self.review = ReviewCursor::Grid;
    }

    /// The finalized game being shown, if any.
    pub fn historical(&self) -> Option<&GameSummary> {
        self.historical.as_ref().and_then(|id| self.summary(id))
    }

    /// Results currently on screen: a historical game's or the current one's.
    pub fn shown_results(&self) -> &[BoardResult] {
        match self.historical() {
            Some(summary) => &summary.results,
            None => &self.results,
        }
    }
}
