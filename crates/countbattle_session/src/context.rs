//! The client session and its event loop.
//!
//! A [`SessionContext`] owns everything a client knows about its room:
//! phase, settings, the round on screen and the results so far. It is driven
//! by [`SessionEvent`]s, applied one at a time in arrival order, either
//! directly through [`SessionContext::handle`] or by [`SessionContext::run`].

use std::ops::ControlFlow;

use countbattle_core::{Answer, MarkedBoard, ScoreEngine, ScoreReport, Symmetry, score_choices};
use derive_getters::Getters;
use derive_more::Display;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::ledger::{BoardResult, GameInstanceId, GameSummary, ResultsLedger};
use crate::library::BoardLibrary;
use crate::phase::{PhaseController, PhaseDecision, PinnedPhase, SessionPhase};
use crate::remote::{PlayerStanding, RemoteUpdate, Standing, standing_of};
use crate::settings::{GameSettings, SettingsStore};
use crate::timer::{RoundTimer, TimerTicket};

/// Input to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A message from the room server.
    Remote(RemoteUpdate),
    /// The player entered a room.
    JoinRoom {
        /// Room joined.
        room_id: String,
        /// This client's player id.
        player_id: String,
    },
    /// Show the board at the current index.
    BeginRound,
    /// The player answered the board on screen.
    Answer(Answer),
    /// A round timer ran out.
    TimerExpired(TimerTicket),
    /// The player pinned a screen.
    PinLocal(PinnedPhase),
    /// The pin was released.
    ClearPin,
    /// Open the summary for the game just played.
    EnterSummary,
    /// Go back to the room lobby without leaving the room.
    ReturnToLobby,
    /// Start a new game in the current room.
    StartNewGame,
    /// Focus one board on the summary screen.
    ReviewBoard(usize),
    /// Back from one board to the summary grid.
    BackToGrid,
    /// Show a finished game from the history.
    ViewHistorical(GameInstanceId),
    /// Back from a finished game to the current one.
    CloseHistorical,
    /// Leave the room.
    LeaveRoom,
    /// Stop the event loop.
    Shutdown,
}

/// Session operation that cannot proceed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionError {
    /// The client has not joined a room.
    #[display("Not in a room")]
    NotInRoom,

    /// No board is on screen.
    #[display("No round in progress")]
    NoRound,

    /// Rounds only run while playing.
    #[display("Cannot start a round in phase {phase}")]
    NotPlaying {
        /// Effective phase at the time.
        phase: SessionPhase,
    },

    /// The board sequence has no entry at this index.
    #[display("Board index {index} is past the end of a {len}-board sequence")]
    BoardIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Sequence length.
        len: usize,
    },

    /// The sequence names a board the catalog does not have.
    #[display("Cannot load board {board_id}: catalog has {catalog_len} boards")]
    Board {
        /// Catalog record requested.
        board_id: usize,
        /// Records in the catalog.
        catalog_len: usize,
    },
}

impl std::error::Error for SessionError {}

/// Room state as last reported by the server.
#[derive(Debug, Clone, Default, Getters)]
pub struct RoomState {
    /// Room id.
    room_id: String,
    /// This client's player id.
    player_id: String,
    /// Everyone in the room.
    players: Vec<PlayerStanding>,
    /// Catalog record ids in play order.
    board_sequence: Vec<usize>,
    /// Index into `board_sequence` of the next board.
    current_board: usize,
    /// Game start, unix millis.
    start_time: Option<i64>,
    /// Whether every player has finished.
    all_players_finished: bool,
}

/// The board on screen.
#[derive(Debug, Clone, Getters)]
pub struct ActiveRound {
    /// Position in the board sequence.
    board_index: usize,
    /// Catalog record.
    board_id: usize,
    /// Transform used to disguise the board.
    symmetry: Symmetry,
    /// The board as shown, with its dead stones.
    position: MarkedBoard,
    /// Both counts of the shown board.
    report: ScoreReport,
    /// Hard-mode margin choices.
    choices: Option<Vec<u32>>,
    /// Timer guarding the round, if timed.
    ticket: Option<TimerTicket>,
    #[getter(skip)]
    started_at: Instant,
}

/// One client's view of a multiplayer room.
#[derive(Debug)]
pub struct SessionContext {
    events: mpsc::UnboundedSender<SessionEvent>,
    phase: PhaseController,
    ledger: ResultsLedger,
    library: BoardLibrary,
    settings: GameSettings,
    store: Box<dyn SettingsStore>,
    engine: ScoreEngine,
    room: Option<RoomState>,
    round: Option<ActiveRound>,
    timer: RoundTimer,
    rng: StdRng,
}

impl SessionContext {
    /// Creates a session in the menu, with settings read from `store`.
    ///
    /// Returns the receiving end of the session's event channel; pass it to
    /// [`SessionContext::run`]. The session keeps a sender for its own
    /// timers, so the loop ends on [`SessionEvent::Shutdown`] rather than on
    /// channel close.
    #[instrument(skip_all)]
    pub fn create(
        library: BoardLibrary,
        store: Box<dyn SettingsStore>,
        rng: StdRng,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let settings = GameSettings::load(store.as_ref());
        info!(?settings, "Creating session");
        let context = Self {
            events,
            phase: PhaseController::new(),
            ledger: ResultsLedger::new(),
            library,
            settings,
            store,
            engine: ScoreEngine::new(),
            room: None,
            round: None,
            timer: RoundTimer::new(),
            rng,
        };
        (context, receiver)
    }

    /// A sender for feeding events to [`SessionContext::run`].
    pub fn sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.events.clone()
    }

    /// Phase state.
    pub fn phase(&self) -> &PhaseController {
        &self.phase
    }

    /// The phase the client acts on.
    pub fn effective_phase(&self) -> SessionPhase {
        self.phase.effective()
    }

    /// Results of this and earlier games.
    pub fn ledger(&self) -> &ResultsLedger {
        &self.ledger
    }

    /// Current room settings.
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// The room, if joined.
    pub fn room(&self) -> Option<&RoomState> {
        self.room.as_ref()
    }

    /// The board on screen.
    pub fn round(&self) -> Option<&ActiveRound> {
        self.round.as_ref()
    }

    /// This player's standing in the room.
    pub fn standing(&self) -> Option<Standing> {
        let room = self.room.as_ref()?;
        standing_of(&room.players, &room.player_id)
    }

    /// Enters a room, landing in its lobby.
    #[instrument(skip(self))]
    pub fn join_room(&mut self, room_id: &str, player_id: &str) {
        self.cancel_round();
        self.room = Some(RoomState {
            room_id: room_id.to_string(),
            player_id: player_id.to_string(),
            ..RoomState::default()
        });
        self.phase.clear_local_pin();
        self.phase.set_direct(SessionPhase::Lobby);
        info!("Joined room");
    }

    /// Merges a server update into local state.
    ///
    /// Room fields apply only while in a room. Settings always apply and are
    /// persisted when they change.
    #[instrument(skip(self, update))]
    pub fn apply_remote(&mut self, update: RemoteUpdate) -> Option<PhaseDecision> {
        let decision = update
            .game_state
            .as_deref()
            .map(|wire| self.phase.on_remote_update(wire));

        match self.room.as_mut() {
            Some(room) => {
                if let Some(room_id) = update.room_id {
                    room.room_id = room_id;
                }
                if let Some(players) = update.players {
                    room.players = players;
                }
                if let Some(sequence) = update.board_sequence {
                    room.board_sequence = sequence;
                }
                if let Some(index) = update.current_board {
                    room.current_board = index;
                }
                if let Some(start) = update.start_time {
                    room.start_time = Some(start);
                }
                if let Some(finished) = update.all_players_finished {
                    room.all_players_finished = finished;
                }
            }
            None => debug!("Update outside a room, room fields ignored"),
        }

        if let Some(patch) = update.settings
            && self.settings.apply(&patch)
        {
            self.settings.save(self.store.as_mut());
        }

        decision
    }

    /// Shows the board at the room's current index under a random symmetry.
    ///
    /// Calling again for the same index returns the round already on screen.
    ///
    /// # Errors
    ///
    /// Fails outside a room, outside the playing phase, past the end of the
    /// sequence, or when the catalog lacks the board.
    #[instrument(skip(self))]
    pub fn begin_round(&mut self) -> Result<&ActiveRound, SessionError> {
        let room = self.room.as_ref().ok_or(SessionError::NotInRoom)?;
        let phase = self.phase.effective();
        if phase != SessionPhase::Playing {
            return Err(SessionError::NotPlaying { phase });
        }

        let index = room.current_board;
        if self.round.as_ref().is_some_and(|r| r.board_index == index) {
            debug!(index, "Round already on screen");
            return self.round.as_ref().ok_or(SessionError::NoRound);
        }

        let board_id = *room
            .board_sequence
            .get(index)
            .ok_or(SessionError::BoardIndexOutOfRange {
                index,
                len: room.board_sequence.len(),
            })?;
        let catalog = self.library.resolve(&self.settings);
        let source = catalog.get(board_id).ok_or(SessionError::Board {
            board_id,
            catalog_len: catalog.len(),
        })?;

        let symmetry = Symmetry::random(&mut self.rng);
        let position = source.transform(&symmetry);
        let report = self.engine.score(&position, self.settings.scoring_mode);
        let margin = report.active_margin();
        let choices = self
            .settings
            .hard_mode
            .then(|| score_choices(margin.magnitude, &mut self.rng));

        let ticket = self.settings.time_limit().map(|limit| {
            let events = self.events.clone();
            self.timer.start(limit, move |ticket| {
                if events.send(SessionEvent::TimerExpired(ticket)).is_err() {
                    debug!(ticket = ticket.generation(), "Event loop gone, expiry dropped");
                }
            })
        });

        info!(index, board_id, %symmetry, %margin, "Round started");
        Ok(self.round.insert(ActiveRound {
            board_index: index,
            board_id,
            symmetry,
            position,
            report,
            choices,
            ticket,
            started_at: Instant::now(),
        }))
    }

    /// Judges `answer` against the board on screen and records the result.
    ///
    /// The room advances to the next board. Resigning, timing out or
    /// answering the last board ends the game for this player: it is
    /// finalized and the summary is pinned, so later server phases cannot
    /// pull the player off their results.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoRound`] when no board is on screen.
    #[instrument(skip(self))]
    pub fn submit_answer(&mut self, answer: Answer) -> Result<BoardResult, SessionError> {
        let round = self.round.take().ok_or(SessionError::NoRound)?;
        self.timer.cancel();

        let margin = round.report.active_margin();
        let is_correct = answer.is_correct(&margin);
        let result = BoardResult::new(
            round.board_index,
            round.board_id,
            answer,
            Answer::expected(&margin, self.settings.hard_mode),
            margin.difference,
            round.started_at.elapsed().as_secs_f64(),
            is_correct,
            round.symmetry,
        );
        info!(%answer, is_correct, board_index = round.board_index, "Answer submitted");

        if let Err(e) = self.ledger.record_result(result.clone()) {
            warn!(error = %e, "Result not recorded");
        }

        let game_over = match self.room.as_mut() {
            Some(room) => {
                room.current_board = round.board_index + 1;
                answer.ends_game() || room.current_board >= room.board_sequence.len()
            }
            None => false,
        };
        if game_over {
            info!("No boards left for this player");
            self.enter_summary();
        }
        Ok(result)
    }

    /// Handles a timer expiry. A stale ticket, or one for a round already
    /// answered, is ignored.
    #[instrument(skip(self))]
    pub fn on_timer_expired(&mut self, ticket: TimerTicket) -> Option<BoardResult> {
        if !self.timer.claim(ticket) {
            return None;
        }
        if self.round.as_ref().and_then(|r| r.ticket) != Some(ticket) {
            debug!("Expiry for a round no longer on screen");
            return None;
        }
        self.submit_answer(Answer::TimedOut).ok()
    }

    /// Opens the summary, finalizing the game first. Does nothing when the
    /// summary is already showing.
    #[instrument(skip(self))]
    pub fn enter_summary(&mut self) -> Option<GameSummary> {
        if self.phase.effective() == SessionPhase::Summary {
            debug!("Already on the summary");
            return None;
        }
        self.cancel_round();

        let summary = if self.ledger.is_finalized() {
            None
        } else {
            match self.ledger.finalize_game() {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!(error = %e, "Nothing to finalize");
                    None
                }
            }
        };
        self.phase.pin_local(PinnedPhase::Summary);
        self.ledger.view_summary();
        summary
    }

    /// Goes back to the room lobby and keeps the client there until a new
    /// game starts.
    #[instrument(skip(self))]
    pub fn return_to_lobby(&mut self) {
        self.cancel_round();
        self.phase.pin_local(PinnedPhase::Lobby);
        self.ledger.close_summary();
    }

    /// Starts a new game in the current room.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotInRoom`] outside a room.
    #[instrument(skip(self))]
    pub fn start_new_game(&mut self) -> Result<GameInstanceId, SessionError> {
        self.cancel_round();
        let room = self.room.as_mut().ok_or(SessionError::NotInRoom)?;
        room.current_board = 0;
        self.phase.clear_local_pin();
        self.phase.set_direct(SessionPhase::Playing);
        Ok(self.ledger.start_new_game(&room.room_id, &mut self.rng))
    }

    /// Leaves the room: stops the timer, drops pins and returns to the menu.
    /// Finished games stay in the history.
    #[instrument(skip(self))]
    pub fn leave_room(&mut self) {
        self.cancel_round();
        if let Some(room) = self.room.take() {
            info!(room_id = %room.room_id, "Left room");
        }
        self.phase.clear_local_pin();
        self.phase.set_direct(SessionPhase::Menu);
    }

    /// Pins a screen.
    pub fn pin_local(&mut self, pin: PinnedPhase) {
        self.phase.pin_local(pin);
    }

    /// Releases the pin.
    pub fn clear_local_pin(&mut self) {
        self.phase.clear_local_pin();
    }

    /// Applies one event. Breaks on [`SessionEvent::Shutdown`].
    ///
    /// Answers, expiries and new games move straight on to the next board
    /// while the player is still playing.
    #[instrument(skip(self))]
    pub fn handle(&mut self, event: SessionEvent) -> ControlFlow<()> {
        match event {
            SessionEvent::Remote(update) => {
                self.apply_remote(update);
            }
            SessionEvent::JoinRoom { room_id, player_id } => self.join_room(&room_id, &player_id),
            SessionEvent::BeginRound => self.try_begin_round(),
            SessionEvent::Answer(answer) => match self.submit_answer(answer) {
                Ok(_) => self.try_begin_round(),
                Err(e) => warn!(error = %e, "Answer ignored"),
            },
            SessionEvent::TimerExpired(ticket) => {
                if self.on_timer_expired(ticket).is_some() {
                    self.try_begin_round();
                }
            }
            SessionEvent::PinLocal(pin) => self.pin_local(pin),
            SessionEvent::ClearPin => self.clear_local_pin(),
            SessionEvent::EnterSummary => {
                self.enter_summary();
            }
            SessionEvent::ReturnToLobby => self.return_to_lobby(),
            SessionEvent::StartNewGame => match self.start_new_game() {
                Ok(_) => self.try_begin_round(),
                Err(e) => warn!(error = %e, "Cannot start a game"),
            },
            SessionEvent::ReviewBoard(index) => {
                if let Err(e) = self.ledger.review_board(index) {
                    warn!(error = %e, "Review ignored");
                }
            }
            SessionEvent::BackToGrid => self.ledger.back_to_grid(),
            SessionEvent::ViewHistorical(instance_id) => {
                if let Err(e) = self.ledger.view_historical(&instance_id) {
                    warn!(error = %e, "History view ignored");
                }
            }
            SessionEvent::CloseHistorical => self.ledger.close_historical(),
            SessionEvent::LeaveRoom => self.leave_room(),
            SessionEvent::Shutdown => {
                info!("Session shutting down");
                self.cancel_round();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Applies events until [`SessionEvent::Shutdown`], then hands the
    /// session back.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<SessionEvent>) -> Self {
        info!("Session event loop started");
        while let Some(event) = events.recv().await {
            if self.handle(event).is_break() {
                break;
            }
        }
        info!("Session event loop stopped");
        self
    }

    fn try_begin_round(&mut self) {
        let more_boards = self
            .room
            .as_ref()
            .is_some_and(|room| room.current_board < room.board_sequence.len());
        if self.phase.effective() != SessionPhase::Playing || !more_boards {
            return;
        }
        if let Err(e) = self.begin_round() {
            warn!(error = %e, "Round not started");
        }
    }

    fn cancel_round(&mut self) {
        self.timer.cancel();
        if let Some(round) = self.round.take() {
            debug!(board_index = round.board_index, "Round abandoned");
        }
    }
}
