//! Count Battle session - client state for a multiplayer counting room
//!
//! # Architecture
//!
//! - **Phases**: server phase reconciled with local pins
//! - **Ledger**: per-game results and the history of finished games
//! - **Remote**: room server message model
//! - **Settings**: room settings, their persistence and catalog selection
//! - **Timer**: one-shot round timers with stale-expiry protection
//! - **Context**: the session object and its event loop
//!
//! # Example
//!
//! ```no_run
//! use countbattle_core::BoardCatalog;
//! use countbattle_session::{BoardLibrary, MemorySettingsStore, SessionContext, SessionEvent};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let catalog = BoardCatalog::parse("xx.\n.xo", "...\n...")?;
//! let (session, events) = SessionContext::create(
//!     BoardLibrary::new(catalog),
//!     Box::new(MemorySettingsStore::new()),
//!     StdRng::from_os_rng(),
//! );
//! let sender = session.sender();
//! sender.send(SessionEvent::JoinRoom {
//!     room_id: "room1".to_string(),
//!     player_id: "p1".to_string(),
//! })?;
//! sender.send(SessionEvent::Shutdown)?;
//! let _session = session.run(events).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod context;
mod ledger;
mod library;
mod phase;
mod remote;
mod settings;
mod timer;

// Crate-level exports - Session
pub use context::{ActiveRound, RoomState, SessionContext, SessionError, SessionEvent};

// Crate-level exports - Phases
pub use phase::{PhaseController, PhaseDecision, PinnedPhase, SessionPhase};

// Crate-level exports - Results
pub use ledger::{BoardResult, GameInstanceId, GameSummary, LedgerError, ResultsLedger, ReviewCursor};

// Crate-level exports - Server messages
pub use remote::{PlayerStanding, RemoteUpdate, RoomSettingsPatch, Standing, standing_of};

// Crate-level exports - Settings
pub use library::BoardLibrary;
pub use settings::{GameSettings, MemorySettingsStore, SettingKey, SettingsStore, TomlSettingsStore};

// Crate-level exports - Timers
pub use timer::{RoundTimer, TimerTicket};
