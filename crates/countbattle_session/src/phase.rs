//! Session phase reconciliation.
//!
//! The room server owns a coarse phase for everyone in the room. A client
//! may also pin its own view to the lobby or the summary screen; a pin
//! outranks whatever the server says until it is cleared explicitly.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Screen a client is on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionPhase {
    /// Not in a room.
    #[default]
    Menu,
    /// In a room, waiting for a game.
    Lobby,
    /// Answering boards.
    Playing,
    /// Game over, final board still showing.
    Finished,
    /// Reviewing this game's results.
    Summary,
}

impl SessionPhase {
    /// Maps a server phase string: `waiting` is the lobby, `playing` is
    /// playing, and anything else is finished.
    #[instrument]
    pub fn from_remote(wire: &str) -> Self {
        match wire {
            "waiting" => SessionPhase::Lobby,
            "playing" => SessionPhase::Playing,
            _ => SessionPhase::Finished,
        }
    }
}

/// Phases a client may pin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PinnedPhase {
    /// Stay in the room lobby.
    Lobby,
    /// Stay on the results summary.
    Summary,
}

impl From<PinnedPhase> for SessionPhase {
    fn from(pin: PinnedPhase) -> Self {
        match pin {
            PinnedPhase::Lobby => SessionPhase::Lobby,
            PinnedPhase::Summary => SessionPhase::Summary,
        }
    }
}

/// What a remote phase update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseDecision {
    /// The stored phase now follows the server.
    Applied {
        /// Stored phase before the update.
        from: SessionPhase,
        /// Stored phase after the update.
        to: SessionPhase,
    },
    /// An existing pin kept the client where it was.
    HeldByPin {
        /// The pin that held.
        pin: PinnedPhase,
        /// Phase the server asked for.
        ignored: SessionPhase,
    },
    /// The client was already on a pinnable screen, so it got pinned there.
    AutoPinned {
        /// The new pin.
        pin: PinnedPhase,
        /// Phase the server asked for.
        ignored: SessionPhase,
    },
}

/// Stored phase plus optional local pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseController {
    stored: SessionPhase,
    pin: Option<PinnedPhase>,
}

impl PhaseController {
    /// Starts in the menu with no pin.
    pub fn new() -> Self {
        Self::default()
    }

    /// The phase the client acts on: the pin when set, else the stored phase.
    pub fn effective(&self) -> SessionPhase {
        self.pin.map(SessionPhase::from).unwrap_or(self.stored)
    }

    /// Phase last written by the server or the UI.
    pub fn stored(&self) -> SessionPhase {
        self.stored
    }

    /// Current pin, if any.
    pub fn pin(&self) -> Option<PinnedPhase> {
        self.pin
    }

    /// Reconciles a server phase string with local state.
    ///
    /// Rules, first match wins:
    /// 1. a summary pin holds, and the stored phase is kept at summary;
    /// 2. a stored summary is promoted to a summary pin;
    /// 3. a lobby pin holds, and the stored phase is kept at lobby;
    /// 4. a stored lobby facing `playing` or `finished` is promoted to a lobby pin;
    /// 5. otherwise the stored phase follows the server.
    #[instrument(skip(self), fields(stored = %self.stored, pin = ?self.pin))]
    pub fn on_remote_update(&mut self, wire: &str) -> PhaseDecision {
        let incoming = SessionPhase::from_remote(wire);

        let decision = match (self.pin, self.stored) {
            (Some(PinnedPhase::Summary), _) => {
                self.stored = SessionPhase::Summary;
                PhaseDecision::HeldByPin {
                    pin: PinnedPhase::Summary,
                    ignored: incoming,
                }
            }
            (_, SessionPhase::Summary) => {
                self.pin = Some(PinnedPhase::Summary);
                PhaseDecision::AutoPinned {
                    pin: PinnedPhase::Summary,
                    ignored: incoming,
                }
            }
            (Some(PinnedPhase::Lobby), _) => {
                self.stored = SessionPhase::Lobby;
                PhaseDecision::HeldByPin {
                    pin: PinnedPhase::Lobby,
                    ignored: incoming,
                }
            }
            (None, SessionPhase::Lobby)
                if matches!(incoming, SessionPhase::Playing | SessionPhase::Finished) =>
            {
                self.pin = Some(PinnedPhase::Lobby);
                PhaseDecision::AutoPinned {
                    pin: PinnedPhase::Lobby,
                    ignored: incoming,
                }
            }
            (_, from) => {
                self.stored = incoming;
                PhaseDecision::Applied { from, to: incoming }
            }
        };

        match decision {
            PhaseDecision::Applied { from, to } if from != to => {
                info!(%from, %to, "Phase changed by server");
            }
            _ => debug!(?decision, "Remote phase reconciled"),
        }
        decision
    }

    /// Pins the view and moves the stored phase there too.
    #[instrument(skip(self))]
    pub fn pin_local(&mut self, pin: PinnedPhase) {
        info!(%pin, "Pinning local phase");
        self.pin = Some(pin);
        self.stored = pin.into();
    }

    /// Drops the pin; the stored phase is left as it is.
    #[instrument(skip(self))]
    pub fn clear_local_pin(&mut self) {
        if let Some(pin) = self.pin.take() {
            info!(%pin, "Cleared local pin");
        }
    }

    /// Sets the stored phase without touching the pin.
    #[instrument(skip(self))]
    pub fn set_direct(&mut self, phase: SessionPhase) {
        debug!(from = %self.stored, to = %phase, "Setting stored phase");
        self.stored = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_phases_map_coarsely() {
        assert_eq!(SessionPhase::from_remote("waiting"), SessionPhase::Lobby);
        assert_eq!(SessionPhase::from_remote("playing"), SessionPhase::Playing);
        assert_eq!(SessionPhase::from_remote("finished"), SessionPhase::Finished);
        assert_eq!(SessionPhase::from_remote("anything"), SessionPhase::Finished);
    }

    #[test]
    fn unpinned_client_follows_server() {
        let mut phases = PhaseController::new();
        let decision = phases.on_remote_update("playing");
        assert_eq!(
            decision,
            PhaseDecision::Applied {
                from: SessionPhase::Menu,
                to: SessionPhase::Playing
            }
        );
        assert_eq!(phases.effective(), SessionPhase::Playing);
    }

    #[test]
    fn stored_summary_is_promoted_to_pin() {
        let mut phases = PhaseController::new();
        phases.set_direct(SessionPhase::Summary);
        let decision = phases.on_remote_update("waiting");
        assert!(matches!(decision, PhaseDecision::AutoPinned { pin: PinnedPhase::Summary, .. }));
        assert_eq!(phases.pin(), Some(PinnedPhase::Summary));
    }

    #[test]
    fn lobby_waiting_is_not_pinned() {
        let mut phases = PhaseController::new();
        phases.set_direct(SessionPhase::Lobby);
        phases.on_remote_update("waiting");
        assert_eq!(phases.pin(), None);
        assert_eq!(phases.effective(), SessionPhase::Lobby);
    }

    #[test]
    fn clearing_pin_keeps_stored_phase() {
        let mut phases = PhaseController::new();
        phases.pin_local(PinnedPhase::Lobby);
        phases.clear_local_pin();
        assert_eq!(phases.pin(), None);
        assert_eq!(phases.stored(), SessionPhase::Lobby);
    }
}
