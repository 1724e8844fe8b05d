//! One-shot round timer.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Identifies one start of the timer. Expiries carrying an older ticket are
/// stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerTicket(u64);

impl TimerTicket {
    /// Generation number.
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// At most one pending sleep per session.
///
/// Starting the timer aborts any pending one. Aborting does not retract an
/// expiry already posted, which is why callers check the ticket with
/// [`RoundTimer::claim`].
#[derive(Debug, Default)]
pub struct RoundTimer {
    generation: u64,
    pending: Option<(TimerTicket, JoinHandle<()>)>,
}

impl RoundTimer {
    /// An idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh countdown. `on_expire` runs on the runtime once
    /// `duration` has passed, unless the timer is cancelled or restarted
    /// first.
    ///
    /// Must be called inside a tokio runtime.
    #[instrument(skip(self, on_expire))]
    pub fn start<F>(&mut self, duration: Duration, on_expire: F) -> TimerTicket
    where
        F: FnOnce(TimerTicket) + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let ticket = TimerTicket(self.generation);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            on_expire(ticket);
        });
        debug!(generation = ticket.0, "Round timer started");
        self.pending = Some((ticket, handle));
        ticket
    }

    /// Stops the pending countdown, if any.
    #[instrument(skip(self))]
    pub fn cancel(&mut self) {
        if let Some((ticket, handle)) = self.pending.take() {
            handle.abort();
            debug!(generation = ticket.0, "Round timer cancelled");
        }
    }

    /// Accepts an expiry if `ticket` is the pending countdown, leaving the
    /// timer idle. Returns `false` for stale tickets.
    #[instrument(skip(self))]
    pub fn claim(&mut self, ticket: TimerTicket) -> bool {
        match &self.pending {
            Some((pending, _)) if *pending == ticket => {
                self.pending = None;
                true
            }
            _ => {
                debug!(generation = ticket.0, "Stale timer expiry");
                false
            }
        }
    }

    /// Whether a countdown is pending.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn expiry_posts_its_ticket() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = RoundTimer::new();
        let ticket = timer.start(Duration::from_secs(5), move |t| {
            let _ = tx.send(t);
        });
        let fired = rx.recv().await.unwrap();
        assert_eq!(fired, ticket);
        assert!(timer.claim(fired));
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_makes_old_ticket_stale() {
        let mut timer = RoundTimer::new();
        let first = timer.start(Duration::from_secs(5), |_| {});
        let second = timer.start(Duration::from_secs(5), |_| {});
        assert!(first < second);
        assert!(!timer.claim(first));
        assert!(timer.claim(second));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel::<TimerTicket>();
        let mut timer = RoundTimer::new();
        timer.start(Duration::from_secs(1), move |t| {
            let _ = tx.send(t);
        });
        timer.cancel();
        // The aborted task drops the sender, closing the channel.
        assert_eq!(rx.recv().await, None);
    }
}
