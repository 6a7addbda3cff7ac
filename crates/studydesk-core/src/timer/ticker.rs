//! One-second tick scheduling.
//!
//! The engine never sleeps. It asks a [`Ticker`] for a repeating tick and
//! keeps the returned guard; dropping or cancelling the guard stops the
//! ticks. Ticks carry the generation of the task that produced them so a
//! tick already queued by a cancelled task can be told apart.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// A tick delivered to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Handle of a running tick task.
pub trait TickGuard {
    /// Generation stamped on every tick this task sends.
    fn generation(&self) -> u64;

    /// Stop the task. Calling it twice is harmless.
    fn cancel(&mut self);
}

/// Schedules repeating one-second ticks.
pub trait Ticker {
    fn every_second(&mut self) -> Box<dyn TickGuard>;
}

/// Tokio-backed ticker forwarding ticks over an unbounded channel.
///
/// Must be used from within a tokio runtime.
pub struct IntervalTicker {
    tx: mpsc::UnboundedSender<Tick>,
    period: Duration,
    generation: u64,
}

impl IntervalTicker {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                period,
                generation: 0,
            },
            rx,
        )
    }
}

struct IntervalGuard {
    generation: u64,
    token: CancellationToken,
}

impl TickGuard for IntervalGuard {
    fn generation(&self) -> u64 {
        self.generation
    }

    fn cancel(&mut self) {
        self.token.cancel();
    }
}

impl Drop for IntervalGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl Ticker for IntervalTicker {
    fn every_second(&mut self) -> Box<dyn TickGuard> {
        self.generation += 1;
        let generation = self.generation;
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();
        let period = self.period;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(Tick { generation }).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::trace!(generation, "tick task stopped");
        });

        Box::new(IntervalGuard { generation, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (mut ticker, mut rx) = IntervalTicker::new();
        let _guard = ticker.every_second();

        let started = Instant::now();
        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(Tick { generation: 1 }));
        }
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_goes_quiet() {
        let (mut ticker, mut rx) = IntervalTicker::new();
        let mut guard = ticker.every_second();
        assert!(rx.recv().await.is_some());

        guard.cancel();
        let waited = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_guard_stops_ticks() {
        let (mut ticker, mut rx) = IntervalTicker::new();
        drop(ticker.every_second());
        let waited = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn new_task_gets_new_generation() {
        let (mut ticker, mut rx) = IntervalTicker::new();
        let mut first = ticker.every_second();
        first.cancel();
        let second = ticker.every_second();
        assert_eq!(second.generation(), 2);
        assert_eq!(rx.recv().await, Some(Tick { generation: 2 }));
    }
}
