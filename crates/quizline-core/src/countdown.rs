//! Per-question countdown.
//!
//! A spawned task emits one [`Tick`] per period on a channel. The owner feeds
//! ticks into [`SessionEngine::tick`](crate::engine::SessionEngine::tick)
//! after checking [`QuestionTimer::is_current`], so ticks that were already
//! queued when the timer moved to another question are dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// One countdown step for `question`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub question: usize,
    generation: u64,
}

/// A running countdown task. Aborted on [`cancel`](Self::cancel) or drop.
#[derive(Debug)]
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    fn spawn(
        question: usize,
        generation: u64,
        period: Duration,
        tx: mpsc::UnboundedSender<Tick>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { question, generation }).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Owns at most one countdown at a time, bound to the question on screen.
#[derive(Debug)]
pub struct QuestionTimer {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
    active: Option<(usize, Countdown)>,
    generation: u64,
}

impl QuestionTimer {
    /// A timer ticking every `period`, and the receiving end of its ticks.
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timer = Self {
            period,
            tx,
            active: None,
            generation: 0,
        };
        (timer, rx)
    }

    /// Cancel any running countdown and start a fresh one for `question`.
    pub fn restart(&mut self, question: usize) {
        self.stop();
        self.generation += 1;
        let countdown = Countdown::spawn(question, self.generation, self.period, self.tx.clone());
        self.active = Some((question, countdown));
    }

    /// Restart only if the countdown is not already running for `question`.
    pub fn follow(&mut self, question: usize) {
        if self.question() != Some(question) {
            self.restart(question);
        }
    }

    pub fn stop(&mut self) {
        if let Some((_, countdown)) = self.active.take() {
            countdown.cancel();
        }
    }

    /// Question the running countdown belongs to.
    pub fn question(&self) -> Option<usize> {
        self.active.as_ref().map(|(question, _)| *question)
    }

    /// Whether `tick` came from the countdown that is running now.
    pub fn is_current(&self, tick: &Tick) -> bool {
        self.active.is_some() && tick.generation == self.generation
    }
}
