//! One-second tick source.
//!
//! A [`Ticker`] owns at most one spawned interval task. Arming always aborts
//! the previous task first, and every [`Tick`] carries the generation that
//! produced it so the consumer can drop ticks that were already queued when
//! the ticker was disarmed.
//!
//! Pausing keeps the part of the current second that already ran:
//! [`Ticker::disarm`] stores it and [`Ticker::resume`] schedules the next
//! tick for the remainder. Running time split across many short segments
//! therefore still adds up to whole ticks.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    Stopwatch,
    Pomodoro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub timer: TimerId,
    pub generation: u64,
}

#[derive(Debug)]
pub struct Ticker {
    timer: TimerId,
    tx: mpsc::UnboundedSender<Tick>,
    generation: u64,
    task: Option<JoinHandle<()>>,
    /// Start of the current cadence, backdated by `carried`.
    origin: Instant,
    /// Ticks accepted since `origin`.
    accepted: u32,
    /// Running time not yet paid out as a tick.
    carried: Duration,
}

impl Ticker {
    pub fn new(timer: TimerId, tx: mpsc::UnboundedSender<Tick>) -> Self {
        Self {
            timer,
            tx,
            generation: 0,
            task: None,
            origin: Instant::now(),
            accepted: 0,
            carried: Duration::ZERO,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Running time carried over from the last disarm.
    pub fn carried(&self) -> Duration {
        self.carried
    }

    /// Start a fresh cadence: first tick one full period from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self) {
        self.release();
        self.spawn();
    }

    /// Continue after a pause: the first tick fires once the carried
    /// partial second has been made up. No-op while armed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn resume(&mut self) {
        if self.task.is_none() {
            self.spawn();
        }
    }

    fn spawn(&mut self) {
        self.generation += 1;
        self.accepted = 0;
        let now = Instant::now();
        self.origin = now.checked_sub(self.carried).unwrap_or(now);
        let tick = Tick {
            timer: self.timer,
            generation: self.generation,
        };
        let tx = self.tx.clone();
        let first = self.origin + TICK_PERIOD;
        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(first, TICK_PERIOD);
            // A late wakeup still owes every elapsed second.
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if tx.send(tick).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(
            timer = ?self.timer,
            generation = self.generation,
            carried_ms = self.carried.as_millis() as u64,
            "tick source armed"
        );
    }

    /// Abort the tick task and keep the running time it has not paid out.
    /// Ticks it already queued stop being accepted; their seconds are
    /// carried instead.
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let ran = Instant::now().saturating_duration_since(self.origin);
            self.carried = ran.saturating_sub(TICK_PERIOD.saturating_mul(self.accepted));
            tracing::debug!(
                timer = ?self.timer,
                generation = self.generation,
                carried_ms = self.carried.as_millis() as u64,
                "tick source released"
            );
        }
    }

    /// Disarm and forget any carried partial second.
    pub fn release(&mut self) {
        self.disarm();
        self.carried = Duration::ZERO;
    }

    /// Whether `tick` comes from the currently armed task. Accepted ticks
    /// count toward the time paid out.
    pub fn accept(&mut self, tick: &Tick) -> bool {
        let current =
            self.task.is_some() && tick.timer == self.timer && tick.generation == self.generation;
        if current {
            self.accepted = self.accepted.saturating_add(1);
        }
        current
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.release();
    }
}
