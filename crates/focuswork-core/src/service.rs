//! Timer service: one task that owns both timers and their tick sources.
//!
//! User commands arrive through a cloneable [`TimerHandle`]; ticks arrive
//! from the two [`Ticker`]s. Both feed a single `select!` loop, so a tick
//! and a command never interleave. Events are published on an unbounded
//! channel returned from [`TimerService::spawn`].
//!
//! The service does not stop one timer when the other starts. Whether only
//! one timer may run at a time is up to the caller.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::entry::TimeEntryRecord;
use crate::error::{InvalidStateError, Result};
use crate::events::Event;
use crate::notify::Notifier;
use crate::timer::{PomodoroEngine, Stopwatch, Tick, Ticker, TimerId, TimerSettings};

const COMMAND_BUFFER: usize = 32;

type Reply<T> = oneshot::Sender<Result<T>>;

enum Command {
    StartTracking {
        project: String,
        task: String,
        reply: Reply<()>,
    },
    PauseTracking {
        reply: Reply<()>,
    },
    ResumeTracking {
        reply: Reply<()>,
    },
    StopTracking {
        notes: String,
        tags: Vec<String>,
        reply: Reply<TimeEntryRecord>,
    },
    StartPomodoro {
        project: String,
        task: String,
        reply: Reply<()>,
    },
    PausePomodoro {
        reply: Reply<()>,
    },
    ResumePomodoro {
        reply: Reply<()>,
    },
    ResetPomodoro {
        reply: Reply<()>,
    },
    SkipPomodoro {
        reply: Reply<()>,
    },
    StopPomodoro {
        reply: Reply<()>,
    },
    SetMuted {
        muted: bool,
        reply: Reply<()>,
    },
    UpdateSettings {
        settings: TimerSettings,
        reply: Reply<()>,
    },
    Snapshot {
        reply: Reply<Event>,
    },
    Shutdown,
}

/// Cloneable front door to a running [`TimerService`].
#[derive(Debug, Clone)]
pub struct TimerHandle {
    tx: mpsc::Sender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Command::StartTracking { .. } => "StartTracking",
            Command::PauseTracking { .. } => "PauseTracking",
            Command::ResumeTracking { .. } => "ResumeTracking",
            Command::StopTracking { .. } => "StopTracking",
            Command::StartPomodoro { .. } => "StartPomodoro",
            Command::PausePomodoro { .. } => "PausePomodoro",
            Command::ResumePomodoro { .. } => "ResumePomodoro",
            Command::ResetPomodoro { .. } => "ResetPomodoro",
            Command::SkipPomodoro { .. } => "SkipPomodoro",
            Command::StopPomodoro { .. } => "StopPomodoro",
            Command::SetMuted { .. } => "SetMuted",
            Command::UpdateSettings { .. } => "UpdateSettings",
            Command::Snapshot { .. } => "Snapshot",
            Command::Shutdown => "Shutdown",
        };
        f.write_str(name)
    }
}

impl TimerHandle {
    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| InvalidStateError::ServiceStopped)?;
        rx.await.map_err(|_| InvalidStateError::ServiceStopped)?
    }

    pub async fn start_tracking(&self, project: &str, task: &str) -> Result<()> {
        let (project, task) = (project.to_string(), task.to_string());
        self.request(|reply| Command::StartTracking {
            project,
            task,
            reply,
        })
        .await
    }

    pub async fn pause_tracking(&self) -> Result<()> {
        self.request(|reply| Command::PauseTracking { reply }).await
    }

    pub async fn resume_tracking(&self) -> Result<()> {
        self.request(|reply| Command::ResumeTracking { reply }).await
    }

    pub async fn stop_tracking(&self, notes: &str, tags: &[String]) -> Result<TimeEntryRecord> {
        let (notes, tags) = (notes.to_string(), tags.to_vec());
        self.request(|reply| Command::StopTracking { notes, tags, reply })
            .await
    }

    pub async fn start_pomodoro(&self, project: &str, task: &str) -> Result<()> {
        let (project, task) = (project.to_string(), task.to_string());
        self.request(|reply| Command::StartPomodoro {
            project,
            task,
            reply,
        })
        .await
    }

    pub async fn pause_pomodoro(&self) -> Result<()> {
        self.request(|reply| Command::PausePomodoro { reply }).await
    }

    pub async fn resume_pomodoro(&self) -> Result<()> {
        self.request(|reply| Command::ResumePomodoro { reply }).await
    }

    pub async fn reset_pomodoro(&self) -> Result<()> {
        self.request(|reply| Command::ResetPomodoro { reply }).await
    }

    pub async fn skip_pomodoro(&self) -> Result<()> {
        self.request(|reply| Command::SkipPomodoro { reply }).await
    }

    pub async fn stop_pomodoro(&self) -> Result<()> {
        self.request(|reply| Command::StopPomodoro { reply }).await
    }

    pub async fn set_muted(&self, muted: bool) -> Result<()> {
        self.request(|reply| Command::SetMuted { muted, reply }).await
    }

    pub async fn update_settings(&self, settings: TimerSettings) -> Result<()> {
        self.request(|reply| Command::UpdateSettings { settings, reply })
            .await
    }

    /// `Event::StateSnapshot` of both timers.
    pub async fn snapshot(&self) -> Result<Event> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Stop the service loop. Both tick sources are released.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown).await;
    }
}

pub struct TimerService {
    stopwatch: Stopwatch,
    pomodoro: PomodoroEngine,
    stopwatch_ticker: Ticker,
    pomodoro_ticker: Ticker,
    notifier: Arc<dyn Notifier>,
    events: mpsc::UnboundedSender<Event>,
}

impl TimerService {
    /// Spawn the service on the current tokio runtime.
    ///
    /// Returns the command handle, the event stream and the loop's task.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `settings` are out of range.
    pub fn spawn(
        settings: TimerSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Result<(TimerHandle, mpsc::UnboundedReceiver<Event>, JoinHandle<()>)> {
        let pomodoro = PomodoroEngine::new(settings)?;
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let service = Self {
            stopwatch: Stopwatch::new(),
            pomodoro,
            stopwatch_ticker: Ticker::new(TimerId::Stopwatch, tick_tx.clone()),
            pomodoro_ticker: Ticker::new(TimerId::Pomodoro, tick_tx),
            notifier,
            events: event_tx,
        };
        let task = tokio::spawn(service.run(cmd_rx, tick_rx));
        Ok((TimerHandle { tx: cmd_tx }, event_rx, task))
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut ticks: mpsc::UnboundedReceiver<Tick>,
    ) {
        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle(cmd),
                },
                Some(tick) = ticks.recv() => self.on_tick(tick),
            }
        }
        self.stopwatch_ticker.release();
        self.pomodoro_ticker.release();
        tracing::debug!("timer service stopped");
    }

    fn publish(&self, event: Event) {
        // A caller that dropped the stream just stops listening.
        let _ = self.events.send(event);
    }

    fn handle(&mut self, cmd: Command) {
        tracing::debug!(command = ?cmd, "timer command");
        match cmd {
            Command::StartTracking {
                project,
                task,
                reply,
            } => {
                let result = self.stopwatch.start(&project, &task).map(|event| {
                    self.stopwatch_ticker.arm();
                    self.publish(event);
                });
                let _ = reply.send(result);
            }
            Command::PauseTracking { reply } => {
                if let Some(event) = self.stopwatch.pause() {
                    self.publish(event);
                }
                let _ = reply.send(Ok(()));
            }
            Command::ResumeTracking { reply } => {
                let result = self
                    .stopwatch
                    .resume()
                    .map(|event| event.into_iter().for_each(|e| self.publish(e)));
                let _ = reply.send(result);
            }
            Command::StopTracking { notes, tags, reply } => {
                let result = self.stopwatch.stop_and_commit(&notes, &tags);
                if let Ok(entry) = &result {
                    self.stopwatch_ticker.release();
                    self.publish(Event::EntryCommitted {
                        entry_id: entry.id(),
                        project: entry.project().to_string(),
                        task: entry.task().to_string(),
                        duration_secs: entry.duration_secs(),
                        at: Utc::now(),
                    });
                }
                let _ = reply.send(result);
            }
            Command::StartPomodoro {
                project,
                task,
                reply,
            } => {
                let result = self.pomodoro.start(&project, &task).map(|event| {
                    self.pomodoro_ticker.arm();
                    self.publish(event);
                });
                let _ = reply.send(result);
            }
            Command::PausePomodoro { reply } => {
                if let Some(event) = self.pomodoro.pause() {
                    self.publish(event);
                }
                let _ = reply.send(Ok(()));
            }
            Command::ResumePomodoro { reply } => {
                let result = self
                    .pomodoro
                    .resume()
                    .map(|event| event.into_iter().for_each(|e| self.publish(e)));
                let _ = reply.send(result);
            }
            Command::ResetPomodoro { reply } => {
                let result = self.pomodoro.reset().map(|event| {
                    // The phase starts over, so does its first second.
                    self.pomodoro_ticker.release();
                    self.publish(event);
                });
                let _ = reply.send(result);
            }
            Command::SkipPomodoro { reply } => {
                let result = self.pomodoro.skip().map(|event| {
                    self.pomodoro_ticker.release();
                    self.publish(event);
                });
                let _ = reply.send(result);
            }
            Command::StopPomodoro { reply } => {
                if let Some(event) = self.pomodoro.stop() {
                    self.pomodoro_ticker.release();
                    self.publish(event);
                }
                let _ = reply.send(Ok(()));
            }
            Command::SetMuted { muted, reply } => {
                self.pomodoro.set_muted(muted);
                let _ = reply.send(Ok(()));
            }
            Command::UpdateSettings { settings, reply } => {
                let _ = reply.send(self.pomodoro.update_settings(settings));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(Ok(Event::StateSnapshot {
                    pomodoro: self.pomodoro.snapshot(),
                    tracking: self.stopwatch.snapshot(),
                    at: Utc::now(),
                }));
            }
            Command::Shutdown => {}
        }
        self.sync_tickers();
    }

    fn on_tick(&mut self, tick: Tick) {
        match tick.timer {
            TimerId::Stopwatch => {
                if !self.stopwatch_ticker.accept(&tick) {
                    tracing::debug!(generation = tick.generation, "stale stopwatch tick dropped");
                    return;
                }
                if let Some(elapsed_secs) = self.stopwatch.tick() {
                    self.publish(Event::TrackingTicked { elapsed_secs });
                }
            }
            TimerId::Pomodoro => {
                if !self.pomodoro_ticker.accept(&tick) {
                    tracing::debug!(generation = tick.generation, "stale pomodoro tick dropped");
                    return;
                }
                match self.pomodoro.tick(self.notifier.as_ref()) {
                    Some(event) => {
                        // The next phase starts on a fresh cadence.
                        self.pomodoro_ticker.release();
                        self.publish(event);
                    }
                    None => self.publish(Event::CountdownTicked {
                        remaining_secs: self.pomodoro.remaining_secs(),
                    }),
                }
            }
        }
        self.sync_tickers();
    }

    /// Resume or pause each tick source to match its timer's running flag.
    fn sync_tickers(&mut self) {
        sync(&mut self.stopwatch_ticker, self.stopwatch.is_running());
        sync(&mut self.pomodoro_ticker, self.pomodoro.is_running());
    }
}

fn sync(ticker: &mut Ticker, running: bool) {
    match (running, ticker.is_armed()) {
        (true, false) => ticker.resume(),
        (false, true) => ticker.disarm(),
        _ => {}
    }
}
