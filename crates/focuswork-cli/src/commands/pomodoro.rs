use std::sync::Arc;

use clap::Args;
use focuswork_core::{Config, CoreError, Event, Phase, TimerService, TimerSettings};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::print_event;
use crate::notifier::DesktopNotifier;

const HELP: &str = "commands: p pause, r resume, s skip, x reset, m mute, i status, q quit \
     (end of input keeps the timer running; stop with q, Ctrl-C or --cycles)";

#[derive(Args)]
pub struct PomodoroArgs {
    /// Task to focus on
    #[arg(long)]
    task: String,
    /// Project (defaults to tracking.default_project)
    #[arg(long)]
    project: Option<String>,
    /// Focus length in minutes
    #[arg(long)]
    focus: Option<u32>,
    /// Short break length in minutes
    #[arg(long)]
    short_break: Option<u32>,
    /// Long break length in minutes
    #[arg(long)]
    long_break: Option<u32>,
    /// Focus sessions before a long break
    #[arg(long)]
    sessions: Option<u32>,
    /// Start muted
    #[arg(long)]
    muted: bool,
    /// Exit after this many completed focus sessions
    #[arg(long)]
    cycles: Option<u32>,
}

impl PomodoroArgs {
    fn settings(&self, mut settings: TimerSettings) -> TimerSettings {
        if let Some(m) = self.focus {
            settings.focus_duration_minutes = m;
        }
        if let Some(m) = self.short_break {
            settings.short_break_minutes = m;
        }
        if let Some(m) = self.long_break {
            settings.long_break_minutes = m;
        }
        if let Some(n) = self.sessions {
            settings.sessions_before_long_break = n;
        }
        settings
    }
}

/// Print a failed interactive command without ending the session.
fn report(result: Result<(), CoreError>) {
    if let Err(e) = result {
        eprintln!("error: {e}");
    }
}

pub async fn run(args: PomodoroArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let settings = args.settings(config.timer.clone());
    let project = args
        .project
        .clone()
        .or(config.tracking.default_project)
        .unwrap_or_default();

    let (handle, mut events, service) = TimerService::spawn(settings, Arc::new(DesktopNotifier))?;
    if let Err(e) = handle.start_pomodoro(&project, &args.task).await {
        handle.shutdown().await;
        let _ = service.await;
        return Err(e.into());
    }
    let mut muted = args.muted;
    if muted {
        handle.set_muted(true).await?;
    }
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut focus_completed = 0;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                print_event(&event)?;
                if let Event::PhaseCompleted { from: Phase::Focus, .. } = event {
                    focus_completed += 1;
                    if args.cycles.is_some_and(|n| focus_completed >= n) {
                        break;
                    }
                }
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match line.trim() {
                    "p" => report(handle.pause_pomodoro().await),
                    "r" => report(handle.resume_pomodoro().await),
                    "s" => report(handle.skip_pomodoro().await),
                    "x" => report(handle.reset_pomodoro().await),
                    "m" => {
                        muted = !muted;
                        report(handle.set_muted(muted).await);
                    }
                    "i" => print_event(&handle.snapshot().await?)?,
                    "q" => break,
                    "" => {}
                    other => eprintln!("unknown command '{other}'; {HELP}"),
                },
                None => stdin_open = false,
            },
            _ = &mut ctrl_c => break,
        }
    }

    report(handle.stop_pomodoro().await);
    handle.shutdown().await;
    let _ = service.await;
    while let Ok(event) = events.try_recv() {
        print_event(&event)?;
    }
    Ok(())
}
