use std::sync::Arc;

use clap::Args;
use focuswork_core::{format_human, Config, CoreError, NullNotifier, TimerService};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::print_event;

const HELP: &str = "commands: p pause, r resume, i status, q, empty line or end of input to stop";

#[derive(Args)]
pub struct TrackArgs {
    /// Task being worked on
    #[arg(long)]
    task: String,
    /// Project (defaults to tracking.default_project)
    #[arg(long)]
    project: Option<String>,
    /// Notes stored on the committed entry
    #[arg(long, default_value = "")]
    notes: String,
    /// Tag for the committed entry; repeatable (defaults to tracking.default_tags)
    #[arg(long = "tag")]
    tags: Vec<String>,
}

fn report(result: Result<(), CoreError>) {
    if let Err(e) = result {
        eprintln!("error: {e}");
    }
}

pub async fn run(args: TrackArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let project = args
        .project
        .or(config.tracking.default_project)
        .unwrap_or_default();
    let tags = if args.tags.is_empty() {
        config.tracking.default_tags
    } else {
        args.tags
    };

    let (handle, mut events, service) = TimerService::spawn(config.timer, Arc::new(NullNotifier))?;
    if let Err(e) = handle.start_tracking(&project, &args.task).await {
        handle.shutdown().await;
        let _ = service.await;
        return Err(e.into());
    }
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(event) = events.recv() => print_event(&event)?,
            line = lines.next_line() => match line? {
                Some(line) => match line.trim() {
                    "p" => report(handle.pause_tracking().await),
                    "r" => report(handle.resume_tracking().await),
                    "i" => print_event(&handle.snapshot().await?)?,
                    "q" | "" => break,
                    other => eprintln!("unknown command '{other}'; {HELP}"),
                },
                None => break,
            },
            _ = &mut ctrl_c => break,
        }
    }

    let committed = handle.stop_tracking(&args.notes, &tags).await;
    handle.shutdown().await;
    let _ = service.await;
    while let Ok(event) = events.try_recv() {
        print_event(&event)?;
    }

    let entry = committed?;
    println!("{}", serde_json::to_string(&entry)?);
    eprintln!(
        "tracked {} on {} / {}",
        format_human(entry.duration_secs()),
        entry.project(),
        entry.task()
    );
    Ok(())
}
