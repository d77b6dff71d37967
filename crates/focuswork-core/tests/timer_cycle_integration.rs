//! Integration tests for the pomodoro cycle driven by simulated ticks.
//!
//! Runs whole focus/break cycles through the public engine API and checks
//! the phase sequence, the counter and the auto-start behaviour.

use focuswork_core::{
    format_countdown, CoreError, Event, NullNotifier, Phase, PomodoroEngine, TimerSettings,
    ValidationError,
};

fn settings() -> TimerSettings {
    TimerSettings {
        focus_duration_minutes: 25,
        short_break_minutes: 5,
        long_break_minutes: 15,
        sessions_before_long_break: 4,
        auto_start_breaks: true,
        ..TimerSettings::default()
    }
}

/// Tick until the current phase ends. Returns the completion event and the
/// number of ticks it took.
fn run_phase(engine: &mut PomodoroEngine) -> (Event, u64) {
    let mut ticks = 0;
    loop {
        assert!(engine.is_running(), "engine stopped mid-phase");
        ticks += 1;
        if let Some(event) = engine.tick(&NullNotifier) {
            return (event, ticks);
        }
    }
}

#[test]
fn test_four_cycle_phase_sequence_with_auto_started_breaks() {
    let mut engine = PomodoroEngine::new(settings()).unwrap();
    engine.start("Website Redesign", "Homepage wireframes").unwrap();

    let mut phases = vec![engine.phase().unwrap()];
    let mut durations = Vec::new();

    while phases.len() < 8 {
        let (event, ticks) = run_phase(&mut engine);
        durations.push(ticks);
        let next = event.next_phase().unwrap();
        phases.push(next);

        if next.is_break() {
            // Breaks are auto-started: no pause between focus and break.
            assert!(engine.is_running());
            assert!(matches!(event, Event::PhaseCompleted { auto_started: true, .. }));
        } else {
            // Focus waits for the user unless auto_start_next_focus is set.
            assert!(!engine.is_running());
            engine.resume().unwrap();
        }
    }

    assert_eq!(
        phases,
        vec![
            Phase::Focus,
            Phase::ShortBreak,
            Phase::Focus,
            Phase::ShortBreak,
            Phase::Focus,
            Phase::ShortBreak,
            Phase::Focus,
            Phase::LongBreak,
        ]
    );
    assert_eq!(durations, vec![1500, 300, 1500, 300, 1500, 300, 1500]);
    assert_eq!(engine.completed_in_cycle(), 0);
    assert_eq!(engine.remaining_secs(), 15 * 60);
}

#[test]
fn test_fully_automatic_cycle_never_pauses() {
    let mut engine = PomodoroEngine::new(TimerSettings {
        auto_start_next_focus: true,
        ..settings()
    })
    .unwrap();
    engine.start("Mobile App", "API integration").unwrap();

    let mut completions = 0;
    while completions < 8 {
        let (event, _) = run_phase(&mut engine);
        assert!(matches!(event, Event::PhaseCompleted { auto_started: true, .. }));
        assert!(engine.is_running());
        completions += 1;
    }
    // 8 completions: four focus + four breaks, back in focus of cycle two.
    assert_eq!(engine.phase(), Some(Phase::Focus));
    assert_eq!(engine.completed_in_cycle(), 0);
}

#[test]
fn test_skip_and_natural_expiry_share_transition_table() {
    let mut skipped = PomodoroEngine::new(settings()).unwrap();
    let mut natural = PomodoroEngine::new(settings()).unwrap();
    skipped.start("P", "T").unwrap();
    natural.start("P", "T").unwrap();

    for _ in 0..8 {
        let s = skipped.skip().unwrap();
        let (n, _) = run_phase(&mut natural);
        assert_eq!(s.next_phase(), n.next_phase());
        assert_eq!(skipped.completed_in_cycle(), natural.completed_in_cycle());
        if !natural.is_running() {
            natural.resume().unwrap();
        }
        if !skipped.is_running() {
            skipped.resume().unwrap();
        }
    }
}

#[test]
fn test_pause_mid_focus_then_resume_finishes_on_time() {
    let mut engine = PomodoroEngine::new(settings()).unwrap();
    engine.start("P", "T").unwrap();
    for _ in 0..600 {
        engine.tick(&NullNotifier);
    }
    engine.pause();
    for _ in 0..100 {
        assert!(engine.tick(&NullNotifier).is_none());
    }
    assert_eq!(format_countdown(engine.remaining_secs()), "15:00");
    engine.resume().unwrap();
    let (_, ticks) = run_phase(&mut engine);
    assert_eq!(ticks, 900);
}

#[test]
fn test_empty_task_leaves_engine_idle() {
    let mut engine = PomodoroEngine::new(settings()).unwrap();
    let err = engine.start("Website Redesign", "").unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::MissingField { .. })
    ));
    assert!(!engine.is_running());
    assert_eq!(engine.phase(), None);
}
