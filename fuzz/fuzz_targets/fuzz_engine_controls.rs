#![no_main]

use libfuzzer_sys::fuzz_target;
use hiitclock::cue::SilentCue;
use hiitclock::display::{PhaseView, WorkoutDisplay};
use hiitclock::workout::{EngineStatus, ExerciseSpec, ManualScheduler, WorkoutEngine, WorkoutSequence};

struct Checked;

impl WorkoutDisplay for Checked {
    fn on_tick(&mut self, view: &PhaseView<'_>) {
        assert!(view.remaining_seconds >= 1);
        assert!(view.remaining_seconds <= view.phase_total_seconds);
        assert!((0.0..=1.0).contains(&view.progress));
    }

    fn on_ready(&mut self) {}

    fn on_complete(&mut self) {}
}

fuzz_target!(|data: &[u8]| {
    let Some((&len, ops)) = data.split_first() else {
        return;
    };
    let specs = (0..usize::from(len % 8) + 1)
        .map(|i| ExerciseSpec::new(format!("E{i}"), u32::from(ops.get(i).copied().unwrap_or(1) % 5) + 1));
    let Ok(sequence) = WorkoutSequence::new(specs) else {
        return;
    };
    let scheduler = ManualScheduler::new();
    let mut engine = WorkoutEngine::new(sequence, Checked, SilentCue, scheduler.clone());

    for op in ops {
        match op % 4 {
            0 => engine.start(),
            1 => engine.stop(),
            2 => engine.reset(),
            _ => engine.tick(),
        }
        let running = engine.status() == EngineStatus::Running;
        assert_eq!(scheduler.active_count(), usize::from(running));
    }
});
