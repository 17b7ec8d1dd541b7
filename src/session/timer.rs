use std::time::{Duration, Instant};

/// Handle for one armed countdown. Only the most recently issued token is
/// ever current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    generation: u64,
    started: Instant,
    duration: Duration,
}

/// Per-exercise countdown. The caller schedules the wake-up and hands the
/// token back; stale tokens are ignored.
#[derive(Debug, Default)]
pub struct ExerciseTimer {
    generation: u64,
    armed: Option<Armed>,
}

impl ExerciseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a new countdown, invalidating any previous token.
    pub fn start(&mut self, duration: Duration) -> TimerToken {
        self.generation += 1;
        self.armed = Some(Armed {
            generation: self.generation,
            started: Instant::now(),
            duration,
        });
        TimerToken {
            generation: self.generation,
        }
    }

    pub fn cancel(&mut self) {
        if self.armed.take().is_some() {
            self.generation += 1;
        }
    }

    pub fn is_current(&self, token: TimerToken) -> bool {
        self.armed
            .is_some_and(|armed| armed.generation == token.generation)
    }

    /// Time left on the armed countdown, saturating at zero.
    pub fn remaining(&self) -> Option<Duration> {
        self.armed
            .map(|armed| armed.duration.saturating_sub(armed.started.elapsed()))
    }

    /// Disarms the countdown if `token` is current. Returns whether it was.
    pub(crate) fn fire(&mut self, token: TimerToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.armed = None;
        self.generation += 1;
        true
    }
}
