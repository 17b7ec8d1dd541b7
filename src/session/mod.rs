//! A single practice run: the exercise batch, the cursor and the running
//! score.
//!
//! Answers are submitted against the current exercise and the caller moves
//! on with [`PracticeSession::advance`] once feedback has been shown. A
//! session is consumed by [`PracticeSession::finish`] or
//! [`PracticeSession::abandon`], so no timer token can outlive it.

mod timer;

pub use timer::{ExerciseTimer, TimerToken};

use crate::curriculum::{Grade, OperationId};
use crate::exercises::{self, parse_answer, Exercise};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// How a submitted answer was judged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnswerOutcome {
    /// Not a number, or nothing to answer; the session is unchanged.
    Rejected,
    Correct,
    Incorrect { correct_answer: f64 },
}

/// Final tally handed to the progression engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionResult {
    pub correct: u32,
    pub total: u32,
}

impl SessionResult {
    pub fn percent(&self) -> u8 {
        crate::progress::percent_of(self.correct, self.total)
    }
}

#[derive(Debug)]
pub struct PracticeSession {
    id: Uuid,
    grade: Grade,
    operation: OperationId,
    exercises: Vec<Exercise>,
    index: usize,
    answered: bool,
    correct: u32,
    incorrect: u32,
    started_at: DateTime<Utc>,
    timer: ExerciseTimer,
}

impl PracticeSession {
    /// Generates a batch for `(grade, operation)`; `None` when nothing could
    /// be generated.
    pub fn start(grade: Grade, operation: OperationId) -> Option<Self> {
        Self::start_with_rng(grade, operation, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        grade: Grade,
        operation: OperationId,
        rng: &mut R,
    ) -> Option<Self> {
        let batch = exercises::generate_session_with_rng(grade, operation, rng);
        Self::from_exercises(grade, operation, batch.exercises)
    }

    pub fn from_exercises(
        grade: Grade,
        operation: OperationId,
        exercises: Vec<Exercise>,
    ) -> Option<Self> {
        if exercises.is_empty() {
            warn!(grade = grade.get(), %operation, "cannot start a session without exercises");
            return None;
        }
        let session = Self {
            id: Uuid::new_v4(),
            grade,
            operation,
            exercises,
            index: 0,
            answered: false,
            correct: 0,
            incorrect: 0,
            started_at: Utc::now(),
            timer: ExerciseTimer::new(),
        };
        debug!(id = %session.id, grade = grade.get(), %operation, len = session.exercises.len(), "session started");
        Some(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn operation(&self) -> OperationId {
        self.operation
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn current(&self) -> Option<&Exercise> {
        self.exercises.get(self.index)
    }

    /// 1-based position of the current exercise and the batch size.
    pub fn position(&self) -> (usize, usize) {
        ((self.index + 1).min(self.exercises.len()), self.exercises.len())
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.exercises.len()
    }

    pub fn timer(&self) -> &ExerciseTimer {
        &self.timer
    }

    /// Arms the countdown for the current exercise.
    pub fn start_timer(&mut self, duration: Duration) -> TimerToken {
        self.timer.start(duration)
    }

    /// Judges `input` against the current exercise.
    pub fn submit(&mut self, input: &str) -> AnswerOutcome {
        if self.answered {
            return AnswerOutcome::Rejected;
        }
        let Some(exercise) = self.exercises.get(self.index) else {
            return AnswerOutcome::Rejected;
        };
        let Some(value) = parse_answer(input) else {
            return AnswerOutcome::Rejected;
        };
        let correct_answer = exercise.correct_answer;
        let is_correct = exercise.accepts(value);
        self.timer.cancel();
        self.answered = true;
        if is_correct {
            self.correct += 1;
            AnswerOutcome::Correct
        } else {
            self.incorrect += 1;
            AnswerOutcome::Incorrect { correct_answer }
        }
    }

    /// Moves to the next exercise, returning it, or `None` at the end.
    pub fn advance(&mut self) -> Option<&Exercise> {
        self.timer.cancel();
        if self.index < self.exercises.len() {
            self.index += 1;
        }
        self.answered = false;
        self.exercises.get(self.index)
    }

    /// Handles a countdown wake-up. A current token counts the exercise as
    /// wrong and advances; a stale one is ignored.
    pub fn expire(&mut self, token: TimerToken) -> bool {
        if !self.timer.fire(token) {
            debug!(id = %self.id, "ignoring stale timer");
            return false;
        }
        if !self.answered && !self.is_finished() {
            self.incorrect += 1;
        }
        self.advance();
        true
    }

    pub fn abandon(self) {
        debug!(id = %self.id, answered = self.correct + self.incorrect, "session abandoned");
    }

    /// Closes the session. Unanswered exercises count against the total.
    pub fn finish(self) -> SessionResult {
        let result = SessionResult {
            correct: self.correct,
            total: u32::try_from(self.exercises.len()).unwrap_or(u32::MAX),
        };
        debug!(id = %self.id, correct = result.correct, total = result.total, "session finished");
        result
    }
}
