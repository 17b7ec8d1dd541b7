//! Exercise generation and answer checking.
//!
//! A session is a batch of exercises with pairwise distinct
//! `(operand1, operand2, operator)` triples. Generation draws from the
//! per-grade generators with a bounded number of attempts; when the budget
//! runs out, the remaining slots are filled by shifting copies of accepted
//! exercises (see [`FALLBACK_OPERAND_OFFSET`]).

mod generators;
pub mod hints;
pub mod problem;

pub use hints::generic_hint;
pub use problem::{format_number, Operator, Problem};

use crate::curriculum::{Grade, OperationId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Generation attempts allowed per requested exercise.
pub const MAX_ATTEMPTS_FACTOR: usize = 5;

/// Amount added to the leading operand of a cloned exercise during fallback.
/// A copy that would still collide is shifted by 2×, 3×, … this amount.
pub const FALLBACK_OPERAND_OFFSET: u32 = 100;

/// Absolute tolerance for operators compared approximately.
pub const ANSWER_TOLERANCE: f64 = 0.01;

/// One generated practice problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub problem: Problem,
    pub operand1: f64,
    pub operand2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operand3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operand4: Option<f64>,
    pub operator: Operator,
    pub correct_answer: f64,
    pub display_text: String,
    pub hint: String,
}

impl Exercise {
    /// Builds an exercise from `problem`; `None` or blank hints fall back to
    /// the generic hint for the operator.
    pub fn new(problem: Problem, hint: Option<String>) -> Self {
        let (operand1, operand2, operand3, operand4) = problem.operands();
        let operator = problem.operator();
        let hint = hint
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| generic_hint(operator).to_string());
        Self {
            problem,
            operand1,
            operand2,
            operand3,
            operand4,
            operator,
            correct_answer: problem.answer(),
            display_text: problem.display(),
            hint,
        }
    }

    pub fn with_hint(problem: Problem, hint: impl Into<String>) -> Self {
        Self::new(problem, Some(hint.into()))
    }

    /// Whether `other` has the same `(operand1, operand2, operator)` triple.
    pub fn same_triple(&self, other: &Exercise) -> bool {
        self.operand1 == other.operand1
            && self.operand2 == other.operand2
            && self.operator == other.operator
    }

    pub fn is_well_formed(&self) -> bool {
        self.correct_answer.is_finite()
            && self.operand1.is_finite()
            && self.operand2.is_finite()
            && !self.display_text.trim().is_empty()
            && !self.hint.trim().is_empty()
    }

    /// Whether a parsed answer matches, using the operator's comparison.
    pub fn accepts(&self, value: f64) -> bool {
        if self.operator.uses_tolerance() {
            (value - self.correct_answer).abs() < ANSWER_TOLERANCE
        } else {
            value == self.correct_answer
        }
    }

    /// Copy with the leading operand shifted by `offset`. Specific hints
    /// refer to the original numbers, so the copy carries the generic one.
    pub fn shifted(&self, offset: u32) -> Exercise {
        Exercise::new(self.problem.shifted(offset), None)
    }
}

/// Result of generating one session, with the counters tests assert on.
#[derive(Debug, Clone, Default)]
pub struct SessionBatch {
    pub exercises: Vec<Exercise>,
    /// Generator calls made before the fallback kicked in.
    pub attempts: usize,
    /// Slots filled by shifting an accepted exercise.
    pub fallback_fills: usize,
}

impl SessionBatch {
    pub fn used_fallback(&self) -> bool {
        self.fallback_fills > 0
    }
}

/// Generates a full session using the thread-local RNG.
///
/// Returns an empty list when the grade does not offer `operation`.
pub fn generate_session(grade: Grade, operation: OperationId) -> Vec<Exercise> {
    generate_session_with_rng(grade, operation, &mut rand::thread_rng()).exercises
}

pub fn generate_session_with_rng<R: Rng + ?Sized>(
    grade: Grade,
    operation: OperationId,
    rng: &mut R,
) -> SessionBatch {
    if !grade.offers(operation) {
        warn!(%grade, %operation, "no generator for grade/operation pair");
        return SessionBatch::default();
    }

    fill_batch(grade, operation, grade.config().exercise_count, || {
        generators::generate(grade, operation, rng)
    })
}

/// Draws from `next` until `target` distinct exercises are accepted or the
/// attempt budget runs out, then tops up with shifted copies.
pub(crate) fn fill_batch<F>(
    grade: Grade,
    operation: OperationId,
    target: usize,
    mut next: F,
) -> SessionBatch
where
    F: FnMut() -> Exercise,
{
    let max_attempts = target * MAX_ATTEMPTS_FACTOR;
    let mut batch = SessionBatch {
        exercises: Vec::with_capacity(target),
        ..SessionBatch::default()
    };

    while batch.exercises.len() < target && batch.attempts < max_attempts {
        batch.attempts += 1;
        let candidate = next();
        if !candidate.is_well_formed() {
            debug!(%grade, %operation, display = %candidate.display_text, "discarding malformed exercise");
            continue;
        }
        if is_duplicate(&batch.exercises, &candidate) {
            continue;
        }
        batch.exercises.push(candidate);
    }

    if batch.exercises.is_empty() {
        warn!(%grade, %operation, attempts = batch.attempts, "generator produced no usable exercise");
        return batch;
    }

    if batch.exercises.len() < target {
        warn!(
            %grade,
            %operation,
            missing = target - batch.exercises.len(),
            "unique exercise budget exhausted, filling with shifted copies"
        );
    }

    let mut source = 0;
    while batch.exercises.len() < target {
        let filler = shifted_unique(&batch.exercises, &batch.exercises[source]);
        batch.exercises.push(filler);
        batch.fallback_fills += 1;
        source += 1;
    }

    batch
}

fn is_duplicate(accepted: &[Exercise], candidate: &Exercise) -> bool {
    accepted.iter().any(|existing| existing.same_triple(candidate))
}

/// Shifts `base` by growing multiples of the offset until the triple is new.
/// Every accepted exercise blocks at most one multiple, so this terminates
/// within `accepted.len() + 1` steps.
fn shifted_unique(accepted: &[Exercise], base: &Exercise) -> Exercise {
    let mut multiple = 1;
    loop {
        let candidate = base.shifted(FALLBACK_OPERAND_OFFSET * multiple);
        if !is_duplicate(accepted, &candidate) {
            return candidate;
        }
        multiple += 1;
    }
}

/// Parses raw learner input; `None` when it is not a finite number.
pub fn parse_answer(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Checks raw learner input against the exercise's answer.
///
/// `+`, `×` and `÷` accept answers within [`ANSWER_TOLERANCE`]; every other
/// operator requires an exact match.
pub fn check_answer(exercise: &Exercise, raw_input: &str) -> bool {
    parse_answer(raw_input).is_some_and(|value| exercise.accepts(value))
}
