//! Turns finished sessions into stars, unlocks and advice.
//!
//! The engine holds no state of its own; it borrows the [`ProgressStore`]
//! it reports into.

mod achievements;
mod recommendations;
mod summary;

pub use summary::{OperationCard, ProgressSummary};

use crate::curriculum::{Grade, OperationId};
use crate::progress::{Achievement, Precision, ProgressStore, UpdateOutcome};
use crate::session::SessionResult;
use crate::storage::KeyValueStore;
use tracing::debug;

/// Result of scoring one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub stars: u8,
    pub passed: bool,
    pub precision: Precision,
    /// At most three suggestions, for display only.
    pub recommendations: Vec<String>,
    pub unlocks: UpdateOutcome,
    /// Achievements first earned by this session.
    pub achievements: Vec<Achievement>,
}

/// Star rating for `correct` out of `total`.
///
/// Below 80% earns nothing, 80-89% one star, 90-99% two, 100% three.
pub fn calculate_stars(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = u64::from(correct) * 100;
    let total = u64::from(total);
    if scaled < 80 * total {
        0
    } else if scaled < 90 * total {
        1
    } else if scaled < 100 * total {
        2
    } else {
        3
    }
}

pub struct ProgressionEngine<'a, S: KeyValueStore> {
    store: &'a mut ProgressStore<S>,
}

impl<'a, S: KeyValueStore> ProgressionEngine<'a, S> {
    pub fn new(store: &'a mut ProgressStore<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &*self.store
    }

    /// Scores a session and records it. Counts are stored whether or not
    /// the session passed.
    pub fn update_progress(
        &mut self,
        grade: Grade,
        operation: OperationId,
        correct: u32,
        total: u32,
    ) -> SessionReport {
        let stars = calculate_stars(correct, total);
        let passed = stars > 0;
        let unlocks = self
            .store
            .update_operation(grade, operation, passed, stars, correct, total);
        let precision = self.store.operation_precision(grade, operation);
        let recommendations =
            recommendations::build(&*self.store, grade, operation, stars, precision.percent);
        let achievements =
            achievements::award(self.store, grade, operation, stars, unlocks.grade_completed);
        debug!(
            grade = grade.get(),
            %operation,
            correct,
            total,
            stars,
            passed,
            "session scored"
        );
        SessionReport {
            stars,
            passed,
            precision,
            recommendations,
            unlocks,
            achievements,
        }
    }

    pub fn record_session(
        &mut self,
        grade: Grade,
        operation: OperationId,
        result: SessionResult,
    ) -> SessionReport {
        debug!(grade = grade.get(), %operation, percent = result.percent(), "recording finished session");
        self.update_progress(grade, operation, result.correct, result.total)
    }

    pub fn summary(&self) -> ProgressSummary {
        summary::summarize(self.store.document())
    }

    pub fn grade_overview(&self, grade: Grade) -> Vec<OperationCard> {
        summary::grade_overview(&*self.store, grade)
    }
}
