use crate::curriculum::{Grade, OperationId};
use crate::progress::{Precision, ProgressDocument, ProgressStore, MAX_STARS};
use crate::storage::KeyValueStore;
use serde::Serialize;

/// Totals across every grade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_operations: u32,
    pub completed_operations: u32,
    pub completion_percentage: u32,
    /// Stars of completed operations only.
    pub total_stars: u32,
    pub max_stars: u32,
    pub star_percentage: u32,
    pub total_exercises: u64,
    pub total_correct: u64,
}

/// What an operation tile shows on the grade screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationCard {
    pub operation: OperationId,
    pub name: &'static str,
    pub unlocked: bool,
    pub completed: bool,
    pub stars: u8,
    pub precision: Precision,
}

pub(super) fn summarize(document: &ProgressDocument) -> ProgressSummary {
    let mut summary = ProgressSummary {
        total_exercises: document.total_exercises,
        total_correct: document.total_correct,
        ..ProgressSummary::default()
    };
    for grade in Grade::ALL {
        let Some(progress) = document.grade(grade) else {
            continue;
        };
        for op in progress.operations.values() {
            summary.total_operations += 1;
            summary.max_stars += u32::from(MAX_STARS);
            if op.completed {
                summary.completed_operations += 1;
                summary.total_stars += u32::from(op.stars);
            }
        }
    }
    summary.completion_percentage =
        rounded_percent(summary.completed_operations, summary.total_operations);
    summary.star_percentage = rounded_percent(summary.total_stars, summary.max_stars);
    summary
}

fn rounded_percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

pub(super) fn grade_overview<S: KeyValueStore>(
    store: &ProgressStore<S>,
    grade: Grade,
) -> Vec<OperationCard> {
    grade
        .operations()
        .iter()
        .map(|op| {
            let progress = store.operation(grade, *op);
            OperationCard {
                operation: *op,
                name: op.display_name(),
                unlocked: progress.unlocked,
                completed: progress.completed,
                stars: progress.stars,
                precision: progress.precision(),
            }
        })
        .collect()
}
