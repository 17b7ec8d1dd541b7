//! Persisted learner progress.
//!
//! The whole state lives in one JSON document stored under
//! [`STORAGE_KEY`]. Grades are keyed by number and operations by their
//! snake_case id; field names are camelCase.

mod migrations;
mod store;

pub use store::{ProgressStore, UpdateOutcome};

use crate::curriculum::{Grade, OperationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of the current progress document.
pub const STORAGE_KEY: &str = "mathlearn_progress_v2";

/// Key used by version-1 documents.
pub const LEGACY_STORAGE_KEY: &str = "mathlearn_progress";

pub const SCHEMA_VERSION: u32 = 2;

/// Sessions kept per operation.
pub const HISTORY_LIMIT: usize = 10;

pub const MAX_STARS: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDocument {
    pub version: u32,
    #[serde(default)]
    pub total_exercises: u64,
    #[serde(default)]
    pub total_correct: u64,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    pub grades: BTreeMap<Grade, GradeProgress>,
}

impl Default for ProgressDocument {
    /// Grade 1 and its addition are open; everything else is locked.
    fn default() -> Self {
        let grades = Grade::ALL
            .into_iter()
            .map(|grade| (grade, GradeProgress::initial(grade)))
            .collect();
        Self {
            version: SCHEMA_VERSION,
            total_exercises: 0,
            total_correct: 0,
            achievements: Vec::new(),
            grades,
        }
    }
}

impl ProgressDocument {
    pub fn grade(&self, grade: Grade) -> Option<&GradeProgress> {
        self.grades.get(&grade)
    }

    pub fn operation(&self, grade: Grade, operation: OperationId) -> Option<&OperationProgress> {
        self.grades.get(&grade)?.operations.get(&operation)
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeProgress {
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub stars: u8,
    #[serde(default)]
    pub operations: BTreeMap<OperationId, OperationProgress>,
}

impl GradeProgress {
    /// Fresh state for `grade`: one record per offered operation.
    pub fn initial(grade: Grade) -> Self {
        let mut progress = Self {
            operations: grade
                .operations()
                .iter()
                .map(|op| (*op, OperationProgress::default()))
                .collect(),
            ..Self::default()
        };
        if grade == Grade::first() {
            progress.unlock();
        }
        progress
    }

    /// Opens the grade together with its first operation.
    pub(crate) fn unlock(&mut self) -> bool {
        let mut changed = !self.unlocked;
        self.unlocked = true;
        if let Some((_, first)) = self.operations.iter_mut().next() {
            changed |= !first.unlocked;
            first.unlocked = true;
        }
        changed
    }

    pub fn completed_operations(&self) -> usize {
        self.operations.values().filter(|op| op.completed).count()
    }

    pub fn all_operations_completed(&self) -> bool {
        !self.operations.is_empty() && self.operations.values().all(|op| op.completed)
    }

    /// Grade stars from the share of collected operation stars.
    pub fn derived_stars(&self) -> u8 {
        let max = self.operations.len() * usize::from(MAX_STARS);
        if max == 0 {
            return 0;
        }
        let earned: usize = self.operations.values().map(|op| usize::from(op.stars)).sum();
        let ratio = earned as f64 / max as f64;
        if ratio >= 0.9 {
            3
        } else if ratio >= 0.7 {
            2
        } else if ratio >= 0.5 {
            1
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationProgress {
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub completed: bool,
    /// Best rating ever reached.
    #[serde(default)]
    pub stars: u8,
    /// Counts of the most recent session only.
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub precision: u8,
    #[serde(default)]
    pub last_played_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl OperationProgress {
    pub fn precision(&self) -> Precision {
        Precision::new(self.correct_count, self.total_count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub correct_count: u32,
    pub total_count: u32,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Last-session accuracy with its display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precision {
    pub percent: u8,
    pub text: String,
}

impl Precision {
    pub fn new(correct: u32, total: u32) -> Self {
        let percent = percent_of(correct, total);
        Self {
            percent,
            text: format!("{correct}/{total} intentos ({percent}%)"),
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Rounded `correct / total` as a percentage; 0 when `total` is 0.
pub fn percent_of(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (f64::from(correct) / f64::from(total) * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
