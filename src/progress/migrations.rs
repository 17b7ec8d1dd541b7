//! Schema upgrades for stored progress documents.
//!
//! Current-key documents are backfilled in place on the raw JSON value, so a
//! document written before precision counters, history or grade-level
//! `completed`/`stars` existed loads without loss. Version-1 documents stored
//! under the legacy key are translated field by field into a fresh default
//! document.

use super::{
    GradeProgress, OperationProgress, ProgressDocument, HISTORY_LIMIT, MAX_STARS, SCHEMA_VERSION,
};
use crate::curriculum::{Grade, OperationId};
use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Backfills `value` and decodes it. The flag reports whether anything had
/// to change, i.e. whether the caller should persist the result.
pub(super) fn upgrade(mut value: Value) -> Result<(ProgressDocument, bool)> {
    let mut changed = backfill(&mut value)?;
    let mut document: ProgressDocument = serde_json::from_value(value)
        .context("Progress document does not match the current schema")?;
    changed |= sanitize(&mut document);
    Ok((document, changed))
}

/// Builds a current document from a version-1 value. Fields that are
/// missing or of the wrong type keep their defaults.
pub(super) fn from_legacy(value: &Value) -> Result<ProgressDocument> {
    let legacy_grades = value
        .get("grades")
        .and_then(Value::as_object)
        .context("Legacy progress has no grades map")?;

    let mut document = ProgressDocument::default();
    for (grade, progress) in document.grades.iter_mut() {
        let Some(legacy) = legacy_grades.get(&grade.to_string()) else {
            continue;
        };
        if let Some(unlocked) = legacy.get("unlocked").and_then(Value::as_bool) {
            progress.unlocked = unlocked;
        }
        let Some(legacy_ops) = legacy.get("operations").and_then(Value::as_object) else {
            continue;
        };
        for (op, op_progress) in progress.operations.iter_mut() {
            if let Some(legacy_op) = legacy_ops.get(op.as_str()) {
                copy_legacy_operation(legacy_op, op_progress);
            }
        }
    }
    sanitize(&mut document);
    Ok(document)
}

fn copy_legacy_operation(legacy: &Value, target: &mut OperationProgress) {
    if let Some(unlocked) = legacy.get("unlocked").and_then(Value::as_bool) {
        target.unlocked = unlocked;
    }
    if let Some(completed) = legacy.get("completed").and_then(Value::as_bool) {
        target.completed = completed;
    }
    if let Some(stars) = legacy.get("stars").and_then(Value::as_u64) {
        target.stars = stars.min(u64::from(MAX_STARS)) as u8;
    }
}

fn backfill(value: &mut Value) -> Result<bool> {
    let root = value
        .as_object_mut()
        .context("Progress document is not a JSON object")?;
    let mut changed = false;

    if root.get("version").and_then(Value::as_u64) != Some(u64::from(SCHEMA_VERSION)) {
        root.insert("version".into(), json!(SCHEMA_VERSION));
        changed = true;
    }
    changed |= ensure(root, "totalExercises", json!(0));
    changed |= ensure(root, "totalCorrect", json!(0));
    changed |= ensure(root, "achievements", json!([]));
    changed |= ensure(root, "grades", json!({}));

    let grades = root
        .get_mut("grades")
        .and_then(Value::as_object_mut)
        .context("Progress grades entry is not an object")?;

    let before = grades.len();
    grades.retain(|key, _| key.parse::<u8>().ok().and_then(Grade::new).is_some());
    if grades.len() != before {
        debug!(dropped = before - grades.len(), "dropping unknown grade entries");
        changed = true;
    }

    for grade in Grade::ALL {
        let key = grade.to_string();
        match grades.get_mut(&key) {
            None => {
                grades.insert(key, serde_json::to_value(GradeProgress::initial(grade))?);
                changed = true;
            }
            Some(entry) => {
                let entry = entry
                    .as_object_mut()
                    .with_context(|| format!("Grade {grade} entry is not an object"))?;
                changed |= backfill_grade(grade, entry)?;
            }
        }
    }
    Ok(changed)
}

fn backfill_grade(grade: Grade, entry: &mut Map<String, Value>) -> Result<bool> {
    let mut changed = false;
    changed |= ensure(entry, "unlocked", json!(grade == Grade::first()));
    changed |= ensure(entry, "completed", json!(false));
    changed |= ensure(entry, "stars", json!(0));
    changed |= ensure(entry, "operations", json!({}));

    let operations = entry
        .get_mut("operations")
        .and_then(Value::as_object_mut)
        .with_context(|| format!("Grade {grade} operations entry is not an object"))?;

    let before = operations.len();
    operations.retain(|key, _| {
        OperationId::parse(key)
            .map(|op| grade.offers(op))
            .unwrap_or(false)
    });
    changed |= operations.len() != before;

    for op in grade.operations() {
        match operations.get_mut(op.as_str()) {
            None => {
                operations.insert(
                    op.as_str().to_string(),
                    serde_json::to_value(OperationProgress::default())?,
                );
                changed = true;
            }
            Some(record) => {
                let record = record
                    .as_object_mut()
                    .with_context(|| format!("Grade {grade} {op} entry is not an object"))?;
                changed |= backfill_operation(record);
            }
        }
    }
    Ok(changed)
}

fn backfill_operation(record: &mut Map<String, Value>) -> bool {
    let mut changed = false;
    for (field, default) in [
        ("unlocked", json!(false)),
        ("completed", json!(false)),
        ("stars", json!(0)),
        ("correctCount", json!(0)),
        ("totalCount", json!(0)),
        ("lastPlayedAt", Value::Null),
        ("history", json!([])),
    ] {
        changed |= ensure(record, field, default);
    }
    if !record.contains_key("precision") {
        let correct = record.get("correctCount").and_then(Value::as_u64).unwrap_or(0);
        let total = record.get("totalCount").and_then(Value::as_u64).unwrap_or(0);
        let precision = if total == 0 {
            0
        } else {
            ((correct as f64 / total as f64) * 100.0).round().min(100.0) as u64
        };
        record.insert("precision".into(), json!(precision));
        changed = true;
    }
    changed
}

/// Locks every operation whose predecessor in `grade` is not completed.
fn relock_out_of_order(grade: Grade, progress: &mut GradeProgress) -> bool {
    let mut changed = false;
    for op in grade.operations() {
        let Some(previous) = op.previous_in(grade) else {
            continue;
        };
        let previous_done = progress
            .operations
            .get(&previous)
            .is_some_and(|p| p.completed);
        if previous_done {
            continue;
        }
        if let Some(record) = progress.operations.get_mut(op) {
            if record.unlocked {
                debug!(grade = grade.get(), operation = %op, "relocking out-of-order operation");
                record.unlocked = false;
                changed = true;
            }
        }
    }
    changed
}

fn ensure(map: &mut Map<String, Value>, key: &str, default: Value) -> bool {
    if map.contains_key(key) {
        return false;
    }
    map.insert(key.to_string(), default);
    true
}

/// Restores the record invariants a hand-edited document may violate.
fn sanitize(document: &mut ProgressDocument) -> bool {
    let mut changed = false;
    for (key, grade) in document.grades.iter_mut() {
        if grade.stars > MAX_STARS {
            grade.stars = MAX_STARS;
            changed = true;
        }
        for op in grade.operations.values_mut() {
            if op.stars > MAX_STARS {
                op.stars = MAX_STARS;
                changed = true;
            }
            if op.correct_count > op.total_count {
                op.correct_count = op.total_count;
                changed = true;
            }
            if op.completed && op.stars == 0 {
                op.completed = false;
                changed = true;
            }
            if op.history.len() > HISTORY_LIMIT {
                let excess = op.history.len() - HISTORY_LIMIT;
                op.history.drain(..excess);
                changed = true;
            }
        }
        changed |= relock_out_of_order(*key, grade);
    }
    let before = document.achievements.len();
    let mut seen = std::collections::HashSet::new();
    document.achievements.retain(|a| seen.insert(a.id.clone()));
    changed |= document.achievements.len() != before;
    changed
}
