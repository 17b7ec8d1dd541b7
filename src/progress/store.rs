use super::migrations;
use super::{
    percent_of, Achievement, GradeProgress, HistoryEntry, OperationProgress, Precision,
    ProgressDocument, HISTORY_LIMIT, LEGACY_STORAGE_KEY, MAX_STARS, STORAGE_KEY,
};
use crate::curriculum::{Grade, OperationId};
use crate::settings::GradeUnlockPolicy;
use crate::storage::KeyValueStore;
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

/// What an `update_operation` call opened up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub unlocked_operation: Option<OperationId>,
    pub unlocked_grade: Option<Grade>,
    /// The grade became completed by this update.
    pub grade_completed: bool,
}

/// Owns the progress document and writes it through to `storage`.
///
/// Reads never fail: absent records answer with locked/zero defaults.
/// Persistence errors are logged and the in-memory state stays
/// authoritative for the rest of the run.
#[derive(Debug)]
pub struct ProgressStore<S: KeyValueStore> {
    storage: S,
    document: ProgressDocument,
    policy: GradeUnlockPolicy,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn open(storage: S) -> Self {
        Self::with_policy(storage, GradeUnlockPolicy::default())
    }

    pub fn with_policy(storage: S, policy: GradeUnlockPolicy) -> Self {
        let mut store = Self {
            storage,
            document: ProgressDocument::default(),
            policy,
        };
        store.load();
        store
    }

    fn load(&mut self) {
        let (document, mut dirty) = match self.storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => match parse_current(&raw) {
                Ok((document, changed)) => {
                    if changed {
                        info!("backfilled progress document to current schema");
                    }
                    (document, changed)
                }
                Err(err) => {
                    warn!(error = %format!("{err:#}"), "progress document is corrupted; resetting");
                    (ProgressDocument::default(), true)
                }
            },
            Ok(None) => self.load_legacy(),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "progress storage unavailable; using defaults");
                (ProgressDocument::default(), false)
            }
        };
        self.document = document;
        dirty |= self.refresh_grades();
        if dirty {
            self.persist();
        }
    }

    fn load_legacy(&mut self) -> (ProgressDocument, bool) {
        let raw = match self.storage.get(LEGACY_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return (ProgressDocument::default(), true),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "legacy progress unreadable; starting fresh");
                return (ProgressDocument::default(), true);
            }
        };
        let document = serde_json::from_str(&raw)
            .context("Legacy progress is not valid JSON")
            .and_then(|value| migrations::from_legacy(&value));
        let document = match document {
            Ok(document) => {
                info!("migrated legacy progress document");
                document
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "legacy progress is corrupted; resetting");
                ProgressDocument::default()
            }
        };
        if let Err(err) = self.storage.remove(LEGACY_STORAGE_KEY) {
            warn!(error = %format!("{err:#}"), "failed to remove legacy progress entry");
        }
        (document, true)
    }

    /// Writes the document; failures are logged and reported as `false`.
    fn persist(&mut self) -> bool {
        match self.write_document() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "failed to persist progress");
                false
            }
        }
    }

    fn write_document(&mut self) -> Result<()> {
        let data =
            serde_json::to_string(&self.document).context("Failed to serialize progress")?;
        self.storage.set(STORAGE_KEY, &data)
    }

    pub fn policy(&self) -> GradeUnlockPolicy {
        self.policy
    }

    pub fn document(&self) -> &ProgressDocument {
        &self.document
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn grade(&self, grade: Grade) -> GradeProgress {
        self.document.grade(grade).cloned().unwrap_or_default()
    }

    pub fn operation(&self, grade: Grade, operation: OperationId) -> OperationProgress {
        self.document
            .operation(grade, operation)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_grade_unlocked(&self, grade: Grade) -> bool {
        self.document.grade(grade).is_some_and(|g| g.unlocked)
    }

    pub fn is_grade_completed(&self, grade: Grade) -> bool {
        self.document.grade(grade).is_some_and(|g| g.completed)
    }

    pub fn is_operation_unlocked(&self, grade: Grade, operation: OperationId) -> bool {
        self.document
            .operation(grade, operation)
            .is_some_and(|op| op.unlocked)
    }

    pub fn is_operation_completed(&self, grade: Grade, operation: OperationId) -> bool {
        self.document
            .operation(grade, operation)
            .is_some_and(|op| op.completed)
    }

    pub fn operation_stars(&self, grade: Grade, operation: OperationId) -> u8 {
        self.document
            .operation(grade, operation)
            .map_or(0, |op| op.stars)
    }

    pub fn operation_precision(&self, grade: Grade, operation: OperationId) -> Precision {
        self.document
            .operation(grade, operation)
            .map(OperationProgress::precision)
            .unwrap_or_default()
    }

    /// Opens `grade` and its first operation.
    pub fn unlock_grade(&mut self, grade: Grade) {
        let changed = self
            .document
            .grades
            .entry(grade)
            .or_insert_with(|| GradeProgress::initial(grade))
            .unlock();
        if changed {
            debug!(grade = grade.get(), "grade unlocked");
            self.persist();
        }
    }

    /// Records one finished session for `(grade, operation)` and runs the
    /// unlock cascade.
    ///
    /// `stars` is clamped to 0..=3 and `correct` to `total`. Counts and
    /// precision describe this session only; stars keep their best value.
    /// `completed` is honoured only together with at least one star.
    pub fn update_operation(
        &mut self,
        grade: Grade,
        operation: OperationId,
        completed: bool,
        stars: u8,
        correct: u32,
        total: u32,
    ) -> UpdateOutcome {
        if !grade.offers(operation) {
            warn!(grade = grade.get(), %operation, "grade does not offer operation; ignoring update");
            return UpdateOutcome::default();
        }
        let stars = stars.min(MAX_STARS);
        let correct = correct.min(total);
        let percent = percent_of(correct, total);
        let now = Utc::now();

        let record = self
            .document
            .grades
            .entry(grade)
            .or_insert_with(|| GradeProgress::initial(grade))
            .operations
            .entry(operation)
            .or_default();
        record.correct_count = correct;
        record.total_count = total;
        record.precision = percent;
        record.history.push(HistoryEntry {
            timestamp: now,
            correct_count: correct,
            total_count: total,
            percent,
        });
        if record.history.len() > HISTORY_LIMIT {
            let excess = record.history.len() - HISTORY_LIMIT;
            record.history.drain(..excess);
        }
        record.stars = record.stars.max(stars);
        if completed && stars >= 1 {
            record.completed = true;
        }
        record.last_played_at = Some(now);

        self.document.total_exercises += u64::from(total);
        self.document.total_correct += u64::from(correct);

        let outcome = self.cascade(grade, operation);
        self.persist();
        outcome
    }

    fn cascade(&mut self, grade: Grade, operation: OperationId) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();
        let Some(progress) = self.document.grades.get_mut(&grade) else {
            return outcome;
        };

        let completed = progress
            .operations
            .get(&operation)
            .is_some_and(|op| op.completed);
        if completed {
            if let Some(next) = operation.next_in(grade) {
                let successor = progress.operations.entry(next).or_default();
                if !successor.unlocked {
                    successor.unlocked = true;
                    outcome.unlocked_operation = Some(next);
                    debug!(grade = grade.get(), operation = %next, "operation unlocked");
                }
            }
        }

        if progress.all_operations_completed() {
            outcome.grade_completed = !progress.completed;
            progress.completed = true;
            progress.stars = progress.stars.max(progress.derived_stars());
        }

        if let Some(next_grade) = grade.next() {
            if self.grade_unlock_due(grade) {
                let next = self
                    .document
                    .grades
                    .entry(next_grade)
                    .or_insert_with(|| GradeProgress::initial(next_grade));
                if !next.unlocked {
                    next.unlock();
                    outcome.unlocked_grade = Some(next_grade);
                    debug!(grade = next_grade.get(), "grade unlocked");
                }
            }
        }
        outcome
    }

    fn grade_unlock_due(&self, grade: Grade) -> bool {
        let Some(progress) = self.document.grade(grade) else {
            return matches!(self.policy, GradeUnlockPolicy::Always);
        };
        match self.policy {
            GradeUnlockPolicy::AnyOperationCompleted => progress.completed_operations() > 0,
            GradeUnlockPolicy::AllOperationsCompleted => progress.all_operations_completed(),
            GradeUnlockPolicy::Always => true,
        }
    }

    /// Re-derives grade completion, grade stars and policy unlocks for the
    /// whole document. Returns whether anything changed.
    fn refresh_grades(&mut self) -> bool {
        let mut changed = false;
        for grade in Grade::ALL {
            let due = self.grade_unlock_due(grade);
            let Some(progress) = self.document.grades.get_mut(&grade) else {
                continue;
            };
            if progress.unlocked {
                changed |= progress.unlock();
            }
            if progress.all_operations_completed() {
                let stars = progress.stars.max(progress.derived_stars());
                changed |= !progress.completed || stars != progress.stars;
                progress.completed = true;
                progress.stars = stars;
            }
            for op in grade.operations() {
                let done = progress.operations.get(op).is_some_and(|p| p.completed);
                if let (true, Some(next)) = (done, op.next_in(grade)) {
                    if let Some(successor) = progress.operations.get_mut(&next) {
                        changed |= !successor.unlocked;
                        successor.unlocked = true;
                    }
                }
            }
            if let (true, Some(next_grade)) = (due, grade.next()) {
                if let Some(next) = self.document.grades.get_mut(&next_grade) {
                    changed |= next.unlock();
                }
            }
        }
        if self.policy == GradeUnlockPolicy::Always {
            if let Some(first) = self.document.grades.get_mut(&Grade::first()) {
                changed |= first.unlock();
            }
        }
        changed
    }

    /// Adds an achievement unless one with the same id exists.
    pub fn record_achievement(&mut self, id: &str, description: &str) -> bool {
        if self.document.has_achievement(id) {
            return false;
        }
        self.document.achievements.push(Achievement {
            id: id.to_string(),
            description: description.to_string(),
            timestamp: Utc::now(),
        });
        self.persist();
        true
    }

    /// Back to the default document.
    pub fn reset_progress(&mut self) {
        self.document = ProgressDocument::default();
        self.refresh_grades();
        info!("progress reset");
        self.persist();
    }

    pub fn export_document(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.document).context("Failed to serialize progress")
    }

    /// Replaces the state with `json`, upgraded like a stored document.
    pub fn import_document(&mut self, json: &str) -> Result<()> {
        let (document, _) = parse_current(json)?;
        self.document = document;
        self.refresh_grades();
        self.write_document()
            .context("Imported progress could not be persisted")?;
        info!("progress imported");
        Ok(())
    }
}

fn parse_current(raw: &str) -> Result<(ProgressDocument, bool)> {
    let value = serde_json::from_str(raw).context("Progress document is not valid JSON")?;
    migrations::upgrade(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn grade(n: u8) -> Grade {
        Grade::new(n).unwrap()
    }

    fn fresh() -> ProgressStore<MemoryStore> {
        ProgressStore::open(MemoryStore::new())
    }

    #[derive(Debug, Default)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            anyhow::bail!("disk unavailable")
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("disk unavailable")
        }
        fn remove(&mut self, _key: &str) -> Result<()> {
            anyhow::bail!("disk unavailable")
        }
    }

    #[test]
    fn opening_empty_storage_persists_defaults() {
        let store = fresh();
        assert!(store.storage().contains(STORAGE_KEY));
        assert!(store.is_grade_unlocked(grade(1)));
        assert!(store.is_operation_unlocked(grade(1), OperationId::Addition));
        assert!(!store.is_grade_unlocked(grade(2)));
    }

    #[test]
    fn passing_session_unlocks_successor_and_next_grade() {
        let mut store = fresh();
        let outcome = store.update_operation(grade(1), OperationId::Addition, true, 2, 18, 20);
        assert_eq!(outcome.unlocked_operation, Some(OperationId::Subtraction));
        assert_eq!(outcome.unlocked_grade, Some(grade(2)));
        assert!(store.is_operation_unlocked(grade(2), OperationId::Addition));
        assert!(!store.is_operation_unlocked(grade(2), OperationId::Subtraction));
        assert_eq!(store.document().total_exercises, 20);
        assert_eq!(store.document().total_correct, 18);
    }

    #[test]
    fn failed_session_records_counts_without_cascade() {
        let mut store = fresh();
        let outcome = store.update_operation(grade(1), OperationId::Addition, false, 0, 10, 20);
        assert_eq!(outcome, UpdateOutcome::default());
        let op = store.operation(grade(1), OperationId::Addition);
        assert!(!op.completed);
        assert_eq!(op.precision, 50);
        assert_eq!(op.history.len(), 1);
        assert!(op.last_played_at.is_some());
    }

    #[test]
    fn stars_keep_their_best_value_while_counts_are_overwritten() {
        let mut store = fresh();
        store.update_operation(grade(1), OperationId::Addition, true, 3, 20, 20);
        store.update_operation(grade(1), OperationId::Addition, true, 1, 16, 20);
        assert_eq!(store.operation_stars(grade(1), OperationId::Addition), 3);
        assert_eq!(
            store.operation_precision(grade(1), OperationId::Addition).text,
            "16/20 intentos (80%)"
        );
    }

    #[test]
    fn history_keeps_last_ten_sessions() {
        let mut store = fresh();
        for correct in 0..12 {
            store.update_operation(grade(1), OperationId::Addition, false, 0, correct, 20);
        }
        let history = store.operation(grade(1), OperationId::Addition).history;
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].correct_count, 2);
        assert_eq!(history[9].correct_count, 11);
    }

    #[test]
    fn inputs_are_clamped() {
        let mut store = fresh();
        store.update_operation(grade(1), OperationId::Addition, true, 9, 25, 20);
        let op = store.operation(grade(1), OperationId::Addition);
        assert_eq!(op.stars, 3);
        assert_eq!(op.correct_count, 20);
    }

    #[test]
    fn completed_requires_a_star() {
        let mut store = fresh();
        store.update_operation(grade(1), OperationId::Addition, true, 0, 5, 20);
        assert!(!store.is_operation_completed(grade(1), OperationId::Addition));
    }

    #[test]
    fn unsupported_pair_is_ignored() {
        let mut store = fresh();
        let outcome = store.update_operation(grade(1), OperationId::Powers, true, 3, 10, 10);
        assert_eq!(outcome, UpdateOutcome::default());
        assert_eq!(store.document().total_exercises, 0);
    }

    #[test]
    fn finishing_every_operation_completes_grade() {
        let mut store = fresh();
        let mut last = UpdateOutcome::default();
        for (op, stars) in grade(1).operations().iter().zip([3, 3, 2, 3]) {
            last = store.update_operation(grade(1), *op, true, stars, 19, 20);
        }
        assert!(last.grade_completed);
        assert!(store.is_grade_completed(grade(1)));
        assert_eq!(store.grade(grade(1)).stars, 3);
    }

    #[test]
    fn all_operations_policy_holds_next_grade() {
        let mut store =
            ProgressStore::with_policy(MemoryStore::new(), GradeUnlockPolicy::AllOperationsCompleted);
        store.update_operation(grade(1), OperationId::Addition, true, 3, 20, 20);
        assert!(!store.is_grade_unlocked(grade(2)));
        for op in &grade(1).operations()[1..] {
            store.update_operation(grade(1), *op, true, 1, 16, 20);
        }
        assert!(store.is_grade_unlocked(grade(2)));
    }

    #[test]
    fn always_policy_opens_every_grade() {
        let store = ProgressStore::with_policy(MemoryStore::new(), GradeUnlockPolicy::Always);
        for g in Grade::ALL {
            assert!(store.is_grade_unlocked(g));
            assert!(store.is_operation_unlocked(g, OperationId::Addition));
        }
    }

    #[test]
    fn corrupted_document_resets() {
        let storage = MemoryStore::new().with_entry(STORAGE_KEY, "{not json");
        let store = ProgressStore::open(storage);
        assert_eq!(store.document(), &ProgressDocument::default());
        assert!(store.storage().raw(STORAGE_KEY).unwrap().starts_with('{'));
        assert!(store.storage().raw(STORAGE_KEY).unwrap().contains("\"version\":2"));
    }

    #[test]
    fn legacy_document_is_migrated_and_removed() {
        let legacy = r#"{"grades":{"1":{"unlocked":true,"operations":{
            "addition":{"unlocked":true,"completed":true,"stars":2},
            "subtraction":{"unlocked":false,"completed":false,"stars":0}}}}}"#;
        let store = ProgressStore::open(MemoryStore::new().with_entry(LEGACY_STORAGE_KEY, legacy));
        assert!(!store.storage().contains(LEGACY_STORAGE_KEY));
        assert!(store.storage().contains(STORAGE_KEY));
        assert_eq!(store.operation_stars(grade(1), OperationId::Addition), 2);
        // refresh applies the cascade the legacy format never stored
        assert!(store.is_operation_unlocked(grade(1), OperationId::Subtraction));
        assert!(store.is_grade_unlocked(grade(2)));
    }

    #[test]
    fn unavailable_storage_degrades_to_defaults() {
        let mut store = ProgressStore::open(BrokenStore);
        assert!(store.is_grade_unlocked(grade(1)));
        let outcome = store.update_operation(grade(1), OperationId::Addition, true, 3, 20, 20);
        assert_eq!(outcome.unlocked_operation, Some(OperationId::Subtraction));
        assert!(store.import_document("{}").is_err());
    }

    #[test]
    fn achievements_are_deduplicated() {
        let mut store = fresh();
        assert!(store.record_achievement("first_pass", "Primer nivel aprobado"));
        assert!(!store.record_achievement("first_pass", "again"));
        assert_eq!(store.document().achievements.len(), 1);
    }

    #[test]
    fn reset_discards_progress() {
        let mut store = fresh();
        store.update_operation(grade(1), OperationId::Addition, true, 3, 20, 20);
        store.reset_progress();
        assert_eq!(store.document(), &ProgressDocument::default());
    }

    #[test]
    fn import_rejects_garbage_and_keeps_state() {
        let mut store = fresh();
        store.update_operation(grade(1), OperationId::Addition, true, 3, 20, 20);
        assert!(store.import_document("[]").is_err());
        assert_eq!(store.operation_stars(grade(1), OperationId::Addition), 3);
    }

    #[test]
    fn import_relocks_operations_ahead_of_their_predecessor() {
        let mut document = ProgressDocument::default();
        document
            .grades
            .get_mut(&grade(1))
            .unwrap()
            .operations
            .get_mut(&OperationId::Division)
            .unwrap()
            .unlocked = true;
        let json = serde_json::to_string(&document).unwrap();

        let mut store = fresh();
        store.import_document(&json).unwrap();
        assert!(!store.is_operation_unlocked(grade(1), OperationId::Division));
        assert!(!store.is_operation_completed(grade(1), OperationId::Multiplication));
        assert!(store.is_operation_unlocked(grade(1), OperationId::Addition));

        store.update_operation(grade(1), OperationId::Addition, true, 1, 16, 20);
        assert!(store.is_operation_unlocked(grade(1), OperationId::Subtraction));
        assert!(!store.is_operation_unlocked(grade(1), OperationId::Division));
    }
}
