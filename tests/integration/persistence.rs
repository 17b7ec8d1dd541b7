use super::IntegrationHarness;
use anyhow::Result;
use mathlearn::progress::{LEGACY_STORAGE_KEY, STORAGE_KEY};
use mathlearn::settings::GradeUnlockPolicy;
use mathlearn::{Grade, KeyValueStore, OperationId, ProgressDocument, ProgressStore};
use std::fs;

fn grade(n: u8) -> Grade {
    Grade::new(n).unwrap()
}

#[test]
fn progress_survives_reopening_the_workspace() -> Result<()> {
    let harness = IntegrationHarness::new();
    {
        let mut store = harness.open_store();
        store.update_operation(grade(1), OperationId::Addition, true, 3, 20, 20);
        store.record_achievement("first_pass", "¡Aprobaste tu primer nivel!");
    }
    let path = harness.progress_dir().join(format!("{STORAGE_KEY}.json"));
    assert!(path.exists());

    let store = harness.open_store();
    assert_eq!(store.operation_stars(grade(1), OperationId::Addition), 3);
    assert!(store.is_operation_unlocked(grade(1), OperationId::Subtraction));
    assert_eq!(store.document().achievements.len(), 1);
    assert_eq!(store.document().total_correct, 20);
    Ok(())
}

#[test]
fn export_then_import_preserves_unlock_state() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut source = harness.open_store();
    source.update_operation(grade(1), OperationId::Addition, true, 2, 18, 20);
    source.update_operation(grade(1), OperationId::Subtraction, true, 1, 16, 20);
    source.update_operation(grade(2), OperationId::Addition, false, 0, 4, 20);
    let exported = source.export_document()?;

    let mut target = ProgressStore::open(mathlearn::MemoryStore::new());
    target.import_document(&exported)?;

    for g in Grade::ALL {
        assert_eq!(source.is_grade_unlocked(g), target.is_grade_unlocked(g));
        assert_eq!(source.is_grade_completed(g), target.is_grade_completed(g));
        for op in g.operations() {
            let (a, b) = (source.operation(g, *op), target.operation(g, *op));
            assert_eq!(a.unlocked, b.unlocked, "{g} {op}");
            assert_eq!(a.completed, b.completed, "{g} {op}");
            assert_eq!(a.stars, b.stars, "{g} {op}");
        }
    }
    assert!(target.storage().contains(STORAGE_KEY));
    Ok(())
}

#[test]
fn corrupted_file_resets_to_defaults() -> Result<()> {
    let harness = IntegrationHarness::new();
    let dir = harness.progress_dir();
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(format!("{STORAGE_KEY}.json")), "{\"grades\": [")?;

    let store = harness.open_store();
    assert_eq!(store.document(), &ProgressDocument::default());

    let rewritten = harness.file_store().get(STORAGE_KEY)?.unwrap();
    let reparsed: ProgressDocument = serde_json::from_str(&rewritten)?;
    assert_eq!(reparsed, ProgressDocument::default());
    Ok(())
}

#[test]
fn older_current_document_is_backfilled_on_disk() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut storage = harness.file_store();
    storage.set(
        STORAGE_KEY,
        r#"{"version":1,"grades":{"1":{"unlocked":true,"operations":{
            "addition":{"unlocked":true,"completed":true,"stars":1,"correctCount":16,"totalCount":20}}}}}"#,
    )?;

    let store = harness.open_store();
    assert_eq!(store.document().version, 2);
    assert_eq!(
        store.operation_precision(grade(1), OperationId::Addition).text,
        "16/20 intentos (80%)"
    );

    let on_disk: serde_json::Value =
        serde_json::from_str(&harness.file_store().get(STORAGE_KEY)?.unwrap())?;
    assert_eq!(on_disk["version"], 2);
    assert!(on_disk["grades"]["1"]["operations"]["addition"]["history"].is_array());
    assert!(on_disk["grades"]["6"]["operations"]["percentages"].is_object());
    Ok(())
}

#[test]
fn legacy_key_is_migrated_once() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut storage = harness.file_store();
    storage.set(
        LEGACY_STORAGE_KEY,
        r#"{"grades":{
            "1":{"unlocked":true,"operations":{
                "addition":{"unlocked":true,"completed":true,"stars":3},
                "subtraction":{"unlocked":true,"completed":true,"stars":2},
                "multiplication":{"unlocked":true,"completed":false,"stars":0},
                "division":{"unlocked":false,"completed":false,"stars":0}}},
            "2":{"unlocked":false,"operations":{}}}}"#,
    )?;

    let store = harness.open_store_with(GradeUnlockPolicy::AllOperationsCompleted);
    assert_eq!(store.operation_stars(grade(1), OperationId::Subtraction), 2);
    assert!(store.is_operation_unlocked(grade(1), OperationId::Multiplication));
    assert!(!store.is_grade_unlocked(grade(2)));

    let files = harness.file_store();
    assert_eq!(files.get(LEGACY_STORAGE_KEY)?, None);
    assert!(files.get(STORAGE_KEY)?.is_some());
    Ok(())
}

#[test]
fn reset_rewrites_the_stored_document() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut store = harness.open_store();
    store.update_operation(grade(1), OperationId::Addition, true, 3, 20, 20);
    store.reset_progress();

    let reopened = harness.open_store();
    assert_eq!(reopened.document(), &ProgressDocument::default());
    assert_eq!(reopened.operation_precision(grade(1), OperationId::Addition).text, "0/0 intentos (0%)");
    Ok(())
}
