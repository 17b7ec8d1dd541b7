use super::IntegrationHarness;
use anyhow::Result;
use mathlearn::settings::{config_file_path, load_or_default, save, workspace_root};
use mathlearn::{AppConfig, GradeUnlockPolicy};
use std::fs;

#[test]
fn config_lives_under_the_workspace() -> Result<()> {
    let harness = IntegrationHarness::new();
    assert_eq!(workspace_root()?, harness.workspace_path());
    assert_eq!(
        config_file_path()?,
        harness.workspace_path().join("config").join("config.toml")
    );
    assert_eq!(load_or_default()?, AppConfig::default());
    Ok(())
}

#[test]
fn saved_policy_drives_the_store() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut config = load_or_default()?;
    config.progression.grade_unlock = GradeUnlockPolicy::Always;
    config.show_timer = true;
    let path = save(&config)?;
    assert!(fs::read_to_string(&path)?.contains("grade_unlock = \"always\""));

    let loaded = load_or_default()?;
    let store = harness.open_store_with(loaded.progression.grade_unlock);
    assert!(store.is_grade_unlocked(mathlearn::Grade::new(6).unwrap()));
    assert_eq!(loaded.exercise_timer().map(|d| d.as_secs()), Some(30));
    Ok(())
}
