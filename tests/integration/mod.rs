use mathlearn::settings::{GradeUnlockPolicy, HOME_ENV_VAR};
use mathlearn::{FileStore, ProgressStore};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

/// Serializes tests that point `MATHLEARN_HOME` at their own workspace.
static WORKSPACE_ENV: Mutex<()> = Mutex::new(());

pub struct IntegrationHarness {
    workspace: TempDir,
    _env: MutexGuard<'static, ()>,
}

impl IntegrationHarness {
    pub fn new() -> Self {
        let guard = WORKSPACE_ENV
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let workspace = TempDir::new().expect("failed to create temp workspace");
        env::set_var(HOME_ENV_VAR, workspace.path());
        Self {
            workspace,
            _env: guard,
        }
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn progress_dir(&self) -> PathBuf {
        self.workspace.path().join("progress")
    }

    pub fn file_store(&self) -> FileStore {
        FileStore::in_workspace().expect("failed to resolve workspace store")
    }

    pub fn open_store(&self) -> ProgressStore<FileStore> {
        ProgressStore::open(self.file_store())
    }

    pub fn open_store_with(&self, policy: GradeUnlockPolicy) -> ProgressStore<FileStore> {
        ProgressStore::with_policy(self.file_store(), policy)
    }
}

mod persistence;
mod progression_flow;
mod properties;
mod settings_file;
