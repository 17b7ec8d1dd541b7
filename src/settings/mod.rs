pub mod config;

pub use config::{
    config_file_path, load_or_default, save, workspace_root, AppConfig, GradeUnlockPolicy,
    ProgressionSettings, HOME_ENV_VAR,
};
