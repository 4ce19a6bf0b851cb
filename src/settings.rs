use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::app::logging::DEFAULT_LOG_FILE_PATH;

pub const CONFIG_DIR_ENV: &str = "HECATE_CONFIG_DIR";
pub const LOG_FILE_ENV: &str = "HECATE_INSTALLER_LOG";
pub const DRY_RUN_ENV: &str = "HECATE_DRY_RUN";
pub const DRY_RUN_FAIL_ENV: &str = "HECATE_DRY_RUN_FAIL";
pub const SEED_ENV: &str = "HECATE_SEED";
pub const SKIP_SUDO_ENV: &str = "HECATE_SKIP_SUDO";

const SHELL_DIR_NAME: &str = "HecateShell";

/// Startup toggles read from the environment (after `.env` is loaded).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub config_dir: PathBuf,
    pub log_file: PathBuf,
    pub dry_run: bool,
    pub dry_run_fail: Option<String>,
    pub seed: Option<u64>,
    pub skip_sudo: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).as_deref() == Some("1");
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let config_dir = match non_empty(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .context("locate the user config directory")?
                .join(SHELL_DIR_NAME),
        };
        let log_file = non_empty(LOG_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_PATH));
        let seed = non_empty(SEED_ENV)
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("{SEED_ENV} must be an unsigned integer, got {value:?}"))
            })
            .transpose()?;

        Ok(Self {
            config_dir,
            log_file,
            dry_run: flag(DRY_RUN_ENV),
            dry_run_fail: non_empty(DRY_RUN_FAIL_ENV).map(|value| value.trim().to_lowercase()),
            seed,
            skip_sudo: flag(SKIP_SUDO_ENV),
        })
    }
}
