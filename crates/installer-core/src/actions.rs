use std::path::PathBuf;

use anyhow::Result;

use crate::choices::{Dotfile, PackageManager};

/// Installation steps the engine runs without looking inside. Every method may
/// block for a long time; the task runner only calls them off the UI thread.
pub trait Actions: Send + Sync {
    fn is_installed(&self) -> bool;
    fn config_dir(&self) -> Result<PathBuf>;
    fn install_dependencies(&self, package_manager: PackageManager) -> Result<()>;
    fn install_dotfile(&self, dotfile: Dotfile) -> Result<()>;
    fn backup_dotfile(&self, dotfile: Dotfile) -> Result<()>;
    fn install_shell(&self, force: bool) -> Result<()>;
    fn update_shell(&self) -> Result<()>;
    fn run_post_install(&self) -> Result<()>;
}
