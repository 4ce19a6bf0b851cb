use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use installer_core::{Actions, Dotfile, PackageManager};

pub const REPO_URL: &str = "https://github.com/river1337/HecateShell.git";
const SHELL_ENTRY: &str = "shell.qml";

pub const DEPENDENCIES: [&str; 7] = [
    "quickshell-git",
    "cava",
    "pipewire",
    "wireplumber",
    "matugen-bin",
    "swww",
    "ttf-jetbrains-mono-nerd",
];

// Subset available from the official repositories
pub const OFFICIAL_DEPENDENCIES: [&str; 4] =
    ["cava", "pipewire", "wireplumber", "ttf-jetbrains-mono-nerd"];

// Binaries checked after installing; fonts have none
const DEPENDENCY_BINARIES: [&str; 6] = ["quickshell", "cava", "pipewire", "wpctl", "matugen", "swww"];

const STDERR_TAIL_LINES: usize = 3;
const BACKUP_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
pub const DRY_RUN_DELAY: Duration = Duration::from_millis(600);

fn shell_installed(config_dir: &Path) -> bool {
    config_dir.join(SHELL_ENTRY).is_file()
}

/// Program and arguments that install the dependency set with `package_manager`.
pub fn dependency_command(package_manager: PackageManager) -> (&'static str, Vec<&'static str>) {
    let mut args = Vec::new();
    let program = if package_manager.supports_aur() {
        package_manager.command()
    } else {
        args.push(package_manager.command());
        "sudo"
    };
    args.extend(["-S", "--noconfirm", "--needed"]);
    if package_manager.supports_aur() {
        args.extend(DEPENDENCIES);
    } else {
        args.extend(OFFICIAL_DEPENDENCIES);
    }
    (program, args)
}

fn run_command(program: &str, args: &[&str]) -> Result<()> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("run {program}"))?;
    if !output.status.success() {
        let tail = stderr_tail(&output.stderr);
        if tail.is_empty() {
            bail!("{program} {} failed ({})", args.join(" "), output.status);
        }
        bail!("{program} {} failed ({}): {tail}", args.join(" "), output.status);
    }
    Ok(())
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let skip = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[skip..].join(" | ")
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow!("path is not valid UTF-8: {}", path.display()))
}

/// `<dest>.backup.<local date>_<local time>`, e.g. `kitty.backup.2025-03-01_14-05-09`.
fn backup_path(dest: &Path) -> PathBuf {
    let stamp = Local::now().format(BACKUP_STAMP_FORMAT);
    PathBuf::from(format!("{}.backup.{stamp}", dest.display()))
}

/// Actions that touch the real system: package managers, git, and `~/.config`.
#[derive(Clone, Debug)]
pub struct SystemActions {
    config_dir: PathBuf,
    user_config: PathBuf,
    // None searches the process PATH
    search_path: Option<OsString>,
}

impl SystemActions {
    pub fn new(config_dir: PathBuf) -> Result<Self> {
        let user_config = dirs::config_dir().context("locate the user config directory")?;
        Ok(Self::with_dirs(config_dir, user_config))
    }

    pub fn with_dirs(config_dir: PathBuf, user_config: PathBuf) -> Self {
        Self {
            config_dir,
            user_config,
            search_path: None,
        }
    }

    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    fn command_exists(&self, binary: &str) -> bool {
        match &self.search_path {
            Some(paths) => which::which_in(binary, Some(paths), &self.user_config).is_ok(),
            None => which::which(binary).is_ok(),
        }
    }

    fn dotfile_dest(&self, dotfile: Dotfile) -> PathBuf {
        self.user_config.join(dotfile.config_name())
    }
}

impl Actions for SystemActions {
    fn is_installed(&self) -> bool {
        shell_installed(&self.config_dir)
    }

    fn config_dir(&self) -> Result<PathBuf> {
        Ok(self.config_dir.clone())
    }

    fn install_dependencies(&self, package_manager: PackageManager) -> Result<()> {
        let (program, args) = dependency_command(package_manager);
        run_command(program, &args)
    }

    fn install_dotfile(&self, dotfile: Dotfile) -> Result<()> {
        let source = self.config_dir.join(dotfile.source());
        if !source.is_dir() {
            bail!("source dotfiles not found: {}", source.display());
        }
        let dest = self.dotfile_dest(dotfile);
        if dest.exists() {
            let previous = PathBuf::from(format!("{}.backup", dest.display()));
            if previous.exists() {
                fs::remove_dir_all(&previous)
                    .with_context(|| format!("remove {}", previous.display()))?;
            }
            fs::rename(&dest, &previous)
                .with_context(|| format!("move {} aside", dest.display()))?;
        }
        fs::create_dir_all(&self.user_config)
            .with_context(|| format!("create {}", self.user_config.display()))?;
        run_command("cp", &["-a", path_arg(&source)?, path_arg(&dest)?])
    }

    fn backup_dotfile(&self, dotfile: Dotfile) -> Result<()> {
        let dest = self.dotfile_dest(dotfile);
        if !dest.exists() {
            return Ok(());
        }
        let backup = backup_path(&dest);
        run_command("cp", &["-a", path_arg(&dest)?, path_arg(&backup)?])
    }

    fn install_shell(&self, force: bool) -> Result<()> {
        if shell_installed(&self.config_dir) && !force {
            bail!("HecateShell is already installed");
        }
        if self.config_dir.exists() {
            fs::remove_dir_all(&self.config_dir)
                .with_context(|| format!("remove {}", self.config_dir.display()))?;
        }
        if let Some(parent) = self.config_dir.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        run_command(
            "git",
            &["clone", "--depth", "1", REPO_URL, path_arg(&self.config_dir)?],
        )?;
        if !shell_installed(&self.config_dir) {
            bail!("{SHELL_ENTRY} missing after clone");
        }
        Ok(())
    }

    fn update_shell(&self) -> Result<()> {
        if !shell_installed(&self.config_dir) {
            bail!("HecateShell is not installed");
        }
        run_command(
            "git",
            &["-C", path_arg(&self.config_dir)?, "pull", "origin", "main"],
        )
    }

    fn run_post_install(&self) -> Result<()> {
        let missing: Vec<&str> = DEPENDENCY_BINARIES
            .into_iter()
            .filter(|binary| !self.command_exists(binary))
            .collect();
        if !missing.is_empty() {
            bail!("commands not found on PATH: {}", missing.join(", "));
        }
        Ok(())
    }
}

/// Stand-in actions that sleep and succeed, except for the one named by
/// `fail` (`deps`, `shell`, `finish`, or a dotfile name).
#[derive(Clone, Debug)]
pub struct DryRunActions {
    config_dir: PathBuf,
    fail: Option<String>,
    delay: Duration,
}

impl DryRunActions {
    pub fn new(config_dir: PathBuf, fail: Option<String>, delay: Duration) -> Self {
        Self {
            config_dir,
            fail,
            delay,
        }
    }

    fn step(&self, name: &str) -> Result<()> {
        thread::sleep(self.delay);
        if self.fail.as_deref() == Some(name) {
            bail!("dry run: simulated {name} failure");
        }
        Ok(())
    }
}

impl Actions for DryRunActions {
    fn is_installed(&self) -> bool {
        shell_installed(&self.config_dir)
    }

    fn config_dir(&self) -> Result<PathBuf> {
        Ok(self.config_dir.clone())
    }

    fn install_dependencies(&self, _package_manager: PackageManager) -> Result<()> {
        self.step("deps")
    }

    fn install_dotfile(&self, dotfile: Dotfile) -> Result<()> {
        self.step(&dotfile.label().to_lowercase())
    }

    fn backup_dotfile(&self, _dotfile: Dotfile) -> Result<()> {
        thread::sleep(self.delay);
        Ok(())
    }

    fn install_shell(&self, _force: bool) -> Result<()> {
        self.step("shell")
    }

    fn update_shell(&self) -> Result<()> {
        self.step("shell")
    }

    fn run_post_install(&self) -> Result<()> {
        self.step("finish")
    }
}
