use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PackageManager {
    #[default]
    Paru,
    Yay,
    Pacman,
}

impl PackageManager {
    pub const ALL: [PackageManager; 3] = [PackageManager::Paru, PackageManager::Yay, PackageManager::Pacman];

    pub fn command(self) -> &'static str {
        match self {
            PackageManager::Paru => "paru",
            PackageManager::Yay => "yay",
            PackageManager::Pacman => "pacman",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PackageManager::Paru => "AUR helper (Recommended)",
            PackageManager::Yay => "Another AUR helper",
            PackageManager::Pacman => "Official packages only",
        }
    }

    /// Whether AUR-only packages can be installed with this manager.
    pub fn supports_aur(self) -> bool {
        !matches!(self, PackageManager::Pacman)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Dotfile bundles shipped with the shell, declared in install order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dotfile {
    Niri,
    Fish,
    Kitty,
    Micro,
    Fastfetch,
}

impl Dotfile {
    pub const ALL: [Dotfile; 5] = [
        Dotfile::Niri,
        Dotfile::Fish,
        Dotfile::Kitty,
        Dotfile::Micro,
        Dotfile::Fastfetch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Dotfile::Niri => "Niri",
            Dotfile::Fish => "Fish",
            Dotfile::Kitty => "Kitty",
            Dotfile::Micro => "Micro",
            Dotfile::Fastfetch => "Fastfetch",
        }
    }

    /// Directory under `~/.config/` the bundle is installed to.
    pub fn config_name(self) -> &'static str {
        match self {
            Dotfile::Niri => "niri",
            Dotfile::Fish => "fish",
            Dotfile::Kitty => "kitty",
            Dotfile::Micro => "micro",
            Dotfile::Fastfetch => "fastfetch",
        }
    }

    /// Source directory relative to the shell checkout.
    pub fn source(self) -> String {
        format!("dotfiles/{}", self.config_name())
    }
}

impl fmt::Display for Dotfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the user decided while walking through the wizard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallerChoices {
    pub install_dependencies: bool,
    pub package_manager: PackageManager,
    pub dotfiles: BTreeMap<Dotfile, bool>,
    pub install_shell: bool,
    is_update_run: bool,
}

impl InstallerChoices {
    pub fn new(is_update_run: bool) -> Self {
        Self {
            install_dependencies: true,
            package_manager: PackageManager::default(),
            dotfiles: BTreeMap::new(),
            install_shell: true,
            is_update_run,
        }
    }

    /// Fixed at startup from installation detection.
    pub fn is_update_run(&self) -> bool {
        self.is_update_run
    }

    /// Checked dotfiles in canonical order.
    pub fn selected_dotfiles(&self) -> Vec<Dotfile> {
        Dotfile::ALL
            .into_iter()
            .filter(|dotfile| self.dotfiles.get(dotfile).copied().unwrap_or(false))
            .collect()
    }

    /// Past-tense verb used in labels and the summary.
    pub fn action_word(&self) -> &'static str {
        if self.is_update_run {
            "updated"
        } else {
            "installed"
        }
    }
}
