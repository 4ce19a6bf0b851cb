use installer_core::anim::{LogoAssembler, MultiTypewriter, Spring, Typewriter};
use installer_core::{Dotfile, PackageManager, TaskRunner};

use crate::ui::checklist::Checklist;
use crate::ui::progress::{ProgressBar, Spinner};
use crate::ui::selector::Selector;

pub use installer_core::events::{TaskEvent, TaskStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    UpdatePrompt,
    Deps,
    PackageManager,
    Dotfiles,
    Shell,
    Installing,
    Complete,
    Error,
}

impl Screen {
    pub fn name(self) -> &'static str {
        match self {
            Screen::Welcome => "welcome",
            Screen::UpdatePrompt => "update-prompt",
            Screen::Deps => "deps",
            Screen::PackageManager => "package-manager",
            Screen::Dotfiles => "dotfiles",
            Screen::Shell => "shell",
            Screen::Installing => "installing",
            Screen::Complete => "complete",
            Screen::Error => "error",
        }
    }

    /// Complete and Error can only be left by exiting.
    pub fn is_terminal(self) -> bool {
        matches!(self, Screen::Complete | Screen::Error)
    }
}

// Logo assembly followed by the greeting
pub struct WelcomeScreen {
    pub logo: LogoAssembler,
    pub greeting: Typewriter,
}

impl WelcomeScreen {
    pub fn intro_done(&self) -> bool {
        self.logo.done() && self.greeting.done()
    }
}

pub struct InstallingScreen {
    pub runner: TaskRunner,
    pub bar: ProgressBar,
    pub spinner: Spinner,
}

pub struct CompleteScreen {
    // Rows above the resting position, springs back to 0
    pub bounce: Spring,
    pub summary: MultiTypewriter,
}

pub struct ErrorScreen {
    pub task: String,
    pub message: String,
}

/// Widgets of the active screen. Leaving a screen drops its state.
pub enum ScreenContext {
    Welcome(WelcomeScreen),
    UpdatePrompt(Selector<bool>),
    Deps(Selector<bool>),
    PackageManager(Selector<PackageManager>),
    Dotfiles(Checklist<Dotfile>),
    Shell(Selector<bool>),
    Installing(InstallingScreen),
    Complete(CompleteScreen),
    Error(ErrorScreen),
}

impl ScreenContext {
    pub fn screen(&self) -> Screen {
        match self {
            ScreenContext::Welcome(_) => Screen::Welcome,
            ScreenContext::UpdatePrompt(_) => Screen::UpdatePrompt,
            ScreenContext::Deps(_) => Screen::Deps,
            ScreenContext::PackageManager(_) => Screen::PackageManager,
            ScreenContext::Dotfiles(_) => Screen::Dotfiles,
            ScreenContext::Shell(_) => Screen::Shell,
            ScreenContext::Installing(_) => Screen::Installing,
            ScreenContext::Complete(_) => Screen::Complete,
            ScreenContext::Error(_) => Screen::Error,
        }
    }
}
