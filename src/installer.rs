use std::sync::Arc;

use crossbeam_channel::Sender;
use installer_core::anim::{
    ticks_per_char, LogoAssembler, MultiTypewriter, Spring, Typewriter, TypewriterConfig,
};
use installer_core::{Actions, Dotfile, InstallerChoices, PackageManager, RunOutcome, TaskList, TaskRunner};
use rand::rngs::StdRng;

use crate::app::keys::Key;
use crate::app::logging::InstallLog;
use crate::model::{
    CompleteScreen, ErrorScreen, InstallingScreen, Screen, ScreenContext, TaskEvent, WelcomeScreen,
};
use crate::ui::checklist::{CheckItem, Checklist};
use crate::ui::progress::{ProgressBar, Spinner};
use crate::ui::selector::{Selector, SelectorOption};
use crate::ui::theme::LOGO;

const GREETING_CHARS_PER_SECOND: u32 = 40;
pub(crate) const PROGRESS_WIDTH: usize = 40;
const BOUNCE_START: f64 = -5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Quit,
}

enum Next {
    Stay,
    Go(Screen),
    Quit,
}

/// Top-level controller. Owns the user's choices, the active screen's widgets,
/// and the random source every animation draws from.
pub struct Installer {
    actions: Arc<dyn Actions>,
    choices: InstallerChoices,
    context: ScreenContext,
    rng: StdRng,
    tx: Sender<TaskEvent>,
    log: InstallLog,
}

impl Installer {
    pub fn new(
        actions: Arc<dyn Actions>,
        mut rng: StdRng,
        tx: Sender<TaskEvent>,
        mut log: InstallLog,
        size: (u16, u16),
    ) -> Self {
        let is_update_run = actions.is_installed();
        log.push(if is_update_run {
            "Starting HecateShell installer (update run)"
        } else {
            "Starting HecateShell installer"
        });

        let greeting = if is_update_run {
            "HecateShell is already installed"
        } else {
            "Welcome to the HecateShell installer"
        };
        let welcome = WelcomeScreen {
            logo: LogoAssembler::new(LOGO, size.0, size.1, &mut rng),
            greeting: Typewriter::new(
                greeting,
                TypewriterConfig {
                    speed: ticks_per_char(GREETING_CHARS_PER_SECOND),
                    ..TypewriterConfig::default()
                },
            ),
        };

        Self {
            actions,
            choices: InstallerChoices::new(is_update_run),
            context: ScreenContext::Welcome(welcome),
            rng,
            tx,
            log,
        }
    }

    pub fn screen(&self) -> Screen {
        self.context.screen()
    }

    pub fn context(&self) -> &ScreenContext {
        &self.context
    }

    pub fn choices(&self) -> &InstallerChoices {
        &self.choices
    }

    pub fn log(&self) -> &InstallLog {
        &self.log
    }

    pub fn handle_key(&mut self, key: Key) -> StepOutcome {
        if key == Key::Quit {
            self.log.push(format!("Quit on {} screen", self.screen().name()));
            return StepOutcome::Quit;
        }

        let choices = &mut self.choices;
        let next = match &mut self.context {
            ScreenContext::Welcome(welcome) => match key {
                Key::Enter | Key::Space if !welcome.intro_done() => {
                    welcome.logo.skip();
                    welcome.greeting.skip();
                    Next::Stay
                }
                Key::Enter | Key::Space if choices.is_update_run() => Next::Go(Screen::UpdatePrompt),
                Key::Enter | Key::Space => Next::Go(Screen::Deps),
                _ => Next::Stay,
            },
            ScreenContext::UpdatePrompt(selector) => match yes_no_key(selector, key) {
                Some(true) => Next::Go(Screen::Deps),
                Some(false) => Next::Quit,
                None => Next::Stay,
            },
            ScreenContext::Deps(selector) => match yes_no_key(selector, key) {
                Some(install) => {
                    choices.install_dependencies = install;
                    if install {
                        Next::Go(Screen::PackageManager)
                    } else {
                        Next::Go(Screen::Dotfiles)
                    }
                }
                None => Next::Stay,
            },
            ScreenContext::PackageManager(selector) => match key {
                Key::Up => {
                    selector.prev();
                    Next::Stay
                }
                Key::Down | Key::Tab => {
                    selector.next();
                    Next::Stay
                }
                Key::Enter => {
                    if let Some(package_manager) = selector.selected() {
                        choices.package_manager = package_manager;
                    }
                    Next::Go(Screen::Dotfiles)
                }
                _ => Next::Stay,
            },
            ScreenContext::Dotfiles(checklist) => {
                match key {
                    Key::Up => checklist.prev(),
                    Key::Down | Key::Tab => checklist.next(),
                    Key::Space => checklist.toggle(),
                    Key::Char('a') => checklist.set_all(true),
                    Key::Char('n') => checklist.set_all(false),
                    _ => {}
                }
                if key == Key::Enter {
                    choices.dotfiles = checklist.selections().collect();
                    Next::Go(Screen::Shell)
                } else {
                    Next::Stay
                }
            }
            ScreenContext::Shell(selector) => match yes_no_key(selector, key) {
                Some(install) => {
                    choices.install_shell = install;
                    Next::Go(Screen::Installing)
                }
                None => Next::Stay,
            },
            ScreenContext::Installing(_) => Next::Stay,
            ScreenContext::Complete(_) | ScreenContext::Error(_) => {
                if key == Key::Enter {
                    Next::Quit
                } else {
                    Next::Stay
                }
            }
        };

        match next {
            Next::Stay => StepOutcome::Continue,
            Next::Go(screen) => {
                self.enter(screen);
                StepOutcome::Continue
            }
            Next::Quit => {
                self.log.push(format!("Exit from {} screen", self.screen().name()));
                StepOutcome::Quit
            }
        }
    }

    /// One animation step for the active screen only.
    pub fn tick(&mut self) {
        match &mut self.context {
            ScreenContext::Welcome(welcome) => {
                welcome.logo.update();
                if welcome.logo.done() {
                    welcome.greeting.update(&mut self.rng);
                }
            }
            ScreenContext::UpdatePrompt(selector)
            | ScreenContext::Deps(selector)
            | ScreenContext::Shell(selector) => selector.update(),
            ScreenContext::PackageManager(selector) => selector.update(),
            ScreenContext::Dotfiles(checklist) => checklist.update(),
            ScreenContext::Installing(installing) => {
                installing.bar.update();
                installing.spinner.update();
            }
            ScreenContext::Complete(complete) => {
                complete.bounce.update();
                complete.summary.update(&mut self.rng);
            }
            ScreenContext::Error(_) => {}
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if let ScreenContext::Welcome(welcome) = &mut self.context {
            welcome.logo.resize(width, height);
        }
    }

    pub fn handle_task_event(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::Log(line) => self.log.push(line),
            TaskEvent::Finished { index, result } => {
                let ScreenContext::Installing(installing) = &mut self.context else {
                    return;
                };
                let outcome = installing.runner.handle_finished(index, result);
                if matches!(outcome, RunOutcome::Started(_) | RunOutcome::Completed) {
                    if let Some(task) = installing.runner.task(index) {
                        self.log.push(format!("TASK {}: {}", task.name, task.status.label()));
                    }
                }
                installing.bar.set_progress(installing.runner.progress());
                self.apply_outcome(outcome);
            }
        }
    }

    fn apply_outcome(&mut self, outcome: RunOutcome) {
        match outcome {
            RunOutcome::Started(index) => {
                if let ScreenContext::Installing(installing) = &self.context {
                    if let Some(task) = installing.runner.task(index) {
                        self.log.push(format!("TASK {}: {}", task.name, task.status.label()));
                    }
                }
            }
            RunOutcome::Completed => {
                self.log.push("DONE: ok");
                self.enter(Screen::Complete);
            }
            RunOutcome::Failed { index, error } => {
                let (name, label) = match &self.context {
                    ScreenContext::Installing(installing) => installing
                        .runner
                        .task(index)
                        .map(|task| (task.name.clone(), task.label.clone()))
                        .unwrap_or_default(),
                    _ => Default::default(),
                };
                let message = format!("{error:#}");
                self.log.push(format!("TASK {name}: FAIL"));
                self.log.push(format!("Screen: {}", Screen::Error.name()));
                self.log.record(&format!("ERROR: {error:?}"));
                self.log.push(format!("DONE: {message}"));
                self.context = ScreenContext::Error(ErrorScreen {
                    task: label,
                    message,
                });
            }
            RunOutcome::Ignored => {}
        }
    }

    fn enter(&mut self, screen: Screen) {
        self.log.push(format!("Screen: {}", screen.name()));
        let context = match screen {
            Screen::UpdatePrompt => ScreenContext::UpdatePrompt(Selector::yes_no(true)),
            Screen::Deps => ScreenContext::Deps(Selector::yes_no(self.choices.install_dependencies)),
            Screen::PackageManager => {
                ScreenContext::PackageManager(package_manager_selector(self.choices.package_manager))
            }
            Screen::Dotfiles => ScreenContext::Dotfiles(dotfile_checklist(&self.choices)),
            Screen::Shell => ScreenContext::Shell(Selector::yes_no(self.choices.install_shell)),
            Screen::Installing => return self.start_install(),
            Screen::Complete => {
                let mut bounce = Spring::bouncy();
                bounce.set_pos(BOUNCE_START);
                bounce.set_target(0.0);
                let lines = summary_lines(&self.choices);
                let config = TypewriterConfig {
                    cursor: false,
                    ..TypewriterConfig::default()
                };
                ScreenContext::Complete(CompleteScreen {
                    bounce,
                    summary: MultiTypewriter::new(lines.as_slice(), config, MultiTypewriter::DEFAULT_LINE_GAP),
                })
            }
            // Welcome only exists at startup; Error carries the failed task.
            Screen::Welcome | Screen::Error => return,
        };
        self.context = context;
    }

    fn start_install(&mut self) {
        let list = TaskList::from_choices(&self.choices, Arc::clone(&self.actions));
        let names: Vec<&str> = list.names().collect();
        self.log.push(format!("Tasks: {}", names.join(", ")));

        let mut runner = TaskRunner::new(list, self.tx.clone());
        let outcome = runner.start();
        self.context = ScreenContext::Installing(InstallingScreen {
            runner,
            bar: ProgressBar::new(PROGRESS_WIDTH),
            spinner: Spinner::default(),
        });
        self.apply_outcome(outcome);
    }
}

// Shared handling for the horizontal Yes/No screens. Returns the confirmed value.
fn yes_no_key(selector: &mut Selector<bool>, key: Key) -> Option<bool> {
    match key {
        Key::Left => selector.prev(),
        Key::Right | Key::Tab => selector.next(),
        Key::Enter => return selector.selected(),
        _ => {}
    }
    None
}

fn package_manager_selector(current: PackageManager) -> Selector<PackageManager> {
    let mut selector = Selector::new(
        PackageManager::ALL
            .into_iter()
            .map(|pm| SelectorOption::described(pm.command(), pm.description(), pm))
            .collect(),
    );
    if let Some(index) = PackageManager::ALL.iter().position(|pm| *pm == current) {
        selector.select(index);
    }
    selector
}

fn dotfile_checklist(choices: &InstallerChoices) -> Checklist<Dotfile> {
    Checklist::new(
        Dotfile::ALL
            .into_iter()
            .map(|dotfile| {
                CheckItem::new(
                    dotfile.label(),
                    format!("~/.config/{}/", dotfile.config_name()),
                    dotfile,
                    choices.dotfiles.get(&dotfile).copied().unwrap_or(true),
                )
            })
            .collect(),
    )
}

pub(crate) fn summary_lines(choices: &InstallerChoices) -> Vec<String> {
    let action = choices.action_word();
    let mut lines = Vec::new();
    if choices.install_dependencies {
        lines.push(format!("• Dependencies {action} with {}", choices.package_manager));
    }
    for dotfile in choices.selected_dotfiles() {
        lines.push(format!("• {dotfile} config {action}"));
    }
    if choices.install_shell {
        lines.push(format!("• HecateShell {action}"));
    }
    lines
}
