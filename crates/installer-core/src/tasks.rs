use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::Sender;

use crate::actions::Actions;
use crate::choices::InstallerChoices;
use crate::events::{TaskEvent, TaskStatus};

pub type Action = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

/// What a failing action does to the rest of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnFailure {
    /// Stop the run and surface the error.
    Abort,
    /// Log the error as a warning and report the task as succeeded.
    Warn,
}

pub struct Task {
    pub name: String,
    pub label: String,
    pub status: TaskStatus,
    on_failure: OnFailure,
    action: Option<Action>,
}

impl Task {
    pub fn new<F>(name: impl Into<String>, label: impl Into<String>, on_failure: OnFailure, action: F) -> Self
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        Self {
            name: name.into(),
            label: label.into(),
            status: TaskStatus::Pending,
            on_failure,
            action: Some(Box::new(action)),
        }
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("status", &self.status)
            .field("on_failure", &self.on_failure)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Dependencies, then each checked dotfile in canonical order, then the
    /// shell, then the finishing step which is always present.
    pub fn from_choices(choices: &InstallerChoices, actions: Arc<dyn Actions>) -> Self {
        let update = choices.is_update_run();
        let verb = if update { "Updating" } else { "Installing" };
        let mut tasks = Vec::new();

        if choices.install_dependencies {
            let actions = Arc::clone(&actions);
            let package_manager = choices.package_manager;
            tasks.push(Task::new(
                "deps",
                format!("{verb} dependencies..."),
                OnFailure::Abort,
                move || {
                    actions
                        .install_dependencies(package_manager)
                        .with_context(|| format!("install dependencies with {package_manager}"))
                },
            ));
        }

        for dotfile in choices.selected_dotfiles() {
            let actions = Arc::clone(&actions);
            tasks.push(Task::new(
                dotfile.label(),
                format!("{verb} {dotfile} config..."),
                OnFailure::Warn,
                move || {
                    if update {
                        actions
                            .backup_dotfile(dotfile)
                            .with_context(|| format!("back up {dotfile} config"))?;
                    }
                    actions
                        .install_dotfile(dotfile)
                        .with_context(|| format!("install {dotfile} config"))
                },
            ));
        }

        if choices.install_shell {
            let actions = Arc::clone(&actions);
            let label = if update {
                "Updating HecateShell..."
            } else {
                "Downloading HecateShell..."
            };
            tasks.push(Task::new("shell", label, OnFailure::Abort, move || {
                if update {
                    actions.update_shell().context("update HecateShell")
                } else {
                    actions.install_shell(true).context("install HecateShell")
                }
            }));
        }

        tasks.push(Task::new("finish", "Finishing up...", OnFailure::Warn, move || {
            actions.run_post_install().context("post-install")
        }));

        Self { tasks }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tasks.iter().map(|task| task.name.as_str())
    }
}

/// Result of feeding the runner a start request or a completion event.
#[derive(Debug)]
pub enum RunOutcome {
    Started(usize),
    Completed,
    Failed { index: usize, error: anyhow::Error },
    /// Completion for a task that is not the one running; nothing changed.
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunState {
    Idle,
    Running(usize),
    Completed,
    Failed,
}

/// Runs a task list strictly one task at a time. Each action executes on its
/// own thread and reports back through the event channel; the runner itself is
/// only touched from the controller thread.
pub struct TaskRunner {
    tasks: Vec<Task>,
    state: RunState,
    tx: Sender<TaskEvent>,
}

impl TaskRunner {
    pub fn new(list: TaskList, tx: Sender<TaskEvent>) -> Self {
        Self {
            tasks: list.tasks,
            state: RunState::Idle,
            tx,
        }
    }

    pub fn start(&mut self) -> RunOutcome {
        if self.state != RunState::Idle {
            return RunOutcome::Ignored;
        }
        if self.tasks.is_empty() {
            self.state = RunState::Completed;
            return RunOutcome::Completed;
        }
        self.start_task(0)
    }

    fn start_task(&mut self, index: usize) -> RunOutcome {
        let Some(task) = self.tasks.get_mut(index) else {
            self.state = RunState::Completed;
            return RunOutcome::Completed;
        };
        let Some(action) = task.action.take() else {
            return RunOutcome::Ignored;
        };
        task.status = TaskStatus::Running;
        self.state = RunState::Running(index);

        let tx = self.tx.clone();
        let label = task.label.clone();
        let on_failure = task.on_failure;
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(action))
                .unwrap_or_else(|_| Err(anyhow!("{label} panicked")));
            let result = match (result, on_failure) {
                (Err(err), OnFailure::Warn) => {
                    let _ = tx.send(TaskEvent::Log(format!("WARN: {label} {err:#}")));
                    Ok(())
                }
                (result, _) => result,
            };
            let _ = tx.send(TaskEvent::Finished { index, result });
        });

        RunOutcome::Started(index)
    }

    pub fn handle_finished(&mut self, index: usize, result: Result<()>) -> RunOutcome {
        if !matches!(self.state, RunState::Running(running) if running == index) {
            return RunOutcome::Ignored;
        }
        match result {
            Ok(()) => {
                self.tasks[index].status = TaskStatus::Succeeded;
                if index + 1 < self.tasks.len() {
                    self.start_task(index + 1)
                } else {
                    self.state = RunState::Completed;
                    RunOutcome::Completed
                }
            }
            Err(error) => {
                self.tasks[index].status = TaskStatus::Failed;
                self.state = RunState::Failed;
                RunOutcome::Failed { index, error }
            }
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Fraction of tasks that reached a final status.
    pub fn progress(&self) -> f64 {
        if self.tasks.is_empty() {
            return 1.0;
        }
        let finished = self
            .tasks
            .iter()
            .filter(|task| task.status.is_finished())
            .count();
        finished as f64 / self.tasks.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::bail;
    use crossbeam_channel::{unbounded, Receiver};

    use super::*;
    use crate::choices::{Dotfile, PackageManager};

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        fail: Vec<&'static str>,
    }

    impl Recorder {
        fn failing(fail: Vec<&'static str>) -> Self {
            Self {
                fail,
                ..Self::default()
            }
        }

        fn record(&self, call: String) -> Result<()> {
            let fails = self.fail.iter().any(|name| *name == call);
            self.calls.lock().unwrap().push(call.clone());
            if fails {
                bail!("{call} broke");
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Actions for Recorder {
        fn is_installed(&self) -> bool {
            false
        }
        fn config_dir(&self) -> Result<PathBuf> {
            Ok(PathBuf::from("/tmp/hecate-test"))
        }
        fn install_dependencies(&self, package_manager: PackageManager) -> Result<()> {
            self.record(format!("deps:{package_manager}"))
        }
        fn install_dotfile(&self, dotfile: Dotfile) -> Result<()> {
            self.record(format!("dotfile:{dotfile}"))
        }
        fn backup_dotfile(&self, dotfile: Dotfile) -> Result<()> {
            self.record(format!("backup:{dotfile}"))
        }
        fn install_shell(&self, force: bool) -> Result<()> {
            self.record(format!("shell:install:{force}"))
        }
        fn update_shell(&self) -> Result<()> {
            self.record("shell:update".to_string())
        }
        fn run_post_install(&self) -> Result<()> {
            self.record("finish".to_string())
        }
    }

    fn drive(runner: &mut TaskRunner, rx: &Receiver<TaskEvent>) -> (RunOutcome, Vec<String>) {
        let mut logs = Vec::new();
        let mut outcome = runner.start();
        while let RunOutcome::Started(_) = outcome {
            match rx.recv_timeout(Duration::from_secs(5)).expect("task event") {
                TaskEvent::Log(line) => logs.push(line),
                TaskEvent::Finished { index, result } => {
                    outcome = runner.handle_finished(index, result);
                }
            }
        }
        (outcome, logs)
    }

    fn counting_task(name: &'static str, fail: bool) -> Task {
        Task::new(name, name, OnFailure::Abort, move || {
            if fail {
                bail!("{name} exploded");
            }
            Ok(())
        })
    }

    #[test]
    fn stops_at_first_failure() {
        let (tx, rx) = unbounded();
        let list = TaskList::new(vec![
            counting_task("one", false),
            counting_task("two", true),
            counting_task("three", false),
        ]);
        let mut runner = TaskRunner::new(list, tx);
        let (outcome, _) = drive(&mut runner, &rx);

        let RunOutcome::Failed { index, error } = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(index, 1);
        assert_eq!(error.to_string(), "two exploded");
        let statuses: Vec<_> = runner.tasks().iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![TaskStatus::Succeeded, TaskStatus::Failed, TaskStatus::Pending]
        );
        assert!(matches!(runner.start(), RunOutcome::Ignored));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn empty_list_completes_immediately() {
        let (tx, _rx) = unbounded();
        let mut runner = TaskRunner::new(TaskList::default(), tx);
        assert!(matches!(runner.start(), RunOutcome::Completed));
        assert_eq!(runner.progress(), 1.0);
    }

    #[test]
    fn stale_and_duplicate_completions_are_ignored() {
        let (tx, rx) = unbounded();
        let list = TaskList::new(vec![counting_task("a", false), counting_task("b", false)]);
        let mut runner = TaskRunner::new(list, tx);
        assert!(matches!(runner.start(), RunOutcome::Started(0)));
        assert!(matches!(runner.handle_finished(1, Ok(())), RunOutcome::Ignored));

        let TaskEvent::Finished { index, result } = rx.recv_timeout(Duration::from_secs(5)).unwrap() else {
            panic!("expected completion");
        };
        assert!(matches!(runner.handle_finished(index, result), RunOutcome::Started(1)));
        assert!(matches!(runner.handle_finished(0, Ok(())), RunOutcome::Ignored));
        assert!(matches!(runner.start(), RunOutcome::Ignored));
        assert_eq!(runner.tasks()[1].status, TaskStatus::Running);
        assert_eq!(runner.progress(), 0.5);
    }

    #[test]
    fn panicking_action_becomes_a_failure() {
        let (tx, rx) = unbounded();
        let list = TaskList::new(vec![Task::new("boom", "Boom", OnFailure::Abort, || {
            panic!("kaboom")
        })]);
        let mut runner = TaskRunner::new(list, tx);
        let (outcome, _) = drive(&mut runner, &rx);
        assert!(matches!(outcome, RunOutcome::Failed { index: 0, .. }));
    }

    #[test]
    fn fresh_run_builds_tasks_in_canonical_order() {
        let mut choices = InstallerChoices::new(false);
        choices.package_manager = PackageManager::Yay;
        for dotfile in [Dotfile::Kitty, Dotfile::Niri, Dotfile::Fastfetch] {
            choices.dotfiles.insert(dotfile, true);
        }
        choices.dotfiles.insert(Dotfile::Fish, false);

        let recorder = Arc::new(Recorder::default());
        let list = TaskList::from_choices(&choices, recorder.clone());
        assert_eq!(
            list.names().collect::<Vec<_>>(),
            vec!["deps", "Niri", "Kitty", "Fastfetch", "shell", "finish"]
        );

        let (tx, rx) = unbounded();
        let mut runner = TaskRunner::new(list, tx);
        assert_eq!(runner.tasks()[0].label, "Installing dependencies...");
        assert_eq!(runner.tasks()[4].label, "Downloading HecateShell...");
        let (outcome, _) = drive(&mut runner, &rx);
        assert!(matches!(outcome, RunOutcome::Completed));
        assert_eq!(
            recorder.calls(),
            vec![
                "deps:yay",
                "dotfile:Niri",
                "dotfile:Kitty",
                "dotfile:Fastfetch",
                "shell:install:true",
                "finish"
            ]
        );
    }

    #[test]
    fn update_run_backs_up_and_pulls() {
        let mut choices = InstallerChoices::new(true);
        choices.install_dependencies = false;
        choices.dotfiles.insert(Dotfile::Fish, true);

        let recorder = Arc::new(Recorder::default());
        let list = TaskList::from_choices(&choices, recorder.clone());
        let (tx, rx) = unbounded();
        let mut runner = TaskRunner::new(list, tx);
        assert_eq!(runner.tasks()[0].label, "Updating Fish config...");
        assert_eq!(runner.tasks()[1].label, "Updating HecateShell...");
        let (outcome, _) = drive(&mut runner, &rx);
        assert!(matches!(outcome, RunOutcome::Completed));
        assert_eq!(
            recorder.calls(),
            vec!["backup:Fish", "dotfile:Fish", "shell:update", "finish"]
        );
    }

    #[test]
    fn only_finish_task_when_nothing_selected() {
        let mut choices = InstallerChoices::new(false);
        choices.install_dependencies = false;
        choices.install_shell = false;
        let list = TaskList::from_choices(&choices, Arc::new(Recorder::default()));
        assert_eq!(list.names().collect::<Vec<_>>(), vec!["finish"]);
    }

    #[test]
    fn dotfile_failures_are_swallowed() {
        let mut choices = InstallerChoices::new(false);
        choices.install_dependencies = false;
        choices.dotfiles.insert(Dotfile::Niri, true);
        choices.dotfiles.insert(Dotfile::Kitty, true);

        let recorder = Arc::new(Recorder::failing(vec!["dotfile:Niri"]));
        let list = TaskList::from_choices(&choices, recorder.clone());
        let (tx, rx) = unbounded();
        let mut runner = TaskRunner::new(list, tx);
        let (outcome, logs) = drive(&mut runner, &rx);

        assert!(matches!(outcome, RunOutcome::Completed));
        assert!(runner
            .tasks()
            .iter()
            .all(|task| task.status == TaskStatus::Succeeded));
        assert_eq!(logs.len(), 1);
        assert!(logs[0].contains("dotfile:Niri broke"), "{}", logs[0]);
        assert!(recorder.calls().contains(&"dotfile:Kitty".to_string()));
    }

    #[test]
    fn shell_failure_aborts_before_finish() {
        let mut choices = InstallerChoices::new(false);
        choices.install_dependencies = false;

        let recorder = Arc::new(Recorder::failing(vec!["shell:install:true"]));
        let list = TaskList::from_choices(&choices, recorder.clone());
        let (tx, rx) = unbounded();
        let mut runner = TaskRunner::new(list, tx);
        let (outcome, _) = drive(&mut runner, &rx);

        let RunOutcome::Failed { index, error } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(index, 0);
        assert_eq!(format!("{error:#}"), "install HecateShell: shell:install:true broke");
        assert_eq!(runner.tasks()[1].status, TaskStatus::Pending);
        assert!(!recorder.calls().contains(&"finish".to_string()));
    }
}
