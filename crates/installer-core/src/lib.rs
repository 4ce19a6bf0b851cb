//! UI-independent core of the HecateShell installer: animation primitives,
//! the user's accumulated choices, and the sequential task runner.

pub mod actions;
pub mod anim;
pub mod choices;
pub mod events;
pub mod tasks;

pub use actions::Actions;
pub use choices::{Dotfile, InstallerChoices, PackageManager};
pub use events::{TaskEvent, TaskStatus};
pub use tasks::{OnFailure, RunOutcome, Task, TaskList, TaskRunner};
