//! Interactive terminal installer for HecateShell.

mod ui;

pub mod app;
pub mod installer;
pub mod model;
pub mod settings;
pub mod system;

pub use installer::{Installer, StepOutcome};
pub use model::{Screen, ScreenContext};
