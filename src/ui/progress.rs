use installer_core::anim::Spring;
use ratatui::text::{Line, Span};

use super::theme;

pub(crate) const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
pub(crate) const SPINNER_LEN: usize = SPINNER.len();
const SPINNER_RATE: u32 = 6;

/// Bar that eases toward its target fraction on a critically damped spring.
#[derive(Clone, Debug)]
pub struct ProgressBar {
    spring: Spring,
    width: usize,
}

impl ProgressBar {
    pub fn new(width: usize) -> Self {
        let mut spring = Spring::smooth();
        spring.set_pos(0.0);
        Self { spring, width }
    }

    pub fn set_progress(&mut self, fraction: f64) {
        self.spring.set_target(fraction.clamp(0.0, 1.0));
    }

    pub fn update(&mut self) {
        self.spring.update();
    }

    pub fn current(&self) -> f64 {
        self.spring.pos()
    }

    pub fn done(&self) -> bool {
        self.current() >= 0.99 && self.spring.at_rest()
    }

    pub fn view(&self) -> Line<'static> {
        let current = self.current().clamp(0.0, 1.0);
        let filled = ((current * self.width as f64).round() as usize).min(self.width);
        Line::from(vec![
            Span::styled("█".repeat(filled), theme::progress_fill()),
            Span::styled("░".repeat(self.width - filled), theme::progress_bg()),
            Span::styled(
                format!(" {:3}%", (current * 100.0).round() as u32),
                theme::dim(),
            ),
        ])
    }
}

#[derive(Clone, Debug, Default)]
pub struct Spinner {
    index: usize,
    ticks: u32,
}

impl Spinner {
    pub fn update(&mut self) {
        self.ticks += 1;
        if self.ticks % SPINNER_RATE == 0 {
            self.index = (self.index + 1) % SPINNER_LEN;
        }
    }

    pub fn frame(&self) -> &'static str {
        SPINNER[self.index]
    }
}
