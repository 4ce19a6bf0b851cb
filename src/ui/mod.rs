pub mod checklist;
pub mod progress;
pub mod selector;
pub mod theme;

use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::installer::Installer;
use crate::model::{
    CompleteScreen, ErrorScreen, InstallingScreen, ScreenContext, TaskStatus, WelcomeScreen,
};
use installer_core::InstallerChoices;

const LOG_TAIL: usize = 6;
const ERROR_WRAP: usize = 60;

const HELP_HORIZONTAL: &str = "← → to select • Enter to confirm • q to quit";
const HELP_VERTICAL: &str = "↑ ↓ to select • Enter to confirm • q to quit";
const HELP_CHECKLIST: &str = "↑ ↓ to navigate • Space to toggle • a/n all/none • Enter to confirm";
const HELP_EXIT: &str = "Press Enter to exit";

/// A run of lines drawn either centered line by line, or as a left-aligned
/// block that is itself centered.
struct Section {
    lines: Vec<Line<'static>>,
    block: bool,
}

impl Section {
    fn centered(lines: Vec<Line<'static>>) -> Self {
        Self { lines, block: false }
    }

    fn block(lines: Vec<Line<'static>>) -> Self {
        Self { lines, block: true }
    }

    fn line(line: Line<'static>) -> Self {
        Self::centered(vec![line])
    }

    fn text(text: impl Into<String>, style: Style) -> Self {
        Self::line(Line::from(Span::styled(text.into(), style)))
    }

    fn blank() -> Self {
        Self::line(Line::default())
    }
}

pub fn draw_ui(area: Rect, f: &mut Frame<'_>, installer: &Installer) {
    f.render_widget(Block::default().style(Style::default().bg(theme::BG0)), area);

    let choices = installer.choices();
    let update = choices.is_update_run();
    match installer.context() {
        ScreenContext::Welcome(welcome) => draw_welcome(area, f, welcome),
        ScreenContext::UpdatePrompt(selector) => render_sections(
            f,
            area,
            prompt(
                "Update HecateShell?",
                "HecateShell is already installed. Would you like to update?",
                None,
                Section::line(selector.view_horizontal()),
                HELP_HORIZONTAL,
            ),
            0,
        ),
        ScreenContext::Deps(selector) => {
            let (title, desc) = if update {
                (
                    "Update Dependencies?",
                    "Would you like to update/install any missing dependencies?",
                )
            } else {
                (
                    "Install Dependencies?",
                    "HecateShell requires some packages to function properly.",
                )
            };
            render_sections(
                f,
                area,
                prompt(title, desc, None, Section::line(selector.view_horizontal()), HELP_HORIZONTAL),
                0,
            )
        }
        ScreenContext::PackageManager(selector) => render_sections(
            f,
            area,
            prompt(
                "Select Package Manager",
                "Choose your preferred AUR helper.",
                None,
                Section::block(selector.view_vertical()),
                HELP_VERTICAL,
            ),
            0,
        ),
        ScreenContext::Dotfiles(checklist) => {
            let (title, desc, note) = if update {
                (
                    "Update Dotfiles?",
                    "Select which configurations to update.",
                    Some("(Existing configs will be backed up)"),
                )
            } else {
                ("Install Dotfiles?", "Select which configurations to install.", None)
            };
            render_sections(
                f,
                area,
                prompt(title, desc, note, Section::block(checklist.view()), HELP_CHECKLIST),
                0,
            )
        }
        ScreenContext::Shell(selector) => {
            let (title, desc) = if update {
                ("Update HecateShell?", "Pull the latest changes from the repository.")
            } else {
                (
                    "Install HecateShell?",
                    "Download and install the QuickShell configuration.",
                )
            };
            render_sections(
                f,
                area,
                prompt(title, desc, None, Section::line(selector.view_horizontal()), HELP_HORIZONTAL),
                0,
            )
        }
        ScreenContext::Installing(installing) => {
            draw_installing(area, f, installing, installer.log().tail(LOG_TAIL), update)
        }
        ScreenContext::Complete(complete) => draw_complete(area, f, complete, choices),
        ScreenContext::Error(error) => draw_error(area, f, error),
    }
}

fn prompt(
    title: &str,
    desc: &str,
    note: Option<&str>,
    body: Section,
    help: &str,
) -> Vec<Section> {
    let mut sections = vec![
        Section::text(title, theme::title()),
        Section::blank(),
        Section::text(desc, theme::subtitle()),
    ];
    if let Some(note) = note {
        sections.push(Section::text(note, theme::dim()));
    }
    sections.extend([Section::blank(), Section::blank(), body, Section::blank()]);
    sections.push(Section::text(help, theme::help()));
    sections
}

fn draw_welcome(area: Rect, f: &mut Frame<'_>, welcome: &WelcomeScreen) {
    let canvas: Vec<Line<'static>> = welcome
        .logo
        .view()
        .into_iter()
        .map(|row| Line::from(Span::styled(row, theme::accent())))
        .collect();
    f.render_widget(Paragraph::new(canvas), area);

    if !welcome.logo.done() {
        return;
    }
    let greeting_row = welcome.logo.bottom() + 2;
    render_row(
        f,
        area,
        greeting_row,
        Line::from(Span::styled(welcome.greeting.view(), theme::subtitle())),
    );
    if welcome.greeting.done() {
        render_row(
            f,
            area,
            greeting_row + 2,
            Line::from(Span::styled("Press Enter to continue", theme::dim())),
        );
    }
}

fn draw_installing(
    area: Rect,
    f: &mut Frame<'_>,
    installing: &InstallingScreen,
    log_tail: Vec<&str>,
    update: bool,
) {
    let tasks = installing
        .runner
        .tasks()
        .iter()
        .map(|task| {
            let (icon, icon_style, label_style) = match task.status {
                TaskStatus::Pending => ("○", theme::dim(), theme::dim()),
                TaskStatus::Running => (installing.spinner.frame(), theme::accent(), theme::normal()),
                TaskStatus::Succeeded => ("✓", theme::success(), theme::normal()),
                TaskStatus::Failed => ("✗", theme::error(), theme::error()),
            };
            Line::from(vec![
                Span::styled(icon, icon_style),
                Span::raw(" "),
                Span::styled(task.label.clone(), label_style),
            ])
        })
        .collect();
    let logs = log_tail
        .into_iter()
        .map(|line| Line::from(Span::styled(line.to_string(), theme::dim())))
        .collect();

    let title = if update { "Updating..." } else { "Installing..." };
    let sections = vec![
        Section::text(title, theme::title()),
        Section::blank(),
        Section::blank(),
        Section::block(tasks),
        Section::blank(),
        Section::line(installing.bar.view()),
        Section::blank(),
        Section::block(logs),
    ];
    render_sections(f, area, sections, 0);
}

fn draw_complete(area: Rect, f: &mut Frame<'_>, complete: &CompleteScreen, choices: &InstallerChoices) {
    let (title, desc) = if choices.is_update_run() {
        ("Update Complete!", "HecateShell has been updated successfully.")
    } else {
        ("Installation Complete!", "HecateShell has been installed successfully.")
    };
    let summary = complete
        .summary
        .view()
        .into_iter()
        .map(|line| Line::from(Span::styled(line, theme::normal())))
        .collect();
    let sections = vec![
        Section::text("✓", theme::success()),
        Section::blank(),
        Section::text(title, theme::title()),
        Section::blank(),
        Section::text(desc, theme::subtitle()),
        Section::blank(),
        Section::block(summary),
        Section::blank(),
        Section::text(HELP_EXIT, theme::help()),
    ];
    render_sections(f, area, sections, complete.bounce.pos().round() as i32);
}

fn draw_error(area: Rect, f: &mut Frame<'_>, error: &ErrorScreen) {
    let message = wrap_words(&error.message, ERROR_WRAP)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, theme::dim())))
        .collect();
    let mut sections = vec![
        Section::text("✗", theme::error()),
        Section::blank(),
        Section::text("Installation Failed", theme::error()),
        Section::blank(),
    ];
    if !error.task.is_empty() {
        sections.push(Section::text(error.task.clone(), theme::warning()));
    }
    sections.extend([
        Section::centered(message),
        Section::blank(),
        Section::text(HELP_EXIT, theme::help()),
    ]);
    render_sections(f, area, sections, 0);
}

/// Stacks sections vertically in the middle of `area`, shifted by `y_offset`
/// rows. Rows that land outside the area are dropped.
fn render_sections(f: &mut Frame<'_>, area: Rect, sections: Vec<Section>, y_offset: i32) {
    let total: i32 = sections.iter().map(|s| s.lines.len() as i32).sum();
    let mut row = (i32::from(area.height) - total) / 2 + y_offset;
    for section in sections {
        let height = section.lines.len() as i32;
        if section.block {
            let width = section
                .lines
                .iter()
                .map(Line::width)
                .max()
                .unwrap_or(0)
                .min(usize::from(area.width)) as u16;
            let x = area.x + (area.width - width) / 2;
            for (index, line) in section.lines.into_iter().enumerate() {
                if let Some(rect) = row_rect(area, row + index as i32) {
                    let rect = Rect { x, width, ..rect };
                    f.render_widget(Paragraph::new(line), rect);
                }
            }
        } else {
            for (index, line) in section.lines.into_iter().enumerate() {
                render_row(f, area, row + index as i32, line);
            }
        }
        row += height;
    }
}

fn render_row(f: &mut Frame<'_>, area: Rect, row: i32, line: Line<'static>) {
    if let Some(rect) = row_rect(area, row) {
        f.render_widget(Paragraph::new(line).alignment(Alignment::Center), rect);
    }
}

fn row_rect(area: Rect, row: i32) -> Option<Rect> {
    if row < 0 || row >= i32::from(area.height) {
        return None;
    }
    Some(Rect {
        x: area.x,
        y: area.y + row as u16,
        width: area.width,
        height: 1,
    })
}

fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
            if !current.is_empty() && needed > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use anyhow::Result;
    use installer_core::{Actions, Dotfile, PackageManager};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    use super::*;
    use crate::app::keys::Key;
    use crate::app::logging::InstallLog;

    struct Idle;

    impl Actions for Idle {
        fn is_installed(&self) -> bool {
            false
        }
        fn config_dir(&self) -> Result<PathBuf> {
            Ok(PathBuf::new())
        }
        fn install_dependencies(&self, _: PackageManager) -> Result<()> {
            Ok(())
        }
        fn install_dotfile(&self, _: Dotfile) -> Result<()> {
            Ok(())
        }
        fn backup_dotfile(&self, _: Dotfile) -> Result<()> {
            Ok(())
        }
        fn install_shell(&self, _: bool) -> Result<()> {
            Ok(())
        }
        fn update_shell(&self) -> Result<()> {
            Ok(())
        }
        fn run_post_install(&self) -> Result<()> {
            Ok(())
        }
    }

    fn rendered(installer: &Installer, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| draw_ui(f.area(), f, installer))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height).map(|y| row_text(buffer, y)).collect()
    }

    fn idle_installer() -> Installer {
        let (tx, _rx) = crossbeam_channel::unbounded();
        Installer::new(
            Arc::new(Idle),
            StdRng::seed_from_u64(1),
            tx,
            InstallLog::in_memory(),
            (80, 30),
        )
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        assert_eq!(
            wrap_words("install dependencies with paru: exit status 1", 20),
            vec!["install dependencies", "with paru: exit", "status 1"]
        );
        assert!(wrap_words("", 10).is_empty());
    }

    #[test]
    fn sections_are_centered_vertically() {
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        terminal
            .draw(|f| {
                render_sections(
                    f,
                    f.area(),
                    vec![Section::text("top", Style::default()), Section::text("bottom", Style::default())],
                    0,
                )
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert_eq!(row_text(buffer, 1).trim(), "top");
        assert_eq!(row_text(buffer, 2).trim(), "bottom");
    }

    #[test]
    fn offset_rows_outside_the_area_are_dropped() {
        let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
        terminal
            .draw(|f| {
                render_sections(
                    f,
                    f.area(),
                    vec![Section::text("a", Style::default()), Section::text("b", Style::default())],
                    -5,
                )
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        for y in 0..3 {
            assert!(row_text(buffer, y).trim().is_empty());
        }
    }

    #[test]
    fn block_sections_share_a_left_edge() {
        let mut terminal = Terminal::new(TestBackend::new(20, 2)).unwrap();
        terminal
            .draw(|f| {
                render_sections(
                    f,
                    f.area(),
                    vec![Section::block(vec![Line::from("abcd"), Line::from("ab")])],
                    0,
                )
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert_eq!(row_text(buffer, 0), format!("{}abcd{}", " ".repeat(8), " ".repeat(8)));
        assert_eq!(row_text(buffer, 1), format!("{}ab{}", " ".repeat(8), " ".repeat(10)));
    }

    #[test]
    fn greeting_and_hint_follow_the_logo() {
        let mut installer = idle_installer();
        installer.handle_key(Key::Enter);
        let rows = rendered(&installer, 80, 30);
        assert!(rows.iter().any(|row| row.contains("Welcome to the HecateShell installer")));
        assert!(rows.iter().any(|row| row.contains("Press Enter to continue")));
    }

    #[test]
    fn installing_lists_every_task() {
        let mut installer = idle_installer();
        for key in [Key::Enter, Key::Enter, Key::Right, Key::Enter, Key::Enter, Key::Right, Key::Enter] {
            installer.handle_key(key);
        }
        let rows = rendered(&installer, 80, 30);
        assert!(rows.iter().any(|row| row.trim() == "Installing..."));
        for label in ["Installing Niri config...", "Installing Fastfetch config...", "Finishing up..."] {
            assert!(rows.iter().any(|row| row.contains(label)), "missing {label}");
        }
    }
}
