use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

pub(crate) type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Wipes the plain terminal before the sudo prompt.
pub(crate) fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::Clear(ClearType::Purge),
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0)
    )
    .context("clear plain terminal")
}

pub(crate) fn enter_terminal() -> Result<Tui> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    let entered = execute!(stdout, EnterAlternateScreen, cursor::Hide);
    undo_on_error(&mut stdout, entered, "enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()));
    undo_on_error(&mut stdout, terminal, "create terminal")
}

// Leaves raw mode and the alternate screen again when setup stops halfway.
fn undo_on_error<T, W: Write>(out: &mut W, result: io::Result<T>, what: &'static str) -> Result<T> {
    if result.is_err() {
        let _ = execute!(out, LeaveAlternateScreen, cursor::Show);
        let _ = disable_raw_mode();
    }
    result.context(what)
}

pub(crate) fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)
        .context("leave alternate screen")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_setup_leaves_the_alternate_screen() {
        let mut out = Vec::new();
        let err = undo_on_error::<(), _>(&mut out, Err(io::Error::other("no tty")), "create terminal")
            .unwrap_err();
        assert_eq!(format!("{err:#}"), "create terminal: no tty");

        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?1049l"), "{written:?}");
        assert!(written.contains("\x1b[?25h"), "{written:?}");
    }

    #[test]
    fn successful_setup_writes_nothing() {
        let mut out = Vec::new();
        let value = undo_on_error(&mut out, Ok(5), "create terminal").unwrap();
        assert_eq!(value, 5);
        assert!(out.is_empty());
    }
}
