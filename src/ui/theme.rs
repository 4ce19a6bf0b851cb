use ratatui::style::{Color, Modifier, Style};

// Gruvbox dark
pub(crate) const BG0: Color = Color::Rgb(0x28, 0x28, 0x28);
pub(crate) const BG1: Color = Color::Rgb(0x3c, 0x38, 0x36);
pub(crate) const FG1: Color = Color::Rgb(0xeb, 0xdb, 0xb2);
pub(crate) const FG4: Color = Color::Rgb(0xa8, 0x99, 0x84);
pub(crate) const RED: Color = Color::Rgb(0xfb, 0x49, 0x34);
pub(crate) const GREEN: Color = Color::Rgb(0xb8, 0xbb, 0x26);
pub(crate) const YELLOW: Color = Color::Rgb(0xfa, 0xbd, 0x2f);
pub(crate) const ORANGE: Color = Color::Rgb(0xfe, 0x80, 0x19);

pub(crate) const PRIMARY: Color = ORANGE;

pub(crate) fn title() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub(crate) fn subtitle() -> Style {
    Style::default().fg(FG4)
}

pub(crate) fn normal() -> Style {
    Style::default().fg(FG1)
}

pub(crate) fn dim() -> Style {
    Style::default().fg(FG4)
}

pub(crate) fn accent() -> Style {
    Style::default().fg(PRIMARY)
}

pub(crate) fn success() -> Style {
    Style::default().fg(GREEN)
}

pub(crate) fn error() -> Style {
    Style::default().fg(RED)
}

pub(crate) fn warning() -> Style {
    Style::default().fg(YELLOW)
}

pub(crate) fn button() -> Style {
    Style::default().fg(FG1).bg(BG1)
}

pub(crate) fn button_focused() -> Style {
    Style::default()
        .fg(BG0)
        .bg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn progress_fill() -> Style {
    Style::default().fg(PRIMARY)
}

pub(crate) fn progress_bg() -> Style {
    Style::default().fg(BG1)
}

pub(crate) fn help() -> Style {
    Style::default().fg(FG4)
}

pub(crate) const LOGO: &str = r"
 ██╗  ██╗███████╗ ██████╗ █████╗ ████████╗███████╗
 ██║  ██║██╔════╝██╔════╝██╔══██╗╚══██╔══╝██╔════╝
 ███████║█████╗  ██║     ███████║   ██║   █████╗
 ██╔══██║██╔══╝  ██║     ██╔══██║   ██║   ██╔══╝
 ██║  ██║███████╗╚██████╗██║  ██║   ██║   ███████╗
 ╚═╝  ╚═╝╚══════╝ ╚═════╝╚═╝  ╚═╝   ╚═╝   ╚══════╝
           ███████╗██╗  ██╗███████╗██╗     ██╗
           ██╔════╝██║  ██║██╔════╝██║     ██║
           ███████╗███████║█████╗  ██║     ██║
           ╚════██║██╔══██║██╔══╝  ██║     ██║
           ███████║██║  ██║███████╗███████╗███████╗
           ╚══════╝╚═╝  ╚═╝╚══════╝╚══════╝╚══════╝";
