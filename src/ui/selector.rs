use installer_core::anim::Spring;
use ratatui::text::{Line, Span};

use super::theme;

const BUTTON_PADDING: usize = 3;
const BUTTON_MARGIN: &str = "  ";

#[derive(Clone, Debug)]
pub struct SelectorOption<T> {
    pub label: String,
    pub description: Option<String>,
    pub value: T,
}

impl<T> SelectorOption<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            description: None,
            value,
        }
    }

    pub fn described(label: impl Into<String>, description: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            description: Some(description.into()),
            value,
        }
    }
}

/// Single-choice selector. Each option owns a bouncy spring that heads to 1.0
/// while it is selected and back to 0.0 otherwise.
#[derive(Clone, Debug)]
pub struct Selector<T> {
    options: Vec<SelectorOption<T>>,
    selected: usize,
    springs: Vec<Spring>,
}

impl<T: Copy> Selector<T> {
    pub fn new(options: Vec<SelectorOption<T>>) -> Self {
        let springs = options
            .iter()
            .map(|_| {
                let mut spring = Spring::bouncy();
                spring.set_pos(0.0);
                spring
            })
            .collect();
        Self {
            options,
            selected: 0,
            springs,
        }
    }

    pub fn next(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + 1) % self.options.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + self.options.len() - 1) % self.options.len();
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.options.len() {
            self.selected = index;
        }
    }

    pub fn selected(&self) -> Option<T> {
        self.options.get(self.selected).map(|option| option.value)
    }

    pub fn update(&mut self) {
        for (index, spring) in self.springs.iter_mut().enumerate() {
            spring.set_target(if index == self.selected { 1.0 } else { 0.0 });
            spring.update();
        }
    }

    fn emphasis(&self, index: usize) -> f64 {
        self.springs.get(index).map(Spring::pos).unwrap_or(0.0)
    }

    /// Options side by side as buttons.
    pub fn view_horizontal(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (index, option) in self.options.iter().enumerate() {
            let emphasis = self.emphasis(index);
            let style = if emphasis > 0.5 {
                theme::button_focused()
            } else {
                theme::button()
            };
            // overshoot past 1.0 widens the button for a frame or two
            let pad = BUTTON_PADDING + emphasis.max(0.0).floor() as usize;
            let label = format!("{0}{1}{0}", " ".repeat(pad), option.label);
            if index > 0 {
                spans.push(Span::raw(BUTTON_MARGIN));
            }
            spans.push(Span::styled(label, style));
        }
        Line::from(spans)
    }

    /// One option per line with a cursor and optional description.
    pub fn view_vertical(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (index, option) in self.options.iter().enumerate() {
            let cursor = if index == self.selected {
                Span::styled("▸ ", theme::accent())
            } else {
                Span::raw("  ")
            };
            let label_style = if self.emphasis(index) > 0.5 {
                theme::title()
            } else {
                theme::normal()
            };
            lines.push(Line::from(vec![
                cursor,
                Span::styled(option.label.clone(), label_style),
            ]));
            if let Some(description) = &option.description {
                lines.push(Line::from(Span::styled(
                    format!("    {description}"),
                    theme::dim(),
                )));
            }
        }
        lines
    }
}

impl Selector<bool> {
    pub fn yes_no(default_yes: bool) -> Self {
        let mut selector = Selector::new(vec![
            SelectorOption::new("Yes (Recommended)", true),
            SelectorOption::new("No", false),
        ]);
        if !default_yes {
            selector.select(1);
        }
        selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wraps_around() {
        let mut selector = Selector::new(vec![
            SelectorOption::new("a", 'a'),
            SelectorOption::new("b", 'b'),
            SelectorOption::new("c", 'c'),
        ]);
        selector.prev();
        assert_eq!(selector.selected(), Some('c'));
        selector.next();
        assert_eq!(selector.selected(), Some('a'));
        selector.next();
        assert_eq!(selector.selected(), Some('b'));
    }

    #[test]
    fn yes_no_defaults() {
        assert_eq!(Selector::yes_no(true).selected(), Some(true));
        assert_eq!(Selector::yes_no(false).selected(), Some(false));
    }

    #[test]
    fn selected_option_springs_toward_emphasis() {
        let mut selector = Selector::yes_no(true);
        for _ in 0..120 {
            selector.update();
        }
        assert!(selector.emphasis(0) > 0.9);
        assert!(selector.emphasis(1).abs() < 0.1);

        selector.next();
        for _ in 0..120 {
            selector.update();
        }
        assert!(selector.emphasis(1) > 0.9);
        assert!(selector.emphasis(0).abs() < 0.1);
    }

    #[test]
    fn vertical_view_includes_descriptions() {
        let selector = Selector::new(vec![
            SelectorOption::described("paru", "AUR helper", 0),
            SelectorOption::new("pacman", 1),
        ]);
        let lines = selector.view_vertical();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].to_string().starts_with("▸ paru"));
        assert_eq!(lines[1].to_string(), "    AUR helper");
    }

    #[test]
    fn horizontal_view_renders_every_option() {
        let text = Selector::yes_no(true).view_horizontal().to_string();
        assert!(text.contains("Yes (Recommended)"));
        assert!(text.contains("No"));
    }
}
