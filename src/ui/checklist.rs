use installer_core::anim::Spring;
use ratatui::text::{Line, Span};

use super::theme;

/// Ticks between two items cascading in.
const CASCADE_RATE: u32 = 6;

#[derive(Clone, Debug)]
pub struct CheckItem<T> {
    pub label: String,
    pub description: String,
    pub value: T,
    pub checked: bool,
    spring: Spring,
}

impl<T> CheckItem<T> {
    pub fn new(label: impl Into<String>, description: impl Into<String>, value: T, checked: bool) -> Self {
        let mut spring = Spring::bouncy();
        spring.set_pos(0.0);
        spring.set_target(if checked { 1.0 } else { 0.0 });
        Self {
            label: label.into(),
            description: description.into(),
            value,
            checked,
            spring,
        }
    }
}

/// Multi-select list whose rows appear one by one.
#[derive(Clone, Debug)]
pub struct Checklist<T> {
    items: Vec<CheckItem<T>>,
    cursor: usize,
    revealed: usize,
    ticks: u32,
}

impl<T: Copy> Checklist<T> {
    pub fn new(items: Vec<CheckItem<T>>) -> Self {
        Self {
            items,
            cursor: 0,
            revealed: 0,
            ticks: 0,
        }
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.cursor = (self.cursor + 1) % self.items.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.items.is_empty() {
            self.cursor = (self.cursor + self.items.len() - 1) % self.items.len();
        }
    }

    pub fn toggle(&mut self) {
        if let Some(item) = self.items.get_mut(self.cursor) {
            item.checked = !item.checked;
        }
    }

    pub fn set_all(&mut self, checked: bool) {
        for item in &mut self.items {
            item.checked = checked;
        }
    }

    /// Every item's value with its checked state, in list order.
    pub fn selections(&self) -> impl Iterator<Item = (T, bool)> + '_ {
        self.items.iter().map(|item| (item.value, item.checked))
    }

    pub fn update(&mut self) {
        self.ticks += 1;
        if self.revealed < self.items.len() && self.ticks % CASCADE_RATE == 0 {
            self.revealed += 1;
        }
        for item in &mut self.items {
            item.spring.set_target(if item.checked { 1.0 } else { 0.0 });
            item.spring.update();
        }
    }

    pub fn view(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (index, item) in self.items.iter().enumerate().take(self.revealed) {
            let cursor = if index == self.cursor {
                Span::styled("▸ ", theme::accent())
            } else {
                Span::raw("  ")
            };
            // the box flips once the spring is past halfway
            let checkbox = if item.spring.pos() > 0.5 {
                Span::styled("[✓]", theme::success())
            } else {
                Span::styled("[ ]", theme::dim())
            };
            let label_style = if item.checked {
                theme::normal()
            } else {
                theme::dim()
            };
            lines.push(Line::from(vec![
                cursor,
                checkbox,
                Span::raw(" "),
                Span::styled(item.label.clone(), label_style),
            ]));
            if !item.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("      {}", item.description),
                    theme::dim(),
                )));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> Checklist<u8> {
        Checklist::new(vec![
            CheckItem::new("one", "~/.config/one/", 1, true),
            CheckItem::new("two", "", 2, true),
            CheckItem::new("three", "", 3, false),
        ])
    }

    #[test]
    fn items_cascade_in() {
        let mut checklist = list();
        assert!(checklist.view().is_empty());
        for _ in 0..CASCADE_RATE {
            checklist.update();
        }
        // first item plus its description
        assert_eq!(checklist.view().len(), 2);
        for _ in 0..(2 * CASCADE_RATE) {
            checklist.update();
        }
        assert_eq!(checklist.view().len(), 4);
        for _ in 0..CASCADE_RATE {
            checklist.update();
        }
        assert_eq!(checklist.view().len(), 4);
    }

    #[test]
    fn toggling_moves_with_the_cursor() {
        let mut checklist = list();
        checklist.next();
        checklist.toggle();
        checklist.prev();
        checklist.prev();
        checklist.toggle();
        let selections: Vec<_> = checklist.selections().collect();
        assert_eq!(selections, vec![(1, true), (2, false), (3, true)]);
    }

    #[test]
    fn set_all_overrides_every_item() {
        let mut checklist = list();
        checklist.set_all(false);
        assert!(checklist.selections().all(|(_, checked)| !checked));
        checklist.set_all(true);
        assert!(checklist.selections().all(|(_, checked)| checked));
    }

    #[test]
    fn checkbox_follows_the_spring() {
        let mut checklist = list();
        checklist.revealed = 3;
        assert!(checklist.view()[0].to_string().contains("[ ]"));
        for _ in 0..60 {
            checklist.update();
        }
        let view = checklist.view();
        assert!(view[0].to_string().contains("[✓] one"));
        assert!(view[3].to_string().contains("[ ] three"));
    }
}
