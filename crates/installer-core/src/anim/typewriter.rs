use rand::Rng;

use super::FPS;

pub const CURSOR_GLYPH: char = '█';

/// Options recognized by [`Typewriter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypewriterConfig {
    /// Ticks per revealed character, at least 1.
    pub speed: u32,
    /// Proportional jitter applied to `speed` for every character, 0.0 to 1.0.
    pub variation: f64,
    /// Render a block cursor after the revealed text.
    pub cursor: bool,
    /// Ticks between cursor visibility toggles.
    pub blink_period: u32,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            speed: 3,
            variation: 0.3,
            cursor: true,
            blink_period: 30,
        }
    }
}

/// Ticks per character for a reveal rate given in characters per second.
pub fn ticks_per_char(chars_per_second: u32) -> u32 {
    if chars_per_second == 0 {
        return TypewriterConfig::default().speed;
    }
    (FPS as u32 / chars_per_second).max(1)
}

#[derive(Clone, Debug)]
pub struct Typewriter {
    text: Vec<char>,
    visible: usize,
    config: TypewriterConfig,
    ticks: u64,
    since_last: u32,
    next_delay: Option<u32>,
    cursor_on: bool,
}

impl Typewriter {
    pub fn new(text: &str, config: TypewriterConfig) -> Self {
        Self {
            text: text.chars().collect(),
            visible: 0,
            config,
            ticks: 0,
            since_last: 0,
            next_delay: None,
            cursor_on: false,
        }
    }

    fn jittered_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let speed = self.config.speed.max(1);
        if self.config.variation <= 0.0 {
            return speed;
        }
        let jitter = f64::from(speed) * self.config.variation * rng.gen_range(-1.0..=1.0);
        (i64::from(speed) + jitter as i64).max(1) as u32
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.ticks += 1;
        let period = u64::from(self.config.blink_period.max(1));
        if self.ticks % period == 0 {
            self.cursor_on = !self.cursor_on;
        }

        if self.done() {
            return;
        }

        let delay = match self.next_delay {
            Some(delay) => delay,
            None => {
                let delay = self.jittered_delay(rng);
                self.next_delay = Some(delay);
                delay
            }
        };
        self.since_last += 1;
        if self.since_last >= delay {
            self.visible += 1;
            self.since_last = 0;
            self.next_delay = None;
        }
    }

    pub fn view(&self) -> String {
        let mut out: String = self.text[..self.visible].iter().collect();
        if self.config.cursor {
            if self.cursor_on || !self.done() {
                out.push(CURSOR_GLYPH);
            } else {
                out.push(' ');
            }
        }
        out
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn done(&self) -> bool {
        self.visible >= self.text.len()
    }

    pub fn skip(&mut self) {
        self.visible = self.text.len();
    }
}

/// Reveals several lines one after another with a pause in between.
#[derive(Clone, Debug)]
pub struct MultiTypewriter {
    lines: Vec<Typewriter>,
    current: usize,
    line_gap: u32,
    gap_ticks: u32,
}

impl MultiTypewriter {
    pub const DEFAULT_LINE_GAP: u32 = 10;

    pub fn new<S: AsRef<str>>(lines: &[S], config: TypewriterConfig, line_gap: u32) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|line| Typewriter::new(line.as_ref(), config))
                .collect(),
            current: 0,
            line_gap,
            gap_ticks: 0,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(line) = self.lines.get_mut(self.current) else {
            return;
        };
        line.update(rng);
        if line.done() {
            self.gap_ticks += 1;
            if self.gap_ticks >= self.line_gap {
                self.current += 1;
                self.gap_ticks = 0;
            }
        }
    }

    /// Every line up to and including the one being typed.
    pub fn view(&self) -> Vec<String> {
        self.lines
            .iter()
            .take(self.current + 1)
            .map(Typewriter::view)
            .collect()
    }

    pub fn done(&self) -> bool {
        self.current >= self.lines.len()
    }

    pub fn skip(&mut self) {
        for line in &mut self.lines {
            line.skip();
        }
        self.current = self.lines.len();
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn steady(speed: u32) -> TypewriterConfig {
        TypewriterConfig {
            speed,
            variation: 0.0,
            cursor: false,
            blink_period: 30,
        }
    }

    #[test]
    fn steady_cadence_reveals_one_char_every_speed_ticks() {
        let mut rng = StdRng::seed_from_u64(1);
        let text = "hecate";
        let mut tw = Typewriter::new(text, steady(3));
        for tick in 1..=(3 * text.len() as u64) {
            tw.update(&mut rng);
            assert_eq!(tw.visible_count() as u64, tick / 3, "tick {tick}");
            assert_eq!(tw.done(), tick == 3 * text.len() as u64);
        }
        assert_eq!(tw.view(), text);
    }

    #[test]
    fn jittered_cadence_still_finishes() {
        let mut rng = StdRng::seed_from_u64(99);
        let config = TypewriterConfig {
            variation: 1.0,
            ..TypewriterConfig::default()
        };
        let mut tw = Typewriter::new("jittery text", config);
        let mut last = 0;
        for _ in 0..500 {
            tw.update(&mut rng);
            assert!(tw.visible_count() - last <= 1);
            last = tw.visible_count();
        }
        assert!(tw.done());
    }

    #[test]
    fn cursor_keeps_blinking_after_done() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = TypewriterConfig {
            cursor: true,
            blink_period: 4,
            ..steady(1)
        };
        let mut tw = Typewriter::new("ab", config);
        tw.update(&mut rng);
        assert_eq!(tw.view(), "a█");
        tw.update(&mut rng);
        assert!(tw.done());
        let mut seen = Vec::new();
        for _ in 0..8 {
            tw.update(&mut rng);
            seen.push(tw.view());
        }
        assert!(seen.contains(&"ab█".to_string()));
        assert!(seen.contains(&"ab ".to_string()));
    }

    #[test]
    fn chars_per_second_converts_to_ticks() {
        assert_eq!(ticks_per_char(40), 1);
        assert_eq!(ticks_per_char(20), 3);
        assert_eq!(ticks_per_char(90), 1);
        assert_eq!(ticks_per_char(0), 3);
    }

    #[test]
    fn skip_reveals_everything() {
        let mut tw = Typewriter::new("done already", steady(5));
        tw.skip();
        assert!(tw.done());
        assert_eq!(tw.view(), "done already");
    }

    #[test]
    fn multi_waits_between_lines() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut multi = MultiTypewriter::new(&["ab", "c"], steady(1), 2);
        multi.update(&mut rng);
        multi.update(&mut rng);
        assert_eq!(multi.view(), vec!["ab".to_string()]);
        // the gap starts counting on the tick the line finishes
        multi.update(&mut rng);
        assert_eq!(multi.view(), vec!["ab".to_string(), String::new()]);
        multi.update(&mut rng);
        assert_eq!(multi.view(), vec!["ab".to_string(), "c".to_string()]);
        assert!(!multi.done());
        multi.update(&mut rng);
        assert!(multi.done());
        assert_eq!(multi.view().len(), 2);
    }

    #[test]
    fn multi_skip_shows_all_lines() {
        let mut multi = MultiTypewriter::new(&["one", "two", "three"], steady(3), 10);
        multi.skip();
        assert!(multi.done());
        assert_eq!(multi.view(), vec!["one", "two", "three"]);
    }
}
