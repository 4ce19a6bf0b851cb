/// Curve applied to normalized time. Every curve maps 0 to 0 and 1 to 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    Linear,
    InCubic,
    OutCubic,
    InOutCubic,
    OutQuad,
    InOutQuad,
    OutExpo,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::InCubic => t * t * t,
            Ease::OutCubic => 1.0 - (1.0 - t).powi(3),
            Ease::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::OutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
        }
    }
}

/// Bounded interpolation from `start` to `end` over a fixed number of ticks.
#[derive(Clone, Debug)]
pub struct Easing {
    start: f64,
    end: f64,
    frame: u32,
    duration: u32,
    ease: Ease,
}

impl Easing {
    pub fn new(start: f64, end: f64, duration: u32, ease: Ease) -> Self {
        Self {
            start,
            end,
            frame: 0,
            duration,
            ease,
        }
    }

    pub fn update(&mut self) -> f64 {
        if self.frame < self.duration {
            self.frame += 1;
        }
        self.pos()
    }

    pub fn pos(&self) -> f64 {
        // exact end once finished, no interpolation residue
        if self.done() {
            return self.end;
        }
        let t = self.frame as f64 / self.duration as f64;
        self.start + (self.end - self.start) * self.ease.apply(t)
    }

    pub fn done(&self) -> bool {
        self.frame >= self.duration
    }

    /// Re-anchors at the current position and restarts the frame counter.
    pub fn set_target(&mut self, end: f64) {
        self.start = self.pos();
        self.end = end;
        self.frame = 0;
    }

    pub fn skip(&mut self) {
        self.frame = self.duration;
    }
}

#[derive(Clone, Debug)]
pub struct Easing2D {
    pub x: Easing,
    pub y: Easing,
}

impl Easing2D {
    pub fn new(start: (f64, f64), end: (f64, f64), duration: u32, ease: Ease) -> Self {
        Self {
            x: Easing::new(start.0, end.0, duration, ease),
            y: Easing::new(start.1, end.1, duration, ease),
        }
    }

    pub fn update(&mut self) -> (f64, f64) {
        (self.x.update(), self.y.update())
    }

    pub fn pos(&self) -> (f64, f64) {
        (self.x.pos(), self.y.pos())
    }

    pub fn done(&self) -> bool {
        self.x.done() && self.y.done()
    }

    pub fn set_target(&mut self, x: f64, y: f64) {
        self.x.set_target(x);
        self.y.set_target(y);
    }

    pub fn skip(&mut self) {
        self.x.skip();
        self.y.skip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 7] = [
        Ease::Linear,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::OutExpo,
    ];

    #[test]
    fn curves_hit_both_endpoints() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
            assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
        }
    }

    #[test]
    fn curves_are_monotonic_in_value() {
        for ease in ALL {
            let mut last = 0.0;
            for step in 1..=100 {
                let value = ease.apply(step as f64 / 100.0);
                assert!(value >= last, "{ease:?} decreased at step {step}");
                last = value;
            }
        }
    }

    #[test]
    fn lands_exactly_on_end_after_duration() {
        for ease in ALL {
            let mut easing = Easing::new(0.1, 0.7, 17, ease);
            for _ in 0..17 {
                easing.update();
            }
            assert!(easing.done());
            assert_eq!(easing.pos(), 0.7);
            assert_eq!(easing.update(), 0.7);
            assert_eq!(easing.pos(), 0.7);
        }
    }

    #[test]
    fn not_done_one_tick_early() {
        let mut easing = Easing::new(0.0, 10.0, 5, Ease::Linear);
        for _ in 0..4 {
            easing.update();
        }
        assert!(!easing.done());
        assert_eq!(easing.pos(), 8.0);
    }

    #[test]
    fn zero_duration_is_immediately_at_end() {
        let easing = Easing::new(3.0, 9.0, 0, Ease::OutCubic);
        assert!(easing.done());
        assert_eq!(easing.pos(), 9.0);
    }

    #[test]
    fn set_target_mid_flight_is_continuous() {
        let mut easing = Easing::new(0.0, 100.0, 30, Ease::InOutCubic);
        for _ in 0..12 {
            easing.update();
        }
        let before = easing.pos();
        easing.set_target(-40.0);
        assert_eq!(easing.pos(), before);
        assert!(!easing.done());
        for _ in 0..30 {
            easing.update();
        }
        assert_eq!(easing.pos(), -40.0);
    }

    #[test]
    fn skip_jumps_to_end() {
        let mut easing = Easing::new(5.0, 6.0, 100, Ease::OutExpo);
        easing.skip();
        assert!(easing.done());
        assert_eq!(easing.pos(), 6.0);
    }

    #[test]
    fn easing_2d_needs_both_axes() {
        let mut motion = Easing2D::new((0.0, 0.0), (4.0, 2.0), 4, Ease::OutCubic);
        motion.x.skip();
        assert!(!motion.done());
        motion.y.skip();
        assert!(motion.done());
        assert_eq!(motion.pos(), (4.0, 2.0));
    }
}
