use super::{FPS, REST_EPSILON};

/// Damped harmonic oscillator integrated once per tick.
///
/// `angular_frequency` is in radians per second, `damping_ratio` below 1.0
/// overshoots, 1.0 settles without overshoot.
#[derive(Clone, Debug)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    angular_frequency: f64,
    damping_ratio: f64,
}

impl Spring {
    pub fn new(angular_frequency: f64, damping_ratio: f64) -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            target: 0.0,
            angular_frequency,
            damping_ratio,
        }
    }

    pub fn bouncy() -> Self {
        Self::new(6.0, 0.5)
    }

    pub fn smooth() -> Self {
        Self::new(5.0, 1.0)
    }

    pub fn slow() -> Self {
        Self::new(3.0, 0.8)
    }

    /// Keeps position and velocity, so motion continues from where it is.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn set_pos(&mut self, position: f64) {
        self.position = position;
        self.velocity = 0.0;
    }

    pub fn update(&mut self) -> f64 {
        let dt = 1.0 / FPS;
        let omega = self.angular_frequency;
        let accel = omega * omega * (self.target - self.position)
            - 2.0 * self.damping_ratio * omega * self.velocity;
        // semi-implicit Euler: velocity first, then position with the new velocity
        self.velocity += accel * dt;
        self.position += self.velocity * dt;
        self.position
    }

    pub fn pos(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn at_rest(&self) -> bool {
        (self.position - self.target).abs() < REST_EPSILON && self.velocity.abs() < REST_EPSILON
    }
}
