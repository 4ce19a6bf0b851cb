//! Frame-driven animation primitives. Everything here advances by exactly one
//! step per call to `update` and never fails; randomness is always supplied by
//! the caller.

mod easing;
mod logo;
mod spring;
mod typewriter;

pub use easing::{Ease, Easing, Easing2D};
pub use logo::LogoAssembler;
pub use spring::Spring;
pub use typewriter::{ticks_per_char, MultiTypewriter, Typewriter, TypewriterConfig, CURSOR_GLYPH};

/// Fixed tick rate every animation is tuned for.
pub const FPS: f64 = 60.0;

pub(crate) const REST_EPSILON: f64 = 1e-3;
