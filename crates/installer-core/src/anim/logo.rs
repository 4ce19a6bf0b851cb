use rand::Rng;

use super::easing::{Ease, Easing2D};

const SCATTER_X: f64 = 20.0;
const SCATTER_Y: f64 = 10.0;
const MIN_DURATION: u32 = 30;
const MAX_DURATION: u32 = 45;

#[derive(Clone, Debug)]
struct Particle {
    ch: char,
    final_pos: (i32, i32),
    delay: u32,
    started: bool,
    motion: Easing2D,
}

/// Flies every visible glyph of a text block in from a scattered origin
/// until the block sits centered in the canvas.
#[derive(Clone, Debug)]
pub struct LogoAssembler {
    particles: Vec<Particle>,
    block_width: i32,
    block_height: i32,
    canvas_width: u16,
    canvas_height: u16,
    frame: u32,
}

fn centering_offset(canvas_width: u16, canvas_height: u16, width: i32, height: i32) -> (i32, i32) {
    (
        (i32::from(canvas_width) - width) / 2,
        (i32::from(canvas_height) - height) / 2,
    )
}

impl LogoAssembler {
    pub fn new<R: Rng + ?Sized>(
        logo: &str,
        canvas_width: u16,
        canvas_height: u16,
        rng: &mut R,
    ) -> Self {
        let mut lines: Vec<&str> = logo.split('\n').collect();
        if lines.first().is_some_and(|line| line.is_empty()) {
            lines.remove(0);
        }

        let block_height = lines.len() as i32;
        let block_width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as i32;
        let (offset_x, offset_y) =
            centering_offset(canvas_width, canvas_height, block_width, block_height);

        let mut particles = Vec::new();
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let (x, y) = (x as i32, y as i32);
                let final_pos = (x + offset_x, y + offset_y);
                let start = (
                    f64::from(final_pos.0) + rng.gen_range(-SCATTER_X..=SCATTER_X),
                    f64::from(final_pos.1) + rng.gen_range(-SCATTER_Y..=SCATTER_Y),
                );
                let duration = rng.gen_range(MIN_DURATION..=MAX_DURATION);
                particles.push(Particle {
                    ch,
                    final_pos,
                    // left-to-right, top-to-bottom stagger
                    delay: ((x + 2 * y) / 3) as u32,
                    started: false,
                    motion: Easing2D::new(
                        start,
                        (f64::from(final_pos.0), f64::from(final_pos.1)),
                        duration,
                        Ease::OutCubic,
                    ),
                });
            }
        }

        Self {
            particles,
            block_width,
            block_height,
            canvas_width,
            canvas_height,
            frame: 0,
        }
    }

    pub fn update(&mut self) {
        self.frame += 1;
        for particle in &mut self.particles {
            if !particle.started && self.frame >= particle.delay {
                particle.started = true;
            }
            if particle.started {
                particle.motion.update();
            }
        }
    }

    pub fn done(&self) -> bool {
        self.particles
            .iter()
            .all(|particle| particle.started && particle.motion.done())
    }

    pub fn skip(&mut self) {
        for particle in &mut self.particles {
            particle.started = true;
            particle.motion.skip();
        }
    }

    /// Re-centers the block. Particles still in flight are retargeted from
    /// where they are; settled ones move straight to the new spot.
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        let old = centering_offset(
            self.canvas_width,
            self.canvas_height,
            self.block_width,
            self.block_height,
        );
        let new = centering_offset(canvas_width, canvas_height, self.block_width, self.block_height);
        let (dx, dy) = (new.0 - old.0, new.1 - old.1);
        self.canvas_width = canvas_width;
        self.canvas_height = canvas_height;
        if dx == 0 && dy == 0 {
            return;
        }

        for particle in &mut self.particles {
            particle.final_pos.0 += dx;
            particle.final_pos.1 += dy;
            let settled = particle.motion.done();
            particle.motion.set_target(
                f64::from(particle.final_pos.0),
                f64::from(particle.final_pos.1),
            );
            if settled {
                particle.motion.skip();
            }
        }
    }

    /// One row per canvas line. Unstarted particles and anything that falls
    /// outside the canvas are left out.
    pub fn view(&self) -> Vec<String> {
        let width = usize::from(self.canvas_width);
        let height = usize::from(self.canvas_height);
        let mut buffer = vec![vec![' '; width]; height];

        for particle in self.particles.iter().filter(|p| p.started) {
            let (x, y) = particle.motion.pos();
            let (ix, iy) = (x.round(), y.round());
            if ix < 0.0 || iy < 0.0 {
                continue;
            }
            let (ix, iy) = (ix as usize, iy as usize);
            if let Some(cell) = buffer.get_mut(iy).and_then(|row| row.get_mut(ix)) {
                *cell = particle.ch;
            }
        }

        buffer.into_iter().map(|row| row.into_iter().collect()).collect()
    }

    /// First canvas row below the assembled block.
    pub fn bottom(&self) -> i32 {
        let (_, offset_y) = centering_offset(
            self.canvas_width,
            self.canvas_height,
            self.block_width,
            self.block_height,
        );
        offset_y + self.block_height
    }
}
