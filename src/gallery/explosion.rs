//! Hit explosions: a short radial particle burst with a center flash.

use std::f64::consts::TAU;

use rand::Rng;

use crate::render::Surface;

/// Lifetime of every explosion (ms).
pub const EXPLOSION_MS: f64 = 500.0;
pub const PARTICLES: usize = 12;
const DEFAULT_COLOR: &str = "#ff8a65";
const FLASH_COLOR: &str = "#fff3e0";

#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: f64,
    pub y: f64,
    pub elapsed: f64,
    pub duration: f64,
    pub color: &'static str,
    pub expired: bool,
}

impl Explosion {
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_color(x, y, DEFAULT_COLOR)
    }

    pub fn with_color(x: f64, y: f64, color: &'static str) -> Self {
        Self { x, y, elapsed: 0.0, duration: EXPLOSION_MS, color, expired: false }
    }

    pub fn update(&mut self, dt: f64) {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.expired = true;
        }
    }

    /// Age as a fraction of the lifetime, 0..=1.
    pub fn progress(&self) -> f64 {
        (self.elapsed / self.duration).min(1.0)
    }

    /// Particle radii are re-rolled on every call, not stored per explosion. The
    /// resulting jitter between frames is the shimmer of the effect; do not cache.
    pub fn draw<S: Surface + ?Sized, R: Rng + ?Sized>(&self, surface: &mut S, rng: &mut R) {
        let p = self.progress();
        surface.save();
        surface.set_alpha(1.0 - p);
        for i in 0..PARTICLES {
            let angle = (i as f64 / PARTICLES as f64) * TAU + p * 2.0;
            let r = 10.0 + p * 70.0 * (0.6 + rng.r#gen::<f64>() * 0.8);
            let sx = self.x + angle.cos() * r;
            let sy = self.y + angle.sin() * r;
            surface.fill_circle(sx, sy, 4.0 * (1.0 - p) + 1.0, self.color);
        }
        surface.fill_circle(self.x, self.y, 6.0 + p * 28.0, FLASH_COLOR);
        surface.restore();
    }
}
