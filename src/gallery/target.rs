//! Flying targets.
//!
//! Targets launch from just below the bottom edge, arc upward under a small constant
//! gravity and tumble slowly. They never die: a target that leaves the play field,
//! or is shot, is recycled in place with a fresh launch state. The scene's
//! `Vec<Target>` is therefore an object pool that only grows.

use rand::Rng;

use super::{Point, Viewport};
use crate::render::Surface;

/// Downward acceleration in px/ms².
pub const GRAVITY: f64 = 0.0009;
/// How far past the top/left/right edges a target may drift before recycling.
pub const EXIT_MARGIN: f64 = 200.0;
/// Sprite height as a fraction of its width.
pub const HEIGHT_RATIO: f64 = 0.7;
/// Horizontal inset from each edge for spawn positions.
pub const SPAWN_INSET: f64 = 100.0;
/// Base tumble rate (rad/ms); each target spins at 0.5x..1.5x of this.
const BASE_SPIN: f64 = 0.0006;
const FALLBACK_COLOR: &str = "#333";

/// Always live: leaving the field or being shot recycles it in place, never removes it.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    /// px per ms
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub rotation: f64,
    /// rad per ms
    pub spin: f64,
}

impl Target {
    pub fn new<R: Rng + ?Sized>(viewport: Viewport, rng: &mut R) -> Self {
        let mut target = Target {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            size: 0.0,
            rotation: 0.0,
            spin: 0.0,
        };
        target.reset(viewport, rng);
        target
    }

    /// Re-launch from a random point along the band below the bottom edge.
    pub fn reset<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        self.x = rng.r#gen::<f64>() * (viewport.width - 2.0 * SPAWN_INSET) + SPAWN_INSET;
        self.y = viewport.height + (20.0 + rng.r#gen::<f64>() * 80.0);
        let dir = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
        self.vx = dir * (0.2 + rng.r#gen::<f64>() * 0.6);
        self.vy = -(0.8 + rng.r#gen::<f64>() * 1.3);
        self.size = 70.0 + rng.r#gen::<f64>() * 30.0;
        self.rotation = rng.r#gen::<f64>() * 0.6 - 0.3;
        self.spin = BASE_SPIN * (0.5 + rng.r#gen::<f64>());
    }

    /// Advance by `dt` ms. The position step uses the velocity from the start of the
    /// step plus the `0.5*G*dt²` term, and only then is gravity applied to `vy`.
    /// Keep that order: it changes the arc at large `dt`.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f64, viewport: Viewport, rng: &mut R) {
        self.x += self.vx * dt;
        self.y += self.vy * dt + 0.5 * GRAVITY * dt * dt;
        self.vy += GRAVITY * dt;
        self.rotation += self.spin * dt;
        if self.has_exited(viewport) {
            self.reset(viewport, rng);
        }
    }

    /// Out past the top, left or right margin. Targets travel upward so the bottom
    /// edge is never checked.
    fn has_exited(&self, viewport: Viewport) -> bool {
        self.y < -EXIT_MARGIN || self.x < -EXIT_MARGIN || self.x > viewport.width + EXIT_MARGIN
    }

    pub fn width(&self) -> f64 {
        self.size
    }

    pub fn height(&self) -> f64 {
        self.size * HEIGHT_RATIO
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, sprite: Option<&S::Image>) {
        let (w, h) = (self.width(), self.height());
        surface.save();
        surface.translate(self.x, self.y);
        surface.rotate(self.rotation);
        match sprite {
            Some(image) => surface.draw_image(image, -w / 2.0, -h / 2.0, w, h),
            None => surface.fill_rect(-w / 2.0, -h / 2.0, w, h, FALLBACK_COLOR),
        }
        surface.restore();
    }

    /// Point-in-box against the unrotated sprite rectangle. The drawn sprite is
    /// rotated but the hit box is not; tilted targets are slightly easier or harder
    /// to hit near the corners and that is accepted.
    pub fn is_hit(&self, px: f64, py: f64) -> bool {
        let (hw, hh) = (self.width() / 2.0, self.height() / 2.0);
        px >= self.x - hw && px <= self.x + hw && py >= self.y - hh && py <= self.y + hh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{FakeImage, Op, Recorder};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const VIEW: Viewport = Viewport { width: 1280.0, height: 720.0 };

    fn fixed(x: f64, y: f64, size: f64) -> Target {
        Target { x, y, vx: 0.0, vy: 0.0, size, rotation: 0.0, spin: 0.0 }
    }

    #[test]
    fn reset_spawns_below_fold_inside_inset() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..500 {
            let t = Target::new(VIEW, &mut rng);
            assert!(t.y > VIEW.height, "y = {}", t.y);
            assert!(t.y <= VIEW.height + 100.0);
            assert!(t.x >= 100.0 && t.x <= VIEW.width - 100.0, "x = {}", t.x);
            assert!(t.vy < 0.0, "targets launch upward");
            assert!((0.2..=0.8).contains(&t.vx.abs()));
            assert!((70.0..=100.0).contains(&t.size));
            assert!(t.rotation.abs() <= 0.3);
        }
    }

    #[test]
    fn update_applies_position_before_velocity() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut t = Target { x: 500.0, y: 400.0, vx: 0.5, vy: -1.0, size: 80.0, rotation: 0.0, spin: 0.001 };
        t.update(50.0, VIEW, &mut rng);
        assert!((t.x - 525.0).abs() < 1e-9);
        // -1.0 * 50 + 0.5 * 0.0009 * 2500 = -48.875
        assert!((t.y - (400.0 - 48.875)).abs() < 1e-9);
        assert!((t.vy - (-1.0 + 0.045)).abs() < 1e-12);
        assert!((t.rotation - 0.05).abs() < 1e-12);
    }

    #[test]
    fn exiting_the_top_recycles_in_place() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut t = fixed(600.0, -199.0, 80.0);
        t.vy = -1.0;
        t.update(10.0, VIEW, &mut rng);
        assert!(t.y > VIEW.height, "recycled target starts below the fold");
    }

    #[test]
    fn exiting_the_sides_recycles() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut left = fixed(-199.0, 300.0, 80.0);
        left.vx = -1.0;
        left.update(5.0, VIEW, &mut rng);
        assert!(left.y > VIEW.height);

        let mut right = fixed(VIEW.width + 199.0, 300.0, 80.0);
        right.vx = 1.0;
        right.update(5.0, VIEW, &mut rng);
        assert!(right.y > VIEW.height);
    }

    #[test]
    fn below_the_fold_is_not_an_exit() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut t = fixed(600.0, VIEW.height + 500.0, 80.0);
        t.update(16.0, VIEW, &mut rng);
        assert!(t.y > VIEW.height + 500.0, "sinking target keeps its state");
        assert_eq!(t.x, 600.0);
    }

    #[test]
    fn positions_stay_finite_over_long_runs() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut targets: Vec<Target> = (0..20).map(|_| Target::new(VIEW, &mut rng)).collect();
        for step in 0..5_000 {
            let dt = (step % 51) as f64;
            for t in &mut targets {
                t.update(dt, VIEW, &mut rng);
                assert!(t.x.is_finite() && t.y.is_finite());
                assert!(t.vx.is_finite() && t.vy.is_finite());
            }
        }
    }

    #[test]
    fn hit_box_is_the_unrotated_rectangle() {
        let mut t = fixed(200.0, 300.0, 100.0);
        // half extents 50 x 35
        assert!(t.is_hit(200.0, 300.0));
        assert!(t.is_hit(150.0, 265.0));
        assert!(t.is_hit(250.0, 335.0));
        assert!(!t.is_hit(250.1, 300.0));
        assert!(!t.is_hit(200.0, 335.1));
        assert!(!t.is_hit(149.9, 300.0));

        // Rotation must not change the answer.
        for rotation in [0.3, 1.0, std::f64::consts::FRAC_PI_2, -2.0] {
            t.rotation = rotation;
            assert!(t.is_hit(250.0, 335.0));
            assert!(!t.is_hit(200.0, 340.0));
            assert!(!t.is_hit(260.0, 300.0));
        }
    }

    #[test]
    fn draw_uses_sprite_when_decoded() {
        let mut t = fixed(10.0, 20.0, 100.0);
        t.rotation = 0.25;
        let mut rec = Recorder::default();
        let img = FakeImage("laptop");
        t.draw(&mut rec, Some(&img));
        assert_eq!(
            rec.ops,
            vec![
                Op::Save,
                Op::Translate(10.0, 20.0),
                Op::Rotate(0.25),
                Op::Image { name: "laptop", x: -50.0, y: -35.0, w: 100.0, h: 70.0 },
                Op::Restore,
            ]
        );
    }

    #[test]
    fn draw_falls_back_to_rectangle() {
        let t = fixed(10.0, 20.0, 100.0);
        let mut rec = Recorder::default();
        t.draw(&mut rec, None);
        assert!(rec.ops.contains(&Op::Rect {
            x: -50.0,
            y: -35.0,
            w: 100.0,
            h: 70.0,
            color: FALLBACK_COLOR.to_string()
        }));
    }
}
