//! Shooting gallery session: targets, explosions, spawner and score.
//!
//! [`Gallery`] owns every piece of mutable game state. The frame loop calls
//! [`Gallery::tick`] (advance, prune, render); input callbacks call
//! [`Gallery::handle_input`] or [`Gallery::shoot`] between frames. Nothing here
//! touches the DOM, so the whole session runs under native tests.

pub mod clock;
pub mod explosion;
pub mod input;
pub mod target;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::audio::Sfx;
use crate::config::GalleryConfig;
use crate::render::{Sprites, Surface};

pub use clock::{CancelToken, FrameClock, run_frames};
pub use explosion::Explosion;
pub use input::{Action, InputEvent, route};
pub use target::Target;

const BACKGROUND: &str = "#ffffff";
const GROUND_COLOR: &str = "#f5f5f5";
const GROUND_BAND: f64 = 60.0;
const CROSSHAIR_SIZE: f64 = 56.0;
const CROSSHAIR_ARM: f64 = 16.0;
const CROSSHAIR_FALLBACK: &str = "#000";

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible play area in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Result of one fire action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shot {
    /// `target` is the index of the recycled target; `at` is where it was hit.
    Hit { target: usize, at: Point },
    Miss,
}

pub struct Gallery {
    config: GalleryConfig,
    viewport: Viewport,
    targets: Vec<Target>,
    explosions: Vec<Explosion>,
    hits: u32,
    misses: u32,
    spawn_interval_ms: f64,
    since_spawn_ms: f64,
    pointer: Point,
    rng: SmallRng,
}

impl Gallery {
    /// New session seeded from system entropy.
    pub fn new(config: GalleryConfig, viewport: Viewport) -> Self {
        Self::with_rng(config, viewport, SmallRng::from_entropy())
    }

    /// New session with a reproducible random sequence.
    pub fn with_seed(config: GalleryConfig, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(config, viewport, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: GalleryConfig, viewport: Viewport, rng: SmallRng) -> Self {
        let mut gallery = Gallery {
            spawn_interval_ms: config.spawn_interval_ms,
            config,
            viewport,
            targets: Vec::new(),
            explosions: Vec::new(),
            hits: 0,
            misses: 0,
            since_spawn_ms: 0.0,
            pointer: viewport.center(),
            rng,
        };
        gallery.populate();
        gallery
    }

    fn populate(&mut self) {
        self.targets.clear();
        for _ in 0..self.config.initial_targets {
            self.targets.push(Target::new(self.viewport, &mut self.rng));
        }
    }

    /// Back to a fresh session: counters zeroed, explosions cleared, the initial
    /// target set re-rolled and the spawn pacing restored.
    pub fn restart(&mut self) {
        self.hits = 0;
        self.misses = 0;
        self.explosions.clear();
        self.spawn_interval_ms = self.config.spawn_interval_ms;
        self.since_spawn_ms = 0.0;
        self.populate();
        log::info!("gallery restarted with {} targets", self.targets.len());
    }

    /// Simulation half of a frame. `dt` is expected to be clamped already
    /// (see [`FrameClock`]).
    pub fn advance(&mut self, dt: f64) {
        self.since_spawn_ms += dt;
        if self.since_spawn_ms > self.spawn_interval_ms {
            self.since_spawn_ms = 0.0;
            self.targets.push(Target::new(self.viewport, &mut self.rng));
            self.spawn_interval_ms = self.config.next_spawn_interval(self.spawn_interval_ms);
            log::debug!(
                "spawned target #{}, next in {:.1}ms",
                self.targets.len(),
                self.spawn_interval_ms
            );
        }

        let viewport = self.viewport;
        for target in &mut self.targets {
            target.update(dt, viewport, &mut self.rng);
        }
        for explosion in &mut self.explosions {
            explosion.update(dt);
        }
        // Remove from the back so earlier indices stay valid.
        for i in (0..self.explosions.len()).rev() {
            if self.explosions[i].expired {
                self.explosions.remove(i);
            }
        }
    }

    /// Draw the whole frame: background, ground band, targets, explosions (over the
    /// targets), crosshair last.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S, sprites: Sprites<'_, S::Image>) {
        let Viewport { width, height } = self.viewport;
        surface.clear(width, height);
        surface.fill_rect(0.0, 0.0, width, height, BACKGROUND);
        surface.fill_rect(0.0, height - GROUND_BAND, width, GROUND_BAND, GROUND_COLOR);

        for target in &self.targets {
            target.draw(surface, sprites.target);
        }
        for explosion in &self.explosions {
            explosion.draw(surface, &mut self.rng);
        }
        self.draw_crosshair(surface, sprites.crosshair);
    }

    fn draw_crosshair<S: Surface + ?Sized>(&self, surface: &mut S, sprite: Option<&S::Image>) {
        let Point { x, y } = self.pointer;
        match sprite {
            Some(image) => surface.draw_image(
                image,
                x - CROSSHAIR_SIZE / 2.0,
                y - CROSSHAIR_SIZE / 2.0,
                CROSSHAIR_SIZE,
                CROSSHAIR_SIZE,
            ),
            None => {
                surface.stroke_line(x - CROSSHAIR_ARM, y, x + CROSSHAIR_ARM, y, CROSSHAIR_FALLBACK);
                surface.stroke_line(x, y - CROSSHAIR_ARM, x, y + CROSSHAIR_ARM, CROSSHAIR_FALLBACK);
            }
        }
    }

    /// One full frame.
    pub fn tick<S: Surface + ?Sized>(&mut self, dt: f64, surface: &mut S, sprites: Sprites<'_, S::Image>) {
        self.advance(dt);
        self.render(surface, sprites);
    }

    /// Fire at `(x, y)`. The most recently spawned target under the point takes the
    /// shot (it is drawn on top); at most one target is hit per shot.
    pub fn shoot<A: Sfx + ?Sized>(&mut self, x: f64, y: f64, sfx: &mut A) -> Shot {
        sfx.play_shoot();
        let hit = self.targets.iter().rposition(|t| t.is_hit(x, y));
        match hit {
            Some(index) => {
                self.hits += 1;
                let at = self.targets[index].position();
                self.targets[index].reset(self.viewport, &mut self.rng);
                self.explosions.push(Explosion::new(at.x, at.y));
                sfx.play_hit();
                Shot::Hit { target: index, at }
            }
            None => {
                self.misses += 1;
                sfx.play_miss();
                Shot::Miss
            }
        }
    }

    /// Apply a routed input event. Returns the shot outcome for fire actions.
    pub fn handle_input<A: Sfx + ?Sized>(&mut self, event: &InputEvent, sfx: &mut A) -> Option<Shot> {
        match route(event, self.pointer, &self.config.fire_key)? {
            Action::Aim(p) => {
                self.pointer = p;
                None
            }
            Action::Fire(p) => Some(self.shoot(p.x, p.y, sfx)),
            Action::Restart => {
                self.restart();
                None
            }
        }
    }

    /// Track a new window size. Existing targets keep flying; new launches use it.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_pointer(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Mutable access for placing targets directly (scripted scenes, tests).
    pub fn targets_mut(&mut self) -> &mut [Target] {
        &mut self.targets
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        self.spawn_interval_ms
    }
}
