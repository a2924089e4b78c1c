use std::f64::consts::PI;
use crossterm::style::Color;
use log::{debug, info};
use rand::Rng;

use crate::collision::{fragment, overlaps};
use crate::constants::*;
use crate::entities::{SpaceObject, asteroid_model, ship_model};
use crate::geometry::{Field, Model, Vector2D};
use crate::input::InputState;
use crate::rendering::{Surface, draw_wireframe};

/// Offsets used by `spawn_wave`, one row per asteroid:
/// (angle added for the x offset, angle added for the y offset, velocity follows +angle).
const WAVE_LAYOUT: [(f64, f64, bool); 4] = [
    (-PI / 2.0, -PI / 2.0, true),
    (PI / 2.0, PI / 2.0, false),
    (-PI / 4.0, PI / 4.0, true),
    (PI / 6.0, -PI / 6.0, false),
];

/// Number of asteroids in the wave that follows a cleared field.
///
/// A score of exactly 10000 belongs to the top tier. Leaving it out of every
/// tier would spawn an empty wave and pay the clear bonus again each frame.
pub fn wave_size_for_score(score: u32) -> usize {
    if score <= SCORE_TIER_MEDIUM {
        2
    } else if score < SCORE_TIER_HARD {
        3
    } else {
        4
    }
}

/// One running game: the player, everything flying around, and the score.
pub struct Session<R: Rng> {
    pub field: Field,
    pub player: SpaceObject,
    pub asteroids: Vec<SpaceObject>,
    pub bullets: Vec<SpaceObject>,
    pub dead: bool,
    pub score: u32,
    pub best_score: u32,
    ship_model: Model,
    asteroid_model: Model,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(field: Field, mut rng: R) -> Self {
        let asteroid_model = asteroid_model(&mut rng);
        let mut session = Session {
            field,
            player: SpaceObject::player(&field),
            asteroids: Vec::new(),
            bullets: Vec::new(),
            dead: false,
            score: 0,
            best_score: 0,
            ship_model: ship_model(),
            asteroid_model,
            rng,
        };
        session.reset();
        session
    }

    pub fn reset(&mut self) {
        self.asteroids.clear();
        self.bullets.clear();
        self.player = SpaceObject::player(&self.field);
        self.dead = false;
        self.score = 0;
        self.spawn_wave(INITIAL_WAVE_SIZE);
        info!("Game reset: {} asteroids around ({}, {})", self.asteroids.len(), self.player.position.x, self.player.position.y);
    }

    /// Places `count` (at most four) fresh asteroids around the player.
    pub fn spawn_wave(&mut self, count: usize) {
        let sin_offset = self.rng.gen_range(SPAWN_OFFSET_MIN..=SPAWN_OFFSET_MAX);
        let cos_offset = self.rng.gen_range(SPAWN_OFFSET_MIN..=SPAWN_OFFSET_MAX);
        let angle = self.player.angle;

        for &(x_shift, y_shift, follows_facing) in WAVE_LAYOUT.iter().take(count) {
            let offset = Vector2D::new(sin_offset * (angle + x_shift).sin(), cos_offset * (angle + y_shift).cos());
            let heading = if follows_facing { angle } else { -angle };
            let velocity = Vector2D::new(heading.sin(), heading.cos()).scale(ASTEROID_SPEED);
            let position = self.field.wrap(self.player.position.add(offset));
            self.asteroids.push(SpaceObject::asteroid(position, velocity, ASTEROID_INITIAL_SIZE));
        }
        info!("Spawned wave of {} asteroids at score {}", count.min(WAVE_LAYOUT.len()), self.score);
    }

    /// Advances the game by `dt` seconds and draws the result onto `surface`.
    pub fn update(&mut self, dt: f64, input: &InputState, surface: &mut impl Surface) {
        if self.dead {
            self.reset();
        }

        surface.clear();

        if input.left {
            self.player.steer(-1.0, dt);
        }
        if input.right {
            self.player.steer(1.0, dt);
        }
        if input.thrust {
            self.player.thrust(dt);
        }
        if input.fire_released {
            self.bullets.push(SpaceObject::bullet(&self.player));
        }

        self.player.integrate(dt, &self.field);
        draw_wireframe(surface, &self.ship_model, self.player.position, self.player.angle, 1.0, Color::White);
        surface.draw_string(SCORE_TEXT_X, SCORE_TEXT_Y, &format!("SCORE:{}", self.score), Color::White);

        // Death only takes effect next frame so this one still renders
        if self
            .asteroids
            .iter()
            .any(|asteroid| overlaps(asteroid.position, asteroid.size as f64, self.player.position))
        {
            info!("Player destroyed with score {}", self.score);
            self.dead = true;
        }

        for asteroid in &mut self.asteroids {
            asteroid.integrate(dt, &self.field);
            asteroid.angle += ASTEROID_SPIN * dt;
            draw_wireframe(surface, &self.asteroid_model, asteroid.position, asteroid.angle, asteroid.size as f64, Color::Red);
        }

        for bullet in &mut self.bullets {
            bullet.integrate(dt, &self.field);
            surface.draw(bullet.position.x as i32, bullet.position.y as i32, PIXEL_SOLID, Color::White);
        }

        self.resolve_hits();

        let field = self.field;
        self.bullets.retain(|bullet| bullet.alive && field.contains(bullet.position));
        self.asteroids.retain(|asteroid| asteroid.alive);

        if self.asteroids.is_empty() {
            self.add_score(SCORE_WAVE_CLEARED);
            self.spawn_wave(wave_size_for_score(self.score));
        }
    }

    /// Bullet against asteroid. Children join the field only after every pair was tested.
    fn resolve_hits(&mut self) {
        let mut children: Vec<SpaceObject> = Vec::new();
        let mut hits = 0;

        for bullet in &mut self.bullets {
            for asteroid in self.asteroids.iter_mut().filter(|asteroid| asteroid.alive) {
                if !overlaps(asteroid.position, asteroid.size as f64, bullet.position) {
                    continue;
                }
                let fragments = fragment(asteroid, &mut self.rng);
                debug!(
                    "Asteroid of size {} hit at ({:.1}, {:.1}), {} fragments",
                    asteroid.size, asteroid.position.x, asteroid.position.y, fragments.len()
                );
                children.extend(fragments);
                asteroid.alive = false;
                bullet.alive = false;
                hits += 1;
                break;
            }
        }

        if hits > 0 {
            self.add_score(SCORE_ASTEROID_HIT * hits);
        }
        self.asteroids.extend(children);
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.best_score = self.best_score.max(self.score);
    }
}
