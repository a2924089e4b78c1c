use crate::constants::*;
use crate::geometry::{Field, Model, Vector2D};
use rand::Rng;
use std::f64::consts::PI;

// --- SpaceObject: shared record for the ship, asteroids and bullets ---
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpaceObject {
    pub position: Vector2D,
    pub velocity: Vector2D, // Units per second
    pub size: i32,          // Collision radius for asteroids, 0 otherwise
    pub angle: f64,         // Radians, 0 faces up
    pub alive: bool,
}

impl SpaceObject {
    pub fn new(position: Vector2D, velocity: Vector2D, size: i32, angle: f64) -> Self {
        SpaceObject { position, velocity, size, angle, alive: true }
    }

    /// The player ship at rest in the middle of the field, facing up.
    pub fn player(field: &Field) -> Self {
        SpaceObject::new(field.center(), Vector2D::zero(), 0, 0.0)
    }

    pub fn asteroid(position: Vector2D, velocity: Vector2D, size: i32) -> Self {
        SpaceObject::new(position, velocity, size, 0.0)
    }

    /// A bullet leaving `shooter` along its facing.
    pub fn bullet(shooter: &SpaceObject) -> Self {
        let velocity = Vector2D::from_heading(shooter.angle).scale(BULLET_SPEED);
        SpaceObject::new(shooter.position, velocity, 0, 0.0)
    }

    pub fn integrate(&mut self, dt: f64, field: &Field) {
        self.position = field.wrap(self.position.add(self.velocity.scale(dt)));
    }

    pub fn steer(&mut self, direction: f64, dt: f64) {
        self.angle += SHIP_ROTATION_SPEED * direction * dt;
    }

    pub fn thrust(&mut self, dt: f64) {
        let thrust_vector = Vector2D::from_heading(self.angle).scale(SHIP_THRUST_POWER * dt);
        self.velocity = self.velocity.add(thrust_vector);
    }
}

pub fn ship_model() -> Model {
    Model::new(vec![
        Vector2D::new(0.0, -5.0), // Nose
        Vector2D::new(-2.5, 2.5),
        Vector2D::new(2.5, 2.5),
    ])
}

/// A unit circle with each vertex pushed in or out at random, for a jagged rock outline.
pub fn asteroid_model(rng: &mut impl Rng) -> Model {
    let points = (0..ASTEROID_MODEL_VERTICES)
        .map(|i| {
            let radius = rng.gen_range(ASTEROID_JAGGEDNESS_MIN..=ASTEROID_JAGGEDNESS_MAX);
            let theta = i as f64 / ASTEROID_MODEL_VERTICES as f64 * 2.0 * PI;
            Vector2D::new(radius * theta.sin(), radius * theta.cos())
        })
        .collect();
    Model::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bullet_leaves_along_ship_facing() {
        let field = Field::new(200, 120);
        let ship = SpaceObject::player(&field);
        let bullet = SpaceObject::bullet(&ship);
        assert_eq!(bullet.position, Vector2D::new(100.0, 60.0));
        assert!(bullet.velocity.x.abs() < 1e-9);
        assert_eq!(bullet.velocity.y, -50.0);
        assert_eq!(bullet.size, 0);
    }

    #[test]
    fn test_integrate_wraps_across_left_edge() {
        let field = Field::new(200, 120);
        let mut rock = SpaceObject::asteroid(Vector2D::new(0.5, 60.0), Vector2D::new(-15.0, 0.0), 16);
        rock.integrate(0.1, &field);
        assert!((rock.position.x - 199.0).abs() < 1e-9);
        assert_eq!(rock.position.y, 60.0);
    }

    #[test]
    fn test_thrust_accelerates_toward_facing() {
        let field = Field::new(200, 120);
        let mut ship = SpaceObject::player(&field);
        ship.thrust(0.5);
        assert!(ship.velocity.x.abs() < 1e-9);
        assert_eq!(ship.velocity.y, -10.0);

        ship.steer(1.0, 0.1);
        assert!((ship.angle - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_asteroid_model_is_jagged_circle() {
        let mut rng = StdRng::seed_from_u64(7);
        let model = asteroid_model(&mut rng);
        assert_eq!(model.len(), ASTEROID_MODEL_VERTICES);
        for point in model.points() {
            let radius = point.distance(Vector2D::zero());
            assert!((0.8 - 1e-9..=1.2 + 1e-9).contains(&radius));
        }
    }
}
