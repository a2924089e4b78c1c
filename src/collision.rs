use crate::constants::*;
use crate::entities::SpaceObject;
use crate::geometry::Vector2D;
use rand::Rng;
use std::f64::consts::PI;

/// True when `point` lies strictly inside the circle of `radius` around `center`.
pub fn overlaps(center: Vector2D, radius: f64, point: Vector2D) -> bool {
    center.distance(point) < radius
}

/// Children produced by destroying `asteroid`: two half-size rocks flying off
/// in random directions, or none once it is too small to split.
pub fn fragment(asteroid: &SpaceObject, rng: &mut impl Rng) -> Vec<SpaceObject> {
    if asteroid.size <= ASTEROID_MIN_SPLIT_SIZE {
        return Vec::new();
    }
    let child_size = asteroid.size >> 1;
    (0..2)
        .map(|_| {
            let angle = rng.gen_range(0.0..2.0 * PI);
            let velocity = Vector2D::new(angle.sin(), angle.cos()).scale(ASTEROID_SPEED);
            SpaceObject::asteroid(asteroid.position, velocity, child_size)
        })
        .collect()
}
