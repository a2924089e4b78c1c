#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn zero() -> Self {
        Vector2D::new(0.0, 0.0)
    }

    /// Unit-length heading for `angle`, where angle 0 points up the screen (negative y).
    pub fn from_heading(angle: f64) -> Self {
        Vector2D::new(angle.sin(), -angle.cos())
    }

    pub fn scale(&self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }

    pub fn rotate(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vector2D::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    pub fn distance(&self, other: Vector2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Shifts `value` by one `extent` toward `[0, extent)`.
///
/// A single shift is enough for anything that moved less than a whole field
/// width in one frame, which is all the simulation ever produces.
pub fn wrap_coordinate(value: f64, extent: f64) -> f64 {
    if value < 0.0 {
        let shifted = value + extent;
        // Values a few ulps below zero round up onto the far edge.
        if shifted >= extent { 0.0 } else { shifted }
    } else if value >= extent {
        value - extent
    } else {
        value
    }
}

/// The toroidal playfield. Constant for the whole session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub width: f64,
    pub height: f64,
}

impl Field {
    pub fn new(width: u16, height: u16) -> Self {
        Field { width: width as f64, height: height as f64 }
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn wrap(&self, position: Vector2D) -> Vector2D {
        Vector2D::new(
            wrap_coordinate(position.x, self.width),
            wrap_coordinate(position.y, self.height),
        )
    }

    pub fn contains(&self, position: Vector2D) -> bool {
        position.x >= 0.0 && position.y >= 0.0 && position.x < self.width && position.y < self.height
    }
}

/// An immutable wireframe outline in model space, shared by every entity drawn with it.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    points: Vec<Vector2D>,
}

impl Model {
    pub fn new(points: Vec<Vector2D>) -> Self {
        Model { points }
    }

    pub fn points(&self) -> &[Vector2D] {
        &self.points
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Rotates, scales and then translates every vertex of `model` into field space.
pub fn transform_polygon(model: &Model, x: f64, y: f64, angle: f64, scale: f64) -> Vec<Vector2D> {
    let offset = Vector2D::new(x, y);
    model
        .points()
        .iter()
        .map(|point| point.rotate(angle).scale(scale).add(offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-9;

    fn assert_close(a: Vector2D, b: Vector2D) {
        assert!((a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_wrap_edges_of_200_wide_field() {
        assert_eq!(wrap_coordinate(-1.0, 200.0), 199.0);
        assert_eq!(wrap_coordinate(200.0, 200.0), 0.0);
        assert_eq!(wrap_coordinate(0.0, 200.0), 0.0);
        assert_eq!(wrap_coordinate(199.5, 200.0), 199.5);
    }

    #[test]
    fn test_wrap_stays_in_range_and_is_idempotent() {
        let extent = 120.0;
        for step in 0..973 {
            let p = -extent + step as f64 * 0.37;
            let once = wrap_coordinate(p, extent);
            assert!((0.0..extent).contains(&once), "wrap({}) = {}", p, once);
            assert_eq!(wrap_coordinate(once, extent), once);
        }
    }

    #[test]
    fn test_wrap_of_tiny_negative_stays_below_extent() {
        let once = wrap_coordinate(-1e-15, 120.0);
        assert!((0.0..120.0).contains(&once), "wrap(-1e-15) = {}", once);
        assert_eq!(wrap_coordinate(once, 120.0), once);

        let field = Field::new(200, 120);
        let edge = field.wrap(Vector2D::new(-1e-14, -1e-15));
        assert!(field.contains(edge));
    }

    #[test]
    fn test_field_wraps_each_axis_independently() {
        let field = Field::new(200, 120);
        assert_eq!(field.wrap(Vector2D::new(-1.0, 121.0)), Vector2D::new(199.0, 1.0));
        assert!(field.contains(Vector2D::new(0.0, 119.9)));
        assert!(!field.contains(Vector2D::new(200.0, 10.0)));
        assert!(!field.contains(Vector2D::new(10.0, -0.1)));
    }

    #[test]
    fn test_heading_zero_points_up() {
        assert_close(Vector2D::from_heading(0.0), Vector2D::new(0.0, -1.0));
        assert_close(Vector2D::from_heading(FRAC_PI_2), Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn test_transform_rotates_then_scales_then_translates() {
        let model = Model::new(vec![Vector2D::new(1.0, 0.0), Vector2D::new(0.0, -2.0)]);
        let points = transform_polygon(&model, 10.0, 20.0, FRAC_PI_2, 3.0);
        assert_eq!(points.len(), 2);
        assert_close(points[0], Vector2D::new(10.0, 23.0));
        assert_close(points[1], Vector2D::new(16.0, 20.0));
    }

    #[test]
    fn test_transform_leaves_template_untouched() {
        let model = Model::new(vec![Vector2D::new(0.0, -5.0), Vector2D::new(2.5, 2.5)]);
        let before = model.clone();
        let first = transform_polygon(&model, 50.0, 50.0, 1.0, 2.0);
        let second = transform_polygon(&model, 50.0, 50.0, 1.0, 2.0);
        assert_eq!(model, before);
        assert_eq!(first, second);
    }
}
