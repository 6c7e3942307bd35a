//! Rectangular arena bounded by the walls `x = 0`, `y = 0`, `x = length` and `y = width`.

use std::slice::Iter;

use super::{error::ensure_positive, Angle, DomainError, Position};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    length: f64,
    width: f64,
}

impl Environment {
    pub fn new(length: f64, width: f64) -> Result<Self, DomainError> {
        Ok(Self {
            length: ensure_positive("environment length", length)?,
            width: ensure_positive("environment width", width)?,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn contains(&self, position: Position) -> bool {
        (0.0..=self.length).contains(&position.x()) && (0.0..=self.width).contains(&position.y())
    }

    /// Distance from `origin` to the wall hit by a ray leaving it at `angle`.
    pub fn distance_along_ray(&self, origin: Position, angle: Angle) -> f64 {
        origin.distance(self.intersection_along_ray(origin, angle))
    }

    /// Point where a ray leaving `origin` at `angle` meets the walls.
    ///
    /// Within a heading quadrant the ray can only leave through one of two adjacent walls, and
    /// the line through the ray meets exactly one of them inside its extent. The other slot holds
    /// the `(0, 0)` placeholder, so the sum of both slots is the hit. A ray through a corner
    /// populates both slots and yields their sum.
    pub fn intersection_along_ray(&self, origin: Position, angle: Angle) -> Position {
        self.wall_intersections(Ray::new(origin, angle))
            .select(angle.quadrant())
    }

    fn wall_intersections(&self, ray: Ray) -> WallIntersections {
        let mut slots = [Position::default(); 5];
        for (slot, wall) in slots.iter_mut().zip(Wall::iter()) {
            if let Some(intersection) = self.intersect_wall(*wall, ray) {
                *slot = intersection;
            }
        }
        slots[4] = slots[0];
        WallIntersections(slots)
    }

    fn intersect_wall(&self, wall: Wall, ray: Ray) -> Option<Position> {
        let candidate = match wall {
            Wall::Right => Position::new(self.length, ray.y_at(self.length)),
            Wall::Top => Position::new(ray.x_at(self.width), self.width),
            Wall::Left => Position::new(0.0, ray.y_at(0.0)),
            Wall::Bottom => Position::new(ray.x_at(0.0), 0.0),
        };
        let (coordinate, extent) = match wall {
            Wall::Right | Wall::Left => (candidate.y(), self.width),
            Wall::Top | Wall::Bottom => (candidate.x(), self.length),
        };
        (0.0..=extent)
            .contains(&coordinate)
            .then_some(candidate)
    }
}

/// Walls in counter-clockwise order, starting with the one a ray at angle 0 points to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Wall {
    Right,
    Top,
    Left,
    Bottom,
}

impl Wall {
    fn iter() -> Iter<'static, Wall> {
        static WALLS: [Wall; 4] = [Wall::Right, Wall::Top, Wall::Left, Wall::Bottom];
        WALLS.iter()
    }
}

/// The line `y = slope * x + intercept` through a ray's origin.
///
/// `tan` never returns an infinite value for a finite angle, so vertical rays end up with a huge
/// but finite slope and need no special case.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Ray {
    slope: f64,
    intercept: f64,
}

impl Ray {
    fn new(origin: Position, angle: Angle) -> Self {
        let slope = angle.tan();
        Self {
            slope,
            intercept: origin.y() - slope * origin.x(),
        }
    }

    fn y_at(&self, x: f64) -> f64 {
        x * self.slope + self.intercept
    }

    fn x_at(&self, y: f64) -> f64 {
        (y - self.intercept) / self.slope
    }
}

/// Wall hits in the order right, top, left, bottom, right. The repeated right wall lets the last
/// quadrant read two adjacent slots like all others.
#[derive(Clone, Copy, Debug, PartialEq)]
struct WallIntersections([Position; 5]);

impl WallIntersections {
    fn select(&self, quadrant: usize) -> Position {
        self.0[quadrant] + self.0[quadrant + 1]
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::tests::arena;

    const EPSILON: f64 = 1e-9;

    #[rstest]
    #[case::zero_length(0.0, 10.0)]
    #[case::negative_width(10.0, -1.0)]
    #[case::nan(f64::NAN, 10.0)]
    #[case::infinite(10.0, f64::INFINITY)]
    fn test_environment_invalid_dimensions(#[case] length: f64, #[case] width: f64) {
        assert!(matches!(
            Environment::new(length, width),
            Err(DomainError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_environment_dimensions() {
        let environment = Environment::new(12.0, 8.0).unwrap();
        assert_abs_diff_eq!(environment.length(), 12.0);
        assert_abs_diff_eq!(environment.width(), 8.0);
    }

    #[rstest]
    #[case::center(Position::new(5.0, 5.0), true)]
    #[case::corner(Position::new(10.0, 0.0), true)]
    #[case::left_of(Position::new(-0.1, 5.0), false)]
    #[case::above(Position::new(5.0, 10.1), false)]
    fn test_environment_contains(#[case] position: Position, #[case] expected: bool) {
        assert_eq!(arena().contains(position), expected);
    }

    #[test]
    fn test_environment_distance_along_ray() {
        assert_abs_diff_eq!(
            arena().distance_along_ray(Position::new(5.0, 5.0), Angle::new(0.0)),
            5.0,
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            arena().intersection_along_ray(Position::new(5.0, 5.0), Angle::new(0.0)),
            Position::new(10.0, 5.0),
            epsilon = EPSILON
        );
    }

    #[rstest]
    #[case::right(Position::new(2.0, 5.0), 0.0, Position::new(10.0, 5.0))]
    #[case::right_top(Position::new(2.0, 5.0), 0.25 * PI, Position::new(7.0, 10.0))]
    #[case::up(Position::new(2.0, 5.0), 0.5 * PI, Position::new(2.0, 10.0))]
    #[case::left_top(Position::new(5.0, 2.0), 0.75 * PI, Position::new(0.0, 7.0))]
    #[case::left(Position::new(2.0, 5.0), PI, Position::new(0.0, 5.0))]
    #[case::left_bottom(Position::new(5.0, 8.0), 1.25 * PI, Position::new(0.0, 3.0))]
    #[case::down(Position::new(2.0, 5.0), 1.5 * PI, Position::new(2.0, 0.0))]
    #[case::right_bottom(Position::new(2.0, 5.0), 1.75 * PI, Position::new(7.0, 0.0))]
    #[case::negative_angle(Position::new(2.0, 5.0), -FRAC_PI_2, Position::new(2.0, 0.0))]
    fn test_environment_intersection_per_quadrant(
        #[case] origin: Position,
        #[case] angle: f64,
        #[case] expected: Position,
    ) {
        let environment = arena();
        let intersection = environment.intersection_along_ray(origin, Angle::new(angle));
        assert_abs_diff_eq!(intersection, expected, epsilon = EPSILON);
        assert_abs_diff_eq!(
            environment.distance_along_ray(origin, Angle::new(angle)),
            origin.distance(expected),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_wall_intersections_slots() {
        let environment = arena();
        let ray = Ray::new(Position::new(2.0, 5.0), Angle::new(0.25 * PI));
        let WallIntersections(slots) = environment.wall_intersections(ray);

        // y = x + 3 crosses the top wall at x = 7 and the left wall at y = 3
        assert_eq!(slots[0], Position::default());
        assert_abs_diff_eq!(slots[1], Position::new(7.0, 10.0), epsilon = EPSILON);
        assert_abs_diff_eq!(slots[2], Position::new(0.0, 3.0), epsilon = EPSILON);
        assert_eq!(slots[3], Position::default());
        assert_eq!(slots[4], slots[0]);
    }

    #[test]
    fn test_wall_intersections_wraparound_slot() {
        let ray = Ray::new(Position::new(5.0, 5.0), Angle::new(0.0));
        let intersections = arena().wall_intersections(ray);
        assert_eq!(intersections.0[4], Position::new(10.0, 5.0));
        assert_eq!(intersections.select(3), Position::new(10.0, 5.0));
    }

    #[test]
    fn test_ray_horizontal_misses_top_and_bottom() {
        let environment = arena();
        let ray = Ray::new(Position::new(5.0, 5.0), Angle::new(0.0));
        assert_eq!(environment.intersect_wall(Wall::Top, ray), None);
        assert_eq!(environment.intersect_wall(Wall::Bottom, ray), None);
        assert_eq!(
            environment.intersect_wall(Wall::Left, ray),
            Some(Position::new(0.0, 5.0))
        );
    }

    #[test]
    fn test_wall_order() {
        assert_eq!(
            Wall::iter().copied().collect::<Vec<_>>(),
            vec![Wall::Right, Wall::Top, Wall::Left, Wall::Bottom]
        );
    }
}
