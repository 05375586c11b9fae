use serde::{Deserialize, Serialize};

/// A position in viewport pixels, or an offset from the marker when used for
/// orbit items.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Moves toward `target` by the fraction `t` of the remaining distance.
    pub fn approach(self, target: Point, t: f64) -> Self {
        Self {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn test_approach_fraction() {
        let from = Point::new(0.0, 10.0);
        let to = Point::new(100.0, -10.0);
        assert_eq!(from.approach(to, 0.0), from);
        assert_eq!(from.approach(to, 1.0), to);
        assert_eq!(from.approach(to, 0.5), Point::new(50.0, 0.0));
    }
}
