use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Position of a box's lower corner, local to its container.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const ORIGIN: Point = Point {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }

    pub fn sq_distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.sq_distance(other).sqrt()
    }

    /// Manhattan distance to the origin, the first term of the best-fit waste score
    pub fn coordinate_sum(&self) -> f64 {
        self.x + self.y + self.z
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
