use crate::geometry::geo_traits::{CollidesWith, Encloses, Shape};
use crate::geometry::primitives::{Dims, Point};

///Geometric primitive representing an axis-aligned box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid {
    pub x_min: f64,
    pub y_min: f64,
    pub z_min: f64,
    pub x_max: f64,
    pub y_max: f64,
    pub z_max: f64,
}

impl Cuboid {
    pub fn new(x_min: f64, y_min: f64, z_min: f64, x_max: f64, y_max: f64, z_max: f64) -> Self {
        debug_assert!(
            x_min <= x_max && y_min <= y_max && z_min <= z_max,
            "invalid Cuboid, x: [{x_min}, {x_max}], y: [{y_min}, {y_max}], z: [{z_min}, {z_max}]"
        );
        Cuboid {
            x_min,
            y_min,
            z_min,
            x_max,
            y_max,
            z_max,
        }
    }

    /// Box spanned by `dims` with its lower corner at `position`
    pub fn from_placement(position: Point, dims: Dims) -> Self {
        Cuboid::new(
            position.x,
            position.y,
            position.z,
            position.x + dims.width,
            position.y + dims.height,
            position.z + dims.depth,
        )
    }

    pub fn dims(&self) -> Dims {
        Dims::new(
            self.x_max - self.x_min,
            self.y_max - self.y_min,
            self.z_max - self.z_min,
        )
    }
}

impl CollidesWith<Cuboid> for Cuboid {
    #[inline(always)]
    fn collides_with(&self, other: &Cuboid) -> bool {
        self.x_min < other.x_max
            && self.x_max > other.x_min
            && self.y_min < other.y_max
            && self.y_max > other.y_min
            && self.z_min < other.z_max
            && self.z_max > other.z_min
    }
}

impl Encloses<Cuboid> for Cuboid {
    #[inline(always)]
    fn encloses(&self, other: &Cuboid) -> bool {
        other.x_min >= self.x_min
            && other.y_min >= self.y_min
            && other.z_min >= self.z_min
            && other.x_max <= self.x_max
            && other.y_max <= self.y_max
            && other.z_max <= self.z_max
    }
}

impl Shape for Cuboid {
    fn volume(&self) -> f64 {
        self.dims().volume()
    }

    fn bbox(&self) -> Cuboid {
        *self
    }
}
