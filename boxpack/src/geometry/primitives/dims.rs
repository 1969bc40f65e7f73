use std::fmt::Display;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::{Cuboid, Point};

/// Extent of a box along the three axes, expressed in the caller's length unit.
///
/// `width` runs along x, `height` along y (the vertical axis, layers are built bottom-up)
/// and `depth` along z.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dims {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Dims {
    pub const fn new(width: f64, height: f64, depth: f64) -> Self {
        Dims {
            width,
            height,
            depth,
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.width, self.height, self.depth]
    }

    /// The three extents in ascending order, useful to compare dimension multisets.
    pub fn sorted(&self) -> [f64; 3] {
        let mut dims = self.as_array();
        dims.sort_by_key(|d| OrderedFloat(*d));
        dims
    }

    /// Whether `other` is a permutation of the extents of `self`.
    pub fn same_multiset(&self, other: &Dims) -> bool {
        self.sorted() == other.sorted()
    }
}

impl Shape for Dims {
    fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }

    fn bbox(&self) -> Cuboid {
        Cuboid::from_placement(Point::ORIGIN, *self)
    }
}

impl Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}
