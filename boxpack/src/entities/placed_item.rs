use serde::{Deserialize, Serialize};

use crate::entities::Item;
use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::{Cuboid, Point};
use crate::geometry::{Orientation, OrientedDims};

/// Palette cycled through when assigning presentation colors to placed items.
pub const ITEM_COLORS: [&str; 10] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
    "#6366F1", "#84CC16",
];

pub fn palette_color(idx: usize) -> &'static str {
    ITEM_COLORS[idx % ITEM_COLORS.len()]
}

/// Represents an [`Item`] that has been placed in a [`Layout`](crate::entities::Layout)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackedItem {
    /// The original item, with its dimensions permuted to the chosen orientation
    #[serde(flatten)]
    pub item: Item,
    /// Lower corner of the item, local to its container
    pub position: Point,
    /// Presentation only
    pub color: String,
    pub rotated: bool,
    #[serde(skip)]
    pub orientation: Orientation,
}

impl PackedItem {
    pub fn new(item: &Item, oriented: OrientedDims, position: Point, color: &str) -> Self {
        debug_assert!(oriented.dims.same_multiset(&item.dims));
        PackedItem {
            item: Item {
                dims: oriented.dims,
                ..item.clone()
            },
            position,
            color: color.to_string(),
            rotated: oriented.rotated,
            orientation: oriented.orientation,
        }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn cuboid(&self) -> Cuboid {
        Cuboid::from_placement(self.position, self.item.dims)
    }

    pub fn volume(&self) -> f64 {
        self.item.dims.volume()
    }
}
