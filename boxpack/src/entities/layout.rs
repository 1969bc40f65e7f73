use crate::entities::{Container, Item, PackedItem, PackingResult};
use crate::geometry::primitives::{Cuboid, Dims, Point};
use crate::geometry::{OrientedDims, fits, overlaps, utilization};

/// A [`Layout`] is a container with a set of items placed in it.
/// It is the mutable working state of a single strategy run and is discarded once converted into a [`PackingResult`].
#[derive(Clone, Debug)]
pub struct Layout {
    container: Container,
    placed_items: Vec<PackedItem>,
    /// Boxes of `placed_items`, kept side by side for the collision scan
    occupied: Vec<Cuboid>,
    used_volume: f64,
}

impl Layout {
    pub fn new(container: Container) -> Self {
        Layout {
            container,
            placed_items: vec![],
            occupied: vec![],
            used_volume: 0.0,
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn placed_items(&self) -> &[PackedItem] {
        &self.placed_items
    }

    /// Checks whether the box collides with any item already in the layout
    pub fn collides(&self, cuboid: &Cuboid) -> bool {
        self.occupied.iter().any(|o| overlaps(o, cuboid))
    }

    /// A box of `dims` can be placed at `position` without leaving the container or overlapping a placed item
    pub fn is_free(&self, dims: Dims, position: Point) -> bool {
        fits(dims, position, self.container.dims)
            && !self.collides(&Cuboid::from_placement(position, dims))
    }

    pub fn place_item(
        &mut self,
        item: &Item,
        oriented: OrientedDims,
        position: Point,
        color: &str,
    ) {
        debug_assert!(
            self.is_free(oriented.dims, position),
            "item {} does not fit at {position}",
            item.id
        );
        let placed = PackedItem::new(item, oriented, position, color);
        self.used_volume += placed.volume();
        self.occupied.push(placed.cuboid());
        self.placed_items.push(placed);
    }

    pub fn used_volume(&self) -> f64 {
        self.used_volume
    }

    pub fn total_volume(&self) -> f64 {
        self.container.volume()
    }

    /// Finalizes the layout into a single-container result.
    /// `unpacked_items` are the items which did not find a place, in their original orientation.
    pub fn into_result(self, unpacked_items: Vec<Item>) -> PackingResult {
        let total_volume = self.total_volume();
        // summed again from scratch so the bookkeeping is exact
        let used_volume = self.placed_items.iter().map(|pi| pi.volume()).sum();
        PackingResult {
            container: self.container,
            packed_items: self.placed_items,
            unpacked_items,
            utilization: utilization(total_volume, used_volume),
            total_volume,
            used_volume,
            algorithm_name: None,
            containers: None,
            total_utilization: None,
            is_multi_container: None,
        }
    }
}
