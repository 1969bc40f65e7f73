/// Set of traits representing various geometric properties & operations
pub mod geo_traits;

/// The six axis-aligned orientations of a box
pub mod orientation;

/// Set of geometric primitives - atomic building blocks for the geometry module
pub mod primitives;

mod kernel;

#[doc(inline)]
pub use kernel::{fits, overlaps, utilization, volume};

#[doc(inline)]
pub use orientation::{OrientedDims, Orientation, orientations};
