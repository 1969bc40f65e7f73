use crate::geometry::primitives::Cuboid;

/// Trait for types that can detect collisions between `Self` and `T`.
///
/// Collisions are evaluated on open intervals: two boxes sharing only a face, an edge or a corner do not collide.
pub trait CollidesWith<T> {
    fn collides_with(&self, other: &T) -> bool;
}

/// Trait for types that can decide whether `T` lies entirely within `Self`.
pub trait Encloses<T> {
    fn encloses(&self, other: &T) -> bool;
}

/// Trait for shared properties of three-dimensional primitives.
pub trait Shape {
    /// Volume of the interior of the shape
    fn volume(&self) -> f64;

    /// Axis-aligned bounding box of the shape
    fn bbox(&self) -> Cuboid;
}
