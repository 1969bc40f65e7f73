mod cuboid;
mod dims;
mod point;

#[doc(inline)]
pub use cuboid::Cuboid;
#[doc(inline)]
pub use dims::Dims;
#[doc(inline)]
pub use point::Point;
