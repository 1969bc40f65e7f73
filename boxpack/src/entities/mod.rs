mod container;
mod item;
mod layout;
mod placed_item;
mod result;

#[doc(inline)]
pub use container::Container;
#[doc(inline)]
pub use item::Item;
#[doc(inline)]
pub use layout::Layout;
#[doc(inline)]
pub use placed_item::{ITEM_COLORS, PackedItem, palette_color};
#[doc(inline)]
pub use result::{ComparisonResult, ContainerResult, PackingResult, PackingStats};
