use boxpack::entities::{Container, Item, Layout, PackingResult, palette_color};
use boxpack::search::GridSearch;
use boxpack::util::Cancelled;

/// Packs `items` in the order given by `sequence` (indices into `items`).
///
/// Every item is placed in the first of its six orientations for which a first-fit position exists,
/// or ends up unpacked when none does. Colors follow the position in the sequence.
pub fn pack_sequence(
    search: &mut GridSearch<'_>,
    container: &Container,
    items: &[Item],
    sequence: &[usize],
) -> Result<PackingResult, Cancelled> {
    debug_assert!(sequence.len() == items.len());
    let mut layout = Layout::new(container.clone());
    let mut unpacked = vec![];

    for (seq_idx, &item_idx) in sequence.iter().enumerate() {
        let item = &items[item_idx];
        match search.first_fit_oriented(&layout, item.dims)? {
            Some((oriented, position)) => {
                layout.place_item(item, oriented, position, palette_color(seq_idx))
            }
            None => unpacked.push(item.clone()),
        }
    }

    Ok(layout.into_result(unpacked))
}
