use std::time::Instant;

use anyhow::Result;
use boxpack::entities::{Container, Item, Layout, PackingResult, palette_color};
use boxpack::geometry::OrientedDims;
use boxpack::search::GridSearch;
use log::{debug, info};
use thousands::Separable;

use crate::opt::{Algorithm, SolveCtx, Strategy, volume_descending};

/// Best-Fit: items by descending volume, each at the grid position with the lowest waste score.
///
/// Items are only tried in their original orientation.
pub struct BestFit {
    pub grid_resolution: f64,
}

impl Strategy for BestFit {
    fn name(&self) -> &'static str {
        Algorithm::BestFit.display_name()
    }

    fn pack(
        &self,
        container: &Container,
        items: &[Item],
        ctx: &mut SolveCtx,
    ) -> Result<PackingResult> {
        let start = Instant::now();
        ctx.progress.report(0.0);

        let mut layout = Layout::new(container.clone());
        let mut unpacked = vec![];
        let mut search = GridSearch::new(self.grid_resolution, &ctx.cancel);

        for (seq_idx, item_idx) in volume_descending(items).into_iter().enumerate() {
            let item = &items[item_idx];
            match search.best_fit(&layout, item.dims)? {
                Some(position) => {
                    debug!("[BF] placing item {} at {position}", item.id);
                    layout.place_item(
                        item,
                        OrientedDims::original(item.dims),
                        position,
                        palette_color(seq_idx),
                    );
                }
                None => unpacked.push(item.clone()),
            }
        }

        let result = layout.into_result(unpacked);
        info!(
            "[BF] packed {}/{} items in {}, {:.3}% utilization ({:.3}ms, {} positions evaluated)",
            result.packed_items.len(),
            items.len(),
            container.id,
            result.utilization,
            start.elapsed().as_secs_f64() * 1000.0,
            search.n_evaluated.separate_with_commas()
        );
        ctx.progress.report(1.0);
        Ok(result)
    }
}
