use std::time::Instant;

use anyhow::Result;
use boxpack::entities::{Container, Item, PackingResult};
use boxpack::search::GridSearch;
use log::info;
use thousands::Separable;

use crate::opt::decoder::pack_sequence;
use crate::opt::{Algorithm, SolveCtx, Strategy, volume_descending};

/// First-Fit Decreasing: items by descending volume, each at the first free position of its first fitting orientation.
/// Fully deterministic.
pub struct FirstFitDecreasing {
    pub grid_resolution: f64,
}

impl Strategy for FirstFitDecreasing {
    fn name(&self) -> &'static str {
        Algorithm::FirstFitDecreasing.display_name()
    }

    fn pack(
        &self,
        container: &Container,
        items: &[Item],
        ctx: &mut SolveCtx,
    ) -> Result<PackingResult> {
        let start = Instant::now();
        ctx.progress.report(0.0);

        let order = volume_descending(items);
        let mut search = GridSearch::new(self.grid_resolution, &ctx.cancel);
        let result = pack_sequence(&mut search, container, items, &order)?;

        info!(
            "[FFD] packed {}/{} items in {}, {:.3}% utilization ({:.3}ms, {} positions evaluated)",
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
