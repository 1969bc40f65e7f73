use anyhow::{Result, ensure};
use boxpack::entities::{ComparisonResult, Item};
use log::info;

use crate::allocator::{ContainerPlan, allocate};
use crate::config::PackConfig;
use crate::opt::{Algorithm, SolveCtx};

/// Runs every algorithm on the same containers and items and ranks the results by
/// effective utilization, best first. Equally good results keep the order of `algorithms`.
///
/// Each algorithm reports its progress in an equal share of the overall range.
/// With a seed in `config`, each algorithm's result matches that of a single run with the same seed.
pub fn compare(
    algorithms: &[Algorithm],
    config: &PackConfig,
    plan: &ContainerPlan,
    items: &[Item],
    ctx: &mut SolveCtx,
) -> Result<ComparisonResult> {
    ensure!(!algorithms.is_empty(), "no algorithms to compare");

    let n_algorithms = algorithms.len();
    let mut results = Vec::with_capacity(n_algorithms);
    for (i, algorithm) in algorithms.iter().enumerate() {
        let strategy = algorithm.strategy(config);
        // every algorithm sees the same random stream it would get in a single run
        ctx.reseed(config.prng_seed);
        ctx.progress.enter(
            i as f64 / n_algorithms as f64,
            (i + 1) as f64 / n_algorithms as f64,
        );
        let result = allocate(strategy.as_ref(), plan, items, ctx)?;
        ctx.progress.leave();

        info!(
            "[CMP] {}: {:.3}% utilization",
            algorithm,
            result.effective_utilization()
        );
        results.push(result.with_algorithm_name(strategy.name()));
    }

    results.sort_by(|a, b| {
        b.effective_utilization()
            .total_cmp(&a.effective_utilization())
    });
    let best_algorithm = results[0].algorithm_name.clone().unwrap_or_default();
    info!("[CMP] best algorithm: {best_algorithm}");

    Ok(ComparisonResult {
        results,
        best_algorithm,
    })
}
