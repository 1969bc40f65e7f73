use std::time::Instant;

use anyhow::Result;
use boxpack::entities::{Container, Item, PackingResult};
use boxpack::search::GridSearch;
use boxpack::util::CancelToken;
use log::{debug, info};
use rand::Rng;
use thousands::Separable;

use crate::opt::decoder::pack_sequence;
use crate::opt::{Algorithm, SolveCtx, Strategy, volume_descending};
use crate::progress::Progress;

/// Below this temperature the search stops, regardless of the remaining iterations
pub const MIN_TEMPERATURE: f64 = 1e-4;
/// Progress is reported every this many iterations
const PROGRESS_INTERVAL: usize = 5;

/// Simulated annealing over item orderings, starting from descending volume.
///
/// The energy of an ordering is the container volume left empty by its first-fit decoding.
/// Returns the best packing encountered, not necessarily the final state.
pub struct SimulatedAnnealing {
    pub grid_resolution: f64,
    pub iterations: usize,
    pub initial_temperature: f64,
    /// Factor applied to the temperature after every iteration
    pub cooling_rate: f64,
}

fn energy(result: &PackingResult) -> f64 {
    result.total_volume - result.used_volume
}

/// Lowest-energy state of an annealing run, with counters for logging
struct Annealed<T> {
    best: T,
    best_energy: f64,
    n_iterations: usize,
    n_accepted: usize,
}

impl SimulatedAnnealing {
    /// Anneals over orderings, starting at `start`.
    /// `evaluate` maps an ordering to its energy and the state it produces.
    fn anneal<T>(
        &self,
        start: Vec<usize>,
        rng: &mut impl Rng,
        cancel: &CancelToken,
        progress: &mut Progress,
        mut evaluate: impl FnMut(&[usize]) -> Result<(f64, T)>,
    ) -> Result<Annealed<T>> {
        let mut current = start;
        let (mut current_energy, initial) = evaluate(&current)?;
        let mut annealed = Annealed {
            best: initial,
            best_energy: current_energy,
            n_iterations: 0,
            n_accepted: 0,
        };

        let mut temperature = self.initial_temperature;
        for i in 0..self.iterations {
            cancel.check()?;
            annealed.n_iterations += 1;

            let mut neighbor = current.clone();
            if neighbor.len() >= 2 {
                let a = rng.random_range(0..neighbor.len());
                let b = rng.random_range(0..neighbor.len());
                neighbor.swap(a, b);
            }
            let (neighbor_energy, state) = evaluate(&neighbor)?;
            let delta = neighbor_energy - current_energy;

            let accept = delta < 0.0 || rng.random::<f64>() < (-delta / temperature).exp();
            if accept {
                annealed.n_accepted += 1;
                current = neighbor;
                current_energy = neighbor_energy;
                if current_energy < annealed.best_energy {
                    debug!(
                        "[SA] energy down to {current_energy:.3} at iteration {i} (T = {temperature:.4})"
                    );
                    annealed.best_energy = current_energy;
                    annealed.best = state;
                }
            }

            temperature *= self.cooling_rate;
            if i % PROGRESS_INTERVAL == 0 {
                progress.report((i + 1) as f64 / self.iterations as f64);
            }
            if temperature < MIN_TEMPERATURE {
                debug!("[SA] frozen after {} iterations", i + 1);
                break;
            }
        }
        Ok(annealed)
    }
}

impl Strategy for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        Algorithm::SimulatedAnnealing.display_name()
    }

    fn pack(
        &self,
        container: &Container,
        items: &[Item],
        ctx: &mut SolveCtx,
    ) -> Result<PackingResult> {
        let start = Instant::now();
        ctx.progress.report(0.0);

        let mut search = GridSearch::new(self.grid_resolution, &ctx.cancel);
        let annealed = self.anneal(
            volume_descending(items),
            &mut ctx.rng,
            &ctx.cancel,
            &mut ctx.progress,
            |sequence| {
                let result = pack_sequence(&mut search, container, items, sequence)?;
                Ok((energy(&result), result))
            },
        )?;
        let best = annealed.best;

        info!(
            "[SA] {}/{} iterations ({} accepted) finished in {:.3}ms, {:.3}% utilization ({} positions evaluated)",
            annealed.n_iterations,
            self.iterations,
            annealed.n_accepted,
            start.elapsed().as_secs_f64() * 1000.0,
            best.utilization,
            search.n_evaluated.separate_with_commas()
        );
        ctx.progress.report(1.0);
        Ok(best)
    }
}
