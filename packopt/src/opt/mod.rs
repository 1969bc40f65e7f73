use std::cmp::Reverse;
use std::fmt::Display;

use anyhow::Result;
use boxpack::entities::{Container, Item, PackingResult};
use boxpack::util::CancelToken;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use rand::SeedableRng;
use rand::prelude::SmallRng;
use serde::{Deserialize, Serialize};

use crate::config::PackConfig;
use crate::opt::annealing::SimulatedAnnealing;
use crate::opt::best_fit::BestFit;
use crate::opt::ffd::FirstFitDecreasing;
use crate::opt::genetic::GeneticAlgorithm;
use crate::progress::Progress;

pub mod annealing;
pub mod best_fit;
pub mod decoder;
pub mod ffd;
pub mod genetic;

/// The packing strategies which can be requested.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    #[default]
    #[serde(rename = "ffd")]
    FirstFitDecreasing,
    #[serde(rename = "bestfit")]
    BestFit,
    #[serde(rename = "genetic")]
    Genetic,
    #[serde(rename = "sa")]
    SimulatedAnnealing,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::FirstFitDecreasing,
        Algorithm::BestFit,
        Algorithm::Genetic,
        Algorithm::SimulatedAnnealing,
    ];

    /// Human-readable name, used to tag results
    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::FirstFitDecreasing => "First-Fit Decreasing",
            Algorithm::BestFit => "Best-Fit",
            Algorithm::Genetic => "Genetic Algorithm",
            Algorithm::SimulatedAnnealing => "Simulated Annealing",
        }
    }

    /// Builds the strategy, with its parameters taken from `config`.
    pub fn strategy(&self, config: &PackConfig) -> Box<dyn Strategy> {
        match self {
            Algorithm::FirstFitDecreasing => Box::new(FirstFitDecreasing {
                grid_resolution: config.grid_resolution,
            }),
            Algorithm::BestFit => Box::new(BestFit {
                grid_resolution: config.grid_resolution,
            }),
            Algorithm::Genetic => Box::new(GeneticAlgorithm {
                grid_resolution: config.grid_resolution,
                generations: config.genetic_generations,
                mutation_rate: config.mutation_rate,
            }),
            Algorithm::SimulatedAnnealing => Box::new(SimulatedAnnealing {
                grid_resolution: config.grid_resolution,
                iterations: config.sa_iterations(),
                initial_temperature: config.sa.initial_temperature,
                cooling_rate: config.sa.cooling_rate,
            }),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Packs items into a single container.
pub trait Strategy {
    fn name(&self) -> &'static str;

    /// Places as many of `items` as possible in `container`.
    /// Items which do not fit end up in the result's unpacked items, this is not an error.
    fn pack(
        &self,
        container: &Container,
        items: &[Item],
        ctx: &mut SolveCtx,
    ) -> Result<PackingResult>;
}

/// Everything a strategy run needs besides its input.
#[derive(Debug)]
pub struct SolveCtx {
    /// SmallRng is a fast, non-cryptographic PRNG <https://rust-random.github.io/book/guide-rngs.html>
    pub rng: SmallRng,
    pub cancel: CancelToken,
    pub progress: Progress,
}

impl SolveCtx {
    pub fn new(rng: SmallRng, cancel: CancelToken, progress: Progress) -> Self {
        SolveCtx {
            rng,
            cancel,
            progress,
        }
    }

    /// Seeded when a seed is given, entropy based otherwise.
    pub fn from_seed(seed: Option<u64>, cancel: CancelToken, progress: Progress) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self::new(rng, cancel, progress)
    }

    /// Restarts the rng as if the context had just been created with `seed`.
    /// Without a seed, a fresh generator is forked off the current one.
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut self.rng),
        };
    }
}

/// Indices of `items` sorted by descending volume. Ties keep their input order.
pub fn volume_descending(items: &[Item]) -> Vec<usize> {
    (0..items.len())
        .sorted_by_key(|&i| Reverse(OrderedFloat(items[i].volume())))
        .collect()
}
