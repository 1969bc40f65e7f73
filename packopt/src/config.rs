use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::opt::Algorithm;

/// Configuration of a packing run, the `parameters` object of a request.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PackConfig {
    /// Step of the placement search grid, in the caller's length unit. Smaller is more precise but slower.
    pub grid_resolution: f64,
    /// Strategy used in single mode
    pub algorithm: Algorithm,
    /// Number of generations of the genetic algorithm, also the basis of the annealing iteration count
    pub genetic_generations: usize,
    /// Probability that a child chromosome receives a random swap
    pub mutation_rate: f64,
    /// Number of copies of the container to fill, one after the other
    pub container_count: usize,
    /// Seed for the PRNG. If undefined, the metaheuristics run in non-deterministic mode using entropy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prng_seed: Option<u64>,
    pub sa: SAConfig,
}

/// Configuration of the simulated annealing cooling schedule
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SAConfig {
    pub initial_temperature: f64,
    /// Factor applied to the temperature after every iteration
    pub cooling_rate: f64,
    /// Annealing runs `genetic_generations * iterations_per_generation` iterations
    pub iterations_per_generation: usize,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            grid_resolution: 5.0,
            algorithm: Algorithm::FirstFitDecreasing,
            genetic_generations: 30,
            mutation_rate: 0.1,
            container_count: 1,
            prng_seed: None,
            sa: SAConfig::default(),
        }
    }
}

impl Default for SAConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.95,
            iterations_per_generation: 10,
        }
    }
}

impl PackConfig {
    pub fn sa_iterations(&self) -> usize {
        self.genetic_generations * self.sa.iterations_per_generation
    }

    /// Rejects parameters for which the search would not terminate or would be meaningless.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_resolution.is_finite() && self.grid_resolution > 0.0,
            "grid resolution must be a positive number, got {}",
            self.grid_resolution
        );
        ensure!(
            (0.0..=1.0).contains(&self.mutation_rate),
            "mutation rate must lie in [0, 1], got {}",
            self.mutation_rate
        );
        ensure!(
            self.sa.initial_temperature.is_finite() && self.sa.initial_temperature > 0.0,
            "initial temperature must be positive, got {}",
            self.sa.initial_temperature
        );
        ensure!(
            self.sa.cooling_rate > 0.0 && self.sa.cooling_rate < 1.0,
            "cooling rate must lie in (0, 1), got {}",
            self.sa.cooling_rate
        );
        Ok(())
    }
}
