use std::time::Instant;

use anyhow::Result;
use boxpack::entities::{Container, Item, Layout, PackingResult};
use boxpack::search::GridSearch;
use log::{debug, info};
use ordered_float::NotNan;
use rand::Rng;
use rand::seq::SliceRandom;
use thousands::Separable;

use crate::opt::decoder::pack_sequence;
use crate::opt::{Algorithm, SolveCtx, Strategy};

pub const POPULATION_SIZE: usize = 20;
/// Share of the population carried over unchanged to the next generation
pub const ELITE_FRACTION: f64 = 0.2;
pub const TOURNAMENT_SIZE: usize = 3;

/// Genetic algorithm over item orderings.
///
/// A chromosome is a permutation of item indices, decoded with the first-fit orientation search.
/// Its fitness is the utilization of the decoded packing.
pub struct GeneticAlgorithm {
    pub grid_resolution: f64,
    pub generations: usize,
    /// Probability of a random swap in a newly created child
    pub mutation_rate: f64,
}

#[derive(Clone, Debug)]
struct Individual {
    chromosome: Vec<usize>,
    fitness: Option<NotNan<f64>>,
}

impl Individual {
    fn new(chromosome: Vec<usize>) -> Self {
        Individual {
            chromosome,
            fitness: None,
        }
    }

    fn fitness(&self) -> NotNan<f64> {
        self.fitness.expect("individual not evaluated")
    }
}

impl Strategy for GeneticAlgorithm {
    fn name(&self) -> &'static str {
        Algorithm::Genetic.display_name()
    }

    fn pack(
        &self,
        container: &Container,
        items: &[Item],
        ctx: &mut SolveCtx,
    ) -> Result<PackingResult> {
        let start = Instant::now();
        ctx.progress.report(0.0);
        ctx.cancel.check()?;

        let n_items = items.len();
        if n_items == 0 {
            ctx.progress.report(1.0);
            return Ok(Layout::new(container.clone()).into_result(vec![]));
        }

        let mut search = GridSearch::new(self.grid_resolution, &ctx.cancel);
        let rng = &mut ctx.rng;

        let mut population = (0..POPULATION_SIZE)
            .map(|_| {
                let mut chromosome = (0..n_items).collect::<Vec<_>>();
                chromosome.shuffle(rng);
                Individual::new(chromosome)
            })
            .collect::<Vec<_>>();

        let n_elites = (POPULATION_SIZE as f64 * ELITE_FRACTION) as usize;

        for gen_idx in 0..self.generations {
            evaluate(&mut population, &mut search, container, items)?;
            // stable, equally fit individuals keep their relative order
            population.sort_by(|a, b| b.fitness().cmp(&a.fitness()));
            debug!(
                "[GA] generation {}/{}: best {:.3}%",
                gen_idx + 1,
                self.generations,
                population[0].fitness()
            );

            population = self.next_generation(&population, n_elites, rng);

            ctx.progress
                .report((gen_idx + 1) as f64 / self.generations as f64);
        }

        evaluate(&mut population, &mut search, container, items)?;
        let fittest = population
            .iter()
            .reduce(|best, ind| match ind.fitness() > best.fitness() {
                true => ind,
                false => best,
            })
            .expect("population is never empty");
        let result = pack_sequence(&mut search, container, items, &fittest.chromosome)?;

        info!(
            "[GA] {} generations finished in {:.3}ms, {:.3}% utilization ({} positions evaluated)",
            self.generations,
            start.elapsed().as_secs_f64() * 1000.0,
            result.utilization,
            search.n_evaluated.separate_with_commas()
        );
        ctx.progress.report(1.0);
        Ok(result)
    }
}

impl GeneticAlgorithm {
    /// Breeds the successor of a population sorted fittest first.
    /// The `n_elites` fittest individuals are carried over unchanged, fitness included.
    fn next_generation(
        &self,
        population: &[Individual],
        n_elites: usize,
        rng: &mut impl Rng,
    ) -> Vec<Individual> {
        let mut next_gen = population[..n_elites].to_vec();
        while next_gen.len() < population.len() {
            let parent_1 = tournament(population, rng);
            let parent_2 = tournament(population, rng);
            let mut child = crossover(&parent_1.chromosome, &parent_2.chromosome, rng);
            if rng.random::<f64>() < self.mutation_rate {
                mutate(&mut child, rng);
            }
            next_gen.push(Individual::new(child));
        }
        next_gen
    }
}

/// Decodes every individual without a known fitness
fn evaluate(
    population: &mut [Individual],
    search: &mut GridSearch<'_>,
    container: &Container,
    items: &[Item],
) -> Result<()> {
    for ind in population.iter_mut().filter(|ind| ind.fitness.is_none()) {
        let result = pack_sequence(search, container, items, &ind.chromosome)?;
        ind.fitness = Some(NotNan::new(result.utilization)?);
    }
    Ok(())
}

/// Fittest of [`TOURNAMENT_SIZE`] individuals drawn at random (with replacement)
fn tournament<'a>(population: &'a [Individual], rng: &mut impl Rng) -> &'a Individual {
    let mut winner = &population[rng.random_range(0..population.len())];
    for _ in 1..TOURNAMENT_SIZE {
        let contender = &population[rng.random_range(0..population.len())];
        if contender.fitness() > winner.fitness() {
            winner = contender;
        }
    }
    winner
}

/// Order crossover: the genes of `parent_1` up to a random cut point,
/// followed by the remaining genes in the order in which they appear in `parent_2`.
fn crossover(parent_1: &[usize], parent_2: &[usize], rng: &mut impl Rng) -> Vec<usize> {
    let cut = rng.random_range(0..parent_1.len());
    let mut present = vec![false; parent_1.len()];
    let mut child = Vec::with_capacity(parent_1.len());
    for &gene in &parent_1[..cut] {
        present[gene] = true;
        child.push(gene);
    }
    child.extend(parent_2.iter().filter(|&&gene| !present[gene]));
    child
}

/// Swaps two randomly chosen genes
fn mutate(chromosome: &mut [usize], rng: &mut impl Rng) {
    let i = rng.random_range(0..chromosome.len());
    let j = rng.random_range(0..chromosome.len());
    chromosome.swap(i, j);
}
