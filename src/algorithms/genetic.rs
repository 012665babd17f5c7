// Genetic search over delivery permutations

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

use crate::algorithms::fitness::FitnessEvaluator;
use crate::algorithms::{Evolution, RouteSolver};
use crate::config::OptimizerConfig;
use crate::error::EngineError;
use crate::models::DeliveryIndex;

/// A candidate visiting order together with its cost
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    /// Permutation of `0..n` delivery indices; the depot is implicit at both ends
    pub genome: Vec<DeliveryIndex>,
    pub cost: f64,
}

/// Permutation-preserving genetic algorithm with elitism and best-ever tracking
#[derive(Debug, Clone)]
pub struct GeneticSolver {
    config: OptimizerConfig,
    cancellation: Option<Arc<AtomicBool>>,
}

impl GeneticSolver {
    /// Creates a solver, rejecting configurations the operators cannot run with
    pub fn new(config: OptimizerConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            cancellation: None,
        })
    }

    /// Stops the search at the next generation boundary once `flag` is set
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Runs the search and returns the best individual seen in any generation
    #[instrument(level = "debug", skip_all, fields(deliveries = evaluator.delivery_count(), population = self.config.population_size))]
    pub fn evolve(&self, evaluator: &FitnessEvaluator<'_>) -> Evolution {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let started = Instant::now();

        let genomes = random_population(
            &mut rng,
            evaluator.delivery_count(),
            self.population_size(),
        );
        let mut population = evaluate_population(evaluator, genomes, Vec::new());
        let mut best = population[0].clone();
        let mut generations = 0;
        let mut stopped_early = false;

        while generations < self.config.max_generations {
            if self.should_stop(started) {
                stopped_early = true;
                break;
            }

            let (elites, offspring) = self.breed(&mut rng, &population);
            population = evaluate_population(evaluator, offspring, elites);
            generations += 1;

            if population[0].cost < best.cost {
                best = population[0].clone();
                debug!(generation = generations, cost = best.cost, "new best route");
            }
        }

        debug!(
            generations,
            stopped_early,
            cost = best.cost,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "evolution finished"
        );

        Evolution {
            best,
            generations,
            stopped_early,
        }
    }

    fn population_size(&self) -> usize {
        self.config.population_size.max(2)
    }

    fn should_stop(&self, started: Instant) -> bool {
        let cancelled = self
            .cancellation
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        let timed_out = self
            .config
            .time_limit()
            .is_some_and(|limit| started.elapsed() >= limit);

        cancelled || timed_out
    }

    /// Produces the next generation from a population sorted by ascending cost:
    /// the elites are kept as they are, the remaining slots are filled with offspring
    fn breed<R: Rng>(
        &self,
        rng: &mut R,
        population: &[Individual],
    ) -> (Vec<Individual>, Vec<Vec<DeliveryIndex>>) {
        let size = self.population_size();
        let elite_count = self.config.elite_count.clamp(1, size - 1);
        let elites = population[..elite_count.min(population.len())].to_vec();

        let needed = size - elites.len();
        let mut offspring = Vec::with_capacity(needed);

        while offspring.len() < needed {
            let lhs = tournament(rng, population, self.config.tournament_size);
            let rhs = tournament(rng, population, self.config.tournament_size);

            let (first, second) = if rng.gen_bool(self.config.crossover_probability) {
                partially_matched_crossover(rng, &lhs.genome, &rhs.genome)
            } else {
                (lhs.genome.clone(), rhs.genome.clone())
            };

            for mut child in [first, second] {
                if offspring.len() == needed {
                    break;
                }
                if rng.gen_bool(self.config.mutation_probability) {
                    swap_mutation(rng, &mut child);
                }
                offspring.push(child);
            }
        }

        (elites, offspring)
    }
}

impl RouteSolver for GeneticSolver {
    fn solve(&self, evaluator: &FitnessEvaluator<'_>) -> Evolution {
        self.evolve(evaluator)
    }
}

/// Independent uniformly random permutations of `0..genome_length`
pub(crate) fn random_population<R: Rng>(
    rng: &mut R,
    genome_length: usize,
    size: usize,
) -> Vec<Vec<DeliveryIndex>> {
    (0..size)
        .map(|_| {
            let mut genome: Vec<DeliveryIndex> = (0..genome_length).collect();
            genome.shuffle(rng);
            genome
        })
        .collect()
}

/// Scores new genomes in parallel and merges them with already scored individuals,
/// sorted by ascending cost
fn evaluate_population(
    evaluator: &FitnessEvaluator<'_>,
    genomes: Vec<Vec<DeliveryIndex>>,
    mut scored: Vec<Individual>,
) -> Vec<Individual> {
    let evaluated: Vec<Individual> = genomes
        .into_par_iter()
        .map(|genome| {
            let cost = evaluator.cost(&genome);
            Individual { genome, cost }
        })
        .collect();

    scored.extend(evaluated);
    scored.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    scored
}

/// Picks `size` random contestants and returns the cheapest one
pub(crate) fn tournament<'p, R: Rng>(
    rng: &mut R,
    population: &'p [Individual],
    size: usize,
) -> &'p Individual {
    (0..size.max(1))
        .map(|_| &population[rng.gen_range(0..population.len())])
        .min_by(|a, b| a.cost.total_cmp(&b.cost))
        .unwrap_or(&population[0])
}

/// Partially matched crossover (PMX). Both children are permutations of the parents' genes.
pub(crate) fn partially_matched_crossover<R: Rng>(
    rng: &mut R,
    lhs: &[DeliveryIndex],
    rhs: &[DeliveryIndex],
) -> (Vec<DeliveryIndex>, Vec<DeliveryIndex>) {
    let len = lhs.len();
    if len < 2 {
        return (lhs.to_vec(), rhs.to_vec());
    }

    let mut start = rng.gen_range(0..len);
    let mut end = rng.gen_range(0..len);
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    (
        pmx_child(lhs, rhs, start, end + 1),
        pmx_child(rhs, lhs, start, end + 1),
    )
}

/// Child keeps `donor[start..end]` and fills the rest from `other`, following the
/// segment mapping for genes the segment already holds
fn pmx_child(
    donor: &[DeliveryIndex],
    other: &[DeliveryIndex],
    start: usize,
    end: usize,
) -> Vec<DeliveryIndex> {
    let len = donor.len();
    let mut child = donor.to_vec();
    // gene -> position inside the copied segment
    let mut segment_position = vec![None; len];
    for (position, &gene) in donor.iter().enumerate().take(end).skip(start) {
        segment_position[gene] = Some(position);
    }

    for position in (0..start).chain(end..len) {
        let mut gene = other[position];
        while let Some(mapped) = segment_position[gene] {
            gene = other[mapped];
        }
        child[position] = gene;
    }

    child
}

/// Swaps two distinct positions of the genome
pub(crate) fn swap_mutation<R: Rng>(rng: &mut R, genome: &mut [DeliveryIndex]) {
    let len = genome.len();
    if len < 2 {
        return;
    }

    let i = rng.gen_range(0..len);
    let mut j = rng.gen_range(0..len - 1);
    if j >= i {
        j += 1;
    }
    genome.swap(i, j);
}
