//! Population lifecycle and the (1, λ) reproduction policy.
//!
//! # Algorithm Overview
//!
//! Each generation goes through two steps:
//!
//! 1. **Evaluate** - [`Population::evaluate_generation`] plays one episode per genome, in
//!    index order, and records the total reward as that genome's fitness
//! 2. **Reproduce** - [`Population::reproduce`] replaces every member with a mutated
//!    child of a single elite parent (normally the fittest genome just evaluated)
//!
//! This is a (1, λ) evolution strategy: one parent, λ = population size children, no
//! crossover. The parent itself is not carried over, so the best fitness of a generation
//! can be lower than the one before it.
//!
//! # Determinism
//!
//! Randomness only enters through the generator passed by the caller. With a seeded
//! generator and a deterministic environment, evaluation statistics and the weights of
//! the next generation are fully reproducible.

use marvin_env::Environment;
use rand::Rng;

use crate::{
    error::{ConfigError, EvaluationError},
    genome::{Genome, Mutation, NetworkShape},
    rollout::Rollout,
    stats::FitnessSummary,
};

/// Fitness statistics of one evaluated generation.
#[derive(Debug, Clone, Copy)]
pub struct FitnessStats<'a> {
    pub summary: FitnessSummary,
    /// Index of the fittest genome. Ties go to the lowest index.
    pub best_index: usize,
    pub best: &'a Genome,
}

/// A fixed-size, ordered collection of genomes sharing one network shape.
#[derive(Debug, Clone)]
pub struct Population {
    shape: NetworkShape,
    genomes: Vec<Genome>,
}

impl Population {
    /// Creates `size` genomes with random weights.
    pub fn random<R>(shape: NetworkShape, size: usize, rng: &mut R) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        if size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        let genomes = (0..size)
            .map(|_| Genome::random(shape.clone(), rng))
            .collect();
        Ok(Self { shape, genomes })
    }

    /// Wraps existing genomes, which must be non-empty and share one shape.
    pub fn from_genomes(genomes: Vec<Genome>) -> Result<Self, ConfigError> {
        let shape = genomes
            .first()
            .ok_or(ConfigError::EmptyPopulation)?
            .shape()
            .clone();
        if let Some(index) = genomes.iter().position(|g| *g.shape() != shape) {
            return Err(ConfigError::ShapeMismatch { index });
        }
        Ok(Self { shape, genomes })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.genomes.len()
    }

    #[must_use]
    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }

    #[must_use]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Plays one episode per genome and summarizes the resulting fitness values.
    ///
    /// Genomes are evaluated one after another in index order against the same
    /// environment. The first environment failure aborts the generation.
    pub fn evaluate_generation<E>(
        &mut self,
        environment: &mut E,
        max_steps: usize,
    ) -> Result<FitnessStats<'_>, EvaluationError>
    where
        E: Environment + ?Sized,
    {
        let rollout = Rollout::new(max_steps);
        for (index, genome) in self.genomes.iter_mut().enumerate() {
            rollout
                .run(genome, environment)
                .map_err(|source| EvaluationError {
                    genome: index,
                    source,
                })?;
        }

        let fitness = |g: &Genome| g.fitness().unwrap_or(f32::NEG_INFINITY);
        let mut best_index = 0;
        for (index, genome) in self.genomes.iter().enumerate().skip(1) {
            if fitness(genome) > fitness(&self.genomes[best_index]) {
                best_index = index;
            }
        }
        let Some(summary) = FitnessSummary::new(self.genomes.iter().map(fitness)) else {
            unreachable!("population is never empty");
        };

        Ok(FitnessStats {
            summary,
            best_index,
            best: &self.genomes[best_index],
        })
    }

    /// Replaces every member with an independently mutated child of `elite`.
    ///
    /// # Panics
    ///
    /// Panics if `elite` has a different network shape than the population.
    pub fn reproduce<R>(&mut self, elite: &Genome, mutation: Mutation, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        assert_eq!(
            elite.shape(),
            &self.shape,
            "elite genome does not fit the population's network shape"
        );
        for genome in &mut self.genomes {
            *genome = elite.mutate(mutation, rng);
        }
    }
}
