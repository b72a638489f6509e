//! The generation loop.
//!
//! [`Trainer`] owns everything a training run needs: the configuration, the environment,
//! the population, the archive and a seeded random number generator. It moves through
//! the states
//!
//! ```text
//! new() ──> Running { generation: 0 } ──> ... ──> Running { generation: G-1 } ──> Done
//!                      │                                  │
//!                      └──────── environment error ───────┴──> Failed { generation }
//! ```
//!
//! Construction validates the configuration and builds the initial population, so a
//! trainer that exists is always ready to run. Each call to
//! [`Trainer::step_generation`] evaluates the population, archives a frozen copy of the
//! winner, reproduces the population from that copy and returns the generation's
//! statistics. Once `Done`, the archive can be persisted and replayed. An environment
//! error is fatal: the trainer moves to `Failed` and refuses to continue.

use chrono::Utc;
use marvin_env::Environment;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    archive::GenerationArchive,
    config::TrainingConfig,
    error::TrainingError,
    genome::Mutation,
    persistence::{ArchiveSnapshot, ArchiveStore},
    population::Population,
    report::{GenerationReport, GenerationReporter},
    rollout::Episode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TrainerState {
    Running { generation: usize },
    Done,
    Failed { generation: usize },
}

#[derive(Debug)]
pub struct Trainer<E> {
    config: TrainingConfig,
    environment: E,
    population: Population,
    archive: GenerationArchive,
    mutation: Mutation,
    seed: u64,
    rng: Pcg32,
    state: TrainerState,
}

impl<E> Trainer<E>
where
    E: Environment,
{
    /// Validates `config` and builds a random population sized for `environment`.
    pub fn new(config: TrainingConfig, mut environment: E) -> Result<Self, TrainingError> {
        config.validate()?;
        let mutation = config.mutation()?;
        let shape = config.network_shape(environment.observation_size(), environment.action_size())?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg32::seed_from_u64(seed);
        let population = Population::random(shape, config.population_size, &mut rng)?;
        environment.set_render(config.render);

        tracing::info!(
            environment = environment.id(),
            seed,
            population = config.population_size,
            generations = config.generations,
            weights = population.shape().weight_count(),
            "initialized training"
        );

        Ok(Self {
            config,
            environment,
            population,
            archive: GenerationArchive::new(),
            mutation,
            seed,
            rng,
            state: TrainerState::Running { generation: 0 },
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Seed of the trainer's generator; pass it back through the config to reproduce a run.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn state(&self) -> TrainerState {
        self.state
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn archive(&self) -> &GenerationArchive {
        &self.archive
    }

    #[must_use]
    pub fn environment(&self) -> &E {
        &self.environment
    }

    /// Runs one generation: evaluate, archive the winner, reproduce from it.
    ///
    /// An environment failure aborts the run: the failed generation is not archived and
    /// every later call fails.
    pub fn step_generation(&mut self) -> Result<GenerationReport, TrainingError> {
        let generation = match self.state {
            TrainerState::Running { generation } => generation,
            TrainerState::Done => {
                return Err(TrainingError::Finished {
                    generations: self.config.generations,
                });
            }
            TrainerState::Failed { generation } => {
                return Err(TrainingError::Aborted { generation });
            }
        };

        let stats = match self
            .population
            .evaluate_generation(&mut self.environment, self.config.max_steps)
        {
            Ok(stats) => stats,
            Err(e) => {
                self.state = TrainerState::Failed { generation };
                tracing::warn!(generation, genome = e.genome, "training aborted");
                return Err(TrainingError::Environment {
                    generation,
                    genome: e.genome,
                    source: e.source,
                });
            }
        };
        let report = GenerationReport::new(generation, &stats);
        let elite = self.archive.record_best(stats.best);
        self.population
            .reproduce(elite, self.mutation, &mut self.rng);

        tracing::debug!(
            generation,
            min = report.fitness.min,
            mean = report.fitness.mean,
            max = report.fitness.max,
            best = report.best_index,
            "generation evaluated"
        );

        self.state = if generation + 1 < self.config.generations {
            TrainerState::Running {
                generation: generation + 1,
            }
        } else {
            TrainerState::Done
        };
        Ok(report)
    }

    /// Runs every remaining generation, reporting each one.
    ///
    /// Fails immediately on a trainer that was aborted earlier.
    pub fn run<R>(&mut self, reporter: &mut R) -> Result<&GenerationArchive, TrainingError>
    where
        R: GenerationReporter + ?Sized,
    {
        while !self.state.is_done() {
            let report = self.step_generation()?;
            reporter.report(&report);
        }
        if let Some((generation, best)) = self.archive.best_overall() {
            tracing::info!(
                generation,
                fitness = best.fitness(),
                "training finished"
            );
        }
        Ok(&self.archive)
    }

    /// The archive together with the conditions needed to replay it.
    #[must_use]
    pub fn snapshot(&self) -> ArchiveSnapshot {
        ArchiveSnapshot {
            environment: self.environment.id().to_owned(),
            environment_seed: self.config.environment_seed,
            max_steps: self.config.max_steps,
            saved_at: Utc::now(),
            generations: self.archive.clone(),
        }
    }

    fn ensure_done(&self) -> Result<(), TrainingError> {
        match self.state {
            TrainerState::Done => Ok(()),
            TrainerState::Running { .. } => Err(TrainingError::NotFinished),
            TrainerState::Failed { generation } => Err(TrainingError::Aborted { generation }),
        }
    }

    /// Saves the archive of a finished run.
    pub fn persist<S>(&self, store: &S) -> Result<(), TrainingError>
    where
        S: ArchiveStore + ?Sized,
    {
        self.ensure_done()?;
        store
            .save(&self.snapshot())
            .map_err(|source| TrainingError::Persistence { source })
    }

    /// Replays every archived genome of a finished run with rendering enabled.
    pub fn replay(&mut self) -> Result<Vec<Episode>, TrainingError> {
        self.ensure_done()?;
        self.environment.set_render(true);
        let result = self
            .archive
            .replay(&mut self.environment, self.config.max_steps);
        self.environment.set_render(self.config.render);
        result.map_err(|source| TrainingError::Replay { source })
    }
}
