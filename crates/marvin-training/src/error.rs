//! Error types of the training engine.
//!
//! Configuration problems surface before the first generation runs. Environment
//! failures carry the generation and genome they happened in. Persistence failures
//! carry the path of the archive file.

use std::{io, path::PathBuf};

use marvin_env::{EnvironmentError, UnknownEnvironmentError};

/// Invalid training parameters or network dimensions.
///
/// Always raised before the first generation is evaluated.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be positive")]
    EmptyPopulation,
    #[display("mutation rate {rate} is outside [0, 1]")]
    MutationRateOutOfRange { rate: f32 },
    #[display("mutation width {width} must be positive and finite")]
    InvalidMutationWidth { width: f32 },
    #[display("max steps per episode must be positive")]
    ZeroMaxSteps,
    #[display("number of generations must be positive")]
    ZeroGenerations,
    #[display("layer {layer} of the network has no neurons")]
    EmptyLayer { layer: usize },
    #[display("network expects {expected} weights, got {actual}")]
    WeightCount { expected: usize, actual: usize },
    #[display("genome {index} does not share the network shape of genome 0")]
    ShapeMismatch { index: usize },
    #[display("invalid environment")]
    UnknownEnvironment { source: UnknownEnvironmentError },
}

/// A rollout failed while evaluating one member of a population.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("rollout of genome #{genome} failed")]
pub struct EvaluationError {
    pub genome: usize,
    pub source: EnvironmentError,
}

/// A rollout failed while replaying an archived genome.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("replay of the best genome of generation {generation} failed")]
pub struct ReplayError {
    pub generation: usize,
    pub source: EnvironmentError,
}

/// Failure of a training run. Every variant is fatal for the run.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TrainingError {
    #[display("invalid training configuration")]
    Config { source: ConfigError },
    #[display("environment failed in generation {generation} while evaluating genome #{genome}")]
    Environment {
        generation: usize,
        genome: usize,
        source: EnvironmentError,
    },
    #[display("replay of the generation archive failed")]
    Replay { source: ReplayError },
    #[display("training already finished after {generations} generations")]
    Finished { generations: usize },
    #[display("training was aborted by a failure in generation {generation}")]
    Aborted { generation: usize },
    #[display("training has not finished yet")]
    NotFinished,
    #[display("failed to persist the generation archive")]
    Persistence { source: PersistenceError },
}

impl From<ConfigError> for TrainingError {
    fn from(source: ConfigError) -> Self {
        Self::Config { source }
    }
}

/// Failure to save or load a generation archive.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PersistenceError {
    #[display("failed to access archive file {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to encode or decode archive file {}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("archive file {} contains no genomes", path.display())]
    EmptyArchive { path: PathBuf },
}
