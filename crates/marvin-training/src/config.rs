//! Training run configuration.

use std::path::PathBuf;

use marvin_env::{Environment, EnvironmentKind};
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    genome::{Mutation, NetworkShape},
};

/// Immutable parameters of a training run.
///
/// Missing fields take their [`Default`] values when deserialized, so a configuration
/// file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[expect(clippy::struct_excessive_bools)]
pub struct TrainingConfig {
    /// Id of the environment to train against.
    pub environment: String,
    /// Seed for the environment's initial states.
    pub environment_seed: u64,
    /// Step cap of a single episode.
    pub max_steps: usize,
    /// Number of generations to evolve.
    pub generations: usize,
    /// Number of genomes per generation.
    pub population_size: usize,
    /// Per-weight perturbation probability.
    pub mutation_rate: f32,
    /// Bound of a single weight perturbation.
    pub mutation_width: f32,
    /// Hidden layer sizes of the controller network.
    pub hidden_layers: Vec<usize>,
    /// Seed for population initialization and mutation; random when absent.
    pub seed: Option<u64>,
    /// Render every rollout during training.
    pub render: bool,
    /// Save the generation archive after the last generation.
    pub save_on_completion: bool,
    /// Replay the archive with rendering after the last generation.
    pub replay_on_completion: bool,
    /// Skip training and replay a previously saved archive.
    pub load_only: bool,
    /// Where the archive is saved to and loaded from.
    pub archive_path: PathBuf,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentKind::Pendulum.id().to_owned(),
            environment_seed: 0,
            max_steps: 1000,
            generations: 100,
            population_size: 420,
            mutation_rate: 0.042,
            mutation_width: 0.5,
            hidden_layers: vec![16],
            seed: None,
            render: false,
            save_on_completion: false,
            replay_on_completion: false,
            load_only: false,
            archive_path: PathBuf::from("weights.json"),
        }
    }
}

impl TrainingConfig {
    /// Checks every parameter that does not depend on the environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if self.generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        self.mutation()?;
        if let Some(index) = self.hidden_layers.iter().position(|&size| size == 0) {
            return Err(ConfigError::EmptyLayer { layer: index + 1 });
        }
        Ok(())
    }

    pub fn mutation(&self) -> Result<Mutation, ConfigError> {
        Mutation::new(self.mutation_rate, self.mutation_width)
    }

    /// Network shape mapping `observation_size` inputs to `action_size` outputs.
    pub fn network_shape(
        &self,
        observation_size: usize,
        action_size: usize,
    ) -> Result<NetworkShape, ConfigError> {
        NetworkShape::new(observation_size, self.hidden_layers.clone(), action_size)
    }

    /// Builds the configured built-in environment.
    pub fn make_environment(&self) -> Result<Box<dyn Environment>, ConfigError> {
        let kind: EnvironmentKind = self
            .environment
            .parse()
            .map_err(|source| ConfigError::UnknownEnvironment { source })?;
        Ok(kind.make(self.environment_seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.max_steps, 1000);
        assert_eq!(config.generations, 100);
        assert_eq!(config.population_size, 420);
        assert!((config.mutation_rate - 0.042).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let invalid = [
            TrainingConfig {
                population_size: 0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                max_steps: 0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                generations: 0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                mutation_rate: -0.1,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                mutation_rate: 1.01,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                mutation_width: f32::INFINITY,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                hidden_layers: vec![8, 0],
                ..TrainingConfig::default()
            },
        ];
        for config in invalid {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{"generations": 3, "seed": 9}"#).unwrap();
        assert_eq!(config.generations, 3);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.population_size, 420);
        assert_eq!(config.environment, "Pendulum-v1");
    }

    #[test]
    fn test_make_environment() {
        let env = TrainingConfig::default().make_environment().unwrap();
        assert_eq!(env.id(), "Pendulum-v1");

        let config = TrainingConfig {
            environment: "Marvin-v0".to_owned(),
            ..TrainingConfig::default()
        };
        assert!(matches!(
            config.make_environment(),
            Err(ConfigError::UnknownEnvironment { .. })
        ));
    }
}
