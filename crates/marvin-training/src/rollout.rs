//! Episode rollouts: coupling a genome to an environment.
//!
//! A rollout resets the environment, then repeatedly feeds the current observation
//! through the genome and steps the environment with the resulting action, summing the
//! rewards. It stops when the environment reports the end of the episode or when the
//! step cap is reached, whichever comes first. The cap is a hard bound: an environment
//! that never finishes is stepped exactly `max_steps` times.

use marvin_env::{Environment, EnvironmentError};

use crate::genome::Genome;

/// Result of playing one episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Episode {
    /// Sum of all rewards received.
    pub total_reward: f32,
    /// Number of `step` calls made.
    pub steps: usize,
    /// Whether the environment ended the episode (as opposed to hitting the step cap).
    pub terminated: bool,
}

/// Plays episodes of at most `max_steps` steps.
#[derive(Debug, Clone, Copy)]
pub struct Rollout {
    max_steps: usize,
}

impl Rollout {
    #[must_use]
    pub fn new(max_steps: usize) -> Self {
        Self { max_steps }
    }

    /// Plays one episode without recording anything on the genome.
    ///
    /// Fails if the environment fails, returns a NaN or infinite reward, or if its
    /// observation or action size does not fit the genome's network.
    pub fn play<E>(&self, genome: &Genome, environment: &mut E) -> Result<Episode, EnvironmentError>
    where
        E: Environment + ?Sized,
    {
        let shape = genome.shape();
        if environment.action_size() != shape.outputs() {
            return Err(EnvironmentError::ActionSize {
                expected: environment.action_size(),
                actual: shape.outputs(),
            });
        }

        let mut observation = environment.reset()?;
        let mut episode = Episode {
            total_reward: 0.0,
            steps: 0,
            terminated: false,
        };
        while episode.steps < self.max_steps {
            check_observation(&observation, shape.inputs())?;
            let action = genome.evaluate(&observation);
            let step = environment.step(&action)?;
            if !step.reward.is_finite() {
                return Err(EnvironmentError::NonFiniteReward {
                    reward: step.reward,
                });
            }
            episode.total_reward += step.reward;
            episode.steps += 1;
            if step.done {
                episode.terminated = true;
                break;
            }
            observation = step.observation;
        }
        Ok(episode)
    }

    /// Plays one episode and stores the total reward as the genome's fitness.
    pub fn run<E>(&self, genome: &mut Genome, environment: &mut E) -> Result<f32, EnvironmentError>
    where
        E: Environment + ?Sized,
    {
        let episode = self.play(genome, environment)?;
        genome.set_fitness(episode.total_reward);
        Ok(episode.total_reward)
    }
}

fn check_observation(observation: &[f32], expected: usize) -> Result<(), EnvironmentError> {
    if observation.len() == expected {
        Ok(())
    } else {
        Err(EnvironmentError::ObservationSize {
            expected,
            actual: observation.len(),
        })
    }
}
