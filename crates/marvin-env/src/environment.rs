use std::{collections::BTreeMap, fmt};

/// Errors reported by an environment while resetting or stepping.
///
/// Any of these aborts the rollout that triggered it.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EnvironmentError {
    #[display("expected action of size {expected}, got {actual}")]
    ActionSize { expected: usize, actual: usize },
    #[display("expected observation of size {expected}, got {actual}")]
    ObservationSize { expected: usize, actual: usize },
    #[display("action contains a non-finite value")]
    NonFiniteAction,
    #[display("simulation state became non-finite")]
    NonFiniteState,
    #[display("environment returned non-finite reward {reward}")]
    NonFiniteReward { reward: f32 },
    #[display("step called before reset")]
    NotReset,
    #[display("simulation backend failure: {message}")]
    Backend { message: String },
}

/// Diagnostic values attached to a step. Never interpreted by the trainer.
pub type StepInfo = BTreeMap<&'static str, f32>;

/// Outcome of a single [`Environment::step`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

impl Step {
    #[must_use]
    pub fn new(observation: Vec<f32>, reward: f32, done: bool) -> Self {
        Self {
            observation,
            reward,
            done,
            info: StepInfo::new(),
        }
    }

    #[must_use]
    pub fn with_info(mut self, key: &'static str, value: f32) -> Self {
        self.info.insert(key, value);
        self
    }
}

/// A single-episode simulation a policy can be rolled out against.
///
/// Implementations hold per-episode state; [`reset`](Self::reset) must be called
/// before the first [`step`](Self::step) of every episode.
pub trait Environment: fmt::Debug {
    /// Identifier such as `Pendulum-v1`.
    fn id(&self) -> &str;

    /// Length of every observation vector.
    fn observation_size(&self) -> usize;

    /// Length of the action vector accepted by [`step`](Self::step).
    fn action_size(&self) -> usize;

    /// Starts a new episode and returns its initial observation.
    fn reset(&mut self) -> Result<Vec<f32>, EnvironmentError>;

    /// Advances the episode by one action.
    fn step(&mut self, action: &[f32]) -> Result<Step, EnvironmentError>;

    /// Enables or disables visual output for subsequent steps.
    fn set_render(&mut self, enabled: bool);
}

impl<E> Environment for Box<E>
where
    E: Environment + ?Sized,
{
    fn id(&self) -> &str {
        (**self).id()
    }

    fn observation_size(&self) -> usize {
        (**self).observation_size()
    }

    fn action_size(&self) -> usize {
        (**self).action_size()
    }

    fn reset(&mut self) -> Result<Vec<f32>, EnvironmentError> {
        (**self).reset()
    }

    fn step(&mut self, action: &[f32]) -> Result<Step, EnvironmentError> {
        (**self).step(action)
    }

    fn set_render(&mut self, enabled: bool) {
        (**self).set_render(enabled);
    }
}
