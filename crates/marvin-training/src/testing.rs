//! Small deterministic environments for unit tests.

use marvin_env::{Environment, EnvironmentError, Step};

/// Pays `step index + offset` on every step; observations are `[t, 1]`.
#[derive(Debug, Default)]
pub(crate) struct CountingEnvironment {
    episode_len: Option<usize>,
    reward_offset: f32,
    t: usize,
    pub(crate) resets: usize,
    pub(crate) step_calls: usize,
    pub(crate) render: bool,
}

impl CountingEnvironment {
    /// Ends every episode after `episode_len` steps.
    pub(crate) fn new(episode_len: usize) -> Self {
        Self {
            episode_len: Some(episode_len),
            ..Self::default()
        }
    }

    /// Never ends an episode on its own.
    pub(crate) fn endless() -> Self {
        Self::default()
    }

    pub(crate) fn with_reward_offset(mut self, offset: f32) -> Self {
        self.reward_offset = offset;
        self
    }

    #[expect(clippy::cast_precision_loss)]
    fn observe(&self) -> Vec<f32> {
        vec![self.t as f32, 1.0]
    }
}

impl Environment for CountingEnvironment {
    fn id(&self) -> &str {
        "Counting-v0"
    }

    fn observation_size(&self) -> usize {
        2
    }

    fn action_size(&self) -> usize {
        1
    }

    fn reset(&mut self) -> Result<Vec<f32>, EnvironmentError> {
        self.t = 0;
        self.resets += 1;
        Ok(self.observe())
    }

    #[expect(clippy::cast_precision_loss)]
    fn step(&mut self, _action: &[f32]) -> Result<Step, EnvironmentError> {
        self.step_calls += 1;
        let reward = self.t as f32 + self.reward_offset;
        self.t += 1;
        let done = self.episode_len.is_some_and(|len| self.t >= len);
        Ok(Step::new(self.observe(), reward, done))
    }

    fn set_render(&mut self, enabled: bool) {
        self.render = enabled;
    }
}

/// Rewards actions close to a fixed target, so fitness depends on the weights.
#[derive(Debug, Default)]
pub(crate) struct TargetEnvironment {
    t: usize,
}

impl TargetEnvironment {
    const TARGET: f32 = 0.3;
    const EPISODE_LEN: usize = 10;
}

impl Environment for TargetEnvironment {
    fn id(&self) -> &str {
        "Target-v0"
    }

    fn observation_size(&self) -> usize {
        2
    }

    fn action_size(&self) -> usize {
        1
    }

    fn reset(&mut self) -> Result<Vec<f32>, EnvironmentError> {
        self.t = 0;
        Ok(vec![1.0, 0.5])
    }

    fn step(&mut self, action: &[f32]) -> Result<Step, EnvironmentError> {
        self.t += 1;
        let reward = -(action[0] - Self::TARGET).powi(2);
        Ok(Step::new(
            vec![1.0, 0.5],
            reward,
            self.t >= Self::EPISODE_LEN,
        ))
    }

    fn set_render(&mut self, _enabled: bool) {}
}

/// Fails from the `fail_at`-th step call on, counted across episodes. Never ends an
/// episode.
#[derive(Debug)]
pub(crate) struct FailingEnvironment {
    fail_at: usize,
    step_calls: usize,
    transient: bool,
}

impl FailingEnvironment {
    pub(crate) fn new(fail_at: usize) -> Self {
        Self {
            fail_at,
            step_calls: 0,
            transient: false,
        }
    }

    /// Fails only on the `fail_at`-th step call and works again afterwards.
    pub(crate) fn once(fail_at: usize) -> Self {
        Self {
            transient: true,
            ..Self::new(fail_at)
        }
    }
}

impl Environment for FailingEnvironment {
    fn id(&self) -> &str {
        "Failing-v0"
    }

    fn observation_size(&self) -> usize {
        2
    }

    fn action_size(&self) -> usize {
        1
    }

    fn reset(&mut self) -> Result<Vec<f32>, EnvironmentError> {
        Ok(vec![0.0, 0.0])
    }

    fn step(&mut self, _action: &[f32]) -> Result<Step, EnvironmentError> {
        self.step_calls += 1;
        let failing = if self.transient {
            self.step_calls == self.fail_at
        } else {
            self.step_calls >= self.fail_at
        };
        if failing {
            return Err(EnvironmentError::Backend {
                message: "simulated crash".to_owned(),
            });
        }
        Ok(Step::new(vec![0.0, 0.0], 1.0, false))
    }

    fn set_render(&mut self, _enabled: bool) {}
}
