//! Continuous mountain car.
//!
//! An underpowered car in a valley has to rock back and forth to build enough momentum
//! to reach the flag on the right hill. Reaching the goal pays `+100` and ends the
//! episode; every step costs `0.1·u²`. Episodes are also cut at
//! [`MountainCar::HORIZON`] steps.

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{Environment, EnvironmentError, Step, check_action};

#[derive(Debug, Clone, Copy, PartialEq)]
struct CarState {
    position: f32,
    velocity: f32,
}

#[derive(Debug, Clone)]
pub struct MountainCar {
    seed: u64,
    state: Option<CarState>,
    elapsed: usize,
    render: bool,
}

impl MountainCar {
    pub const ID: &'static str = "MountainCarContinuous-v0";
    pub const HORIZON: usize = 999;

    const MIN_POSITION: f32 = -1.2;
    const MAX_POSITION: f32 = 0.6;
    const MAX_SPEED: f32 = 0.07;
    const GOAL_POSITION: f32 = 0.45;
    const POWER: f32 = 0.0015;
    const GOAL_REWARD: f32 = 100.0;

    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            state: None,
            elapsed: 0,
            render: false,
        }
    }

    fn render_frame(&self, state: CarState) {
        const WIDTH: usize = 40;
        let span = Self::MAX_POSITION - Self::MIN_POSITION;
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let column = (((state.position - Self::MIN_POSITION) / span) * (WIDTH - 1) as f32)
            .round()
            .clamp(0.0, (WIDTH - 1) as f32) as usize;
        let mut track = vec!['-'; WIDTH];
        track[WIDTH - 1] = '|';
        track[column] = 'o';
        eprintln!(
            "[{}] t={:3} {} v={:+.4}",
            Self::ID,
            self.elapsed,
            track.into_iter().collect::<String>(),
            state.velocity
        );
    }
}

impl Environment for MountainCar {
    fn id(&self) -> &str {
        Self::ID
    }

    fn observation_size(&self) -> usize {
        2
    }

    fn action_size(&self) -> usize {
        1
    }

    fn reset(&mut self) -> Result<Vec<f32>, EnvironmentError> {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        let state = CarState {
            position: rng.random_range(-0.6..-0.4),
            velocity: 0.0,
        };
        self.state = Some(state);
        self.elapsed = 0;
        tracing::trace!(seed = self.seed, position = state.position, "episode reset");
        Ok(vec![state.position, state.velocity])
    }

    fn step(&mut self, action: &[f32]) -> Result<Step, EnvironmentError> {
        check_action(action, self.action_size())?;
        let CarState { position, velocity } = self.state.ok_or(EnvironmentError::NotReset)?;

        let force = action[0].clamp(-1.0, 1.0);
        let mut velocity = (velocity + force * Self::POWER - 0.0025 * (3.0 * position).cos())
            .clamp(-Self::MAX_SPEED, Self::MAX_SPEED);
        let position = (position + velocity).clamp(Self::MIN_POSITION, Self::MAX_POSITION);
        if position <= Self::MIN_POSITION && velocity < 0.0 {
            velocity = 0.0;
        }
        if !position.is_finite() || !velocity.is_finite() {
            return Err(EnvironmentError::NonFiniteState);
        }

        let state = CarState { position, velocity };
        self.state = Some(state);
        self.elapsed += 1;

        let reached_goal = position >= Self::GOAL_POSITION && velocity >= 0.0;
        let mut reward = -0.1 * force.powi(2);
        if reached_goal {
            reward += Self::GOAL_REWARD;
        }

        if self.render {
            self.render_frame(state);
        }

        Ok(Step::new(
            vec![position, velocity],
            reward,
            reached_goal || self.elapsed >= Self::HORIZON,
        )
        .with_info("force", force))
    }

    fn set_render(&mut self, enabled: bool) {
        self.render = enabled;
    }
}
