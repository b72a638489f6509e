//! Inverted pendulum swing-up.
//!
//! A frictionless pendulum starts at a random angle and must be swung up and held
//! upright with a bounded torque. The reward is the negated cost
//!
//! ```text
//! θ² + 0.1·θ̇² + 0.001·u²
//! ```
//!
//! where θ is normalized to `[-π, π)` (0 is upright), so the best achievable return is 0.
//! Episodes end after [`Pendulum::HORIZON`] steps.

use std::f32::consts::PI;

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{Environment, EnvironmentError, Step, check_action};

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendulumState {
    theta: f32,
    theta_dot: f32,
}

#[derive(Debug, Clone)]
pub struct Pendulum {
    seed: u64,
    state: Option<PendulumState>,
    elapsed: usize,
    render: bool,
}

impl Pendulum {
    pub const ID: &'static str = "Pendulum-v1";
    pub const HORIZON: usize = 200;

    const MAX_SPEED: f32 = 8.0;
    const MAX_TORQUE: f32 = 2.0;
    const DT: f32 = 0.05;
    const GRAVITY: f32 = 10.0;
    const MASS: f32 = 1.0;
    const LENGTH: f32 = 1.0;

    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            state: None,
            elapsed: 0,
            render: false,
        }
    }

    fn observe(state: PendulumState) -> Vec<f32> {
        vec![state.theta.cos(), state.theta.sin(), state.theta_dot]
    }
}

fn normalize_angle(theta: f32) -> f32 {
    (theta + PI).rem_euclid(2.0 * PI) - PI
}

impl Environment for Pendulum {
    fn id(&self) -> &str {
        Self::ID
    }

    fn observation_size(&self) -> usize {
        3
    }

    fn action_size(&self) -> usize {
        1
    }

    fn reset(&mut self) -> Result<Vec<f32>, EnvironmentError> {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        let state = PendulumState {
            theta: rng.random_range(-PI..PI),
            theta_dot: rng.random_range(-1.0..1.0),
        };
        self.state = Some(state);
        self.elapsed = 0;
        tracing::trace!(seed = self.seed, theta = state.theta, "episode reset");
        Ok(Self::observe(state))
    }

    fn step(&mut self, action: &[f32]) -> Result<Step, EnvironmentError> {
        check_action(action, self.action_size())?;
        let PendulumState { theta, theta_dot } = self.state.ok_or(EnvironmentError::NotReset)?;

        let torque = (action[0] * Self::MAX_TORQUE).clamp(-Self::MAX_TORQUE, Self::MAX_TORQUE);
        let cost =
            normalize_angle(theta).powi(2) + 0.1 * theta_dot.powi(2) + 0.001 * torque.powi(2);

        let acceleration = 3.0 * Self::GRAVITY / (2.0 * Self::LENGTH) * theta.sin()
            + 3.0 / (Self::MASS * Self::LENGTH.powi(2)) * torque;
        let theta_dot =
            (theta_dot + acceleration * Self::DT).clamp(-Self::MAX_SPEED, Self::MAX_SPEED);
        let theta = theta + theta_dot * Self::DT;
        if !theta.is_finite() || !theta_dot.is_finite() {
            return Err(EnvironmentError::NonFiniteState);
        }

        let state = PendulumState { theta, theta_dot };
        self.state = Some(state);
        self.elapsed += 1;

        if self.render {
            eprintln!(
                "[{}] t={:3} θ={:+.3} θ̇={:+.3} u={:+.3}",
                Self::ID,
                self.elapsed,
                normalize_angle(theta),
                theta_dot,
                torque
            );
        }

        Ok(
            Step::new(Self::observe(state), -cost, self.elapsed >= Self::HORIZON)
                .with_info("torque", torque),
        )
    }

    fn set_render(&mut self, enabled: bool) {
        self.render = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_is_deterministic_per_seed() {
        let mut a = Pendulum::new(7);
        let mut b = Pendulum::new(7);
        assert_eq!(a.reset().unwrap(), b.reset().unwrap());
        // reseeded on every reset
        assert_eq!(a.reset().unwrap(), b.reset().unwrap());
    }

    #[test]
    fn test_step_before_reset_fails() {
        let mut env = Pendulum::new(0);
        assert!(matches!(env.step(&[0.0]), Err(EnvironmentError::NotReset)));
    }

    #[test]
    fn test_rejects_wrong_action_size() {
        let mut env = Pendulum::new(0);
        env.reset().unwrap();
        assert!(matches!(
            env.step(&[0.0, 1.0]),
            Err(EnvironmentError::ActionSize {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_episode_ends_at_horizon() {
        let mut env = Pendulum::new(3);
        env.reset().unwrap();
        for _ in 0..Pendulum::HORIZON - 1 {
            let step = env.step(&[0.0]).unwrap();
            assert!(!step.done);
            assert!(step.reward <= 0.0);
        }
        assert!(env.step(&[0.0]).unwrap().done);
    }

    #[test]
    fn test_normalize_angle_range() {
        for theta in [-10.0, -PI, -1.0, 0.0, 1.0, PI, 10.0] {
            let n = normalize_angle(theta);
            assert!((-PI..=PI).contains(&n), "{theta} -> {n}");
        }
        assert!(normalize_angle(2.0 * PI).abs() < 1e-5);
    }
}
