//! Environment adapters for training continuous-control policies.
//!
//! This crate defines the [`Environment`] contract the training engine drives, plus a
//! couple of small built-in control tasks so that a full training run can be executed
//! without an external simulator.
//!
//! # The Contract
//!
//! An environment is a stateful, single-episode simulation:
//!
//! 1. [`Environment::reset`] starts a new episode and returns the initial observation
//! 2. [`Environment::step`] applies an action and returns a [`Step`]
//!    (next observation, reward, done flag, diagnostic info)
//! 3. [`Environment::observation_size`] / [`Environment::action_size`] describe the
//!    vector dimensions the policy must produce and consume
//! 4. [`Environment::set_render`] toggles visual output
//!
//! Actions are expected in `[-1, 1]` per component; each environment scales them to its
//! own physical range.
//!
//! # Built-in Environments
//!
//! | Id                         | Observation                   | Action       |
//! |----------------------------|-------------------------------|--------------|
//! | `Pendulum-v1`              | `[cos θ, sin θ, θ̇]`           | torque       |
//! | `MountainCarContinuous-v0` | `[position, velocity]`        | force        |
//!
//! Use [`EnvironmentKind`] to look an environment up by id:
//!
//! ```
//! use marvin_env::{Environment as _, EnvironmentKind};
//!
//! let kind: EnvironmentKind = "Pendulum-v1".parse().unwrap();
//! let mut env = kind.make(42);
//! let observation = env.reset().unwrap();
//! assert_eq!(observation.len(), env.observation_size());
//! ```
//!
//! # Determinism
//!
//! Every built-in environment draws its initial state from a PCG generator that is
//! reseeded with the environment seed on each reset. Two episodes driven by the same
//! actions therefore produce the same rewards, which is what makes archived controllers
//! replayable.

pub use self::{environment::*, registry::*};

pub mod environment;
pub mod mountain_car;
pub mod pendulum;
pub mod registry;

pub(crate) fn check_action(action: &[f32], expected: usize) -> Result<(), EnvironmentError> {
    if action.len() != expected {
        return Err(EnvironmentError::ActionSize {
            expected,
            actual: action.len(),
        });
    }
    if action.iter().any(|a| !a.is_finite()) {
        return Err(EnvironmentError::NonFiniteAction);
    }
    Ok(())
}
