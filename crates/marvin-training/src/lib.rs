//! Neuro-evolution of fixed-topology controller networks.
//!
//! This crate trains feed-forward networks to act in a [`marvin_env::Environment`] by
//! evolving their weights. No gradients are computed: networks are scored by the total
//! reward they collect in one episode, and the next generation is bred from the winner.
//!
//! # How Training Works
//!
//! 1. **Initialization** - Build a population of networks with Gaussian random weights
//! 2. **Evaluation** - Each network plays one episode; its total reward is its fitness
//! 3. **Selection** - The network with the highest fitness wins the generation
//! 4. **Archiving** - A frozen copy of the winner is appended to the generation archive
//! 5. **Reproduction** - Every member of the next generation is a mutated copy of the winner
//! 6. **Repeat** - Continue for the configured number of generations
//!
//! This is a (1, λ) evolution strategy. There is no crossover, and the parent itself does
//! not survive into the next generation, so the best fitness of a run is not guaranteed
//! to increase monotonically. The archive keeps every winner so nothing is lost.
//!
//! # Architecture
//!
//! ```text
//! TrainingConfig
//!     ↓ validated by
//! Trainer ──────────────> GenerationReporter (per-generation statistics)
//!     ↓ drives
//! Population
//!     ↓ evaluates each Genome through
//! Rollout ──────────────> Environment (marvin-env)
//!     ↓ produces
//! Fitness
//!     ↓ winner recorded in
//! GenerationArchive ────> ArchiveStore (save / load / replay)
//! ```
//!
//! # Network Layout
//!
//! A [`genome::Genome`] stores its weights as one flat vector, layer by layer. Each
//! neuron owns `fan_in + 1` consecutive values: its input weights followed by its bias.
//! All layers, including the output layer, use `tanh`, so actions are in `(-1, 1)`.
//!
//! # Reproducibility
//!
//! All randomness of a run flows from a single seeded [`rand_pcg::Pcg32`]. Combined with
//! deterministic environments, the same configuration and seed produce the same
//! generation statistics and the same archive.

pub mod archive;
pub mod config;
pub mod error;
pub mod genome;
pub mod persistence;
pub mod population;
pub mod report;
pub mod rollout;
pub mod stats;
pub mod trainer;
pub mod weights;

#[cfg(test)]
mod testing;
