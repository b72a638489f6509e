//! Fixed-topology feed-forward controllers.
//!
//! A [`Genome`] is a fully connected network whose topology is described by a
//! [`NetworkShape`] and whose parameters live in one flat weight vector. Evolution only
//! ever changes weight values; the shape of a genome never changes after construction.
//!
//! # Weight Layout
//!
//! Layers are stored one after another. Within a layer, each neuron owns
//! `fan_in + 1` consecutive weights: one per input followed by its bias.
//!
//! ```text
//! [ n0.w0 .. n0.w(in-1) n0.bias | n1.w0 .. n1.bias | ... ]   layer 0
//! [ ... ]                                                    layer 1
//! ```
//!
//! Every neuron, including the output layer, applies `tanh`, so actions lie in
//! `[-1, 1]` and environments scale them to their own ranges.

use std::iter;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, weights};

/// Layer sizes of a feed-forward network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkShape {
    inputs: usize,
    hidden: Vec<usize>,
    outputs: usize,
}

impl NetworkShape {
    /// Creates a shape, rejecting any layer without neurons.
    pub fn new(inputs: usize, hidden: Vec<usize>, outputs: usize) -> Result<Self, ConfigError> {
        let shape = Self {
            inputs,
            hidden,
            outputs,
        };
        shape.validate()?;
        Ok(shape)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(layer) = self.layer_sizes().position(|size| size == 0) {
            return Err(ConfigError::EmptyLayer { layer });
        }
        Ok(())
    }

    #[must_use]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    #[must_use]
    pub fn hidden(&self) -> &[usize] {
        &self.hidden
    }

    #[must_use]
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    fn layer_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        iter::once(self.inputs)
            .chain(self.hidden.iter().copied())
            .chain(iter::once(self.outputs))
    }

    /// `(fan_in, fan_out)` of every weighted layer, input side first.
    pub fn layers(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        iter::zip(self.layer_sizes(), self.layer_sizes().skip(1))
    }

    /// Number of weights (biases included) a genome of this shape carries.
    #[must_use]
    pub fn weight_count(&self) -> usize {
        self.layers()
            .map(|(fan_in, fan_out)| (fan_in + 1) * fan_out)
            .sum()
    }
}

/// Mutation parameters shared by every child of a reproduction step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mutation {
    rate: f32,
    width: f32,
}

impl Mutation {
    /// `rate` is the per-weight perturbation probability; `width` bounds each delta.
    pub fn new(rate: f32, width: f32) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::MutationRateOutOfRange { rate });
        }
        if !(width.is_finite() && width > 0.0) {
            return Err(ConfigError::InvalidMutationWidth { width });
        }
        Ok(Self { rate, width })
    }

    #[must_use]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }
}

/// A candidate controller: network weights plus the fitness of its last rollout.
///
/// `Clone` is a deep copy of the weight vector, so a clone taken for archiving is
/// unaffected by anything later done to the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GenomeRecord")]
pub struct Genome {
    shape: NetworkShape,
    weights: Vec<f32>,
    fitness: Option<f32>,
}

#[derive(Deserialize)]
struct GenomeRecord {
    shape: NetworkShape,
    weights: Vec<f32>,
    fitness: Option<f32>,
}

impl TryFrom<GenomeRecord> for Genome {
    type Error = ConfigError;

    fn try_from(record: GenomeRecord) -> Result<Self, Self::Error> {
        record.shape.validate()?;
        let mut genome = Self::from_weights(record.shape, record.weights)?;
        genome.fitness = record.fitness;
        Ok(genome)
    }
}

impl Genome {
    /// Creates a genome with every layer drawn from `N(0, 1 / (fan_in + 1))`.
    pub fn random<R>(shape: NetworkShape, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut weights = Vec::with_capacity(shape.weight_count());
        for (fan_in, fan_out) in shape.layers() {
            #[expect(clippy::cast_precision_loss)]
            let sigma = 1.0 / ((fan_in + 1) as f32).sqrt();
            weights.extend(weights::gaussian(rng, sigma, (fan_in + 1) * fan_out));
        }
        Self {
            shape,
            weights,
            fitness: None,
        }
    }

    /// Creates a genome from explicit weights.
    ///
    /// Fails if the number of weights does not match [`NetworkShape::weight_count`].
    pub fn from_weights(shape: NetworkShape, weights: Vec<f32>) -> Result<Self, ConfigError> {
        let expected = shape.weight_count();
        if weights.len() != expected {
            return Err(ConfigError::WeightCount {
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self {
            shape,
            weights,
            fitness: None,
        })
    }

    #[must_use]
    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Total reward of the last rollout, or `None` if the genome was never evaluated.
    #[must_use]
    pub fn fitness(&self) -> Option<f32> {
        self.fitness
    }

    pub(crate) fn set_fitness(&mut self, fitness: f32) {
        self.fitness = Some(fitness);
    }

    /// Computes the action for an observation.
    ///
    /// # Panics
    ///
    /// Panics if `observation.len()` differs from the shape's input count.
    #[must_use]
    pub fn evaluate(&self, observation: &[f32]) -> Vec<f32> {
        assert_eq!(
            observation.len(),
            self.shape.inputs,
            "observation size does not match network inputs"
        );
        let mut activations = observation.to_vec();
        let mut offset = 0;
        for (fan_in, fan_out) in self.shape.layers() {
            let len = (fan_in + 1) * fan_out;
            let layer = &self.weights[offset..offset + len];
            activations = layer
                .chunks_exact(fan_in + 1)
                .map(|neuron| {
                    let sum = iter::zip(&neuron[..fan_in], &activations)
                        .map(|(w, a)| w * a)
                        .sum::<f32>();
                    (sum + neuron[fan_in]).tanh()
                })
                .collect();
            offset += len;
        }
        activations
    }

    /// Returns a mutated child. The receiver is left unchanged.
    ///
    /// The child starts without a fitness value.
    #[must_use]
    pub fn mutate<R>(&self, mutation: Mutation, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut weights = self.weights.clone();
        weights::perturb(&mut weights, mutation.rate, mutation.width, rng);
        Self {
            shape: self.shape.clone(),
            weights,
            fitness: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn shape() -> NetworkShape {
        NetworkShape::new(3, vec![4, 2], 1).unwrap()
    }

    #[test]
    fn test_weight_count_includes_biases() {
        assert_eq!(shape().weight_count(), 4 * 4 + 5 * 2 + 3);
        let direct = NetworkShape::new(2, vec![], 3).unwrap();
        assert_eq!(direct.weight_count(), 9);
    }

    #[test]
    fn test_shape_rejects_empty_layers() {
        assert!(matches!(
            NetworkShape::new(0, vec![4], 1),
            Err(ConfigError::EmptyLayer { layer: 0 })
        ));
        assert!(matches!(
            NetworkShape::new(3, vec![4, 0], 1),
            Err(ConfigError::EmptyLayer { layer: 2 })
        ));
    }

    #[test]
    fn test_from_weights_checks_length() {
        let err = Genome::from_weights(shape(), vec![0.0; 5]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WeightCount {
                expected: 29,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_evaluate_hand_computed() {
        // 2 inputs -> 1 output, weights [0.5, -1.0], bias 0.25
        let shape = NetworkShape::new(2, vec![], 1).unwrap();
        let genome = Genome::from_weights(shape, vec![0.5, -1.0, 0.25]).unwrap();
        let action = genome.evaluate(&[2.0, 1.0]);
        assert_eq!(action, vec![(0.5f32 * 2.0 - 1.0 + 0.25).tanh()]);
    }

    #[test]
    fn test_evaluate_is_deterministic_and_bounded() {
        let genome = Genome::random(shape(), &mut Pcg32::seed_from_u64(9));
        let observation = [0.3, -2.0, 5.0];
        let first = genome.evaluate(&observation);
        assert_eq!(first, genome.evaluate(&observation));
        assert_eq!(first.len(), 1);
        assert!(first.iter().all(|a| (-1.0..=1.0).contains(a)));
    }

    #[test]
    #[should_panic(expected = "observation size")]
    fn test_evaluate_rejects_wrong_input_size() {
        let genome = Genome::random(shape(), &mut Pcg32::seed_from_u64(9));
        let _ = genome.evaluate(&[1.0]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut original = Genome::random(shape(), &mut rng);
        original.set_fitness(3.5);
        let snapshot = original.clone();
        assert_eq!(snapshot.weights(), original.weights());

        original = original.mutate(Mutation::new(1.0, 0.5).unwrap(), &mut rng);
        assert_ne!(snapshot.weights(), original.weights());
        assert_eq!(snapshot.fitness(), Some(3.5));
    }

    #[test]
    fn test_mutate_leaves_receiver_untouched() {
        let mut rng = Pcg32::seed_from_u64(11);
        let parent = Genome::random(shape(), &mut rng);
        let before = parent.weights().to_vec();
        let child = parent.mutate(Mutation::new(1.0, 0.5).unwrap(), &mut rng);
        assert_eq!(parent.weights(), before.as_slice());
        assert_eq!(child.weights().len(), before.len());
        assert!(iter::zip(child.weights(), &before).all(|(c, p)| c != p));
        assert_eq!(child.fitness(), None);
    }

    #[test]
    fn test_mutation_validation() {
        assert!(Mutation::new(0.0, 0.1).is_ok());
        assert!(Mutation::new(1.0, 0.1).is_ok());
        assert!(matches!(
            Mutation::new(1.5, 0.1),
            Err(ConfigError::MutationRateOutOfRange { .. })
        ));
        assert!(matches!(
            Mutation::new(f32::NAN, 0.1),
            Err(ConfigError::MutationRateOutOfRange { .. })
        ));
        assert!(matches!(
            Mutation::new(0.5, 0.0),
            Err(ConfigError::InvalidMutationWidth { .. })
        ));
    }

    #[test]
    fn test_serde_rejects_inconsistent_weights() {
        let genome = Genome::random(shape(), &mut Pcg32::seed_from_u64(12));
        let json = serde_json::to_string(&genome).unwrap();
        let decoded: Genome = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, genome);

        let broken = r#"{"shape":{"inputs":2,"hidden":[],"outputs":1},"weights":[1.0],"fitness":null}"#;
        let err = serde_json::from_str::<Genome>(broken).unwrap_err();
        assert!(err.to_string().contains("weights"));
    }
}
