//! Weight vector operations used by genomes.
//!
//! - **Initialization**: [`gaussian`] draws a layer's weights from `N(0, σ²)`
//! - **Mutation**: [`perturb`] adds a bounded uniform delta to a random subset of weights
//!
//! Both take the random number generator from the caller, so a seeded generator makes
//! initialization and mutation reproducible.

use rand::Rng;
use rand_distr::StandardNormal;

/// Creates a weight vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use marvin_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f32 + 1.0), 4);
/// assert_eq!(weights, vec![1.0, 0.5, 1.0 / 3.0, 0.25]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Generates `len` weights sampled independently from `N(0, sigma²)`.
pub fn gaussian<R>(rng: &mut R, sigma: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.sample::<f32, _>(StandardNormal) * sigma, len)
}

/// Perturbs weights in place.
///
/// Each weight is selected independently with probability `rate`; a selected weight
/// receives a delta drawn uniformly from `[-width, width]`. Unselected weights are left
/// untouched, so `rate = 0.0` is a no-op and `rate = 1.0` perturbs every weight.
///
/// # Panics
///
/// Panics if `rate` is outside `[0, 1]` or `width` is not positive and finite.
pub fn perturb<R>(weights: &mut [f32], rate: f32, width: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    assert!(width.is_finite() && width > 0.0, "invalid mutation width {width}");
    for w in weights {
        if rng.random_bool(rate.into()) {
            *w += rng.random_range(-width..=width);
        }
    }
}
