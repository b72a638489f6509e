//! Descriptive statistics of a generation's fitness values.

use serde::{Deserialize, Serialize};

/// Summary of the fitness values of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessSummary {
    /// The lowest fitness in the generation.
    pub min: f32,
    /// The arithmetic mean of all fitness values.
    pub mean: f32,
    /// The highest fitness in the generation.
    pub max: f32,
    /// The population standard deviation of the fitness values.
    pub std_dev: f32,
}

impl FitnessSummary {
    /// Computes the summary of a set of fitness values.
    ///
    /// # Returns
    ///
    /// * `Some(FitnessSummary)` - if there is at least one value
    /// * `None` - if `values` is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use marvin_training::stats::FitnessSummary;
    /// let summary = FitnessSummary::new([4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
    /// assert_eq!(summary.min, 1.0);
    /// assert_eq!(summary.max, 5.0);
    /// assert_eq!(summary.mean, 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        let first = *values.first()?;
        let (min, max) = values
            .iter()
            .fold((first, first), |(min, max), &v| (min.min(v), max.max(v)));
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
        Some(Self {
            min,
            mean,
            max,
            std_dev: variance.sqrt(),
        })
    }
}
