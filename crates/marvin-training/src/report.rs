//! Per-generation statistics and the sink they are reported to.

use serde::{Deserialize, Serialize};

use crate::{population::FitnessStats, stats::FitnessSummary};

/// Statistics of one finished generation, as handed to a [`GenerationReporter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Zero-based generation index.
    pub generation: usize,
    /// Population index of the generation's winner.
    pub best_index: usize,
    #[serde(flatten)]
    pub fitness: FitnessSummary,
}

impl GenerationReport {
    #[must_use]
    pub fn new(generation: usize, stats: &FitnessStats<'_>) -> Self {
        Self {
            generation,
            best_index: stats.best_index,
            fitness: stats.summary,
        }
    }
}

/// One-way sink for per-generation statistics.
pub trait GenerationReporter {
    fn report(&mut self, report: &GenerationReport);
}

impl<F> GenerationReporter for F
where
    F: FnMut(&GenerationReport),
{
    fn report(&mut self, report: &GenerationReport) {
        self(report);
    }
}
