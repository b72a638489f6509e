//! The generation archive: a frozen copy of every generation's winner.
//!
//! Entries are deep copies taken at the moment a generation is evaluated, so later
//! mutation of the live population never changes them. The archive serializes as a
//! plain list of genomes and rejects lists whose genomes do not share one network shape.

use std::slice;

use marvin_env::Environment;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, ReplayError},
    genome::Genome,
    rollout::{Episode, Rollout},
};

/// Append-only record of the best genome of every generation.
///
/// Entries are independent copies: nothing done to the live population after
/// [`record_best`](Self::record_best) can change them, and no mutable access is exposed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Genome>", into = "Vec<Genome>")]
pub struct GenerationArchive {
    best: Vec<Genome>,
}

impl TryFrom<Vec<Genome>> for GenerationArchive {
    type Error = ConfigError;

    fn try_from(best: Vec<Genome>) -> Result<Self, Self::Error> {
        let mismatch = best
            .first()
            .and_then(|first| best.iter().position(|g| g.shape() != first.shape()));
        if let Some(index) = mismatch {
            return Err(ConfigError::ShapeMismatch { index });
        }
        Ok(Self { best })
    }
}

impl From<GenerationArchive> for Vec<Genome> {
    fn from(archive: GenerationArchive) -> Self {
        archive.best
    }
}

impl GenerationArchive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frozen copy of `genome` and returns the archived entry.
    pub fn record_best(&mut self, genome: &Genome) -> &Genome {
        self.best.push(genome.clone());
        &self.best[self.best.len() - 1]
    }

    /// All archived genomes, oldest generation first.
    #[must_use]
    pub fn all_best(&self) -> &[Genome] {
        &self.best
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.best.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Genome> {
        self.best.last()
    }

    /// The archived genome with the highest recorded fitness, with its generation index.
    ///
    /// Ties go to the earliest generation.
    #[must_use]
    pub fn best_overall(&self) -> Option<(usize, &Genome)> {
        let fitness = |g: &Genome| g.fitness().unwrap_or(f32::NEG_INFINITY);
        self.best
            .iter()
            .enumerate()
            .reduce(|best, cur| if fitness(cur.1) > fitness(best.1) { cur } else { best })
    }

    /// Plays one episode with every archived genome, in generation order.
    pub fn replay<E>(
        &self,
        environment: &mut E,
        max_steps: usize,
    ) -> Result<Vec<Episode>, ReplayError>
    where
        E: Environment + ?Sized,
    {
        let rollout = Rollout::new(max_steps);
        self.best
            .iter()
            .enumerate()
            .map(|(generation, genome)| {
                rollout
                    .play(genome, &mut *environment)
                    .map_err(|source| ReplayError { generation, source })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a GenerationArchive {
    type Item = &'a Genome;
    type IntoIter = slice::Iter<'a, Genome>;

    fn into_iter(self) -> Self::IntoIter {
        self.best.iter()
    }
}
