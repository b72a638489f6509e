//! Saving and loading generation archives.
//!
//! The trainer only depends on the [`ArchiveStore`] trait. [`JsonArchiveStore`] is the
//! built-in implementation; it writes an [`ArchiveSnapshot`] as pretty-printed JSON:
//!
//! ```json
//! {
//!   "environment": "Pendulum-v1",
//!   "environment_seed": 0,
//!   "max_steps": 1000,
//!   "saved_at": "2026-10-18T09:30:00Z",
//!   "generations": [
//!     { "shape": { "inputs": 3, "hidden": [16], "outputs": 1 }, "weights": [...], "fitness": -812.4 }
//!   ]
//! }
//! ```
//!
//! The environment id, seed and step cap are stored alongside the genomes so that a
//! replay can rebuild the exact conditions the recorded fitness values were measured in.
//!
//! Saving writes a sibling `<name>.tmp` file and renames it over the archive, so an
//! existing archive is only replaced by a completely written one.

use std::{
    ffi::OsString,
    fs::{self, File},
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{archive::GenerationArchive, error::PersistenceError};

/// A generation archive together with the conditions it was recorded under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveSnapshot {
    pub environment: String,
    pub environment_seed: u64,
    pub max_steps: usize,
    pub saved_at: DateTime<Utc>,
    pub generations: GenerationArchive,
}

/// Persistence collaborator for generation archives.
pub trait ArchiveStore {
    fn save(&self, snapshot: &ArchiveSnapshot) -> Result<(), PersistenceError>;

    /// Loads a previously saved snapshot. An archive without genomes is an error.
    fn load(&self) -> Result<ArchiveSnapshot, PersistenceError>;
}

/// Stores snapshots as JSON files.
#[derive(Debug, Clone)]
pub struct JsonArchiveStore {
    path: PathBuf,
}

impl JsonArchiveStore {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> PersistenceError {
        PersistenceError::Json {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_to(&self, path: &Path, snapshot: &ArchiveSnapshot) -> Result<(), PersistenceError> {
        let file = File::create(path).map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot).map_err(|e| self.json_error(e))?;
        writeln!(writer).map_err(|e| self.io_error(e))?;
        writer.flush().map_err(|e| self.io_error(e))?;
        writer.get_ref().sync_all().map_err(|e| self.io_error(e))
    }
}

impl ArchiveStore for JsonArchiveStore {
    fn save(&self, snapshot: &ArchiveSnapshot) -> Result<(), PersistenceError> {
        let temp_path = self.temp_path();
        let result = self.write_to(&temp_path, snapshot).and_then(|()| {
            fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))
        });
        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        tracing::info!(
            path = %self.path.display(),
            generations = snapshot.generations.len(),
            "saved generation archive"
        );
        Ok(())
    }

    fn load(&self) -> Result<ArchiveSnapshot, PersistenceError> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let snapshot: ArchiveSnapshot =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| self.json_error(e))?;
        if snapshot.generations.is_empty() {
            return Err(PersistenceError::EmptyArchive {
                path: self.path.clone(),
            });
        }
        tracing::info!(
            path = %self.path.display(),
            generations = snapshot.generations.len(),
            environment = %snapshot.environment,
            "loaded generation archive"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::genome::{Genome, NetworkShape};

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("marvin-{}-{name}.json", process::id()))
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let store = JsonArchiveStore::new(temp_path("missing"));
        assert!(matches!(store.load(), Err(PersistenceError::Io { .. })));
    }

    #[test]
    fn test_empty_archive_is_rejected() {
        let path = temp_path("empty");
        let store = JsonArchiveStore::new(&path);
        let snapshot = ArchiveSnapshot {
            environment: "Pendulum-v1".to_owned(),
            environment_seed: 0,
            max_steps: 10,
            saved_at: Utc::now(),
            generations: GenerationArchive::new(),
        };
        store.save(&snapshot).unwrap();
        assert!(matches!(
            store.load(),
            Err(PersistenceError::EmptyArchive { .. })
        ));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_failed_save_keeps_previous_archive() {
        let path = temp_path("kept");
        let store = JsonArchiveStore::new(&path);
        let mut rng = Pcg32::seed_from_u64(1);
        let shape = NetworkShape::new(2, vec![3], 1).unwrap();
        let mut generations = GenerationArchive::new();
        generations.record_best(&Genome::random(shape.clone(), &mut rng));
        let first = ArchiveSnapshot {
            environment: "Pendulum-v1".to_owned(),
            environment_seed: 0,
            max_steps: 10,
            saved_at: Utc::now(),
            generations: generations.clone(),
        };
        store.save(&first).unwrap();

        // a directory in place of the temp file makes the next save fail
        let blocker = store.temp_path();
        fs::create_dir(&blocker).unwrap();
        generations.record_best(&Genome::random(shape, &mut rng));
        let second = ArchiveSnapshot {
            generations,
            ..first.clone()
        };
        assert!(matches!(
            store.save(&second),
            Err(PersistenceError::Io { .. })
        ));
        assert_eq!(store.load().unwrap(), first);

        fs::remove_dir(blocker).unwrap();
        store.save(&second).unwrap();
        assert_eq!(store.load().unwrap().generations.len(), 2);
        assert!(!store.temp_path().exists());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonArchiveStore::new(&path);
        assert!(matches!(store.load(), Err(PersistenceError::Json { .. })));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_saved_snapshot_loads_unchanged() {
        let path = temp_path("saved");
        let store = JsonArchiveStore::new(&path);
        let mut rng = Pcg32::seed_from_u64(0);
        let shape = NetworkShape::new(3, vec![4], 1).unwrap();
        let mut generations = GenerationArchive::new();
        generations.record_best(&Genome::random(shape, &mut rng));
        let snapshot = ArchiveSnapshot {
            environment: "Pendulum-v1".to_owned(),
            environment_seed: 4,
            max_steps: 200,
            saved_at: Utc::now(),
            generations,
        };
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), snapshot);
        fs::remove_file(path).unwrap();
    }
}
