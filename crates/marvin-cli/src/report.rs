use std::{
    fs::File,
    io::{self, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use marvin_training::report::{GenerationReport, GenerationReporter};

/// Prints the statistics block of every generation to stderr.
#[derive(Debug, Default)]
pub(crate) struct StderrReporter {}

impl GenerationReporter for StderrReporter {
    fn report(&mut self, report: &GenerationReport) {
        let GenerationReport {
            generation,
            best_index,
            fitness,
        } = report;
        eprintln!("Generation {generation:5}");
        eprintln!("  Min Fitness: {:.3}", fitness.min);
        eprintln!("  Avg Fitness: {:.3}", fitness.mean);
        eprintln!("  Max Fitness: {:.3} (#{best_index})", fitness.max);
        eprintln!("  Std Dev:     {:.3}", fitness.std_dev);
    }
}

/// Writes one JSON object per generation to a log file.
///
/// Write failures do not interrupt training; the first one is kept and returned by
/// [`JsonLinesReporter::finish`].
#[derive(Debug)]
pub(crate) struct JsonLinesReporter {
    writer: BufWriter<File>,
    path: PathBuf,
    error: Option<io::Error>,
}

impl JsonLinesReporter {
    pub(crate) fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_owned(),
            error: None,
        })
    }

    fn write_line(&mut self, report: &GenerationReport) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, report)?;
        writeln!(self.writer)
    }

    pub(crate) fn finish(mut self) -> anyhow::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e)
                .with_context(|| format!("Failed to write log file: {}", self.path.display()));
        }
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush log file: {}", self.path.display()))
    }
}

impl GenerationReporter for JsonLinesReporter {
    fn report(&mut self, report: &GenerationReport) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_line(report) {
            tracing::warn!(path = %self.path.display(), "stopped writing generation log: {e}");
            self.error = Some(e);
        }
    }
}
