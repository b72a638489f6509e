use std::path::PathBuf;

use anyhow::Context as _;
use marvin_env::Environment;
use marvin_training::{
    config::TrainingConfig,
    persistence::{ArchiveStore, JsonArchiveStore},
    report::{GenerationReport, GenerationReporter as _},
    trainer::Trainer,
};

use crate::{
    command::replay,
    report::{JsonLinesReporter, StderrReporter},
    util,
};

#[derive(Default, Debug, Clone, clap::Args)]
#[expect(clippy::struct_excessive_bools)]
pub(crate) struct TrainArg {
    /// JSON file with base training parameters
    #[arg(long)]
    config: Option<PathBuf>,
    /// Environment id (see `marvin envs`)
    #[arg(long = "env")]
    environment: Option<String>,
    /// Seed for the environment's initial states
    #[arg(long)]
    env_seed: Option<u64>,
    /// Step cap of a single episode
    #[arg(long)]
    steps: Option<usize>,
    /// Number of generations
    #[arg(long)]
    generations: Option<usize>,
    /// Number of genomes per generation
    #[arg(long)]
    population: Option<usize>,
    /// Per-weight mutation probability
    #[arg(long)]
    rate: Option<f32>,
    /// Bound of a single weight perturbation
    #[arg(long)]
    width: Option<f32>,
    /// Hidden layer sizes, comma separated
    #[arg(long, value_delimiter = ',')]
    hidden: Option<Vec<usize>>,
    /// Seed for initialization and mutation
    #[arg(long)]
    seed: Option<u64>,
    /// Render every rollout while training
    #[arg(long)]
    render: bool,
    /// Save the generation archive when training completes
    #[arg(long)]
    save: bool,
    /// Replay the generation archive when training completes
    #[arg(long)]
    replay: bool,
    /// Archive file path
    #[arg(long)]
    archive: Option<PathBuf>,
    /// Write per-generation statistics to this file, one JSON object per line
    #[arg(long)]
    log: Option<PathBuf>,
    /// Skip training and replay the archive file
    #[arg(long)]
    load: bool,
}

impl TrainArg {
    fn to_config(&self) -> anyhow::Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<TrainingConfig, _>("training config", path)?,
            None => TrainingConfig::default(),
        };
        self.apply_to(&mut config);
        Ok(config)
    }

    fn apply_to(&self, config: &mut TrainingConfig) {
        if let Some(environment) = &self.environment {
            config.environment.clone_from(environment);
        }
        if let Some(seed) = self.env_seed {
            config.environment_seed = seed;
        }
        if let Some(steps) = self.steps {
            config.max_steps = steps;
        }
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(rate) = self.rate {
            config.mutation_rate = rate;
        }
        if let Some(width) = self.width {
            config.mutation_width = width;
        }
        if let Some(hidden) = &self.hidden {
            config.hidden_layers.clone_from(hidden);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(archive) = &self.archive {
            config.archive_path.clone_from(archive);
        }
        config.render |= self.render;
        config.save_on_completion |= self.save;
        config.replay_on_completion |= self.replay;
        config.load_only |= self.load;
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = arg.to_config()?;
    if config.load_only {
        return replay::replay_archive(&config.archive_path, false);
    }

    let environment = config.make_environment()?;
    let mut trainer = Trainer::new(config, environment)?;
    eprintln!(
        "Training on {} ({} generations x {} genomes, seed {})",
        trainer.environment().id(),
        trainer.config().generations,
        trainer.config().population_size,
        trainer.seed()
    );

    let mut stderr = StderrReporter::default();
    let mut log = arg
        .log
        .as_deref()
        .map(JsonLinesReporter::create)
        .transpose()?;
    trainer.run(&mut |report: &GenerationReport| {
        stderr.report(report);
        if let Some(log) = &mut log {
            log.report(report);
        }
    })?;
    if let Some(log) = log {
        log.finish()?;
    }

    eprintln!();
    eprintln!("Training completed");
    if let Some((generation, best)) = trainer.archive().best_overall() {
        eprintln!("  Best generation: {generation}");
        if let Some(fitness) = best.fitness() {
            eprintln!("  Best fitness:    {fitness:.3}");
        }
    }

    let store = trainer
        .config()
        .save_on_completion
        .then(|| JsonArchiveStore::new(&trainer.config().archive_path));
    save_and_replay(&mut trainer, store.as_ref())
}

/// Saves the archive of a finished run to `store` and replays it if configured.
///
/// The replay still runs when saving fails; the save error is returned afterwards.
fn save_and_replay<E, S>(trainer: &mut Trainer<E>, store: Option<&S>) -> anyhow::Result<()>
where
    E: Environment,
    S: ArchiveStore + ?Sized,
{
    let saved = match store {
        Some(store) => {
            let result = trainer
                .persist(store)
                .context("Failed to save generation archive");
            match &result {
                Ok(()) => eprintln!("  Archive saved"),
                Err(e) => tracing::error!("{e:#}"),
            }
            result
        }
        None => Ok(()),
    };

    if trainer.config().replay_on_completion {
        let episodes = trainer.replay()?;
        replay::print_episodes(trainer.archive().all_best(), &episodes);
    }

    saved
}
