use std::path::{Path, PathBuf};

use anyhow::Context as _;
use marvin_env::{Environment as _, EnvironmentKind};
use marvin_training::{
    genome::Genome,
    persistence::{ArchiveStore as _, JsonArchiveStore},
    rollout::{Episode, Rollout},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Archive file path
    #[arg(long, default_value = "weights.json")]
    archive: PathBuf,
    /// Only replay the genome with the highest recorded fitness
    #[arg(long)]
    best_only: bool,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    replay_archive(&arg.archive, arg.best_only)
}

/// Loads an archive and replays it with rendering, in the environment it was recorded in.
pub(crate) fn replay_archive(path: &Path, best_only: bool) -> anyhow::Result<()> {
    let store = JsonArchiveStore::new(path);
    let snapshot = store
        .load()
        .with_context(|| format!("Failed to load archive: {}", path.display()))?;
    let kind: EnvironmentKind = snapshot.environment.parse()?;
    let mut environment = kind.make(snapshot.environment_seed);
    environment.set_render(true);

    eprintln!("Replaying {}", path.display());
    eprintln!("  Environment: {}", snapshot.environment);
    eprintln!("  Saved at:    {}", snapshot.saved_at);
    eprintln!("  Generations: {}", snapshot.generations.len());

    if best_only {
        let (generation, genome) = snapshot
            .generations
            .best_overall()
            .context("Archive contains no genomes")?;
        let episode = Rollout::new(snapshot.max_steps)
            .play(genome, &mut environment)
            .with_context(|| format!("Replay of generation {generation} failed"))?;
        print_episode(generation, genome, &episode);
    } else {
        let episodes = snapshot
            .generations
            .replay(&mut environment, snapshot.max_steps)?;
        print_episodes(snapshot.generations.all_best(), &episodes);
    }
    Ok(())
}

pub(crate) fn print_episodes(genomes: &[Genome], episodes: &[Episode]) {
    for (generation, (genome, episode)) in genomes.iter().zip(episodes).enumerate() {
        print_episode(generation, genome, episode);
    }
}

fn print_episode(generation: usize, genome: &Genome, episode: &Episode) {
    let recorded = genome
        .fitness()
        .map_or_else(|| "-".to_owned(), |f| format!("{f:.3}"));
    eprintln!(
        "Generation {generation:5}: reward {:.3} (recorded {recorded}) in {} steps",
        episode.total_reward, episode.steps
    );
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use marvin_training::{config::TrainingConfig, report::GenerationReport, trainer::Trainer};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("marvin-cli-{}-{name}", process::id()))
    }

    fn save_pendulum_archive(path: &Path) {
        let config = TrainingConfig {
            max_steps: 5,
            generations: 2,
            population_size: 3,
            hidden_layers: vec![2],
            seed: Some(5),
            ..TrainingConfig::default()
        };
        let environment = config.make_environment().unwrap();
        let mut trainer = Trainer::new(config, environment).unwrap();
        trainer.run(&mut |_: &GenerationReport| {}).unwrap();
        trainer.persist(&JsonArchiveStore::new(path)).unwrap();
    }

    #[test]
    fn test_replay_saved_archive() {
        let path = temp_path("replay.json");
        save_pendulum_archive(&path);
        replay_archive(&path, false).unwrap();
        replay_archive(&path, true).unwrap();
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_archive_is_fatal() {
        assert!(replay_archive(&temp_path("absent.json"), false).is_err());
        assert!(replay_archive(&temp_path("absent.json"), true).is_err());
    }

    #[test]
    fn test_corrupt_archive_is_fatal() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "[1, 2").unwrap();
        assert!(replay_archive(&path, false).is_err());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_empty_archive_is_fatal() {
        let path = temp_path("empty.json");
        fs::write(
            &path,
            r#"{"environment": "Pendulum-v1", "environment_seed": 0, "max_steps": 5,
                "saved_at": "2026-01-01T00:00:00Z", "generations": []}"#,
        )
        .unwrap();
        assert!(replay_archive(&path, true).is_err());
        fs::remove_file(path).unwrap();
    }
}
