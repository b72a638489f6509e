use clap::{Parser, Subcommand};

use self::{envs::EnvsArg, replay::ReplayArg, train::TrainArg};

mod envs;
mod replay;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a controller network for an environment
    Train(#[clap(flatten)] TrainArg),
    /// Replay a saved generation archive with rendering
    Replay(#[clap(flatten)] ReplayArg),
    /// List the built-in environments
    Envs(#[clap(flatten)] EnvsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
        Mode::Envs(arg) => envs::run(&arg),
    }
    Ok(())
}
