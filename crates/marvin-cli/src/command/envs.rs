use marvin_env::{Environment as _, EnvironmentKind};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EnvsArg {}

pub(crate) fn run(_arg: &EnvsArg) {
    for kind in EnvironmentKind::ALL {
        let env = kind.make(0);
        println!(
            "{:<26} observation: {}  action: {}",
            kind.id(),
            env.observation_size(),
            env.action_size()
        );
    }
}
