use std::str::FromStr;

use crate::{Environment, mountain_car::MountainCar, pendulum::Pendulum};

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown environment id '{id}' (available: {})", EnvironmentKind::ids().join(", "))]
pub struct UnknownEnvironmentError {
    pub id: String,
}

/// Built-in environments selectable by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKind {
    Pendulum,
    MountainCar,
}

impl EnvironmentKind {
    pub const ALL: [Self; 2] = [Self::Pendulum, Self::MountainCar];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Pendulum => Pendulum::ID,
            Self::MountainCar => MountainCar::ID,
        }
    }

    #[must_use]
    pub fn ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.id()).collect()
    }

    /// Creates a fresh environment whose episodes start from a state derived from `seed`.
    #[must_use]
    pub fn make(self, seed: u64) -> Box<dyn Environment> {
        match self {
            Self::Pendulum => Box::new(Pendulum::new(seed)),
            Self::MountainCar => Box::new(MountainCar::new(seed)),
        }
    }
}

impl FromStr for EnvironmentKind {
    type Err = UnknownEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEnvironmentError { id: s.to_owned() })
    }
}
