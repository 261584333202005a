//! A printable overview of all missions.

use crate::{
    mission::{Mission, MissionStatus},
    rocket::{Rocket, RocketStatus},
};
use serde::{Serialize, Serializer};
use std::cmp::Reverse;
use std::fmt::{self, Display, Formatter};

/// All missions, busiest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    missions: Vec<Mission>,
}

impl Summary {
    /// Build a summary over `missions`.
    ///
    /// Missions are ordered by the number of assigned rockets, descending. Missions with the same
    /// number of rockets are ordered by name, also descending.
    pub fn new(missions: impl IntoIterator<Item = Mission>) -> Self {
        let mut missions = missions.into_iter().collect::<Vec<_>>();
        missions.sort_by(|a, b| order_key(a).cmp(&order_key(b)));
        Self { missions }
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for mission in &self.missions {
            writeln!(
                f,
                "- {} - {} - Dragons: {}",
                mission.name(),
                mission.status(),
                mission.rockets().len()
            )?;
            for rocket in mission.rockets().values() {
                writeln!(f, "  - {} - {}", rocket.name(), rocket.status())?;
            }
        }
        Ok(())
    }
}

/// The serialized form of a mission in a summary, which includes its derived status.
#[derive(Serialize)]
struct MissionReport<'a> {
    name: &'a str,
    status: MissionStatus,
    ended: bool,
    rockets: Vec<RocketReport<'a>>,
}

#[derive(Serialize)]
struct RocketReport<'a> {
    name: &'a str,
    status: RocketStatus,
}

impl<'a> From<&'a Mission> for MissionReport<'a> {
    fn from(mission: &'a Mission) -> Self {
        Self {
            name: mission.name(),
            status: mission.status(),
            ended: mission.is_ended(),
            rockets: mission.rockets().values().map(RocketReport::from).collect(),
        }
    }
}

impl<'a> From<&'a Rocket> for RocketReport<'a> {
    fn from(rocket: &'a Rocket) -> Self {
        Self {
            name: rocket.name(),
            status: rocket.status(),
        }
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.missions.iter().map(MissionReport::from))
    }
}

fn order_key(mission: &Mission) -> (Reverse<usize>, Reverse<&str>) {
    (Reverse(mission.rockets().len()), Reverse(mission.name()))
}
