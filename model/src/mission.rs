//! Missions and the rockets assigned to them.

use crate::{
    registry::Error,
    rocket::{Rocket, RocketStatus},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

/// The state of a mission, derived from its rockets.
///
/// Both `Display` and serde use the printable names, like "In progress".
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Deserialize,
    Serialize,
)]
pub enum MissionStatus {
    /// No rockets assigned yet.
    Scheduled,
    /// At least one assigned rocket is under repair.
    Pending,
    /// Rockets are assigned and none of them is under repair.
    #[strum(serialize = "In progress")]
    #[serde(rename = "In progress")]
    InProgress,
    /// The mission is over. Ended missions have no rockets.
    Ended,
}

/// A mission flown by Dragon rockets.
///
/// The mission keeps a snapshot of every rocket assigned to it, keyed by rocket name. It is up to
/// the [registry](crate::registry) to keep those snapshots in sync with the rockets themselves.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Mission {
    name: String,
    rockets: BTreeMap<String, Rocket>,
    ended: bool,
}

impl Mission {
    /// A new mission with no rockets.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rockets: Default::default(),
            ended: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rockets assigned to this mission, in name order.
    pub fn rockets(&self) -> &BTreeMap<String, Rocket> {
        &self.rockets
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn status(&self) -> MissionStatus {
        if self.ended {
            MissionStatus::Ended
        } else if self.rockets.is_empty() {
            MissionStatus::Scheduled
        } else if self
            .rockets
            .values()
            .any(|rocket| rocket.status() == RocketStatus::InRepair)
        {
            MissionStatus::Pending
        } else {
            MissionStatus::InProgress
        }
    }

    /// Add `rocket` to this mission, replacing any previous snapshot of it.
    ///
    /// # Errors
    ///
    /// Fails if the mission has already ended.
    pub fn assign_rocket(&self, rocket: Rocket) -> Result<Self, Error> {
        if self.ended {
            return Err(Error::MissionEnded {
                name: self.name.clone(),
            });
        }
        let mut rockets = self.rockets.clone();
        rockets.insert(rocket.name().to_string(), rocket);
        Ok(Self {
            rockets,
            ..self.clone()
        })
    }

    /// Refresh the snapshot of `rocket`, if it is assigned to this mission.
    pub fn update_rocket(&self, rocket: Rocket) -> Self {
        let mut updated = self.clone();
        if let Some(snapshot) = updated.rockets.get_mut(rocket.name()) {
            *snapshot = rocket;
        }
        updated
    }

    /// End this mission, releasing all of its rockets.
    ///
    /// # Errors
    ///
    /// Fails if the mission has already ended.
    pub fn end(&self) -> Result<Self, Error> {
        if self.ended {
            return Err(Error::MissionAlreadyEnded {
                name: self.name.clone(),
            });
        }
        Ok(Self {
            name: self.name.clone(),
            rockets: Default::default(),
            ended: true,
        })
    }
}
