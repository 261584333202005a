//! Rockets and their lifecycle.

use crate::registry::Error;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Where a rocket currently is.
///
/// Both `Display` and serde use the printable names, like "In repair".
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
pub enum RocketStatus {
    #[strum(serialize = "On ground")]
    #[serde(rename = "On ground")]
    OnGround,
    #[strum(serialize = "In space")]
    #[serde(rename = "In space")]
    InSpace,
    #[strum(serialize = "In repair")]
    #[serde(rename = "In repair")]
    InRepair,
}

/// A Dragon rocket.
///
/// Rockets are identified by name. Every transition produces a new value, so a rocket read out of
/// a repository is a snapshot which stays valid until it is explicitly written back.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Rocket {
    name: String,
    status: RocketStatus,
    mission: Option<String>,
}

impl Rocket {
    /// A brand new rocket, on the ground and not assigned to any mission.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: RocketStatus::OnGround,
            mission: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> RocketStatus {
        self.status
    }

    /// The name of the mission this rocket is assigned to, if any.
    pub fn mission(&self) -> Option<&str> {
        self.mission.as_deref()
    }

    /// The same rocket with a different status.
    pub fn with_status(&self, status: RocketStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Send this rocket to the repair shop.
    ///
    /// The mission assignment, if any, is kept.
    pub fn in_repair(&self) -> Self {
        self.with_status(RocketStatus::InRepair)
    }

    /// Take this rocket out of repair.
    ///
    /// A repaired rocket goes back to space if it is still assigned to a mission, and otherwise
    /// stays on the ground.
    pub fn repaired(&self) -> Self {
        if self.mission.is_some() {
            self.with_status(RocketStatus::InSpace)
        } else {
            self.with_status(RocketStatus::OnGround)
        }
    }

    /// Assign this rocket to `mission`.
    ///
    /// # Errors
    ///
    /// A rocket can fly only one mission at a time, so this fails if the rocket is already
    /// assigned.
    pub fn assign_mission(&self, mission: impl Into<String>) -> Result<Self, Error> {
        if let Some(current) = &self.mission {
            return Err(Error::MissionAlreadyAssigned {
                rocket: self.name.clone(),
                mission: current.clone(),
            });
        }
        let status = match self.status {
            RocketStatus::InRepair => RocketStatus::InRepair,
            _ => RocketStatus::InSpace,
        };
        Ok(Self {
            name: self.name.clone(),
            status,
            mission: Some(mission.into()),
        })
    }

    /// Detach this rocket from its mission.
    ///
    /// The rocket lands unless it is under repair, in which case it stays there.
    pub fn remove_mission(&self) -> Self {
        let status = match self.status {
            RocketStatus::InRepair => RocketStatus::InRepair,
            _ => RocketStatus::OnGround,
        };
        Self {
            name: self.name.clone(),
            status,
            mission: None,
        }
    }
}
