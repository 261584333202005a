//! The Dragon rockets registry.
//!
//! [`DragonRockets`] is the entrypoint to the library. It owns a [`RocketRepository`] and a
//! [`MissionRepository`] and keeps the two consistent: whenever a rocket changes, the snapshot of
//! that rocket held by its mission changes with it.

use crate::{
    db::{self, MissionRepository, RocketRepository},
    mission::Mission,
    rocket::{Rocket, RocketStatus},
    summary::Summary,
};
use async_std::sync::Mutex;
use futures::future::try_join_all;
use snafu::Snafu;
use std::collections::BTreeSet;

/// Errors reported by the registry.
#[derive(Clone, Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("Rocket with name {name} already exists in the system"))]
    RocketAlreadyExists { name: String },

    #[snafu(display("Rocket with name {name} does not exist in the system"))]
    RocketDoesNotExist { name: String },

    #[snafu(display("Mission with name {name} already exists in the system"))]
    MissionAlreadyExists { name: String },

    #[snafu(display("Mission with name {name} does not exist in the system"))]
    MissionDoesNotExist { name: String },

    /// The rocket is already flying `mission`.
    #[snafu(display("Mission already assigned"))]
    MissionAlreadyAssigned { rocket: String, mission: String },

    #[snafu(display("Mission {name} is already ended"))]
    MissionAlreadyEnded { name: String },

    /// Rockets cannot join a mission which is over.
    #[snafu(display("Mission {name} has ended and cannot take new rockets"))]
    MissionEnded { name: String },

    #[snafu(display("storage error: {source}"))]
    Db { source: db::Error },
}

impl From<db::Error> for Error {
    fn from(source: db::Error) -> Self {
        Self::Db { source }
    }
}

/// A registry of Dragon rockets and their missions.
#[derive(Debug)]
pub struct DragonRockets<R, M> {
    rockets: R,
    missions: M,
    // Held for the duration of every mutating operation, so that updates spanning both
    // repositories never interleave.
    lock: Mutex<()>,
}

impl<R: RocketRepository, M: MissionRepository> DragonRockets<R, M> {
    pub fn new(rockets: R, missions: M) -> Self {
        Self {
            rockets,
            missions,
            lock: Mutex::new(()),
        }
    }

    /// The underlying rocket storage.
    pub fn rockets(&self) -> &R {
        &self.rockets
    }

    /// The underlying mission storage.
    pub fn missions(&self) -> &M {
        &self.missions
    }

    /// Register a new rocket.
    ///
    /// The rocket starts out on the ground, with no mission.
    pub async fn add_rocket(&self, name: impl Into<String>) -> Result<Rocket, Error> {
        let name = name.into();
        let _guard = self.lock.lock().await;
        if self.rockets.exists(&name).await? {
            return Err(Error::RocketAlreadyExists { name });
        }
        let rocket = self.rockets.save(Rocket::new(name)).await?;
        tracing::info!("added rocket {}", rocket.name());
        Ok(rocket)
    }

    /// Register a new mission.
    pub async fn add_mission(&self, name: impl Into<String>) -> Result<Mission, Error> {
        let name = name.into();
        let _guard = self.lock.lock().await;
        if self.missions.exists(&name).await? {
            return Err(Error::MissionAlreadyExists { name });
        }
        let mission = self.missions.save(Mission::new(name)).await?;
        tracing::info!("added mission {}", mission.name());
        Ok(mission)
    }

    /// Assign a single rocket to a mission.
    pub async fn assign_rocket_to_mission(
        &self,
        rocket: &str,
        mission: &str,
    ) -> Result<(), Error> {
        self.assign_rockets_to_mission([rocket], mission).await
    }

    /// Assign a group of rockets to a mission.
    ///
    /// Either every rocket is assigned or, if any of them cannot be, nothing changes. Naming the
    /// same rocket more than once is the same as naming it once.
    ///
    /// # Errors
    ///
    /// Fails if any of the rockets or the mission does not exist, if the mission has ended, or if
    /// any of the rockets is already assigned to a mission.
    pub async fn assign_rockets_to_mission<I, S>(
        &self,
        rockets: I,
        mission: &str,
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = rockets.into_iter().map(Into::into).collect();
        let _guard = self.lock.lock().await;

        // Validate everything before writing anything. Rockets are checked before the mission.
        let assigned = try_join_all(names.iter().map(|name| self.find_rocket(name)))
            .await?
            .into_iter()
            .map(|rocket| rocket.assign_mission(mission))
            .collect::<Result<Vec<_>, _>>()?;
        let mut mission = self.find_mission(mission).await?;
        for rocket in &assigned {
            mission = mission.assign_rocket(rocket.clone())?;
        }

        try_join_all(assigned.into_iter().map(|rocket| self.rockets.update(rocket))).await?;
        let mission = self.missions.update(mission).await?;
        tracing::info!(
            "assigned {} rocket(s) to mission {}; it now has {}",
            names.len(),
            mission.name(),
            mission.rockets().len()
        );
        Ok(())
    }

    /// Mark a rocket as damaged and send it for repair.
    ///
    /// Does nothing if the rocket is already under repair.
    pub async fn set_rocket_as_damaged(&self, rocket: &str) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let rocket = self.find_rocket(rocket).await?;
        if rocket.status() == RocketStatus::InRepair {
            tracing::debug!("rocket {} is already in repair", rocket.name());
            return Ok(());
        }
        self.update_rocket(rocket.in_repair()).await
    }

    /// Mark a rocket as repaired.
    ///
    /// Does nothing unless the rocket is under repair.
    pub async fn set_rocket_as_repaired(&self, rocket: &str) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let rocket = self.find_rocket(rocket).await?;
        if rocket.status() != RocketStatus::InRepair {
            tracing::debug!("rocket {} is not in repair", rocket.name());
            return Ok(());
        }
        self.update_rocket(rocket.repaired()).await
    }

    /// End a mission, releasing all of its rockets.
    ///
    /// # Errors
    ///
    /// Fails if the mission does not exist or has already ended.
    pub async fn end_mission(&self, mission: &str) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let mission = self.find_mission(mission).await?;
        let ended = mission.end()?;

        let rockets = try_join_all(
            mission
                .rockets()
                .keys()
                .map(|name| self.find_rocket(name)),
        )
        .await?;
        try_join_all(
            rockets
                .iter()
                .map(|rocket| self.rockets.update(rocket.remove_mission())),
        )
        .await?;
        self.missions.update(ended).await?;
        tracing::info!(
            "ended mission {}, releasing {} rocket(s)",
            mission.name(),
            rockets.len()
        );
        Ok(())
    }

    /// Summarize all missions, busiest first.
    pub async fn summary(&self) -> Result<Summary, Error> {
        Ok(Summary::new(self.missions.find_all().await?))
    }

    async fn find_rocket(&self, name: &str) -> Result<Rocket, Error> {
        self.rockets
            .find_by_name(name)
            .await?
            .ok_or_else(|| Error::RocketDoesNotExist { name: name.into() })
    }

    async fn find_mission(&self, name: &str) -> Result<Mission, Error> {
        self.missions
            .find_by_name(name)
            .await?
            .ok_or_else(|| Error::MissionDoesNotExist { name: name.into() })
    }

    /// Store a changed rocket and refresh its snapshot in its mission.
    async fn update_rocket(&self, rocket: Rocket) -> Result<(), Error> {
        if let Some(name) = rocket.mission() {
            let mission = self.find_mission(name).await?;
            self.missions
                .update(mission.update_rocket(rocket.clone()))
                .await?;
        }
        let rocket = self.rockets.update(rocket).await?;
        tracing::info!("rocket {} is now {}", rocket.name(), rocket.status());
        Ok(())
    }
}
