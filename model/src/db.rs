//! Storage for rockets and missions.
//!
//! The registry only talks to storage through the [`RocketRepository`] and [`MissionRepository`]
//! traits, so it can run against any backend. The [`memory`] backend keeps everything in process
//! memory and is what the `dragons` binary and the tests use.

use crate::{mission::Mission, rocket::Rocket};
use async_trait::async_trait;
use derive_more::From;
use snafu::Snafu;
use std::fmt::Display;

pub mod memory;

/// Errors returned by a repository.
#[derive(Clone, Debug, PartialEq, Eq, Snafu, From)]
#[snafu(display("{message}"))]
pub struct Error {
    message: String,
}

impl Error {
    /// Wrap a custom message into an error.
    pub fn custom(msg: impl Display) -> Self {
        Self::from(msg.to_string())
    }

    /// An error indicating that an entity with the same name is already stored.
    pub fn already_exists(kind: &str, name: &str) -> Self {
        Self::from(format!("{kind} {name} already exists"))
    }

    /// An error indicating that an entity to be updated is not stored.
    pub fn does_not_exist(kind: &str, name: &str) -> Self {
        Self::from(format!("{kind} {name} doesn't exist"))
    }
}

/// Storage for [`Rocket`]s, keyed by name.
#[async_trait]
pub trait RocketRepository: Send + Sync {
    /// Store a new rocket.
    ///
    /// # Errors
    ///
    /// Fails if a rocket with the same name is already stored.
    async fn save(&self, rocket: Rocket) -> Result<Rocket, Error>;

    /// Replace a stored rocket.
    ///
    /// # Errors
    ///
    /// Fails if no rocket with this name is stored.
    async fn update(&self, rocket: Rocket) -> Result<Rocket, Error>;

    /// Look up a rocket by name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Rocket>, Error>;

    /// Check whether a rocket with this name is stored.
    async fn exists(&self, name: &str) -> Result<bool, Error>;

    /// All stored rockets, in no particular order.
    async fn find_all(&self) -> Result<Vec<Rocket>, Error>;
}

/// Storage for [`Mission`]s, keyed by name.
#[async_trait]
pub trait MissionRepository: Send + Sync {
    /// Store a new mission.
    ///
    /// # Errors
    ///
    /// Fails if a mission with the same name is already stored.
    async fn save(&self, mission: Mission) -> Result<Mission, Error>;

    /// Replace a stored mission.
    ///
    /// # Errors
    ///
    /// Fails if no mission with this name is stored.
    async fn update(&self, mission: Mission) -> Result<Mission, Error>;

    /// Look up a mission by name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Mission>, Error>;

    /// Check whether a mission with this name is stored.
    async fn exists(&self, name: &str) -> Result<bool, Error>;

    /// All stored missions, in no particular order.
    async fn find_all(&self) -> Result<Vec<Mission>, Error>;
}
