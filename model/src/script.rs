//! Scripted sequences of registry operations.
//!
//! A script is a JSON array of commands, each tagged by an `op` field:
//!
//! ```json
//! [
//!     { "op": "add_rocket", "name": "Dragon 1" },
//!     { "op": "add_mission", "name": "Luna1" },
//!     { "op": "assign", "rocket": "Dragon 1", "mission": "Luna1" },
//!     { "op": "damage", "rocket": "Dragon 1" }
//! ]
//! ```

use crate::{
    db::{MissionRepository, RocketRepository},
    registry::{DragonRockets, Error},
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::path::Path;

/// A single registry operation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    AddRocket { name: String },
    AddMission { name: String },
    Assign { rocket: String, mission: String },
    AssignMany { rockets: Vec<String>, mission: String },
    Damage { rocket: String },
    Repair { rocket: String },
    EndMission { mission: String },
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::AddRocket { name } => write!(f, "add rocket {name}"),
            Self::AddMission { name } => write!(f, "add mission {name}"),
            Self::Assign { rocket, mission } => write!(f, "assign {rocket} to {mission}"),
            Self::AssignMany { rockets, mission } => {
                write!(f, "assign [{}] to {mission}", rockets.join(", "))
            }
            Self::Damage { rocket } => write!(f, "damage {rocket}"),
            Self::Repair { rocket } => write!(f, "repair {rocket}"),
            Self::EndMission { mission } => write!(f, "end mission {mission}"),
        }
    }
}

impl Command {
    /// Run this command against `registry`.
    pub async fn apply<R, M>(&self, registry: &DragonRockets<R, M>) -> Result<(), Error>
    where
        R: RocketRepository,
        M: MissionRepository,
    {
        match self {
            Self::AddRocket { name } => registry.add_rocket(name.as_str()).await.map(|_| ()),
            Self::AddMission { name } => registry.add_mission(name.as_str()).await.map(|_| ()),
            Self::Assign { rocket, mission } => {
                registry.assign_rocket_to_mission(rocket, mission).await
            }
            Self::AssignMany { rockets, mission } => {
                registry
                    .assign_rockets_to_mission(rockets.iter().map(String::as_str), mission)
                    .await
            }
            Self::Damage { rocket } => registry.set_rocket_as_damaged(rocket).await,
            Self::Repair { rocket } => registry.set_rocket_as_repaired(rocket).await,
            Self::EndMission { mission } => registry.end_mission(mission).await,
        }
    }
}

/// Load a script from a JSON file.
pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Vec<Command>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("script {} is malformed", path.display()))
}

/// Apply `commands` to `registry` in order.
///
/// If `keep_going` is set, failing commands are logged and skipped; otherwise the first failure
/// stops the script. Returns the number of commands which failed.
pub async fn run<R, M>(
    registry: &DragonRockets<R, M>,
    commands: &[Command],
    keep_going: bool,
) -> anyhow::Result<usize>
where
    R: RocketRepository,
    M: MissionRepository,
{
    let mut failed = 0;
    for (i, command) in commands.iter().enumerate() {
        tracing::debug!("command {i}: {command}");
        if let Err(err) = command.apply(registry).await {
            if !keep_going {
                return Err(
                    anyhow::Error::new(err).context(format!("command {i} ({command}) failed"))
                );
            }
            tracing::warn!("skipping command {i} ({command}): {err}");
            failed += 1;
        }
    }
    Ok(failed)
}

/// The sample fleet: a few missions in every state.
pub fn demo() -> Vec<Command> {
    let add_rocket = |name: &str| Command::AddRocket { name: name.into() };
    let add_mission = |name: &str| Command::AddMission { name: name.into() };
    vec![
        add_mission("Mars"),
        add_mission("Luna1"),
        add_mission("Double Landing"),
        add_mission("Transit"),
        add_mission("Luna2"),
        add_mission("Vertical Landing"),
        add_rocket("Dragon 1"),
        add_rocket("Dragon 2"),
        add_rocket("Red Dragon"),
        add_rocket("Dragon XL"),
        add_rocket("Falcon Heavy"),
        Command::AssignMany {
            rockets: vec!["Dragon 1".into(), "Dragon 2".into()],
            mission: "Luna1".into(),
        },
        Command::Damage {
            rocket: "Dragon 1".into(),
        },
        Command::AssignMany {
            rockets: vec![
                "Red Dragon".into(),
                "Dragon XL".into(),
                "Falcon Heavy".into(),
            ],
            mission: "Transit".into(),
        },
        Command::EndMission {
            mission: "Double Landing".into(),
        },
        Command::EndMission {
            mission: "Vertical Landing".into(),
        },
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::db::memory::{MissionStore, RocketStore};
    use crate::mission::MissionStatus;
    use std::io::Write;

    fn registry() -> DragonRockets<RocketStore, MissionStore> {
        DragonRockets::new(RocketStore::create(), MissionStore::create())
    }

    #[test]
    fn test_parse() {
        let commands: Vec<Command> = serde_json::from_str(
            r#"[
                { "op": "add_rocket", "name": "Dragon 1" },
                { "op": "assign_many", "rockets": ["a", "b"], "mission": "Luna1" },
                { "op": "end_mission", "mission": "Luna1" }
            ]"#,
        )
        .unwrap();
        assert_eq!(
            commands,
            [
                Command::AddRocket {
                    name: "Dragon 1".into()
                },
                Command::AssignMany {
                    rockets: vec!["a".into(), "b".into()],
                    mission: "Luna1".into()
                },
                Command::EndMission {
                    mission: "Luna1".into()
                },
            ]
        );
        assert!(serde_json::from_str::<Command>(r#"{ "op": "launch" }"#).is_err());
    }

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{ "op": "add_mission", "name": "Mars" }}, {{ "op": "damage", "rocket": "x" }}]"#
        )
        .unwrap();
        assert_eq!(
            load(file.path()).unwrap(),
            [
                Command::AddMission {
                    name: "Mars".into()
                },
                Command::Damage { rocket: "x".into() },
            ]
        );

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        assert!(load(bad.path())
            .unwrap_err()
            .to_string()
            .contains("is malformed"));
    }

    #[async_std::test]
    async fn test_run_stops_on_error() {
        let registry = registry();
        let commands = [
            Command::AddRocket { name: "a".into() },
            Command::Damage { rocket: "b".into() },
            Command::AddRocket { name: "c".into() },
        ];
        let err = run(&registry, &commands, false).await.unwrap_err();
        assert_eq!(err.to_string(), "command 1 (damage b) failed");
        assert!(!registry.rockets().exists("c").await.unwrap());
    }

    #[async_std::test]
    async fn test_run_keep_going() {
        let registry = registry();
        let commands = [
            Command::AddRocket { name: "a".into() },
            Command::AddRocket { name: "a".into() },
            Command::Damage { rocket: "b".into() },
            Command::AddRocket { name: "c".into() },
        ];
        assert_eq!(run(&registry, &commands, true).await.unwrap(), 2);
        assert!(registry.rockets().exists("c").await.unwrap());
    }

    #[async_std::test]
    async fn test_demo() {
        let registry = registry();
        assert_eq!(run(&registry, &demo(), false).await.unwrap(), 0);

        let summary = registry.summary().await.unwrap();
        assert_eq!(
            summary
                .missions()
                .iter()
                .map(|mission| (mission.name(), mission.status()))
                .collect::<Vec<_>>(),
            [
                ("Transit", MissionStatus::InProgress),
                ("Luna1", MissionStatus::Pending),
                ("Vertical Landing", MissionStatus::Ended),
                ("Mars", MissionStatus::Scheduled),
                ("Luna2", MissionStatus::Scheduled),
                ("Double Landing", MissionStatus::Ended),
            ]
        );
    }
}
