//! In-memory instantiation of the [`db`](super) repositories.
//!
//! Each store is a handle to a map behind an async lock. Handles can be [cloned](Clone) to share
//! the same underlying data, which is how tests inspect the state a registry leaves behind.

use super::{Error, MissionRepository, RocketRepository};
use crate::{mission::Mission, rocket::Rocket};
use async_std::sync::{Arc, RwLock};
use async_trait::async_trait;
use std::collections::hash_map::{Entry, HashMap};

/// An entity which can be stored in a [`Table`].
trait Record: Clone + Send + Sync {
    /// Human-readable name of this kind of entity, for error messages.
    const KIND: &'static str;

    fn key(&self) -> &str;
}

impl Record for Rocket {
    const KIND: &'static str = "Rocket";

    fn key(&self) -> &str {
        self.name()
    }
}

impl Record for Mission {
    const KIND: &'static str = "Mission";

    fn key(&self) -> &str {
        self.name()
    }
}

/// A shared in-memory table of records keyed by name.
#[derive(Debug)]
struct Table<T>(Arc<RwLock<HashMap<String, T>>>);

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self(Default::default())
    }
}

impl<T: Record> Table<T> {
    async fn insert(&self, record: T) -> Result<T, Error> {
        let mut rows = self.0.write().await;
        match rows.entry(record.key().to_string()) {
            Entry::Occupied(e) => Err(Error::already_exists(T::KIND, e.key())),
            Entry::Vacant(e) => {
                e.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn replace(&self, record: T) -> Result<T, Error> {
        let mut rows = self.0.write().await;
        match rows.get_mut(record.key()) {
            Some(row) => {
                *row = record.clone();
                Ok(record)
            }
            None => Err(Error::does_not_exist(T::KIND, record.key())),
        }
    }

    async fn get(&self, key: &str) -> Option<T> {
        self.0.read().await.get(key).cloned()
    }

    async fn contains(&self, key: &str) -> bool {
        self.0.read().await.contains_key(key)
    }

    async fn all(&self) -> Vec<T> {
        self.0.read().await.values().cloned().collect()
    }
}

/// In-memory storage for rockets.
#[derive(Clone, Debug, Default)]
pub struct RocketStore(Table<Rocket>);

impl RocketStore {
    /// Create a new, empty store.
    ///
    /// The new store is not related to any previously created store. Clone it to get more handles
    /// to the same data.
    pub fn create() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RocketRepository for RocketStore {
    async fn save(&self, rocket: Rocket) -> Result<Rocket, Error> {
        self.0.insert(rocket).await
    }

    async fn update(&self, rocket: Rocket) -> Result<Rocket, Error> {
        self.0.replace(rocket).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Rocket>, Error> {
        Ok(self.0.get(name).await)
    }

    async fn exists(&self, name: &str) -> Result<bool, Error> {
        Ok(self.0.contains(name).await)
    }

    async fn find_all(&self) -> Result<Vec<Rocket>, Error> {
        Ok(self.0.all().await)
    }
}

/// In-memory storage for missions.
#[derive(Clone, Debug, Default)]
pub struct MissionStore(Table<Mission>);

impl MissionStore {
    /// Create a new, empty store.
    ///
    /// The new store is not related to any previously created store. Clone it to get more handles
    /// to the same data.
    pub fn create() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MissionRepository for MissionStore {
    async fn save(&self, mission: Mission) -> Result<Mission, Error> {
        self.0.insert(mission).await
    }

    async fn update(&self, mission: Mission) -> Result<Mission, Error> {
        self.0.replace(mission).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Mission>, Error> {
        Ok(self.0.get(name).await)
    }

    async fn exists(&self, name: &str) -> Result<bool, Error> {
        Ok(self.0.contains(name).await)
    }

    async fn find_all(&self) -> Result<Vec<Mission>, Error> {
        Ok(self.0.all().await)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rocket::RocketStatus;

    #[async_std::test]
    async fn test_save_rocket() {
        let store = RocketStore::create();
        let rocket = Rocket::new("draco 2");
        assert_eq!(store.save(rocket.clone()).await.unwrap(), rocket);
        assert_eq!(store.find_by_name("draco 2").await.unwrap(), Some(rocket));
        assert_eq!(store.find_by_name("draco 9").await.unwrap(), None);
    }

    #[async_std::test]
    async fn test_save_rocket_twice() {
        let store = RocketStore::create();
        let rocket = Rocket::new("draco 3");
        store.save(rocket.clone()).await.unwrap();
        assert_eq!(
            store.save(rocket).await.unwrap_err().to_string(),
            "Rocket draco 3 already exists"
        );
    }

    #[async_std::test]
    async fn test_update_rocket() {
        let store = RocketStore::create();
        let rocket = Rocket::new("draco 10");
        store.save(rocket.clone()).await.unwrap();

        let updated = rocket.with_status(RocketStatus::InRepair);
        assert_eq!(store.update(updated.clone()).await.unwrap(), updated);
        assert_eq!(store.find_by_name("draco 10").await.unwrap(), Some(updated));
    }

    #[async_std::test]
    async fn test_update_missing_rocket() {
        let store = RocketStore::create();
        assert_eq!(
            store
                .update(Rocket::new("draco 11"))
                .await
                .unwrap_err()
                .to_string(),
            "Rocket draco 11 doesn't exist"
        );
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[async_std::test]
    async fn test_rocket_exists() {
        let store = RocketStore::create();
        assert!(!store.exists("draco 111").await.unwrap());
        store.save(Rocket::new("draco 111")).await.unwrap();
        assert!(store.exists("draco 111").await.unwrap());
    }

    #[async_std::test]
    async fn test_clones_share_data() {
        let store = RocketStore::create();
        let other = store.clone();
        store.save(Rocket::new("shared")).await.unwrap();
        assert!(other.exists("shared").await.unwrap());

        // A freshly created store is independent.
        assert!(!RocketStore::create().exists("shared").await.unwrap());
    }

    #[async_std::test]
    async fn test_save_mission() {
        let store = MissionStore::create();
        let mission = Mission::new("mars 1");
        store.save(mission.clone()).await.unwrap();
        assert_eq!(store.find_by_name("mars 1").await.unwrap(), Some(mission.clone()));
        assert_eq!(
            store.save(mission).await.unwrap_err().to_string(),
            "Mission mars 1 already exists"
        );
    }

    #[async_std::test]
    async fn test_update_mission() {
        let store = MissionStore::create();
        let mission = Mission::new("mars 3");
        assert_eq!(
            store
                .update(mission.clone())
                .await
                .unwrap_err()
                .to_string(),
            "Mission mars 3 doesn't exist"
        );

        store.save(mission.clone()).await.unwrap();
        let updated = mission.assign_rocket(Rocket::new("eagle")).unwrap();
        assert_eq!(store.update(updated.clone()).await.unwrap(), updated);
        assert_eq!(store.find_by_name("mars 3").await.unwrap(), Some(updated));
    }

    #[async_std::test]
    async fn test_all_missions() {
        let store = MissionStore::create();
        assert!(!store.exists("venus 111").await.unwrap());
        store.save(Mission::new("venus 111")).await.unwrap();
        store.save(Mission::new("venus 112")).await.unwrap();
        assert!(store.exists("venus 111").await.unwrap());

        let mut names = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|mission| mission.name().to_string())
            .collect::<Vec<_>>();
        names.sort();
        assert_eq!(names, ["venus 111", "venus 112"]);
    }
}
