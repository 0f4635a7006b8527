use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::{Error, Result};

/// A reading as the server keeps it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredReading {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub link: String,
    pub when: DateTime<Utc>,
}

/// Where readings live. Readings always belong to one user.
pub trait ReadingStore: Send + Sync {
    fn find_readings(&self, user_id: &str) -> Result<Vec<StoredReading>>;

    /// Stores a new reading stamped with the current time.
    fn add_reading(&self, user_id: &str, title: &str, link: &str) -> Result<StoredReading>;

    fn remove_reading(&self, user_id: &str, reading_id: &str) -> Result<()>;
}

/// 24 hex digits, shaped like a MongoDB object id.
pub fn new_object_id() -> String {
    rand::random::<[u8; 12]>()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    readings: Mutex<HashMap<String, Vec<StoredReading>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadingStore for MemoryStore {
    fn find_readings(&self, user_id: &str) -> Result<Vec<StoredReading>> {
        let readings = self.readings.lock().map_err(|_err| Error::StorageLock)?;
        Ok(readings.get(user_id).cloned().unwrap_or_default())
    }

    fn add_reading(&self, user_id: &str, title: &str, link: &str) -> Result<StoredReading> {
        let reading = StoredReading {
            id: new_object_id(),
            user_id: user_id.to_owned(),
            title: title.to_owned(),
            link: link.to_owned(),
            when: Utc::now().trunc_subsecs(3),
        };

        self.readings
            .lock()
            .map_err(|_err| Error::StorageLock)?
            .entry(user_id.to_owned())
            .or_default()
            .push(reading.clone());
        log::debug!("stored reading {} for {}", reading.id, user_id);

        Ok(reading)
    }

    fn remove_reading(&self, user_id: &str, reading_id: &str) -> Result<()> {
        let mut readings = self.readings.lock().map_err(|_err| Error::StorageLock)?;
        let user_readings = readings.get_mut(user_id).ok_or_else(|| Error::NotFound(reading_id.to_owned()))?;

        let before = user_readings.len();
        user_readings.retain(|reading| reading.id != reading_id);
        if user_readings.len() == before {
            return Err(Error::NotFound(reading_id.to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ids() {
        let id = new_object_id();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_object_id());
    }

    #[test]
    fn test_readings_are_per_user() {
        let store = MemoryStore::new();
        let added = store.add_reading("alice", "a title", "http://a.link").unwrap();
        store.add_reading("bob", "b title", "http://b.link").unwrap();

        assert_eq!(store.find_readings("alice").unwrap(), vec![added.clone()]);
        assert_eq!(store.find_readings("carol").unwrap(), vec![]);
        assert!((Utc::now() - added.when).num_seconds().abs() < 5);
    }

    #[test]
    fn test_remove_reading() {
        let store = MemoryStore::new();
        let added = store.add_reading("alice", "a title", "http://a.link").unwrap();

        assert!(matches!(
            store.remove_reading("bob", &added.id),
            Err(Error::NotFound(_))
        ));
        store.remove_reading("alice", &added.id).unwrap();
        assert!(store.find_readings("alice").unwrap().is_empty());
        assert!(matches!(
            store.remove_reading("alice", &added.id),
            Err(Error::NotFound(_))
        ));
    }
}
