use crate::core::store::KeyValueStore;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "storage";

/// fjall-backed store. Every write is synced before returning.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self, fjall::Error> {
        let keyspace = fjall::Config::new(path).open()?;
        let partition = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl KeyValueStore for DiskStore {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.partition.get(key) {
            Ok(Some(bytes)) => match std::str::from_utf8(&bytes) {
                Ok(value) => {
                    debug!("Store HIT for key: {}", key);
                    Some(value.to_owned())
                }
                Err(e) => {
                    debug!("Store value for key {} is not UTF-8: {}", key, e);
                    None
                }
            },
            Ok(None) => {
                debug!("Store MISS for key: {}", key);
                None
            }
            Err(e) => {
                debug!("DiskStore get error: {}", e);
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        let res = self
            .partition
            .insert(key, value)
            .and_then(|_| self.keyspace.persist(PersistMode::SyncAll));
        match res {
            Ok(()) => debug!("Store PUT for key: {}", key),
            Err(e) => debug!("DiskStore put error: {}", e),
        }
    }

    fn remove_item(&self, key: &str) {
        let res = self
            .partition
            .remove(key)
            .and_then(|_| self.keyspace.persist(PersistMode::SyncAll));
        if let Err(e) = res {
            debug!("DiskStore remove error: {}", e);
        }
    }
}
