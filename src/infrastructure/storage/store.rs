#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

pub const TRANSCRIPT: &str = "transcript";
pub const COURSES: &str = "courses";
pub const GROUPS: &str = "study-groups";
pub const PARTNERS: &str = "partners";

/// One JSON file per collection under the data directory. Reads are
/// forgiving: a missing or corrupt file behaves like an empty store and
/// the seeds take over.
pub struct Store {
    pub data_dir: path::PathBuf,
}

impl Default for Store {
    fn default() -> Store {
        return Store::new(path::PathBuf::from(Config::get(ConfigKey::DataDir)));
    }
}

impl Store {
    pub fn new(data_dir: path::PathBuf) -> Store {
        return Store { data_dir };
    }

    fn file_path(&self, collection: &str) -> path::PathBuf {
        return self.data_dir.join(format!("{collection}.json"));
    }

    pub async fn read<T: DeserializeOwned>(&self, collection: &str) -> Option<T> {
        let file_path = self.file_path(collection);
        if !file_path.exists() {
            return None;
        }

        let payload = match fs::read_to_string(&file_path).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(collection = collection, error = ?err, "unreadable collection");
                return None;
            }
        };

        match serde_json::from_str::<T>(&payload) {
            Ok(value) => return Some(value),
            Err(err) => {
                tracing::warn!(collection = collection, error = ?err, "corrupt collection");
                return None;
            }
        }
    }

    pub async fn write<T: Serialize>(&self, collection: &str, value: &T) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).await?;
        }

        let payload = serde_json::to_string_pretty(value)?;
        let mut file = fs::File::create(self.file_path(collection)).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }
}
