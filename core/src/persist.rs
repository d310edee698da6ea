//! Key-value persistence for the state stores.
//!
//! RULE: every persisted key is built by `StorageKey`. No store formats
//! key strings itself.
//!
//! Each blob is a JSON `Versioned` envelope. Loading an older version runs
//! the store's migration function; a newer version is refused with
//! `MatrixError::SchemaVersion` so the caller can fall back to defaults.

use crate::{
    error::{MatrixError, MatrixResult},
    types::RoleId,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;

/// Byte-oriented key-value storage.
pub trait KvStore {
    fn get(&self, key: &str) -> MatrixResult<Option<Vec<u8>>>;
    fn set(&mut self, key: &str, value: &[u8]) -> MatrixResult<()>;
    /// All keys starting with `prefix`, sorted.
    fn keys(&self, prefix: &str) -> MatrixResult<Vec<String>>;
}

/// In-process storage. Used in tests and when no database is configured.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> MatrixResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> MatrixResult<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn keys(&self, prefix: &str) -> MatrixResult<Vec<String>> {
        Ok(self
            .entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}

pub const TOGGLED_PREFIX: &str = "roleToggledSkills-";
pub const ROLE_SKILLS_PREFIX: &str = "roleSkills-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKey {
    Competency,
    EmployeeSkills,
    SkillsMatrix,
    RoleToggledSkills(RoleId),
    RoleSkills(RoleId),
}

impl StorageKey {
    pub fn as_key(&self) -> String {
        match self {
            StorageKey::Competency              => "competency-storage".to_string(),
            StorageKey::EmployeeSkills          => "employee-skills-storage".to_string(),
            StorageKey::SkillsMatrix            => "skills-matrix-storage".to_string(),
            StorageKey::RoleToggledSkills(role) => format!("{TOGGLED_PREFIX}{role}"),
            StorageKey::RoleSkills(role)        => format!("{ROLE_SKILLS_PREFIX}{role}"),
        }
    }

    /// Recover the role id from a per-role key.
    pub fn role_suffix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
        key.strip_prefix(prefix).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u32,
    pub state: T,
}

/// Write `state` under `key` at `version`.
pub fn save_versioned<T: Serialize>(
    kv: &mut dyn KvStore,
    key: &StorageKey,
    version: u32,
    state: &T,
) -> MatrixResult<()> {
    let bytes = serde_json::to_vec(&Versioned { version, state })?;
    kv.set(&key.as_key(), &bytes)
}

/// Read the blob under `key`.
///
/// - absent key: `Ok(None)`
/// - `version == current`: decoded directly
/// - `version < current`: the raw `state` value is handed to `migrate`
/// - `version > current`: `MatrixError::SchemaVersion`
pub fn load_versioned<T, F>(
    kv: &dyn KvStore,
    key: &StorageKey,
    current: u32,
    migrate: F,
) -> MatrixResult<Option<T>>
where
    T: DeserializeOwned,
    F: FnOnce(u32, serde_json::Value) -> MatrixResult<T>,
{
    let key_text = key.as_key();
    let Some(bytes) = kv.get(&key_text)? else {
        return Ok(None);
    };
    let envelope: Versioned<serde_json::Value> = serde_json::from_slice(&bytes)?;
    match envelope.version {
        v if v == current => Ok(Some(serde_json::from_value(envelope.state)?)),
        v if v < current => {
            log::info!("migrating '{key_text}' from version {v} to {current}");
            migrate(v, envelope.state).map(Some)
        }
        v => Err(MatrixError::SchemaVersion { key: key_text, found: v, supported: current }),
    }
}

/// Migration for stores that have never changed shape.
pub fn no_migration<T>(version: u32, _state: serde_json::Value) -> MatrixResult<T> {
    Err(MatrixError::Other(anyhow::anyhow!(
        "no migration registered from version {version}"
    )))
}
