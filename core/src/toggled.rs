//! Per-role set of skills in scope for the matrix view.
//!
//! A role's set defaults to every skill of the role on first access.
//! Each entry keeps the title it was toggled with, so skills outside the
//! catalog still display as entered. Each role persists under its own key.

use crate::{
    error::MatrixResult,
    persist::{load_versioned, no_migration, save_versioned, KvStore, StorageKey, TOGGLED_PREFIX},
    types::{RoleId, SkillKey},
};
use std::collections::{BTreeMap, BTreeSet};

pub const TOGGLED_VERSION: u32 = 2;

/// skill → display title.
pub type ToggledSet = BTreeMap<SkillKey, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToggledSkills {
    roles: BTreeMap<RoleId, ToggledSet>,
}

fn entry(title: &str) -> (SkillKey, String) {
    (SkillKey::new(title), title.trim().to_string())
}

impl ToggledSkills {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role_id: &str) -> Option<&ToggledSet> {
        self.roles.get(role_id)
    }

    /// The role's skill keys, if the role has a set.
    pub fn keys(&self, role_id: &str) -> Option<BTreeSet<SkillKey>> {
        self.roles.get(role_id).map(|set| set.keys().cloned().collect())
    }

    pub fn toggled_or_init(&mut self, role_id: &str, default_titles: &[String]) -> &ToggledSet {
        self.roles.entry(role_id.to_string()).or_insert_with(|| {
            log::debug!("role {role_id}: toggling all {} skills by default", default_titles.len());
            default_titles.iter().map(|t| entry(t)).collect()
        })
    }

    pub fn is_toggled(&self, role_id: &str, skill: &SkillKey) -> bool {
        self.roles.get(role_id).is_some_and(|s| s.contains_key(skill))
    }

    /// Flip membership of `title`. Returns whether the skill is toggled afterwards.
    pub fn toggle(&mut self, role_id: &str, title: &str) -> bool {
        let set = self.roles.entry(role_id.to_string()).or_default();
        let (key, title) = entry(title);
        if set.remove(&key).is_some() {
            false
        } else {
            set.insert(key, title);
            true
        }
    }

    /// Replace the role's set. Titles that normalize to the same key keep
    /// the first spelling.
    pub fn set_toggled(&mut self, role_id: &str, titles: &[&str]) {
        let mut set = ToggledSet::new();
        for title in titles {
            let (key, title) = entry(title);
            set.entry(key).or_insert(title);
        }
        self.roles.insert(role_id.to_string(), set);
    }

    // ── Persistence ─────────────────────────────────────────────────

    pub fn persist_role(&self, kv: &mut dyn KvStore, role_id: &str) -> MatrixResult<()> {
        match self.roles.get(role_id) {
            Some(set) => save_versioned(
                kv,
                &StorageKey::RoleToggledSkills(role_id.to_string()),
                TOGGLED_VERSION,
                set,
            ),
            None => Ok(()),
        }
    }

    pub fn persist(&self, kv: &mut dyn KvStore) -> MatrixResult<()> {
        for role_id in self.roles.keys() {
            self.persist_role(kv, role_id)?;
        }
        Ok(())
    }

    /// Load every persisted role. A corrupt role entry is logged and skipped
    /// so one bad blob does not discard the others.
    pub fn load(kv: &dyn KvStore) -> MatrixResult<Self> {
        let mut out = Self::default();
        for key in kv.keys(TOGGLED_PREFIX)? {
            let Some(role_id) = StorageKey::role_suffix(&key, TOGGLED_PREFIX) else {
                continue;
            };
            let storage_key = StorageKey::RoleToggledSkills(role_id.to_string());
            match load_versioned::<ToggledSet, _>(kv, &storage_key, TOGGLED_VERSION, migrate) {
                Ok(Some(set)) => {
                    out.roles.insert(role_id.to_string(), set);
                }
                Ok(None) => {}
                Err(e) => log::warn!("ignoring toggled skills for role {role_id}: {e}"),
            }
        }
        Ok(out)
    }
}

/// Version 1 stored bare keys. The key text stands in for the title.
fn migrate(version: u32, raw: serde_json::Value) -> MatrixResult<ToggledSet> {
    match version {
        1 => {
            let keys: BTreeSet<SkillKey> = serde_json::from_value(raw)?;
            Ok(keys.into_iter().map(|k| (k.clone(), k.to_string())).collect())
        }
        v => no_migration(v, raw),
    }
}
