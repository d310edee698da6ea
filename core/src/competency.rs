//! Role competency state: what level and requirement a role expects for
//! each skill at each seniority rung.
//!
//! Edit-buffer model. `current` is the working copy, `saved` the last
//! committed snapshot. `set_skill_state` edits `current`; `save_changes`
//! copies it into `saved`; `cancel_changes` copies `saved` back.
//!
//! There is one default for a missing cell, `CompetencySkillState::default()`
//! (unspecified / preferred). Reads return `Option` and leave the choice
//! of default to the caller.

use crate::{
    error::MatrixResult,
    level::{LevelKey, Requirement, SkillLevel},
    persist::{load_versioned, save_versioned, KvStore, StorageKey},
    types::{RoleId, SkillKey},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const COMPETENCY_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompetencySkillState {
    pub level: SkillLevel,
    pub required: Requirement,
}

impl CompetencySkillState {
    pub fn new(level: SkillLevel, required: Requirement) -> Self {
        Self { level, required }
    }
}

/// skill → rung → cell, for one role.
pub type RoleCompetency = BTreeMap<SkillKey, BTreeMap<LevelKey, CompetencySkillState>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompetencyStore {
    current: BTreeMap<RoleId, RoleCompetency>,
    saved: BTreeMap<RoleId, RoleCompetency>,
    #[serde(skip)]
    dirty: BTreeSet<RoleId>,
}

impl CompetencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill every missing cell for `skills` × all rungs with the default.
    /// Existing cells are left untouched. Returns the number of cells created.
    pub fn initialize_state(&mut self, role_id: &str, skills: &[SkillKey]) -> usize {
        let role = self.current.entry(role_id.to_string()).or_default();
        let mut created = 0;
        for skill in skills {
            let levels = role.entry(skill.clone()).or_default();
            for level_key in LevelKey::ALL {
                levels.entry(level_key).or_insert_with(|| {
                    created += 1;
                    CompetencySkillState::default()
                });
            }
        }

        if !self.saved.contains_key(role_id) {
            // First initialization becomes the baseline to cancel back to.
            let baseline = self.current.get(role_id).cloned().unwrap_or_default();
            self.saved.insert(role_id.to_string(), baseline);
        }
        self.refresh_dirty(role_id);

        log::debug!("role {role_id}: initialized {created} competency cells");
        created
    }

    /// Add default cells for a skill newly attached to an initialized role.
    /// Both copies get the cells, so the profile change is not a pending edit.
    pub fn extend_role(&mut self, role_id: &str, skill: &SkillKey) {
        for map in [&mut self.current, &mut self.saved] {
            if let Some(role) = map.get_mut(role_id) {
                let levels = role.entry(skill.clone()).or_default();
                for level_key in LevelKey::ALL {
                    levels.entry(level_key).or_default();
                }
            }
        }
        self.refresh_dirty(role_id);
    }

    pub fn is_initialized(&self, role_id: &str) -> bool {
        self.current.contains_key(role_id)
    }

    pub fn skill_state(
        &self,
        role_id: &str,
        skill: &SkillKey,
        level_key: LevelKey,
    ) -> Option<CompetencySkillState> {
        self.current
            .get(role_id)?
            .get(skill)?
            .get(&level_key)
            .copied()
    }

    pub fn skill_state_or_default(
        &self,
        role_id: &str,
        skill: &SkillKey,
        level_key: LevelKey,
    ) -> CompetencySkillState {
        self.skill_state(role_id, skill, level_key).unwrap_or_default()
    }

    /// Upsert one cell and recompute the role's change flag.
    pub fn set_skill_state(
        &mut self,
        role_id: &str,
        skill: &SkillKey,
        level_key: LevelKey,
        state: CompetencySkillState,
    ) {
        self.current
            .entry(role_id.to_string())
            .or_default()
            .entry(skill.clone())
            .or_default()
            .insert(level_key, state);
        self.refresh_dirty(role_id);
        log::debug!(
            "role {role_id}: {skill}@{level_key} = {}/{}",
            state.level,
            state.required
        );
    }

    pub fn role_state(&self, role_id: &str) -> Option<&RoleCompetency> {
        self.current.get(role_id)
    }

    pub fn saved_state(&self, role_id: &str) -> Option<&RoleCompetency> {
        self.saved.get(role_id)
    }

    pub fn has_changes(&self, role_id: &str) -> bool {
        self.dirty.contains(role_id)
    }

    /// Commit the working copy. Returns false if there was nothing to commit.
    pub fn save_changes(&mut self, role_id: &str) -> bool {
        let Some(current) = self.current.get(role_id) else {
            return false;
        };
        let changed = self.dirty.contains(role_id);
        self.saved.insert(role_id.to_string(), current.clone());
        self.dirty.remove(role_id);
        changed
    }

    /// Roll the working copy back to the last snapshot.
    /// Returns false if there was nothing to discard.
    pub fn cancel_changes(&mut self, role_id: &str) -> bool {
        let changed = self.dirty.contains(role_id);
        match self.saved.get(role_id) {
            Some(saved) => {
                self.current.insert(role_id.to_string(), saved.clone());
            }
            None => {
                self.current.remove(role_id);
            }
        }
        self.dirty.remove(role_id);
        changed
    }

    fn refresh_dirty(&mut self, role_id: &str) {
        if self.current.get(role_id) != self.saved.get(role_id) {
            self.dirty.insert(role_id.to_string());
        } else {
            self.dirty.remove(role_id);
        }
    }

    fn rebuild_dirty(&mut self) {
        let roles: Vec<RoleId> = self
            .current
            .keys()
            .chain(self.saved.keys())
            .cloned()
            .collect();
        for role in roles {
            self.refresh_dirty(&role);
        }
    }

    // ── Persistence ─────────────────────────────────────────────────

    pub fn persist(&self, kv: &mut dyn KvStore) -> MatrixResult<()> {
        save_versioned(kv, &StorageKey::Competency, COMPETENCY_VERSION, self)
    }

    /// Load from `kv`; an absent key gives an empty store.
    pub fn load(kv: &dyn KvStore) -> MatrixResult<Self> {
        let loaded: Option<Self> =
            load_versioned(kv, &StorageKey::Competency, COMPETENCY_VERSION, migrate)?;
        let mut store = loaded.unwrap_or_default();
        store.rebuild_dirty();
        Ok(store)
    }
}

/// Version 1 persisted only the working map. It becomes both copies.
fn migrate(version: u32, raw: serde_json::Value) -> MatrixResult<CompetencyStore> {
    match version {
        1 => {
            let flat: BTreeMap<RoleId, RoleCompetency> = serde_json::from_value(raw)?;
            Ok(CompetencyStore {
                current: flat.clone(),
                saved: flat,
                dirty: BTreeSet::new(),
            })
        }
        v => crate::persist::no_migration(v, raw),
    }
}
