//! Role profiles and their skill requirements.
//!
//! A profile buckets its requirements by catalog category (specialized,
//! common, certifications). Profiles come from config; skills added at
//! runtime are tracked separately so they can be persisted per role.

use crate::{
    catalog::{Skill, SkillCatalog, SkillCategory},
    error::MatrixResult,
    level::{LevelKey, Requirement, SkillLevel, Track},
    persist::{load_versioned, no_migration, save_versioned, KvStore, StorageKey, ROLE_SKILLS_PREFIX},
    types::{RoleId, SkillKey},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ROLE_SKILLS_VERSION: u32 = 1;

/// A catalog skill as required by one role profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleSkillRequirement {
    #[serde(flatten)]
    pub skill: Skill,
    pub minimum_level: SkillLevel,
    pub requirement_level: Requirement,
}

impl RoleSkillRequirement {
    pub fn key(&self) -> SkillKey {
        self.skill.key()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoleSkillData {
    pub title: String,
    #[serde(default)]
    pub specialized: Vec<RoleSkillRequirement>,
    #[serde(default)]
    pub common: Vec<RoleSkillRequirement>,
    #[serde(default)]
    pub certifications: Vec<RoleSkillRequirement>,
}

impl RoleSkillData {
    pub fn bucket(&self, category: SkillCategory) -> &[RoleSkillRequirement] {
        match category {
            SkillCategory::Specialized   => &self.specialized,
            SkillCategory::Common        => &self.common,
            SkillCategory::Certification => &self.certifications,
        }
    }

    fn bucket_mut(&mut self, category: SkillCategory) -> &mut Vec<RoleSkillRequirement> {
        match category {
            SkillCategory::Specialized   => &mut self.specialized,
            SkillCategory::Common        => &mut self.common,
            SkillCategory::Certification => &mut self.certifications,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleSkillRequirement> {
        self.specialized
            .iter()
            .chain(self.common.iter())
            .chain(self.certifications.iter())
    }

    pub fn find(&self, key: &SkillKey) -> Option<&RoleSkillRequirement> {
        self.iter().find(|r| &r.key() == key)
    }

    /// Insert into the bucket matching the skill's category.
    /// Returns false if the role already lists the title.
    pub fn insert(&mut self, requirement: RoleSkillRequirement) -> bool {
        if self.find(&requirement.key()).is_some() {
            return false;
        }
        self.bucket_mut(requirement.skill.category).push(requirement);
        true
    }

    pub fn len(&self) -> usize {
        self.specialized.len() + self.common.len() + self.certifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleProfile {
    pub role_id: RoleId,
    pub title: String,
    pub track: Track,
    pub skills: RoleSkillData,
}

impl RoleProfile {
    pub fn skill_keys(&self) -> Vec<SkillKey> {
        self.skills.iter().map(|r| r.key()).collect()
    }

    pub fn skill_titles(&self) -> Vec<String> {
        self.skills.iter().map(|r| r.skill.title.clone()).collect()
    }

    /// Whether `level_key` sits on this profile's track.
    pub fn offers_level(&self, level_key: LevelKey) -> bool {
        level_key.track() == self.track
    }
}

// ── Config file shapes ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSkillEntry {
    pub title: String,
    #[serde(default = "default_minimum_level")]
    pub minimum_level: SkillLevel,
    #[serde(default)]
    pub requirement_level: Requirement,
}

fn default_minimum_level() -> SkillLevel {
    SkillLevel::Intermediate
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfileConfig {
    pub role_id: RoleId,
    pub title: String,
    pub track: Track,
    pub skills: Vec<RoleSkillEntry>,
}

impl RoleSkillEntry {
    pub fn resolve(&self, catalog: &SkillCatalog) -> RoleSkillRequirement {
        RoleSkillRequirement {
            skill: catalog.unified_skill(&self.title),
            minimum_level: self.minimum_level,
            requirement_level: self.requirement_level,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoleCatalog {
    profiles: BTreeMap<RoleId, RoleProfile>,
    /// Skills added after load, per role, in insertion order.
    added: BTreeMap<RoleId, Vec<RoleSkillEntry>>,
}

impl RoleCatalog {
    pub fn from_config(configs: &[RoleProfileConfig], catalog: &SkillCatalog) -> Self {
        let profiles = configs
            .iter()
            .map(|c| {
                let mut skills = RoleSkillData {
                    title: c.title.clone(),
                    ..RoleSkillData::default()
                };
                for entry in &c.skills {
                    if !skills.insert(entry.resolve(catalog)) {
                        log::warn!("role {} lists '{}' twice", c.role_id, entry.title);
                    }
                }
                (
                    c.role_id.clone(),
                    RoleProfile {
                        role_id: c.role_id.clone(),
                        title: c.title.clone(),
                        track: c.track,
                        skills,
                    },
                )
            })
            .collect();
        Self { profiles, added: BTreeMap::new() }
    }

    pub fn get(&self, role_id: &str) -> Option<&RoleProfile> {
        self.profiles.get(role_id)
    }

    /// Profile whose title matches `title` after normalization.
    pub fn find_by_title(&self, title: &str) -> Option<&RoleProfile> {
        let wanted = SkillKey::new(title);
        self.profiles
            .values()
            .find(|p| SkillKey::new(&p.title) == wanted)
    }

    pub fn role_ids(&self) -> impl Iterator<Item = &RoleId> {
        self.profiles.keys()
    }

    pub fn skill_keys(&self, role_id: &str) -> Option<Vec<SkillKey>> {
        self.get(role_id).map(RoleProfile::skill_keys)
    }

    pub fn requirement(&self, role_id: &str, key: &SkillKey) -> Option<&RoleSkillRequirement> {
        self.get(role_id).and_then(|p| p.skills.find(key))
    }

    /// Add a skill to a role's profile. `None` if the role is unknown,
    /// `Some(false)` if the role already lists the skill.
    pub fn add_skill(
        &mut self,
        role_id: &str,
        entry: RoleSkillEntry,
        catalog: &SkillCatalog,
    ) -> Option<bool> {
        let profile = self.profiles.get_mut(role_id)?;
        let inserted = profile.skills.insert(entry.resolve(catalog));
        if inserted {
            self.added.entry(role_id.to_string()).or_default().push(entry);
        }
        Some(inserted)
    }

    pub fn added_skills(&self, role_id: &str) -> &[RoleSkillEntry] {
        self.added.get(role_id).map(Vec::as_slice).unwrap_or(&[])
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Only runtime additions are persisted; profiles themselves come from config.
    pub fn persist(&self, kv: &mut dyn KvStore) -> MatrixResult<()> {
        for (role_id, entries) in &self.added {
            save_versioned(
                kv,
                &StorageKey::RoleSkills(role_id.clone()),
                ROLE_SKILLS_VERSION,
                entries,
            )?;
        }
        Ok(())
    }

    /// Re-apply persisted additions on top of the config profiles.
    /// Returns the number of skills restored.
    pub fn restore_added(&mut self, kv: &dyn KvStore, catalog: &SkillCatalog) -> MatrixResult<usize> {
        let mut restored = 0;
        for key in kv.keys(ROLE_SKILLS_PREFIX)? {
            let Some(role_id) = StorageKey::role_suffix(&key, ROLE_SKILLS_PREFIX) else {
                continue;
            };
            let storage_key = StorageKey::RoleSkills(role_id.to_string());
            let entries: Vec<RoleSkillEntry> =
                match load_versioned(kv, &storage_key, ROLE_SKILLS_VERSION, no_migration) {
                    Ok(Some(entries)) => entries,
                    Ok(None) => continue,
                    Err(e) => {
                        log::warn!("ignoring added skills for role {role_id}: {e}");
                        continue;
                    }
                };
            for entry in entries {
                match self.add_skill(role_id, entry, catalog) {
                    Some(true) => restored += 1,
                    Some(false) => {}
                    None => log::warn!("persisted skills reference unknown role {role_id}"),
                }
            }
        }
        Ok(restored)
    }
}
