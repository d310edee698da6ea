//! Employee skill state: each employee's actual proficiency and intent.
//!
//! No cross-employee invariants. Every write stamps `last_updated`.

use crate::{
    error::MatrixResult,
    level::{GoalStatus, SkillLevel},
    persist::{load_versioned, no_migration, save_versioned, KvStore, StorageKey},
    types::{EmployeeId, SkillKey},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const EMPLOYEE_SKILLS_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmployeeSkillState {
    pub level: SkillLevel,
    pub goal_status: GoalStatus,
    pub in_development_plan: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

/// A partial update. `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct EmployeeSkillUpdate {
    #[serde(default)]
    pub level: Option<SkillLevel>,
    #[serde(default)]
    pub goal_status: Option<GoalStatus>,
    #[serde(default)]
    pub in_development_plan: Option<bool>,
}

impl EmployeeSkillUpdate {
    pub fn level(level: SkillLevel) -> Self {
        Self { level: Some(level), ..Self::default() }
    }

    pub fn goal(goal_status: GoalStatus) -> Self {
        Self { goal_status: Some(goal_status), ..Self::default() }
    }

    fn apply(&self, state: &mut EmployeeSkillState, now: DateTime<Utc>) {
        if let Some(level) = self.level {
            state.level = level;
        }
        if let Some(goal) = self.goal_status {
            state.goal_status = goal;
        }
        if let Some(plan) = self.in_development_plan {
            state.in_development_plan = plan;
        }
        state.last_updated = Some(now);
    }
}

pub type EmployeeSkills = BTreeMap<SkillKey, EmployeeSkillState>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmployeeSkillStore {
    employees: BTreeMap<EmployeeId, EmployeeSkills>,
}

impl EmployeeSkillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an employee from their recorded skills. No-op if already present.
    /// Returns true if the employee was newly initialized.
    pub fn initialize_employee_skills(
        &mut self,
        employee_id: &str,
        seed: &[(SkillKey, SkillLevel)],
    ) -> bool {
        if self.employees.contains_key(employee_id) {
            return false;
        }
        let skills = seed
            .iter()
            .map(|(key, level)| {
                (
                    key.clone(),
                    EmployeeSkillState { level: *level, ..EmployeeSkillState::default() },
                )
            })
            .collect();
        self.employees.insert(employee_id.to_string(), skills);
        log::debug!("employee {employee_id}: seeded {} skills", seed.len());
        true
    }

    pub fn is_initialized(&self, employee_id: &str) -> bool {
        self.employees.contains_key(employee_id)
    }

    pub fn update_skill_state(
        &mut self,
        employee_id: &str,
        skill: &SkillKey,
        update: EmployeeSkillUpdate,
    ) -> EmployeeSkillState {
        self.update_skill_state_at(employee_id, skill, update, Utc::now())
    }

    pub fn update_skill_state_at(
        &mut self,
        employee_id: &str,
        skill: &SkillKey,
        update: EmployeeSkillUpdate,
        now: DateTime<Utc>,
    ) -> EmployeeSkillState {
        let state = self
            .employees
            .entry(employee_id.to_string())
            .or_default()
            .entry(skill.clone())
            .or_default();
        update.apply(state, now);
        state.clone()
    }

    /// Apply all updates as one commit, sharing one timestamp.
    pub fn batch_update_skills(
        &mut self,
        employee_id: &str,
        updates: &BTreeMap<SkillKey, EmployeeSkillUpdate>,
    ) {
        let now = Utc::now();
        let skills = self.employees.entry(employee_id.to_string()).or_default();
        for (skill, update) in updates {
            update.apply(skills.entry(skill.clone()).or_default(), now);
        }
        log::debug!("employee {employee_id}: batch updated {} skills", updates.len());
    }

    pub fn skill_state(&self, employee_id: &str, skill: &SkillKey) -> Option<&EmployeeSkillState> {
        self.employees.get(employee_id)?.get(skill)
    }

    /// Missing entries read as unspecified / unknown.
    pub fn skill_state_or_default(&self, employee_id: &str, skill: &SkillKey) -> EmployeeSkillState {
        self.skill_state(employee_id, skill).cloned().unwrap_or_default()
    }

    pub fn skills_for(&self, employee_id: &str) -> Option<&EmployeeSkills> {
        self.employees.get(employee_id)
    }

    /// skill → level view, as consumed by the benchmark calculator.
    pub fn levels_for(&self, employee_id: &str) -> BTreeMap<SkillKey, SkillLevel> {
        self.employees
            .get(employee_id)
            .map(|skills| skills.iter().map(|(k, s)| (k.clone(), s.level)).collect())
            .unwrap_or_default()
    }

    // ── Persistence ─────────────────────────────────────────────────

    pub fn persist(&self, kv: &mut dyn KvStore) -> MatrixResult<()> {
        save_versioned(kv, &StorageKey::EmployeeSkills, EMPLOYEE_SKILLS_VERSION, self)
    }

    pub fn load(kv: &dyn KvStore) -> MatrixResult<Self> {
        let loaded: Option<Self> = load_versioned(
            kv,
            &StorageKey::EmployeeSkills,
            EMPLOYEE_SKILLS_VERSION,
            no_migration,
        )?;
        Ok(loaded.unwrap_or_default())
    }
}
