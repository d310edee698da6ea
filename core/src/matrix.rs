//! Skills-matrix view: composed rows plus the persisted filter.
//!
//! Rows are read-only projections. They own no state of their own and are
//! rebuilt from the catalog, competency and employee stores on each call.

use crate::{
    benchmark::SkillComparison,
    catalog::{SkillCategory, SkillWeight},
    competency::CompetencySkillState,
    error::MatrixResult,
    level::{GoalStatus, Requirement, SkillLevel},
    persist::{load_versioned, no_migration, save_versioned, KvStore, StorageKey},
    types::SkillKey,
};
use serde::{Deserialize, Serialize};

pub const SKILLS_MATRIX_VERSION: u32 = 1;

/// One skill line of an employee's matrix.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatrixRow {
    pub key: SkillKey,
    pub title: String,
    pub category: SkillCategory,
    pub subcategory: String,
    pub weight: SkillWeight,
    pub level: SkillLevel,
    pub goal_status: GoalStatus,
    pub in_development_plan: bool,
    /// The role's cell at the employee's rung, if one exists.
    pub role_requirement: Option<CompetencySkillState>,
    pub comparison: SkillComparison,
}

/// One skill line of a role's matrix at a given rung.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoleMatrixRow {
    pub key: SkillKey,
    pub title: String,
    pub category: SkillCategory,
    pub state: CompetencySkillState,
}

/// Empty vectors mean "no restriction".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MatrixFilter {
    #[serde(default)]
    pub categories: Vec<SkillCategory>,
    #[serde(default)]
    pub levels: Vec<SkillLevel>,
    #[serde(default)]
    pub requirement: Option<Requirement>,
    #[serde(default)]
    pub search: String,
}

impl MatrixFilter {
    pub fn matches(&self, row: &MatrixRow) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&row.category) {
            return false;
        }
        if !self.levels.is_empty() && !self.levels.contains(&row.level) {
            return false;
        }
        if let Some(wanted) = self.requirement {
            if row.role_requirement.map(|r| r.required) != Some(wanted) {
                return false;
            }
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || row.title.to_lowercase().contains(&needle)
    }

    /// Keep matching rows, ordered by category then title.
    pub fn apply(&self, rows: Vec<MatrixRow>) -> Vec<MatrixRow> {
        let mut out: Vec<MatrixRow> = rows.into_iter().filter(|r| self.matches(r)).collect();
        out.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.title.cmp(&b.title)));
        out
    }

    pub fn persist(&self, kv: &mut dyn KvStore) -> MatrixResult<()> {
        save_versioned(kv, &StorageKey::SkillsMatrix, SKILLS_MATRIX_VERSION, self)
    }

    pub fn load(kv: &dyn KvStore) -> MatrixResult<Self> {
        let loaded: Option<Self> =
            load_versioned(kv, &StorageKey::SkillsMatrix, SKILLS_MATRIX_VERSION, no_migration)?;
        Ok(loaded.unwrap_or_default())
    }
}
