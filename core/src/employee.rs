//! Employee records as loaded from config.

use crate::{
    level::{LevelKey, SkillLevel},
    types::{EmployeeId, SkillKey},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A recorded skill on the employee's profile, used to seed skill state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeSkill {
    pub title: String,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// "Title: Level", e.g. "Frontend Engineer: P4".
    pub role: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub office: String,
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub category: String,
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub term_date: Option<NaiveDate>,
    #[serde(default)]
    pub skills: Vec<EmployeeSkill>,
}

impl Employee {
    /// The part of `role` before the level suffix.
    pub fn role_title(&self) -> &str {
        match self.role.split_once(':') {
            Some((title, _)) => title.trim(),
            None => self.role.trim(),
        }
    }

    /// The seniority rung after the colon, if present and recognised.
    pub fn level_key(&self) -> Option<LevelKey> {
        self.role
            .split_once(':')
            .and_then(|(_, level)| level.trim().parse().ok())
    }

    pub fn seed_levels(&self) -> Vec<(SkillKey, SkillLevel)> {
        self.skills
            .iter()
            .map(|s| (SkillKey::new(&s.title), s.level))
            .collect()
    }
}
