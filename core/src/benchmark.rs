//! Benchmark / match calculator.
//!
//! Pure functions over already-loaded collections. Nothing here touches a
//! store; the engine resolves requirements and employee levels first.
//!
//! Match percentage for one skill is a continuous ratio of level
//! priorities, capped at 100:
//!
//!   match = min(100, employee_priority * 100 / required_priority)
//!
//! An `unspecified` requirement is met by anyone. The benchmark for an
//! employee against a role is the mean match over the role's toggled skills.

use crate::{
    catalog::{SkillCatalog, SkillCategory},
    competency::{CompetencySkillState, CompetencyStore},
    employee::Employee,
    employee_skills::EmployeeSkills,
    level::{GoalStatus, LevelKey, Requirement, SkillLevel},
    role::RoleProfile,
    toggled::ToggledSet,
    types::SkillKey,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SkillComparison {
    pub match_percentage: u32,
    /// How many rungs the employee is short. Zero when met or exceeded.
    pub gap_level: u32,
}

pub fn compare_skill_levels(employee: SkillLevel, required: SkillLevel) -> SkillComparison {
    let have = employee.priority();
    let need = required.priority();
    let match_percentage = if need == 0 {
        100
    } else {
        (have * 100 / need).min(100)
    };
    SkillComparison {
        match_percentage,
        gap_level: need.saturating_sub(have),
    }
}

/// What a role expects for one toggled skill, after resolving the
/// competency cell against the profile and catalog.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EffectiveRequirement {
    pub key: SkillKey,
    pub title: String,
    pub category: SkillCategory,
    pub level: SkillLevel,
    pub requirement: Requirement,
}

/// Resolve requirements for every toggled skill, in key order.
///
/// Level and kind resolve separately. A competency cell at `level_key`
/// decides the kind whenever it differs from the default cell, and the
/// level whenever its level is set. Anything left falls back to the
/// profile, and for skills outside the profile to the catalog level with
/// preferred. Such skills keep the title they were toggled with.
pub fn resolve_requirements(
    role: &RoleProfile,
    catalog: &SkillCatalog,
    competency: &CompetencyStore,
    level_key: Option<LevelKey>,
    toggled: &ToggledSet,
) -> Vec<EffectiveRequirement> {
    toggled
        .iter()
        .map(|(key, title)| {
            let profile = role.skills.find(key);
            let cell = level_key.and_then(|lk| competency.skill_state(&role.role_id, key, lk));
            let skill = profile
                .map(|p| p.skill.clone())
                .unwrap_or_else(|| catalog.unified_skill(title));

            let level = cell
                .map(|c| c.level)
                .filter(|l| *l != SkillLevel::Unspecified)
                .or_else(|| profile.map(|p| p.minimum_level))
                .unwrap_or(skill.level);
            let requirement = cell
                .filter(|c| *c != CompetencySkillState::default())
                .map(|c| c.required)
                .or_else(|| profile.map(|p| p.requirement_level))
                .unwrap_or(Requirement::Preferred);

            EffectiveRequirement {
                key: key.clone(),
                title: skill.title,
                category: skill.category,
                level,
                requirement,
            }
        })
        .collect()
}

/// Mean match percentage over `requirements`. Absent employee skills count
/// as unspecified. No requirements scores zero.
pub fn benchmark_percentage(
    employee_levels: &BTreeMap<SkillKey, SkillLevel>,
    requirements: &[EffectiveRequirement],
) -> u32 {
    if requirements.is_empty() {
        return 0;
    }
    let total: u32 = requirements
        .iter()
        .map(|r| {
            let have = employee_levels.get(&r.key).copied().unwrap_or_default();
            compare_skill_levels(have, r.level).match_percentage
        })
        .sum();
    total / requirements.len() as u32
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedEmployee<'a> {
    pub employee: &'a Employee,
    pub benchmark: u32,
    pub exact_match: bool,
}

/// True when the employee already holds `role` (title compared normalized,
/// with or without the level suffix).
pub fn is_exact_role_match(employee: &Employee, role: &RoleProfile) -> bool {
    let wanted = SkillKey::new(&role.title);
    SkillKey::new(&employee.role) == wanted || SkillKey::new(employee.role_title()) == wanted
}

/// Exact role holders first, in input order. Everyone else follows,
/// sorted by descending benchmark (stable, so ties keep input order).
pub fn sort_employees_by_role_match<'a, F>(
    employees: &'a [Employee],
    role: &RoleProfile,
    requirements: &[EffectiveRequirement],
    levels_of: F,
) -> Vec<RankedEmployee<'a>>
where
    F: Fn(&Employee) -> BTreeMap<SkillKey, SkillLevel>,
{
    let (mut exact, mut partial): (Vec<_>, Vec<_>) = employees
        .iter()
        .map(|employee| RankedEmployee {
            employee,
            benchmark: benchmark_percentage(&levels_of(employee), requirements),
            exact_match: is_exact_role_match(employee, role),
        })
        .partition(|r| r.exact_match);

    partial.sort_by(|a, b| b.benchmark.cmp(&a.benchmark));
    exact.append(&mut partial);
    exact
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CategoryCounts {
    pub specialized: usize,
    pub common: usize,
    pub certification: usize,
}

impl CategoryCounts {
    pub fn increment(&mut self, category: SkillCategory) {
        match category {
            SkillCategory::Specialized   => self.specialized += 1,
            SkillCategory::Common        => self.common += 1,
            SkillCategory::Certification => self.certification += 1,
        }
    }

    pub fn get(&self, category: SkillCategory) -> usize {
        match category {
            SkillCategory::Specialized   => self.specialized,
            SkillCategory::Common        => self.common,
            SkillCategory::Certification => self.certification,
        }
    }

    pub fn total(&self) -> usize {
        self.specialized + self.common + self.certification
    }
}

/// Toggled skills the role marks as required, per category.
pub fn count_required_by_category(requirements: &[EffectiveRequirement]) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for r in requirements.iter().filter(|r| r.requirement == Requirement::Required) {
        counts.increment(r.category);
    }
    counts
}

/// Toggled skills the employee has set as a goal, per category.
pub fn count_goals_by_category(
    skills: &EmployeeSkills,
    toggled: &BTreeSet<SkillKey>,
    catalog: &SkillCatalog,
) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for (key, state) in skills {
        if state.goal_status == GoalStatus::SkillGoal && toggled.contains(key) {
            counts.increment(catalog.category_of(key));
        }
    }
    counts
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MissingSkill {
    pub key: SkillKey,
    pub title: String,
    pub category: SkillCategory,
    pub current: SkillLevel,
    pub required: SkillLevel,
    pub requirement: Requirement,
    pub gap: u32,
}

/// Requirements the employee falls short of. Required before preferred,
/// then larger gaps first, then title.
pub fn missing_skills(
    employee_levels: &BTreeMap<SkillKey, SkillLevel>,
    requirements: &[EffectiveRequirement],
) -> Vec<MissingSkill> {
    let mut out: Vec<MissingSkill> = requirements
        .iter()
        .filter_map(|r| {
            let current = employee_levels.get(&r.key).copied().unwrap_or_default();
            let cmp = compare_skill_levels(current, r.level);
            (cmp.gap_level > 0).then(|| MissingSkill {
                key: r.key.clone(),
                title: r.title.clone(),
                category: r.category,
                current,
                required: r.level,
                requirement: r.requirement,
                gap: cmp.gap_level,
            })
        })
        .collect();

    out.sort_by(|a, b| {
        let rank = |m: &MissingSkill| match m.requirement {
            Requirement::Required  => 0,
            Requirement::Preferred => 1,
        };
        rank(a)
            .cmp(&rank(b))
            .then(b.gap.cmp(&a.gap))
            .then(a.title.cmp(&b.title))
    });
    out
}
