//! Skill catalog: the read-only dictionary of skill definitions.
//!
//! Lookups go through `SkillKey`, so callers may pass any casing or spacing
//! of a title. `get` reports absence; `unified_skill` never fails and
//! synthesizes a common/intermediate entry for titles it does not know.

use crate::{level::SkillLevel, types::SkillKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Specialized,
    Common,
    Certification,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 3] = [
        SkillCategory::Specialized,
        SkillCategory::Common,
        SkillCategory::Certification,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SkillCategory::Specialized   => "specialized",
            SkillCategory::Common        => "common",
            SkillCategory::Certification => "certification",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkillWeight {
    Critical,
    Technical,
    #[default]
    Necessary,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

/// Which benchmark sources list this skill (business, role, market, organization).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillBenchmarks {
    #[serde(rename = "B", default)]
    pub business: bool,
    #[serde(rename = "R", default)]
    pub role: bool,
    #[serde(rename = "M", default)]
    pub market: bool,
    #[serde(rename = "O", default)]
    pub organization: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subcategory: String,
    pub category: SkillCategory,
    #[serde(default)]
    pub business_category: String,
    #[serde(default)]
    pub weight: SkillWeight,
    #[serde(default)]
    pub level: SkillLevel,
    #[serde(default)]
    pub growth: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub benchmarks: SkillBenchmarks,
}

impl Skill {
    pub fn key(&self) -> SkillKey {
        SkillKey::new(&self.title)
    }

    /// The stand-in entry for a title missing from the catalog.
    pub fn synthesized(title: &str) -> Self {
        let key = SkillKey::new(title);
        Self {
            id: format!("synthetic:{key}"),
            title: title.trim().to_string(),
            subcategory: "General".into(),
            category: SkillCategory::Common,
            business_category: "Uncategorized".into(),
            weight: SkillWeight::Necessary,
            level: SkillLevel::Intermediate,
            growth: String::new(),
            salary: String::new(),
            confidence: Confidence::Low,
            benchmarks: SkillBenchmarks::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    skills: HashMap<SkillKey, Skill>,
}

impl SkillCatalog {
    pub fn new(skills: Vec<Skill>) -> Self {
        let mut catalog = Self::default();
        for skill in skills {
            let key = skill.key();
            if catalog.skills.insert(key, skill).is_some() {
                log::warn!("duplicate catalog title, keeping the later entry");
            }
        }
        catalog
    }

    pub fn get(&self, title: &str) -> Option<&Skill> {
        self.skills.get(&SkillKey::new(title))
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// Catalog entry for `title`, or a synthesized common/intermediate skill.
    pub fn unified_skill(&self, title: &str) -> Skill {
        match self.get(title) {
            Some(skill) => skill.clone(),
            None => {
                log::debug!("skill '{title}' not in catalog, synthesizing default entry");
                Skill::synthesized(title)
            }
        }
    }

    pub fn category_of(&self, key: &SkillKey) -> SkillCategory {
        self.skills
            .get(key)
            .map(|s| s.category)
            .unwrap_or(SkillCategory::Common)
    }

    /// All skills of one category, sorted by title.
    pub fn by_category(&self, category: SkillCategory) -> Vec<&Skill> {
        let mut out: Vec<&Skill> = self
            .skills
            .values()
            .filter(|s| s.category == category)
            .collect();
        out.sort_by(|a, b| a.title.cmp(&b.title));
        out
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
