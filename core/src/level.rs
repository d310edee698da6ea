//! Proficiency levels, requirement kinds, goal statuses and seniority rungs.
//!
//! Every enum serializes as its snake_case name and parses back from the
//! same text case-insensitively, so UI selections and persisted blobs share
//! one vocabulary.

use crate::error::{MatrixError, MatrixResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    #[default]
    Unspecified,
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Unspecified,
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
    ];

    /// Ordinal used by every comparison: advanced=3 ... unspecified=0.
    pub fn priority(self) -> u32 {
        match self {
            SkillLevel::Unspecified  => 0,
            SkillLevel::Beginner     => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced     => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Unspecified  => "unspecified",
            SkillLevel::Beginner     => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced     => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Required,
    #[default]
    Preferred,
}

impl Requirement {
    pub fn as_str(self) -> &'static str {
        match self {
            Requirement::Required  => "required",
            Requirement::Preferred => "preferred",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Unknown,
    SkillGoal,
    NotInterested,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalStatus::Unknown       => "unknown",
            GoalStatus::SkillGoal     => "skill_goal",
            GoalStatus::NotInterested => "not_interested",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Professional,
    Managerial,
}

/// A seniority rung on one of the two tracks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LevelKey {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    M3,
    M4,
    M5,
    M6,
}

impl LevelKey {
    pub const ALL: [LevelKey; 10] = [
        LevelKey::P1,
        LevelKey::P2,
        LevelKey::P3,
        LevelKey::P4,
        LevelKey::P5,
        LevelKey::P6,
        LevelKey::M3,
        LevelKey::M4,
        LevelKey::M5,
        LevelKey::M6,
    ];

    pub fn track(self) -> Track {
        match self {
            LevelKey::M3 | LevelKey::M4 | LevelKey::M5 | LevelKey::M6 => Track::Managerial,
            _ => Track::Professional,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LevelKey::P1 => "p1",
            LevelKey::P2 => "p2",
            LevelKey::P3 => "p3",
            LevelKey::P4 => "p4",
            LevelKey::P5 => "p5",
            LevelKey::P6 => "p6",
            LevelKey::M3 => "m3",
            LevelKey::M4 => "m4",
            LevelKey::M5 => "m5",
            LevelKey::M6 => "m6",
        }
    }
}

fn parse_by_name<T: Copy>(
    kind: &'static str,
    text: &str,
    candidates: &[T],
    name: fn(T) -> &'static str,
) -> MatrixResult<T> {
    let wanted = text.trim().to_lowercase().replace([' ', '-'], "_");
    candidates
        .iter()
        .copied()
        .find(|c| name(*c) == wanted)
        .ok_or_else(|| MatrixError::InvalidValue { kind, value: text.to_string() })
}

impl FromStr for SkillLevel {
    type Err = MatrixError;
    fn from_str(s: &str) -> MatrixResult<Self> {
        parse_by_name("skill level", s, &SkillLevel::ALL, SkillLevel::as_str)
    }
}

impl FromStr for Requirement {
    type Err = MatrixError;
    fn from_str(s: &str) -> MatrixResult<Self> {
        parse_by_name(
            "requirement",
            s,
            &[Requirement::Required, Requirement::Preferred],
            Requirement::as_str,
        )
    }
}

impl FromStr for GoalStatus {
    type Err = MatrixError;
    fn from_str(s: &str) -> MatrixResult<Self> {
        parse_by_name(
            "goal status",
            s,
            &[GoalStatus::Unknown, GoalStatus::SkillGoal, GoalStatus::NotInterested],
            GoalStatus::as_str,
        )
    }
}

impl FromStr for LevelKey {
    type Err = MatrixError;
    fn from_str(s: &str) -> MatrixResult<Self> {
        parse_by_name("level key", s, &LevelKey::ALL, LevelKey::as_str)
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for LevelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
