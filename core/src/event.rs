//! Audit events, one per state mutation made through the engine.
//!
//! Variants are added over time and never removed or reordered, because
//! persisted payloads carry the tag.

use crate::{
    level::{GoalStatus, LevelKey, Requirement, SkillLevel},
    types::{EmployeeId, RoleId, SkillKey},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatrixEvent {
    // ── Role competency ────────────────────────────
    RoleInitialized {
        role_id: RoleId,
        cells_created: usize,
    },
    CompetencyCellSet {
        role_id: RoleId,
        skill: SkillKey,
        level_key: LevelKey,
        level: SkillLevel,
        required: Requirement,
    },
    ChangesSaved {
        role_id: RoleId,
    },
    ChangesCancelled {
        role_id: RoleId,
    },
    RoleSkillAdded {
        role_id: RoleId,
        skill: SkillKey,
    },

    // ── Toggled skills ─────────────────────────────
    SkillToggled {
        role_id: RoleId,
        skill: SkillKey,
        toggled: bool,
    },
    ToggledSkillsReplaced {
        role_id: RoleId,
        count: usize,
    },

    // ── Employee skills ────────────────────────────
    EmployeeInitialized {
        employee_id: EmployeeId,
        skills: usize,
    },
    EmployeeSkillUpdated {
        employee_id: EmployeeId,
        skill: SkillKey,
        level: SkillLevel,
        goal_status: GoalStatus,
        in_development_plan: bool,
    },
    EmployeeSkillsBatchUpdated {
        employee_id: EmployeeId,
        count: usize,
    },

    // ── View ───────────────────────────────────────
    FilterChanged,
}

impl MatrixEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            MatrixEvent::RoleInitialized { .. }            => "role_initialized",
            MatrixEvent::CompetencyCellSet { .. }          => "competency_cell_set",
            MatrixEvent::ChangesSaved { .. }               => "changes_saved",
            MatrixEvent::ChangesCancelled { .. }           => "changes_cancelled",
            MatrixEvent::RoleSkillAdded { .. }             => "role_skill_added",
            MatrixEvent::SkillToggled { .. }               => "skill_toggled",
            MatrixEvent::ToggledSkillsReplaced { .. }      => "toggled_skills_replaced",
            MatrixEvent::EmployeeInitialized { .. }        => "employee_initialized",
            MatrixEvent::EmployeeSkillUpdated { .. }       => "employee_skill_updated",
            MatrixEvent::EmployeeSkillsBatchUpdated { .. } => "employee_skills_batch_updated",
            MatrixEvent::FilterChanged                     => "filter_changed",
        }
    }

    /// The role or employee id the event is about.
    pub fn subject(&self) -> &str {
        match self {
            MatrixEvent::RoleInitialized { role_id, .. }
            | MatrixEvent::CompetencyCellSet { role_id, .. }
            | MatrixEvent::ChangesSaved { role_id }
            | MatrixEvent::ChangesCancelled { role_id }
            | MatrixEvent::RoleSkillAdded { role_id, .. }
            | MatrixEvent::SkillToggled { role_id, .. }
            | MatrixEvent::ToggledSkillsReplaced { role_id, .. } => role_id,
            MatrixEvent::EmployeeInitialized { employee_id, .. }
            | MatrixEvent::EmployeeSkillUpdated { employee_id, .. }
            | MatrixEvent::EmployeeSkillsBatchUpdated { employee_id, .. } => employee_id,
            MatrixEvent::FilterChanged => "view",
        }
    }
}

/// A persisted row of the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:          Option<i64>,
    pub event_type:  String,
    pub subject:     String,
    pub payload:     String,
    pub recorded_at: String,
}

impl EventLogEntry {
    pub fn from_event(event: &MatrixEvent, recorded_at: String) -> serde_json::Result<Self> {
        Ok(Self {
            id:          None,
            event_type:  event.type_name().to_string(),
            subject:     event.subject().to_string(),
            payload:     serde_json::to_string(event)?,
            recorded_at,
        })
    }

    pub fn decode(&self) -> serde_json::Result<MatrixEvent> {
        serde_json::from_str(&self.payload)
    }
}
