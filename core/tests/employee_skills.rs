//! Employee skill state tests.
//!
//! Tests cover: seeding from config, partial updates, timestamps,
//! batch updates, goal counts, unknown employees.

use chrono::{TimeZone, Utc};
use skillsmatrix_core::{
    employee_skills::{EmployeeSkillState, EmployeeSkillStore, EmployeeSkillUpdate},
    engine::MatrixEngine,
    error::MatrixError,
    level::{GoalStatus, SkillLevel},
    types::SkillKey,
};
use std::collections::BTreeMap;

fn build() -> MatrixEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    MatrixEngine::build_test().expect("build test engine")
}

#[test]
fn initialize_seeds_recorded_skills_once() {
    let mut engine = build();
    assert!(engine.initialize_employee("emp-1").unwrap());
    assert!(!engine.initialize_employee("emp-1").unwrap(), "second init must be a no-op");

    let ml = engine.employee_skill("emp-1", "Machine Learning").expect("seeded");
    assert_eq!(ml.level, SkillLevel::Advanced);
    assert_eq!(ml.goal_status, GoalStatus::Unknown);
    assert!(!ml.in_development_plan);
    assert_eq!(ml.last_updated, None, "seeding is not a user edit");

    assert!(engine.employee_skill("emp-1", "GraphQL").is_none());
}

/// Re-initializing must not overwrite edits made since the first seed.
#[test]
fn initialize_does_not_clobber_edits() {
    let mut engine = build();
    engine
        .update_employee_skill("emp-2", "React", EmployeeSkillUpdate::level(SkillLevel::Advanced))
        .unwrap();
    engine.initialize_employee("emp-2").unwrap();
    assert_eq!(
        engine.employee_skill("emp-2", "React").map(|s| s.level),
        Some(SkillLevel::Advanced)
    );
}

#[test]
fn partial_update_keeps_other_fields() {
    let mut engine = build();
    engine
        .update_employee_skill("emp-2", "GraphQL", EmployeeSkillUpdate::goal(GoalStatus::SkillGoal))
        .unwrap();
    let state = engine
        .update_employee_skill(
            "emp-2",
            "graphql",
            EmployeeSkillUpdate { in_development_plan: Some(true), ..Default::default() },
        )
        .unwrap();

    assert_eq!(state.level, SkillLevel::Unspecified);
    assert_eq!(state.goal_status, GoalStatus::SkillGoal);
    assert!(state.in_development_plan);
    assert!(state.last_updated.is_some());
    assert_eq!(engine.employee_skill("emp-2", "GraphQL"), Some(&state));
}

#[test]
fn every_write_stamps_last_updated() {
    let mut store = EmployeeSkillStore::new();
    let react = SkillKey::new("React");
    let t1 = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();

    store.update_skill_state_at("emp-9", &react, EmployeeSkillUpdate::level(SkillLevel::Beginner), t1);
    let state = store.update_skill_state_at("emp-9", &react, EmployeeSkillUpdate::default(), t2);

    assert_eq!(state.level, SkillLevel::Beginner);
    assert_eq!(state.last_updated, Some(t2));
}

#[test]
fn batch_update_applies_all_with_one_timestamp() {
    let mut engine = build();
    let mut updates = BTreeMap::new();
    updates.insert("React".to_string(), EmployeeSkillUpdate::level(SkillLevel::Advanced));
    updates.insert("GraphQL".to_string(), EmployeeSkillUpdate::goal(GoalStatus::SkillGoal));
    updates.insert(
        "Communication".to_string(),
        EmployeeSkillUpdate {
            level: Some(SkillLevel::Beginner),
            in_development_plan: Some(true),
            ..Default::default()
        },
    );
    engine.batch_update_employee_skills("emp-2", &updates).unwrap();

    let react = engine.employee_skill("emp-2", "React").unwrap().clone();
    let graphql = engine.employee_skill("emp-2", "GraphQL").unwrap().clone();
    let comm = engine.employee_skill("emp-2", "Communication").unwrap().clone();

    assert_eq!(react.level, SkillLevel::Advanced);
    assert_eq!(graphql.goal_status, GoalStatus::SkillGoal);
    assert_eq!(comm.level, SkillLevel::Beginner);
    assert!(comm.in_development_plan);
    assert!(react.last_updated.is_some());
    assert_eq!(react.last_updated, graphql.last_updated);
    assert_eq!(react.last_updated, comm.last_updated);

    // Untouched seeded skill keeps its seed.
    let ts = engine.employee_skill("emp-2", "TypeScript").unwrap();
    assert_eq!(ts.level, SkillLevel::Intermediate);
    assert_eq!(ts.last_updated, None);
}

#[test]
fn missing_entries_read_as_default() {
    let store = EmployeeSkillStore::new();
    assert_eq!(store.skill_state("nobody", &SkillKey::new("React")), None);
    assert_eq!(
        store.skill_state_or_default("nobody", &SkillKey::new("React")),
        EmployeeSkillState::default()
    );
    assert!(store.levels_for("nobody").is_empty());
}

#[test]
fn goal_counts_only_include_toggled_skills() {
    let mut engine = build();
    engine
        .update_employee_skill("emp-2", "GraphQL", EmployeeSkillUpdate::goal(GoalStatus::SkillGoal))
        .unwrap();
    engine
        .update_employee_skill("emp-2", "Communication", EmployeeSkillUpdate::goal(GoalStatus::SkillGoal))
        .unwrap();
    engine
        .update_employee_skill("emp-2", "Python", EmployeeSkillUpdate::goal(GoalStatus::SkillGoal))
        .unwrap();

    let counts = engine.goal_counts("emp-2").unwrap();
    assert_eq!(counts.specialized, 1, "GraphQL only; Python is not a Frontend Engineer skill");
    assert_eq!(counts.common, 1);
    assert_eq!(counts.certification, 0);

    engine.toggle_skill("125", "GraphQL").unwrap();
    let counts = engine.goal_counts("emp-2").unwrap();
    assert_eq!(counts.specialized, 0);
    assert_eq!(counts.total(), 1);
}

#[test]
fn unknown_employee_is_an_error() {
    let mut engine = build();
    let err = engine.initialize_employee("emp-404").unwrap_err();
    assert!(matches!(err, MatrixError::UnknownEmployee { ref employee_id } if employee_id == "emp-404"));

    let err = engine
        .update_employee_skill("emp-404", "React", EmployeeSkillUpdate::level(SkillLevel::Advanced))
        .unwrap_err();
    assert!(matches!(err, MatrixError::UnknownEmployee { .. }));
    assert!(engine.employee_skill("emp-404", "React").is_none());
}
