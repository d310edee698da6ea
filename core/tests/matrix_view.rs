//! Skills matrix view tests: employee rows, role rows, filtering.

use skillsmatrix_core::{
    catalog::SkillCategory,
    employee_skills::EmployeeSkillUpdate,
    engine::MatrixEngine,
    level::{GoalStatus, LevelKey, Requirement, SkillLevel},
    matrix::MatrixFilter,
};

fn build() -> MatrixEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    MatrixEngine::build_test().expect("build test engine")
}

#[test]
fn employee_rows_compare_against_own_role() {
    let mut engine = build();
    let rows = engine.employee_matrix("emp-2").unwrap();
    let summary: Vec<(&str, u32)> = rows
        .iter()
        .map(|r| (r.title.as_str(), r.comparison.match_percentage))
        .collect();
    assert_eq!(
        summary,
        vec![("GraphQL", 0), ("React", 66), ("TypeScript", 100), ("Communication", 0)]
    );
    assert_eq!(rows[1].level, SkillLevel::Intermediate);
    assert_eq!(rows[3].category, SkillCategory::Common);
    assert!(rows.iter().all(|r| r.role_requirement.is_none()), "role not initialized yet");
}

#[test]
fn employee_rows_carry_the_role_cell_at_their_rung() {
    let mut engine = build();
    engine
        .set_skill_state("125", "React", LevelKey::P3, SkillLevel::Intermediate, Requirement::Required)
        .unwrap();
    let rows = engine.employee_matrix("emp-2").unwrap();
    let react = rows.iter().find(|r| r.title == "React").unwrap();
    assert_eq!(react.role_requirement.map(|c| c.level), Some(SkillLevel::Intermediate));
    assert_eq!(react.comparison.match_percentage, 100);
}

#[test]
fn employee_rows_reflect_goals_and_plans() {
    let mut engine = build();
    engine
        .update_employee_skill(
            "emp-2",
            "GraphQL",
            EmployeeSkillUpdate {
                goal_status: Some(GoalStatus::SkillGoal),
                in_development_plan: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    let rows = engine.employee_matrix("emp-2").unwrap();
    let graphql = rows.iter().find(|r| r.title == "GraphQL").unwrap();
    assert_eq!(graphql.goal_status, GoalStatus::SkillGoal);
    assert!(graphql.in_development_plan);
    // Seeded skills survive the lazy initialization.
    let ts = rows.iter().find(|r| r.title == "TypeScript").unwrap();
    assert_eq!(ts.level, SkillLevel::Intermediate);
}

#[test]
fn employee_without_profile_sees_recorded_skills() {
    let mut engine = build();
    let rows = engine.employee_matrix("emp-3").unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Node.js", "React"]);
    assert!(rows.iter().all(|r| r.comparison.match_percentage == 100));
}

#[test]
fn filter_narrows_and_persists() {
    let mut engine = build();
    engine
        .set_filter(MatrixFilter {
            categories: vec![SkillCategory::Specialized],
            search: "script".into(),
            ..MatrixFilter::default()
        })
        .unwrap();
    let rows = engine.employee_matrix("emp-2").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "TypeScript");
    assert_eq!(engine.filter().search, "script");

    engine
        .set_filter(MatrixFilter { levels: vec![SkillLevel::Unspecified], ..MatrixFilter::default() })
        .unwrap();
    let titles: Vec<String> = engine
        .employee_matrix("emp-2")
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["GraphQL", "Communication"]);
}

#[test]
fn requirement_filter_needs_a_role_cell() {
    let mut engine = build();
    engine
        .set_filter(MatrixFilter { requirement: Some(Requirement::Required), ..MatrixFilter::default() })
        .unwrap();
    assert!(engine.employee_matrix("emp-2").unwrap().is_empty());

    engine
        .set_skill_state("125", "TypeScript", LevelKey::P3, SkillLevel::Advanced, Requirement::Required)
        .unwrap();
    let rows = engine.employee_matrix("emp-2").unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["TypeScript"]);
}

#[test]
fn role_matrix_lists_toggled_skills_at_rung() {
    let mut engine = build();
    engine.toggle_skill("125", "GraphQL").unwrap();
    engine
        .set_skill_state("125", "Communication", LevelKey::P5, SkillLevel::Advanced, Requirement::Required)
        .unwrap();

    let rows = engine.role_matrix("125", LevelKey::P5).unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["React", "TypeScript", "Communication"]);
    assert_eq!(rows[2].state.level, SkillLevel::Advanced);
    assert_eq!(rows[0].state.level, SkillLevel::Unspecified);

    let other_rung = engine.role_matrix("125", LevelKey::P4).unwrap();
    assert_eq!(other_rung[2].state.level, SkillLevel::Unspecified);
}
