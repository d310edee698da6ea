//! Benchmark and ranking tests.
//!
//! Tests cover: per-skill comparison, monotonicity, the role benchmark,
//! ranking order, missing skills, required counts per category.

use skillsmatrix_core::{
    benchmark::{compare_skill_levels, missing_skills, resolve_requirements},
    catalog::SkillCategory,
    competency::CompetencyStore,
    employee_skills::EmployeeSkillUpdate,
    engine::MatrixEngine,
    level::{LevelKey, Requirement, SkillLevel},
    matrix::MatrixFilter,
    toggled::ToggledSet,
    types::SkillKey,
};
use std::collections::{BTreeMap, BTreeSet};

const LEVELS: [SkillLevel; 4] = [
    SkillLevel::Unspecified,
    SkillLevel::Beginner,
    SkillLevel::Intermediate,
    SkillLevel::Advanced,
];

fn build() -> MatrixEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    MatrixEngine::build_test().expect("build test engine")
}

/// Frontend Engineer scoped to React (advanced) and TypeScript (intermediate).
fn frontend_engine() -> MatrixEngine {
    let mut engine = build();
    engine.set_toggled_skills("125", &["React", "TypeScript"]).unwrap();
    engine
}

// ── compare_skill_levels ─────────────────────────────────────────────

#[test]
fn comparison_is_full_when_met_or_exceeded() {
    for required in LEVELS {
        for employee in LEVELS.iter().copied().filter(|l| l.priority() >= required.priority()) {
            let cmp = compare_skill_levels(employee, required);
            assert_eq!(cmp.match_percentage, 100, "{employee} vs {required}");
            assert_eq!(cmp.gap_level, 0, "{employee} vs {required}");
        }
    }
}

#[test]
fn comparison_is_monotonic_in_employee_level() {
    for required in LEVELS {
        let scores: Vec<u32> = LEVELS
            .iter()
            .map(|&e| compare_skill_levels(e, required).match_percentage)
            .collect();
        assert!(
            scores.windows(2).all(|w| w[0] <= w[1]),
            "non-monotonic scores against {required}: {scores:?}"
        );
        assert!(scores.iter().all(|&s| s <= 100));
    }
}

#[test]
fn comparison_ratio_and_gap() {
    let cmp = compare_skill_levels(SkillLevel::Intermediate, SkillLevel::Advanced);
    assert_eq!(cmp.match_percentage, 66);
    assert_eq!(cmp.gap_level, 1);

    let cmp = compare_skill_levels(SkillLevel::Beginner, SkillLevel::Intermediate);
    assert_eq!(cmp.match_percentage, 50);
    assert_eq!(cmp.gap_level, 1);

    let cmp = compare_skill_levels(SkillLevel::Unspecified, SkillLevel::Advanced);
    assert_eq!(cmp.match_percentage, 0);
    assert_eq!(cmp.gap_level, 3);
}

// ── Role benchmark ───────────────────────────────────────────────────

#[test]
fn benchmark_is_mean_over_toggled_skills() {
    let mut engine = frontend_engine();
    let expected = [("emp-1", 16), ("emp-2", 83), ("emp-3", 50), ("emp-4", 0), ("emp-5", 100)];
    for (employee_id, score) in expected {
        assert_eq!(
            engine.benchmark(employee_id, "125", None).unwrap(),
            score,
            "{employee_id} against Frontend Engineer"
        );
    }
}

#[test]
fn benchmark_with_nothing_toggled_is_zero() {
    let mut engine = build();
    engine.set_toggled_skills("125", &[]).unwrap();
    assert_eq!(engine.benchmark("emp-5", "125", None).unwrap(), 0);
}

#[test]
fn benchmark_uses_competency_cell_at_rung() {
    let mut engine = frontend_engine();
    assert_eq!(engine.benchmark("emp-1", "125", Some(LevelKey::P3)).unwrap(), 16);

    engine
        .set_skill_state("125", "React", LevelKey::P3, SkillLevel::Intermediate, Requirement::Required)
        .unwrap();
    let requirements = engine.requirements("125", Some(LevelKey::P3)).unwrap();
    let react = requirements.iter().find(|r| r.key == SkillKey::new("React")).unwrap();
    assert_eq!(react.level, SkillLevel::Intermediate);

    // React 50, TypeScript 0.
    assert_eq!(engine.benchmark("emp-1", "125", Some(LevelKey::P3)).unwrap(), 25);
    // Other rungs still fall back to the profile.
    assert_eq!(engine.benchmark("emp-1", "125", Some(LevelKey::P4)).unwrap(), 16);
}

#[test]
fn benchmark_follows_employee_updates() {
    let mut engine = frontend_engine();
    assert_eq!(engine.benchmark("emp-1", "125", None).unwrap(), 16);
    engine
        .update_employee_skill(
            "emp-1",
            "TypeScript",
            EmployeeSkillUpdate::level(SkillLevel::Advanced),
        )
        .unwrap();
    assert_eq!(engine.benchmark("emp-1", "125", None).unwrap(), 66);
}

// ── Ranking ──────────────────────────────────────────────────────────

#[test]
fn exact_role_holders_rank_first_then_by_benchmark() {
    let mut engine = frontend_engine();
    let ranking = engine.rank_employees("125", None).unwrap();
    let order: Vec<&str> = ranking.iter().map(|r| r.employee_id.as_str()).collect();
    assert_eq!(order, vec!["emp-2", "emp-5", "emp-3", "emp-1", "emp-4"]);

    assert!(ranking[0].exact_match && ranking[1].exact_match);
    assert!(ranking[2..].iter().all(|r| !r.exact_match));
    // Exact holders keep input order even when a later one scores higher.
    assert!(ranking[0].benchmark < ranking[1].benchmark);
    assert!(ranking[2..].windows(2).all(|w| w[0].benchmark >= w[1].benchmark));
}

#[test]
fn ranking_is_a_permutation_of_the_roster() {
    let mut engine = build();
    for role_id in ["123", "125", "126"] {
        let ranking = engine.rank_employees(role_id, None).unwrap();
        let ids: BTreeSet<&str> = ranking.iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ranking.len(), engine.config.employees.len());
        assert_eq!(ids.len(), engine.config.employees.len(), "role {role_id}: duplicate ids");
    }
}

// ── Missing skills ───────────────────────────────────────────────────

#[test]
fn missing_skills_against_own_role_and_rung() {
    let mut engine = build();
    let missing = engine.missing_skills("emp-1", None).unwrap();
    let summary: Vec<(&str, u32)> = missing.iter().map(|m| (m.title.as_str(), m.gap)).collect();
    assert_eq!(
        summary,
        vec![
            ("Communication", 2),
            ("Deep Learning", 2),
            ("AWS Certified Solutions Architect", 1),
        ]
    );
    assert!(missing.iter().all(|m| m.requirement == Requirement::Preferred));
}

#[test]
fn missing_required_skills_come_first() {
    let mut engine = build();
    let missing = engine.missing_skills("emp-1", Some("125")).unwrap();
    let titles: Vec<&str> = missing.iter().map(|m| m.title.as_str()).collect();
    // React (required, gap 2), TypeScript (required, gap 2), then preferred.
    assert_eq!(titles, vec!["React", "TypeScript", "Communication", "GraphQL"]);
    assert_eq!(missing[0].current, SkillLevel::Beginner);
    assert_eq!(missing[0].required, SkillLevel::Advanced);
}

#[test]
fn missing_skills_for_unmatched_role_is_empty() {
    let mut engine = build();
    // "Backend Engineer" has no profile in the test config.
    assert!(engine.missing_skills("emp-3", None).unwrap().is_empty());
}

#[test]
fn missing_skills_pure_function_skips_met_requirements() {
    let engine = build();
    let role = engine.config.roles.get("125").unwrap();
    let toggled: ToggledSet = role
        .skills
        .iter()
        .map(|r| (r.key(), r.skill.title.clone()))
        .collect();
    let requirements = resolve_requirements(
        role,
        &engine.config.catalog,
        &CompetencyStore::new(),
        None,
        &toggled,
    );
    let mut levels = BTreeMap::new();
    levels.insert(SkillKey::new("React"), SkillLevel::Advanced);
    levels.insert(SkillKey::new("TypeScript"), SkillLevel::Advanced);
    levels.insert(SkillKey::new("GraphQL"), SkillLevel::Beginner);
    levels.insert(SkillKey::new("Communication"), SkillLevel::Beginner);

    let missing = missing_skills(&levels, &requirements);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].key, SkillKey::new("Communication"));
    assert_eq!(missing[0].gap, 1);
}

// ── Counts ───────────────────────────────────────────────────────────

#[test]
fn required_counts_per_category() {
    let mut engine = build();
    let counts = engine.category_counts("125", None).unwrap();
    assert_eq!(counts.get(SkillCategory::Specialized), 2);
    assert_eq!(counts.get(SkillCategory::Common), 0);
    assert_eq!(counts.get(SkillCategory::Certification), 0);

    let counts = engine.category_counts("126", None).unwrap();
    assert_eq!(counts.common, 2);
    assert_eq!(counts.total(), 2);
}

#[test]
fn required_counts_follow_competency_and_toggles() {
    let mut engine = build();
    engine.initialize_role("125").unwrap();
    // Untouched default cells do not mask the profile.
    assert_eq!(engine.category_counts("125", Some(LevelKey::P2)).unwrap().specialized, 2);

    engine
        .set_skill_state("125", "Communication", LevelKey::P2, SkillLevel::Beginner, Requirement::Required)
        .unwrap();
    engine
        .set_skill_state("125", "TypeScript", LevelKey::P2, SkillLevel::Beginner, Requirement::Preferred)
        .unwrap();
    let counts = engine.category_counts("125", Some(LevelKey::P2)).unwrap();
    assert_eq!(counts.specialized, 1);
    assert_eq!(counts.common, 1);

    engine.toggle_skill("125", "React").unwrap();
    let counts = engine.category_counts("125", Some(LevelKey::P2)).unwrap();
    assert_eq!(counts.specialized, 0);
}

#[test]
fn requirement_kind_applies_without_a_level() {
    let mut engine = build();
    engine.initialize_role("125").unwrap();
    assert_eq!(engine.category_counts("125", Some(LevelKey::P3)).unwrap().common, 0);

    // Communication is preferred on the profile; the cell marks it required
    // without choosing a level.
    engine
        .set_skill_state("125", "Communication", LevelKey::P3, SkillLevel::Unspecified, Requirement::Required)
        .unwrap();
    assert_eq!(engine.category_counts("125", Some(LevelKey::P3)).unwrap().common, 1);
    assert_eq!(engine.category_counts("125", Some(LevelKey::P4)).unwrap().common, 0);

    let requirements = engine.requirements("125", Some(LevelKey::P3)).unwrap();
    let communication = requirements
        .iter()
        .find(|r| r.key == SkillKey::new("Communication"))
        .unwrap();
    assert_eq!(communication.requirement, Requirement::Required);
    assert_eq!(communication.level, SkillLevel::Intermediate, "level still from the profile");

    // The matrix view's requirement filter agrees with the counts.
    engine
        .set_filter(MatrixFilter { requirement: Some(Requirement::Required), ..MatrixFilter::default() })
        .unwrap();
    let titles: Vec<String> = engine
        .employee_matrix("emp-2")
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["Communication"]);
}
