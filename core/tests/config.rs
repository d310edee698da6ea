//! Config loading tests against the bundled data files.

use skillsmatrix_core::{
    catalog::SkillCategory,
    config::MatrixConfig,
    engine::MatrixEngine,
    level::{LevelKey, Requirement, SkillLevel, Track},
    store::MatrixStore,
    types::SkillKey,
};

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");

fn load() -> MatrixConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    MatrixConfig::load(DATA_DIR).expect("bundled data loads")
}

#[test]
fn bundled_roles_are_present() {
    let config = load();
    let ids: Vec<&str> = config.roles.role_ids().map(String::as_str).collect();
    assert_eq!(ids, vec!["123", "124", "125", "126", "127", "128", "129", "130"]);

    let manager = config.roles.get("126").unwrap();
    assert_eq!(manager.title, "Engineering Manager");
    assert_eq!(manager.track, Track::Managerial);
    assert!(manager.offers_level(LevelKey::M4));
    assert!(!manager.offers_level(LevelKey::P4));
}

#[test]
fn every_role_skill_resolves_against_the_catalog() {
    let config = load();
    for role_id in config.roles.role_ids() {
        let profile = config.roles.get(role_id).unwrap();
        assert!(!profile.skills.is_empty(), "role {role_id} has no skills");
        for requirement in profile.skills.iter() {
            assert!(
                config.catalog.contains(&requirement.skill.title),
                "role {role_id}: '{}' not in catalog",
                requirement.skill.title
            );
        }
        for category in SkillCategory::ALL {
            assert!(
                profile.skills.bucket(category).iter().all(|r| r.skill.category == category),
                "role {role_id}: {category:?} bucket holds a foreign category"
            );
        }
    }
}

#[test]
fn frontend_profile_matches_data_file() {
    let config = load();
    let react = config.roles.requirement("125", &SkillKey::new("React")).unwrap();
    assert_eq!(react.minimum_level, SkillLevel::Advanced);
    assert_eq!(react.requirement_level, Requirement::Required);
    assert_eq!(config.roles.get("125").unwrap().skills.len(), 8);
}

#[test]
fn employees_parse_role_and_rung() {
    let config = load();
    assert_eq!(config.employees.len(), 9);

    let victor = config.employee("123").unwrap();
    assert_eq!(victor.role_title(), "AI Engineer");
    assert_eq!(victor.level_key(), Some(LevelKey::P4));
    assert!(!victor.skills.is_empty());

    let tom = config.employee("130").unwrap();
    assert_eq!(tom.level_key(), Some(LevelKey::M3));
}

#[test]
fn engine_runs_over_bundled_data() {
    let store = MatrixStore::in_memory().unwrap();
    store.migrate().unwrap();
    let mut engine = MatrixEngine::build(load(), store);

    let ranking = engine.rank_employees("125", None).unwrap();
    assert_eq!(ranking.len(), 9);
    let exact: Vec<&str> = ranking
        .iter()
        .take_while(|r| r.exact_match)
        .map(|r| r.employee_id.as_str())
        .collect();
    assert_eq!(exact, vec!["124", "127"]);

    assert_eq!(
        engine.initialize_role("125").unwrap(),
        8 * LevelKey::ALL.len()
    );
}

#[test]
fn missing_data_dir_is_an_error() {
    let err = MatrixConfig::load("/nonexistent/skills-matrix").unwrap_err();
    assert!(err.to_string().contains("skill_catalog.json"));
}
