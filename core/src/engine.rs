//! The matrix engine: the one owner of all skills-matrix state.
//!
//! OWNERSHIP:
//!   - `CompetencyStore`     owns role competency cells
//!   - `EmployeeSkillStore`  owns employee skill cells
//!   - `ToggledSkills`       owns per-role scope sets
//!   - `MatrixFilter`        owns the matrix view filter
//!   - views (`employee_matrix`, `rank_employees`, ...) compose the
//!     above read-only and hold nothing.
//!
//! RULES:
//!   - Every mutation edits a copy of its container, writes the copy
//!     through to the store, and only then swaps it in. A failed write
//!     leaves memory as it was.
//!   - Every committed mutation appends one audit event.
//!   - Hydration never fails: a container that cannot be loaded is logged
//!     and starts from its default.
//!   - Unknown role or employee ids are errors here; the stores underneath
//!     report absence as `Option`.

use crate::{
    benchmark::{
        self, count_goals_by_category, count_required_by_category, CategoryCounts,
        EffectiveRequirement, MissingSkill, SkillComparison,
    },
    competency::{CompetencySkillState, CompetencyStore},
    config::MatrixConfig,
    employee::Employee,
    employee_skills::{EmployeeSkillState, EmployeeSkillStore, EmployeeSkillUpdate},
    error::{MatrixError, MatrixResult},
    event::{EventLogEntry, MatrixEvent},
    level::{LevelKey, Requirement, SkillLevel},
    matrix::{MatrixFilter, MatrixRow, RoleMatrixRow},
    role::{RoleProfile, RoleSkillEntry},
    store::MatrixStore,
    toggled::ToggledSkills,
    types::SkillKey,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One line of a ranking, detached from the config it was computed from.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmployeeRanking {
    pub employee_id: String,
    pub name: String,
    pub role: String,
    pub benchmark: u32,
    pub exact_match: bool,
}

pub struct MatrixEngine {
    pub config:      MatrixConfig,
    store:           MatrixStore,
    competency:      CompetencyStore,
    employee_skills: EmployeeSkillStore,
    toggled:         ToggledSkills,
    filter:          MatrixFilter,
}

impl MatrixEngine {
    /// Build an engine over `store`, hydrating every container from it.
    pub fn build(config: MatrixConfig, store: MatrixStore) -> Self {
        let mut engine = Self {
            config,
            store,
            competency:      CompetencyStore::new(),
            employee_skills: EmployeeSkillStore::new(),
            toggled:         ToggledSkills::new(),
            filter:          MatrixFilter::default(),
        };
        engine.hydrate();
        engine
    }

    /// In-memory store, `default_test()` config.
    pub fn build_test() -> MatrixResult<Self> {
        let store = MatrixStore::in_memory()?;
        store.migrate()?;
        Ok(Self::build(MatrixConfig::default_test(), store))
    }

    fn hydrate(&mut self) {
        self.competency = CompetencyStore::load(&self.store).unwrap_or_else(|e| {
            log::warn!("competency state unreadable, starting empty: {e}");
            CompetencyStore::new()
        });
        self.employee_skills = EmployeeSkillStore::load(&self.store).unwrap_or_else(|e| {
            log::warn!("employee skill state unreadable, starting empty: {e}");
            EmployeeSkillStore::new()
        });
        self.toggled = ToggledSkills::load(&self.store).unwrap_or_else(|e| {
            log::warn!("toggled skills unreadable, starting empty: {e}");
            ToggledSkills::new()
        });
        self.filter = MatrixFilter::load(&self.store).unwrap_or_else(|e| {
            log::warn!("matrix filter unreadable, using defaults: {e}");
            MatrixFilter::default()
        });
        match self.config.roles.restore_added(&self.store, &self.config.catalog) {
            Ok(0) => {}
            Ok(n) => log::info!("restored {n} role skill additions"),
            Err(e) => log::warn!("role skill additions unreadable: {e}"),
        }
    }

    pub fn store(&self) -> &MatrixStore {
        &self.store
    }

    fn record(&self, event: MatrixEvent) -> MatrixResult<()> {
        let entry = EventLogEntry::from_event(&event, chrono::Utc::now().to_rfc3339())?;
        self.store.append_event(&entry)
    }

    pub fn events(&self) -> MatrixResult<Vec<EventLogEntry>> {
        self.store.events()
    }

    /// Write every container to the store.
    pub fn persist_all(&mut self) -> MatrixResult<()> {
        self.competency.persist(&mut self.store)?;
        self.employee_skills.persist(&mut self.store)?;
        self.toggled.persist(&mut self.store)?;
        self.filter.persist(&mut self.store)?;
        self.config.roles.persist(&mut self.store)?;
        Ok(())
    }

    // ── Lookups ─────────────────────────────────────────────────────

    pub fn role(&self, role_id: &str) -> MatrixResult<&RoleProfile> {
        self.config.roles.get(role_id).ok_or_else(|| {
            log::warn!("unknown role id {role_id}");
            MatrixError::UnknownRole { role_id: role_id.to_string() }
        })
    }

    pub fn employee(&self, employee_id: &str) -> MatrixResult<&Employee> {
        self.config.employee(employee_id).ok_or_else(|| {
            log::warn!("unknown employee id {employee_id}");
            MatrixError::UnknownEmployee { employee_id: employee_id.to_string() }
        })
    }

    /// The profile an employee currently holds, matched by role title.
    pub fn role_of(&self, employee: &Employee) -> Option<&RoleProfile> {
        self.config.roles.find_by_title(employee.role_title())
    }

    // ── Role competency ─────────────────────────────────────────────

    /// Populate missing cells for every skill of the role at every rung.
    /// Returns the number of cells created.
    pub fn initialize_role(&mut self, role_id: &str) -> MatrixResult<usize> {
        let role = self.role(role_id)?;
        let (keys, titles) = (role.skill_keys(), role.skill_titles());

        let mut competency = self.competency.clone();
        let created = competency.initialize_state(role_id, &keys);
        let toggled = match self.toggled.get(role_id) {
            Some(_) => None,
            None => {
                let mut toggled = self.toggled.clone();
                toggled.toggled_or_init(role_id, &titles);
                Some(toggled)
            }
        };
        if created == 0 && toggled.is_none() {
            return Ok(0);
        }

        if created > 0 {
            competency.persist(&mut self.store)?;
        }
        if let Some(toggled) = &toggled {
            toggled.persist_role(&mut self.store, role_id)?;
        }
        self.competency = competency;
        if let Some(toggled) = toggled {
            self.toggled = toggled;
        }

        if created > 0 {
            self.record(MatrixEvent::RoleInitialized {
                role_id: role_id.to_string(),
                cells_created: created,
            })?;
        }
        Ok(created)
    }

    fn ensure_role(&mut self, role_id: &str) -> MatrixResult<()> {
        if !self.competency.is_initialized(role_id) {
            self.initialize_role(role_id)?;
        }
        Ok(())
    }

    pub fn set_skill_state(
        &mut self,
        role_id: &str,
        skill_title: &str,
        level_key: LevelKey,
        level: SkillLevel,
        required: Requirement,
    ) -> MatrixResult<()> {
        self.ensure_role(role_id)?;
        let skill = SkillKey::new(skill_title);
        let mut competency = self.competency.clone();
        competency.set_skill_state(
            role_id,
            &skill,
            level_key,
            CompetencySkillState::new(level, required),
        );
        competency.persist(&mut self.store)?;
        self.competency = competency;
        self.record(MatrixEvent::CompetencyCellSet {
            role_id: role_id.to_string(),
            skill,
            level_key,
            level,
            required,
        })
    }

    pub fn skill_state(
        &self,
        role_id: &str,
        skill_title: &str,
        level_key: LevelKey,
    ) -> Option<CompetencySkillState> {
        self.competency
            .skill_state(role_id, &SkillKey::new(skill_title), level_key)
    }

    pub fn has_changes(&self, role_id: &str) -> bool {
        self.competency.has_changes(role_id)
    }

    pub fn save_changes(&mut self, role_id: &str) -> MatrixResult<bool> {
        self.role(role_id)?;
        let mut competency = self.competency.clone();
        if !competency.save_changes(role_id) {
            return Ok(false);
        }
        competency.persist(&mut self.store)?;
        self.competency = competency;
        log::info!("role {role_id}: competency changes saved");
        self.record(MatrixEvent::ChangesSaved { role_id: role_id.to_string() })?;
        Ok(true)
    }

    pub fn cancel_changes(&mut self, role_id: &str) -> MatrixResult<bool> {
        self.role(role_id)?;
        let mut competency = self.competency.clone();
        if !competency.cancel_changes(role_id) {
            return Ok(false);
        }
        competency.persist(&mut self.store)?;
        self.competency = competency;
        log::info!("role {role_id}: competency changes discarded");
        self.record(MatrixEvent::ChangesCancelled { role_id: role_id.to_string() })?;
        Ok(true)
    }

    /// Attach a catalog skill to a role's profile. Returns false if the
    /// role already lists it.
    pub fn add_role_skill(&mut self, role_id: &str, entry: RoleSkillEntry) -> MatrixResult<bool> {
        let skill = SkillKey::new(&entry.title);
        let mut roles = self.config.roles.clone();
        let inserted = roles
            .add_skill(role_id, entry, &self.config.catalog)
            .ok_or_else(|| MatrixError::UnknownRole { role_id: role_id.to_string() })?;
        if !inserted {
            return Ok(false);
        }
        let title = roles
            .requirement(role_id, &skill)
            .map(|r| r.skill.title.clone())
            .unwrap_or_else(|| skill.to_string());

        let mut competency = self.competency.clone();
        competency.extend_role(role_id, &skill);
        let mut toggled = self.toggled.clone();
        if toggled.get(role_id).is_some() && !toggled.is_toggled(role_id, &skill) {
            toggled.toggle(role_id, &title);
        }

        roles.persist(&mut self.store)?;
        competency.persist(&mut self.store)?;
        toggled.persist_role(&mut self.store, role_id)?;
        self.config.roles = roles;
        self.competency = competency;
        self.toggled = toggled;
        self.record(MatrixEvent::RoleSkillAdded { role_id: role_id.to_string(), skill })?;
        Ok(true)
    }

    // ── Toggled skills ──────────────────────────────────────────────

    fn ensure_toggled(&mut self, role_id: &str) -> MatrixResult<()> {
        if self.toggled.get(role_id).is_none() {
            let titles = self.role(role_id)?.skill_titles();
            let mut toggled = self.toggled.clone();
            toggled.toggled_or_init(role_id, &titles);
            toggled.persist_role(&mut self.store, role_id)?;
            self.toggled = toggled;
        }
        Ok(())
    }

    pub fn toggled_skills(&mut self, role_id: &str) -> MatrixResult<BTreeSet<SkillKey>> {
        self.ensure_toggled(role_id)?;
        Ok(self.toggled.keys(role_id).unwrap_or_default())
    }

    /// Flip one skill in or out of the role's scope. Returns the new membership.
    pub fn toggle_skill(&mut self, role_id: &str, skill_title: &str) -> MatrixResult<bool> {
        self.ensure_toggled(role_id)?;
        let mut candidate = self.toggled.clone();
        let toggled = candidate.toggle(role_id, skill_title);
        candidate.persist_role(&mut self.store, role_id)?;
        self.toggled = candidate;
        self.record(MatrixEvent::SkillToggled {
            role_id: role_id.to_string(),
            skill: SkillKey::new(skill_title),
            toggled,
        })?;
        Ok(toggled)
    }

    pub fn set_toggled_skills(&mut self, role_id: &str, titles: &[&str]) -> MatrixResult<()> {
        self.role(role_id)?;
        let mut toggled = self.toggled.clone();
        toggled.set_toggled(role_id, titles);
        let count = toggled.get(role_id).map_or(0, |s| s.len());
        toggled.persist_role(&mut self.store, role_id)?;
        self.toggled = toggled;
        self.record(MatrixEvent::ToggledSkillsReplaced { role_id: role_id.to_string(), count })
    }

    // ── Employee skills ─────────────────────────────────────────────

    /// Seed the employee's skill state from config. Returns false if it
    /// already existed.
    pub fn initialize_employee(&mut self, employee_id: &str) -> MatrixResult<bool> {
        let seed = self.employee(employee_id)?.seed_levels();
        if self.employee_skills.is_initialized(employee_id) {
            return Ok(false);
        }
        let mut employee_skills = self.employee_skills.clone();
        employee_skills.initialize_employee_skills(employee_id, &seed);
        employee_skills.persist(&mut self.store)?;
        self.employee_skills = employee_skills;
        self.record(MatrixEvent::EmployeeInitialized {
            employee_id: employee_id.to_string(),
            skills: seed.len(),
        })?;
        Ok(true)
    }

    pub fn update_employee_skill(
        &mut self,
        employee_id: &str,
        skill_title: &str,
        update: EmployeeSkillUpdate,
    ) -> MatrixResult<EmployeeSkillState> {
        self.initialize_employee(employee_id)?;
        let skill = SkillKey::new(skill_title);
        let mut employee_skills = self.employee_skills.clone();
        let state = employee_skills.update_skill_state(employee_id, &skill, update);
        employee_skills.persist(&mut self.store)?;
        self.employee_skills = employee_skills;
        self.record(MatrixEvent::EmployeeSkillUpdated {
            employee_id: employee_id.to_string(),
            skill,
            level: state.level,
            goal_status: state.goal_status,
            in_development_plan: state.in_development_plan,
        })?;
        Ok(state)
    }

    pub fn batch_update_employee_skills(
        &mut self,
        employee_id: &str,
        updates: &BTreeMap<String, EmployeeSkillUpdate>,
    ) -> MatrixResult<()> {
        self.initialize_employee(employee_id)?;
        let keyed: BTreeMap<SkillKey, EmployeeSkillUpdate> = updates
            .iter()
            .map(|(title, update)| (SkillKey::new(title), *update))
            .collect();
        let mut employee_skills = self.employee_skills.clone();
        employee_skills.batch_update_skills(employee_id, &keyed);
        employee_skills.persist(&mut self.store)?;
        self.employee_skills = employee_skills;
        self.record(MatrixEvent::EmployeeSkillsBatchUpdated {
            employee_id: employee_id.to_string(),
            count: keyed.len(),
        })
    }

    pub fn employee_skill(&self, employee_id: &str, skill_title: &str) -> Option<&EmployeeSkillState> {
        self.employee_skills
            .skill_state(employee_id, &SkillKey::new(skill_title))
    }

    /// Current levels: the store's if the employee was initialized,
    /// otherwise the recorded skills from config.
    fn employee_levels(&self, employee: &Employee) -> BTreeMap<SkillKey, SkillLevel> {
        if self.employee_skills.is_initialized(&employee.id) {
            self.employee_skills.levels_for(&employee.id)
        } else {
            employee.seed_levels().into_iter().collect()
        }
    }

    fn employee_state(&self, employee: &Employee, skill: &SkillKey) -> EmployeeSkillState {
        if self.employee_skills.is_initialized(&employee.id) {
            self.employee_skills.skill_state_or_default(&employee.id, skill)
        } else {
            EmployeeSkillState {
                level: employee
                    .seed_levels()
                    .into_iter()
                    .find(|(k, _)| k == skill)
                    .map(|(_, level)| level)
                    .unwrap_or_default(),
                ..EmployeeSkillState::default()
            }
        }
    }

    // ── Benchmarks ──────────────────────────────────────────────────

    /// Effective requirements of the role's toggled skills at `level_key`.
    pub fn requirements(
        &mut self,
        role_id: &str,
        level_key: Option<LevelKey>,
    ) -> MatrixResult<Vec<EffectiveRequirement>> {
        self.ensure_toggled(role_id)?;
        let role = self.role(role_id)?;
        Ok(benchmark::resolve_requirements(
            role,
            &self.config.catalog,
            &self.competency,
            level_key,
            &self.toggled.get(role_id).cloned().unwrap_or_default(),
        ))
    }

    pub fn compare(
        &self,
        employee_id: &str,
        skill_title: &str,
        required: SkillLevel,
    ) -> MatrixResult<SkillComparison> {
        let employee = self.employee(employee_id)?;
        let have = self.employee_state(employee, &SkillKey::new(skill_title)).level;
        Ok(benchmark::compare_skill_levels(have, required))
    }

    pub fn benchmark(
        &mut self,
        employee_id: &str,
        role_id: &str,
        level_key: Option<LevelKey>,
    ) -> MatrixResult<u32> {
        let requirements = self.requirements(role_id, level_key)?;
        let employee = self.employee(employee_id)?;
        Ok(benchmark::benchmark_percentage(&self.employee_levels(employee), &requirements))
    }

    /// Every employee ranked against the role: current holders first,
    /// then everyone else by descending benchmark.
    pub fn rank_employees(
        &mut self,
        role_id: &str,
        level_key: Option<LevelKey>,
    ) -> MatrixResult<Vec<EmployeeRanking>> {
        let requirements = self.requirements(role_id, level_key)?;
        let role = self.role(role_id)?;
        let ranked = benchmark::sort_employees_by_role_match(
            &self.config.employees,
            role,
            &requirements,
            |e| self.employee_levels(e),
        );
        Ok(ranked
            .into_iter()
            .map(|r| EmployeeRanking {
                employee_id: r.employee.id.clone(),
                name: r.employee.name.clone(),
                role: r.employee.role.clone(),
                benchmark: r.benchmark,
                exact_match: r.exact_match,
            })
            .collect())
    }

    /// Gaps against `role_id`, or against the employee's own role and rung
    /// when `role_id` is `None`.
    pub fn missing_skills(
        &mut self,
        employee_id: &str,
        role_id: Option<&str>,
    ) -> MatrixResult<Vec<MissingSkill>> {
        let employee = self.employee(employee_id)?;
        let level_key = employee.level_key();
        let role_id = match role_id {
            Some(id) => id.to_string(),
            None => match self.role_of(employee) {
                Some(role) => role.role_id.clone(),
                None => return Ok(Vec::new()),
            },
        };
        let requirements = self.requirements(&role_id, level_key)?;
        let employee = self.employee(employee_id)?;
        Ok(benchmark::missing_skills(&self.employee_levels(employee), &requirements))
    }

    /// Toggled skills the role marks required at `level_key`, per category.
    pub fn category_counts(
        &mut self,
        role_id: &str,
        level_key: Option<LevelKey>,
    ) -> MatrixResult<CategoryCounts> {
        let requirements = self.requirements(role_id, level_key)?;
        Ok(count_required_by_category(&requirements))
    }

    /// Toggled skills of the employee's role that the employee set as a goal.
    pub fn goal_counts(&mut self, employee_id: &str) -> MatrixResult<CategoryCounts> {
        self.initialize_employee(employee_id)?;
        let employee = self.employee(employee_id)?;
        let role_id = self.role_of(employee).map(|r| r.role_id.clone());
        let toggled = match role_id {
            Some(role_id) => self.toggled_skills(&role_id)?,
            None => self
                .employee_skills
                .skills_for(employee_id)
                .map(|s| s.keys().cloned().collect())
                .unwrap_or_default(),
        };
        let skills = self
            .employee_skills
            .skills_for(employee_id)
            .cloned()
            .unwrap_or_default();
        Ok(count_goals_by_category(&skills, &toggled, &self.config.catalog))
    }

    // ── Matrix view ─────────────────────────────────────────────────

    pub fn filter(&self) -> &MatrixFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: MatrixFilter) -> MatrixResult<()> {
        filter.persist(&mut self.store)?;
        self.filter = filter;
        self.record(MatrixEvent::FilterChanged)
    }

    /// The employee's matrix against their own role and rung, filtered.
    /// Employees without a matching profile get their recorded skills
    /// compared with catalog levels.
    pub fn employee_matrix(&mut self, employee_id: &str) -> MatrixResult<Vec<MatrixRow>> {
        let employee = self.employee(employee_id)?.clone();
        let level_key = employee.level_key();
        let role_id = self.role_of(&employee).map(|r| r.role_id.clone());

        let rows: Vec<MatrixRow> = match role_id {
            Some(role_id) => {
                let requirements = self.requirements(&role_id, level_key)?;
                requirements
                    .iter()
                    .map(|r| {
                        let cell = level_key
                            .and_then(|lk| self.competency.skill_state(&role_id, &r.key, lk));
                        self.row(&employee, &r.title, r.level, cell)
                    })
                    .collect()
            }
            None => employee
                .skills
                .iter()
                .map(|s| {
                    let required = self.config.catalog.unified_skill(&s.title).level;
                    self.row(&employee, &s.title, required, None)
                })
                .collect(),
        };
        Ok(self.filter.apply(rows))
    }

    fn row(
        &self,
        employee: &Employee,
        title: &str,
        required: SkillLevel,
        cell: Option<CompetencySkillState>,
    ) -> MatrixRow {
        let skill = self.config.catalog.unified_skill(title);
        let key = SkillKey::new(title);
        let state = self.employee_state(employee, &key);
        MatrixRow {
            key,
            title: skill.title,
            category: skill.category,
            subcategory: skill.subcategory,
            weight: skill.weight,
            level: state.level,
            goal_status: state.goal_status,
            in_development_plan: state.in_development_plan,
            role_requirement: cell,
            comparison: benchmark::compare_skill_levels(state.level, required),
        }
    }

    /// The role's cells at `level_key` for its toggled skills, initializing
    /// the role on first read.
    pub fn role_matrix(&mut self, role_id: &str, level_key: LevelKey) -> MatrixResult<Vec<RoleMatrixRow>> {
        self.ensure_role(role_id)?;
        self.ensure_toggled(role_id)?;
        let toggled = self.toggled.get(role_id).cloned().unwrap_or_default();
        let mut rows: Vec<RoleMatrixRow> = toggled
            .iter()
            .map(|(key, title)| {
                let skill = self.config.catalog.unified_skill(title);
                RoleMatrixRow {
                    key: key.clone(),
                    title: skill.title,
                    category: skill.category,
                    state: self.competency.skill_state_or_default(role_id, key, level_key),
                }
            })
            .collect();
        rows.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.title.cmp(&b.title)));
        Ok(rows)
    }
}
