use crate::{
    catalog::{Confidence, Skill, SkillBenchmarks, SkillCatalog, SkillCategory, SkillWeight},
    employee::{Employee, EmployeeSkill},
    level::{Requirement, SkillLevel, Track},
    role::{RoleCatalog, RoleProfileConfig, RoleSkillEntry},
};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct SkillCatalogFile {
    skills: Vec<Skill>,
}

#[derive(Debug, Clone, Deserialize)]
struct RoleProfilesFile {
    roles: Vec<RoleProfileConfig>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmployeesFile {
    employees: Vec<Employee>,
}

#[derive(Debug, Clone)]
pub struct MatrixConfig {
    pub catalog: SkillCatalog,
    pub roles: RoleCatalog,
    pub employees: Vec<Employee>,
}

impl MatrixConfig {
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let catalog_path = format!("{data_dir}/skills/skill_catalog.json");
        let catalog_content = std::fs::read_to_string(&catalog_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {catalog_path}: {e}"))?;
        let catalog_file: SkillCatalogFile = serde_json::from_str(&catalog_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {catalog_path}: {e}"))?;
        let catalog = SkillCatalog::new(catalog_file.skills);

        let roles_path = format!("{data_dir}/roles/role_profiles.json");
        let roles_content = std::fs::read_to_string(&roles_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {roles_path}: {e}"))?;
        let roles_file: RoleProfilesFile = serde_json::from_str(&roles_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {roles_path}: {e}"))?;

        for role in &roles_file.roles {
            for entry in &role.skills {
                if !catalog.contains(&entry.title) {
                    log::warn!(
                        "role {} references '{}' which is not in the catalog",
                        role.role_id,
                        entry.title
                    );
                }
            }
        }
        let roles = RoleCatalog::from_config(&roles_file.roles, &catalog);

        let employees_path = format!("{data_dir}/employees/employees.json");
        let employees_content = std::fs::read_to_string(&employees_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {employees_path}: {e}"))?;
        let employees_file: EmployeesFile = serde_json::from_str(&employees_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {employees_path}: {e}"))?;

        log::info!(
            "loaded {} skills, {} roles, {} employees from {data_dir}",
            catalog.len(),
            roles_file.roles.len(),
            employees_file.employees.len()
        );

        Ok(Self {
            catalog,
            roles,
            employees: employees_file.employees,
        })
    }

    pub fn employee(&self, employee_id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == employee_id)
    }

    /// Config with hardcoded data for use in tests.
    pub fn default_test() -> Self {
        use SkillCategory::{Certification, Common, Specialized};
        use SkillLevel::{Advanced, Beginner, Intermediate};
        use SkillWeight::{Critical, Necessary, Technical};
        use Requirement::{Preferred, Required};

        let skill = |id: &str, title: &str, sub: &str, category, weight, level| Skill {
            id: id.into(),
            title: title.into(),
            subcategory: sub.into(),
            category,
            business_category: "Information Technology".into(),
            weight,
            level,
            growth: "+20%".into(),
            salary: "$150,000".into(),
            confidence: Confidence::High,
            benchmarks: SkillBenchmarks { business: true, role: true, market: true, organization: false },
        };

        let catalog = SkillCatalog::new(vec![
            skill("s1", "Machine Learning", "Artificial Intelligence", Specialized, Critical, Advanced),
            skill("s2", "Python", "Programming Languages", Specialized, Technical, Advanced),
            skill("s3", "Deep Learning", "Artificial Intelligence", Specialized, Critical, Intermediate),
            skill("s4", "React", "Frontend Frameworks", Specialized, Critical, Advanced),
            skill("s5", "TypeScript", "Programming Languages", Specialized, Technical, Intermediate),
            skill("s6", "GraphQL", "API Design", Specialized, Technical, Beginner),
            skill("s7", "Node.js", "Backend Frameworks", Specialized, Technical, Intermediate),
            skill("s8", "Communication", "Soft Skills", Common, Necessary, Intermediate),
            skill("s9", "Problem Solving", "Soft Skills", Common, Necessary, Intermediate),
            skill("s10", "Team Leadership", "Leadership", Common, Critical, Advanced),
            skill("s11", "AWS Certified Solutions Architect", "Cloud Certification", Certification, Technical, Beginner),
            skill("s12", "Certified Kubernetes Administrator", "Cloud Certification", Certification, Technical, Beginner),
        ]);

        let entry = |title: &str, minimum_level, requirement_level| RoleSkillEntry {
            title: title.into(),
            minimum_level,
            requirement_level,
        };

        let role_configs = vec![
            RoleProfileConfig {
                role_id: "123".into(),
                title: "AI Engineer".into(),
                track: Track::Professional,
                skills: vec![
                    entry("Machine Learning", Advanced, Required),
                    entry("Python", Advanced, Required),
                    entry("Deep Learning", Intermediate, Preferred),
                    entry("Communication", Intermediate, Preferred),
                    entry("AWS Certified Solutions Architect", Beginner, Preferred),
                ],
            },
            RoleProfileConfig {
                role_id: "125".into(),
                title: "Frontend Engineer".into(),
                track: Track::Professional,
                skills: vec![
                    entry("React", Advanced, Required),
                    entry("TypeScript", Intermediate, Required),
                    entry("GraphQL", Beginner, Preferred),
                    entry("Communication", Intermediate, Preferred),
                ],
            },
            RoleProfileConfig {
                role_id: "126".into(),
                title: "Engineering Manager".into(),
                track: Track::Managerial,
                skills: vec![
                    entry("Team Leadership", Advanced, Required),
                    entry("Communication", Advanced, Required),
                    entry("Problem Solving", Intermediate, Preferred),
                    entry("Certified Kubernetes Administrator", Beginner, Preferred),
                ],
            },
        ];
        let roles = RoleCatalog::from_config(&role_configs, &catalog);

        let employee = |id: &str, name: &str, role: &str, skills: Vec<(&str, SkillLevel)>| Employee {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            department: "Engineering".into(),
            office: "Toronto".into(),
            manager: "Sus Manu".into(),
            category: "Full-time".into(),
            start_date: NaiveDate::from_ymd_opt(2022, 3, 1),
            term_date: None,
            skills: skills
                .into_iter()
                .map(|(title, level)| EmployeeSkill { title: title.into(), level })
                .collect(),
        };

        let employees = vec![
            employee("emp-1", "Victor Smith", "AI Engineer: P4", vec![
                ("Machine Learning", Advanced),
                ("Python", Advanced),
                ("React", Beginner),
            ]),
            employee("emp-2", "Jennifer Anderson", "Frontend Engineer: P3", vec![
                ("React", Intermediate),
                ("TypeScript", Intermediate),
            ]),
            employee("emp-3", "Kevin Chen", "Backend Engineer: P4", vec![
                ("React", Advanced),
                ("Node.js", Advanced),
            ]),
            employee("emp-4", "Maria Garcia", "Engineering Manager: M4", vec![
                ("Team Leadership", Advanced),
                ("Communication", Advanced),
            ]),
            employee("emp-5", "Sarah Johnson", "Frontend Engineer", vec![
                ("React", Advanced),
                ("TypeScript", Advanced),
                ("Communication", Intermediate),
            ]),
        ];

        Self { catalog, roles, employees }
    }
}
