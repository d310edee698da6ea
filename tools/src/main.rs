//! matrix-runner: headless runner for the skills matrix.
//!
//! Usage:
//!   matrix-runner --data-dir ./data --role 125 --level p4
//!   matrix-runner --db matrix.db --ipc-mode

use anyhow::Result;
use serde_json::{json, Value};
use skillsmatrix_core::{
    config::MatrixConfig,
    employee_skills::EmployeeSkillUpdate,
    engine::MatrixEngine,
    level::{GoalStatus, LevelKey, Requirement, SkillLevel},
    store::MatrixStore,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetRole {
        role_id: String,
        #[serde(default)]
        level_key: Option<LevelKey>,
    },
    SetSkillState {
        role_id: String,
        skill: String,
        level_key: LevelKey,
        level: SkillLevel,
        required: Requirement,
    },
    SaveChanges {
        role_id: String,
    },
    CancelChanges {
        role_id: String,
    },
    ToggleSkill {
        role_id: String,
        skill: String,
    },
    UpdateEmployeeSkill {
        employee_id: String,
        skill: String,
        #[serde(default)]
        level: Option<SkillLevel>,
        #[serde(default)]
        goal_status: Option<GoalStatus>,
        #[serde(default)]
        in_development_plan: Option<bool>,
    },
    Rank {
        role_id: String,
        #[serde(default)]
        level_key: Option<LevelKey>,
    },
    MissingSkills {
        employee_id: String,
        #[serde(default)]
        role_id: Option<String>,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");
    let role_id = string_arg(&args, "--role").unwrap_or("125");
    let level_key = match string_arg(&args, "--level") {
        Some(text) => Some(text.parse::<LevelKey>()?),
        None => None,
    };

    if !ipc_mode {
        println!("Skills Matrix: matrix-runner");
        println!("  data_dir:  {data_dir}");
        println!("  db:        {db}");
        println!("  role:      {role_id}");
        println!();
    }

    let config = MatrixConfig::load(data_dir)?;
    let store = MatrixStore::open(db)?;
    store.migrate()?;
    let mut engine = MatrixEngine::build(config, store);

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        print_summary(&mut engine, role_id, level_key)?;
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut MatrixEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };
        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        let reply = match handle_command(engine, cmd) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("command failed: {e}");
                json!({ "error": e.to_string() })
            }
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(engine: &mut MatrixEngine, cmd: IpcCommand) -> Result<Value> {
    let reply = match cmd {
        IpcCommand::GetRole { role_id, level_key } => role_state(engine, &role_id, level_key)?,
        IpcCommand::SetSkillState { role_id, skill, level_key, level, required } => {
            engine.set_skill_state(&role_id, &skill, level_key, level, required)?;
            role_state(engine, &role_id, Some(level_key))?
        }
        IpcCommand::SaveChanges { role_id } => {
            let saved = engine.save_changes(&role_id)?;
            json!({ "role_id": role_id, "saved": saved })
        }
        IpcCommand::CancelChanges { role_id } => {
            let discarded = engine.cancel_changes(&role_id)?;
            json!({ "role_id": role_id, "discarded": discarded })
        }
        IpcCommand::ToggleSkill { role_id, skill } => {
            let toggled = engine.toggle_skill(&role_id, &skill)?;
            json!({ "role_id": role_id, "skill": skill, "toggled": toggled })
        }
        IpcCommand::UpdateEmployeeSkill {
            employee_id,
            skill,
            level,
            goal_status,
            in_development_plan,
        } => {
            let update = EmployeeSkillUpdate { level, goal_status, in_development_plan };
            let state = engine.update_employee_skill(&employee_id, &skill, update)?;
            json!({ "employee_id": employee_id, "skill": skill, "state": state })
        }
        IpcCommand::Rank { role_id, level_key } => {
            let ranking = engine.rank_employees(&role_id, level_key)?;
            json!({ "role_id": role_id, "ranking": ranking })
        }
        IpcCommand::MissingSkills { employee_id, role_id } => {
            let missing = engine.missing_skills(&employee_id, role_id.as_deref())?;
            json!({ "employee_id": employee_id, "missing": missing })
        }
        IpcCommand::Quit => Value::Null,
    };
    Ok(reply)
}

fn role_state(engine: &mut MatrixEngine, role_id: &str, level_key: Option<LevelKey>) -> Result<Value> {
    let title = engine.role(role_id)?.title.clone();
    let toggled = engine.toggled_skills(role_id)?;
    let counts = engine.category_counts(role_id, level_key)?;
    let rows = match level_key {
        Some(lk) => serde_json::to_value(engine.role_matrix(role_id, lk)?)?,
        None => Value::Null,
    };
    Ok(json!({
        "role_id": role_id,
        "title": title,
        "has_changes": engine.has_changes(role_id),
        "toggled": toggled,
        "required_counts": counts,
        "rows": rows,
    }))
}

fn print_summary(engine: &mut MatrixEngine, role_id: &str, level_key: Option<LevelKey>) -> Result<()> {
    let title = engine.role(role_id)?.title.clone();
    let requirements = engine.requirements(role_id, level_key)?;
    let counts = engine.category_counts(role_id, level_key)?;
    let ranking = engine.rank_employees(role_id, level_key)?;

    println!("=== ROLE {role_id}: {title} ===");
    if let Some(lk) = level_key {
        println!("  level:          {lk}");
    }
    println!("  toggled skills: {}", requirements.len());
    println!(
        "  required:       {} specialized, {} common, {} certification",
        counts.specialized, counts.common, counts.certification
    );
    println!();
    for r in &requirements {
        println!(
            "  {:<40} {:<14} {:<12} {}",
            r.title,
            r.category.as_str(),
            r.level.as_str(),
            r.requirement.as_str()
        );
    }

    println!();
    println!("=== EMPLOYEE RANKING ===");
    if ranking.is_empty() {
        println!("  (No employees loaded)");
    }
    for r in &ranking {
        let marker = if r.exact_match { "*" } else { " " };
        println!("  {marker} {:>3}%  {:<24} {}", r.benchmark, r.name, r.role);
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
