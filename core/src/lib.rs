//! Skills matrix core: role profiles, competency and employee skill state,
//! and the benchmark calculations that compare the two.

pub mod benchmark;
pub mod catalog;
pub mod competency;
pub mod config;
pub mod employee;
pub mod employee_skills;
pub mod engine;
pub mod error;
pub mod event;
pub mod level;
pub mod matrix;
pub mod persist;
pub mod role;
pub mod store;
pub mod toggled;
pub mod types;
