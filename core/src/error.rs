use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Role '{role_id}' not found")]
    UnknownRole { role_id: String },

    #[error("Employee '{employee_id}' not found")]
    UnknownEmployee { employee_id: String },

    #[error("Invalid {kind}: '{value}'")]
    InvalidValue { kind: &'static str, value: String },

    #[error("Unsupported schema version for '{key}': found {found}, supported up to {supported}")]
    SchemaVersion { key: String, found: u32, supported: u32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type MatrixResult<T> = Result<T, MatrixError>;
