use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskMateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{0}")]
    Validation(String),
}

pub type Result<T, E = TaskMateError> = std::result::Result<T, E>;
