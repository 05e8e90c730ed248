use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("No plan found within the time limit")]
    NoPlanFound,
    #[error("Unknown item: {0}")]
    UnknownItem(String),
    #[error("Recipe cost must be a non-negative number")]
    InvalidCost,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed problem data: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
