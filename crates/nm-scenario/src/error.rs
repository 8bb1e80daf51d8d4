use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("unknown scenario {0:?}")]
    Unknown(String),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
