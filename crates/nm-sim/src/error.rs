use nm_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("world configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("initial population of {got} exceeds max_agents {max}")]
    PopulationTooLarge { got: usize, max: usize },
}

pub type SimResult<T> = Result<T, SimError>;
