use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedError {
    #[error("task store is empty")]
    EmptyStore,

    #[error("invalid task parameter `{field}`: {reason}")]
    InvalidTaskParameter { field: &'static str, reason: String },

    #[error("invalid scheduler config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid quantum {0}: must be finite and greater than zero")]
    InvalidQuantum(f64),

    #[error("red-black invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, SchedError>;
