//! Error type shared by the whole engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("particle `{label}` has invalid mass {mass} (must be positive and finite)")]
    InvalidMass { label: String, mass: f64 },

    #[error("invalid particle label {0:?}")]
    InvalidLabel(String),

    #[error("duplicate particle label `{0}`")]
    DuplicateLabel(String),

    #[error("particles `{first}` and `{second}` occupy the same position")]
    CoincidentParticles { first: String, second: String },

    #[error("force between `{first}` and `{second}` is not finite")]
    NonFiniteForce { first: String, second: String },

    #[error("cannot normalize a zero-length vector")]
    ZeroVector,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
