//! Boundary validation errors.

use thiserror::Error;

use super::OversError;

/// Input that is shape-correct JSON but breaks a model rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Player name must not be empty")]
    EmptyName,

    #[error("{0}")]
    Overs(#[from] OversError),
}
