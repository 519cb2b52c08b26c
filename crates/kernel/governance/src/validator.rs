//! Proposal validation against the action registry.

use crate::action::ActionDefinition;
use crate::proposal::Proposal;
use crate::registry::ActionRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Separator between rendered validation errors.
const ERROR_SEPARATOR: &str = ", ";

/// A single position-tagged validation failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The named action has no registry entry.
    UnknownAction { position: usize, name: String },
    /// The action's own validate predicate returned false.
    FailedValidation { position: usize, name: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownAction { name, .. } => {
                write!(f, "{name}: no such action")
            }
            ValidationError::FailedValidation { position, name } => {
                write!(f, "{name} at position {position} failed validation")
            }
        }
    }
}

/// Accumulated validation result for one proposal.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Every error message joined with a fixed separator; empty when valid.
    pub fn description(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(ERROR_SEPARATOR)
    }

    /// The caller-facing verdict.
    pub fn outcome(&self) -> ValidationOutcome {
        ValidationOutcome {
            valid: self.is_valid(),
            description: self.description(),
        }
    }
}

/// Caller-facing validation verdict.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub description: String,
}

/// Check every constituent action of `proposal` against the registry.
///
/// Errors accumulate across all positions so the proposer gets full
/// diagnostics in one round-trip; validation never short-circuits on the
/// first failure. Reads nothing mutable.
pub fn validate_proposal(registry: &ActionRegistry, proposal: &Proposal) -> ValidationReport {
    let mut errors = Vec::new();
    for (position, action) in proposal.actions.iter().enumerate() {
        match registry.get(&action.name) {
            None => {
                debug!(action = %action.name, position, "unknown action");
                errors.push(ValidationError::UnknownAction {
                    position,
                    name: action.name.clone(),
                });
            }
            Some(kind) => {
                if !kind.validate(&action.args) {
                    debug!(action = %action.name, position, "action failed validation");
                    errors.push(ValidationError::FailedValidation {
                        position,
                        name: action.name.clone(),
                    });
                }
            }
        }
    }
    ValidationReport { errors }
}
