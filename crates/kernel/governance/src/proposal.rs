//! Proposal documents, ballots, and the structural parse step.
//!
//! Submission payloads are parsed into a typed intermediate representation
//! before any policy logic runs, so "unknown action" and "malformed args"
//! stay distinct, position-tagged conditions.

use crate::member::MemberId;
use conclave_kernel_store::{ConvertError, Converter};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Sequential identifier allocated when a proposal is stored.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProposalId(u64);

impl ProposalId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed-width little-endian key converter for proposal ids.
pub struct ProposalIdConverter;

impl Converter for ProposalIdConverter {
    type Value = ProposalId;

    fn encode(value: &ProposalId) -> Result<Vec<u8>, ConvertError> {
        Ok(value.0.to_le_bytes().to_vec())
    }

    fn decode(bytes: &[u8]) -> Result<ProposalId, ConvertError> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| {
            ConvertError::new(format!("expected 8 bytes, got {}", bytes.len()))
        })?;
        Ok(ProposalId(u64::from_le_bytes(raw)))
    }
}

/// One named action with its argument object.
///
/// The argument shape is dictated by the named action definition, not by
/// the registry; the engine requires only that it is an object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposedAction {
    pub name: String,
    pub args: Map<String, Value>,
}

impl ProposedAction {
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// An ordered sequence of proposed actions.
///
/// Order is semantically significant: validation error positions and apply
/// execution order both follow it. A proposal is immutable after creation;
/// its lifecycle state is computed by resolution, never stored on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub actions: Vec<ProposedAction>,
}

impl Proposal {
    pub fn new(actions: Vec<ProposedAction>) -> Self {
        Self { actions }
    }

    /// Structural parse of a submission payload.
    pub fn parse(payload: &str) -> Result<Self, ProposalParseError> {
        let document: Value = serde_json::from_str(payload)
            .map_err(|err| ProposalParseError::Json(err.to_string()))?;
        let object = document
            .as_object()
            .ok_or(ProposalParseError::NotAnObject)?;
        let entries = object
            .get("actions")
            .and_then(Value::as_array)
            .ok_or(ProposalParseError::MissingActions)?;

        let mut actions = Vec::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            let action = entry
                .as_object()
                .ok_or(ProposalParseError::ActionNotAnObject { position })?;
            let name = action
                .get("name")
                .and_then(Value::as_str)
                .ok_or(ProposalParseError::MissingName { position })?
                .to_string();
            let args = match action.get("args") {
                None => Map::new(),
                Some(Value::Object(map)) => map.clone(),
                Some(_) => {
                    return Err(ProposalParseError::ArgsNotObject { name, position });
                }
            };
            actions.push(ProposedAction { name, args });
        }
        Ok(Self { actions })
    }

    /// The proposal's only action, when it has exactly one.
    pub fn single_action(&self) -> Option<&ProposedAction> {
        match self.actions.as_slice() {
            [action] => Some(action),
            _ => None,
        }
    }
}

/// Position-tagged failures of the structural parse step, distinct from
/// validation errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProposalParseError {
    #[error("payload is not valid JSON: {0}")]
    Json(String),

    #[error("payload must be a JSON object")]
    NotAnObject,

    #[error("payload has no actions array")]
    MissingActions,

    #[error("action at position {position} must be an object")]
    ActionNotAnObject { position: usize },

    #[error("action at position {position} has no name")]
    MissingName { position: usize },

    #[error("args for {name} at position {position} must be an object")]
    ArgsNotObject { name: String, position: usize },
}

/// One member's ballot on a proposal. Ballots accumulate in arrival order,
/// and resolution may depend on that order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub member_id: MemberId,
    pub vote: bool,
}

impl Vote {
    pub fn new(member_id: impl Into<MemberId>, vote: bool) -> Self {
        Self {
            member_id: member_id.into(),
            vote,
        }
    }
}

/// Parse a vote payload: an ordered sequence of `{member_id, vote}`.
pub fn parse_votes(payload: &str) -> Result<Vec<Vote>, ProposalParseError> {
    serde_json::from_str(payload).map_err(|err| ProposalParseError::Json(err.to_string()))
}
