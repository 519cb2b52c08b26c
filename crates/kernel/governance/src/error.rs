use crate::member::MemberId;
use crate::proposal::{ProposalId, ProposalParseError};
use conclave_kernel_store::StoreError;
use thiserror::Error;

/// Result alias for governance operations.
pub type GovernanceResult<T> = Result<T, GovernanceError>;

/// Errors from the governance engine.
///
/// Validation failures are not errors: they are accumulated into a
/// [`crate::ValidationReport`] and returned to the caller so a proposer
/// gets every failing position in one response.
#[derive(Debug, Error)]
pub enum GovernanceError {
    /// The submission payload did not parse into the typed proposal
    /// representation.
    #[error("malformed proposal payload: {0}")]
    Parse(#[from] ProposalParseError),

    /// Fatal store failure: corrupt persisted bytes or an encoding
    /// failure. Never masked as absence.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An action passed validation but has no registry entry at apply
    /// time. The registry drifted between validation and application;
    /// the proposal must not be partially applied.
    #[error("action {name} at position {position} vanished from the registry after validation")]
    ConsistencyViolation { name: String, position: usize },

    /// An action's apply routine failed.
    #[error("apply failed for action {name}: {detail}")]
    ApplyFailed { name: String, detail: String },

    #[error("no such proposal: {0}")]
    ProposalNotFound(ProposalId),

    #[error("member {0} is not an active member")]
    MemberNotActive(MemberId),

    #[error("proposal {proposal} can only be withdrawn by its proposer, not {caller}")]
    NotProposer {
        proposal: ProposalId,
        caller: MemberId,
    },
}
