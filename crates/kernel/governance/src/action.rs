//! The closed set of governance actions.
//!
//! Each kind binds a wire name to validation and application behavior and
//! declares the resolution rule the resolver evaluates for single-action
//! proposals of that kind. The set is fixed at compile time; the registry
//! built over it never changes after startup.

use crate::error::{GovernanceError, GovernanceResult};
use crate::member::UserId;
use crate::tables;
use conclave_kernel_store::KvWrite;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Argument object attached to a proposed action.
pub type ActionArgs = Map<String, Value>;

/// Validation and application behavior bound to one action name.
///
/// `validate` is a pure predicate: it must not touch the store, and an
/// argument shape it does not recognize yields `false`, never an error.
/// `apply` receives the read-write store handle and runs exactly once per
/// accepted proposal.
pub trait ActionDefinition {
    fn validate(&self, args: &ActionArgs) -> bool;
    fn apply(&self, args: &ActionArgs, store: &mut dyn KvWrite) -> GovernanceResult<()>;
}

/// Per-kind resolution rule for single-action proposals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionPolicy {
    /// Accepted as soon as resolution runs.
    AcceptAlways,
    /// Rejected as soon as resolution runs.
    RejectAlways,
    /// Accepted when exactly one ballot has been cast and it is `true`.
    AcceptOnSingleYes,
    /// Rejected when exactly one ballot has been cast and it is `false`.
    RejectOnSingleNo,
    /// Accepted when any cast ballot belongs to a stored operator.
    AcceptOnOperatorBallot,
    /// Accepted when the proposer's stored record marks them an operator.
    AcceptOnOperatorProposer,
    /// Accepted when exactly two ballots were cast and the first and the
    /// second are both `true`. Positional, not a count of agreements.
    AcceptOnDoubleYes,
    /// Rejected when exactly two ballots were cast and the first and the
    /// second are both `false`. Positional.
    RejectOnDoubleNo,
}

/// The closed set of built-in governance actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SetRecoveryThreshold,
    AlwaysAcceptNoop,
    AlwaysRejectNoop,
    AlwaysAcceptWithOneVote,
    AlwaysRejectWithOneVote,
    AlwaysAcceptIfVotedByOperator,
    AlwaysAcceptIfProposedByOperator,
    AlwaysAcceptWithTwoVotes,
    AlwaysRejectWithTwoVotes,
    RemoveUser,
}

impl ActionKind {
    /// Every built-in kind.
    pub const ALL: [ActionKind; 10] = [
        ActionKind::SetRecoveryThreshold,
        ActionKind::AlwaysAcceptNoop,
        ActionKind::AlwaysRejectNoop,
        ActionKind::AlwaysAcceptWithOneVote,
        ActionKind::AlwaysRejectWithOneVote,
        ActionKind::AlwaysAcceptIfVotedByOperator,
        ActionKind::AlwaysAcceptIfProposedByOperator,
        ActionKind::AlwaysAcceptWithTwoVotes,
        ActionKind::AlwaysRejectWithTwoVotes,
        ActionKind::RemoveUser,
    ];

    /// Wire name of this action.
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::SetRecoveryThreshold => "set_recovery_threshold",
            ActionKind::AlwaysAcceptNoop => "always_accept_noop",
            ActionKind::AlwaysRejectNoop => "always_reject_noop",
            ActionKind::AlwaysAcceptWithOneVote => "always_accept_with_one_vote",
            ActionKind::AlwaysRejectWithOneVote => "always_reject_with_one_vote",
            ActionKind::AlwaysAcceptIfVotedByOperator => "always_accept_if_voted_by_operator",
            ActionKind::AlwaysAcceptIfProposedByOperator => {
                "always_accept_if_proposed_by_operator"
            }
            ActionKind::AlwaysAcceptWithTwoVotes => "always_accept_with_two_votes",
            ActionKind::AlwaysRejectWithTwoVotes => "always_reject_with_two_votes",
            ActionKind::RemoveUser => "remove_user",
        }
    }

    /// Resolution rule for single-action proposals of this kind. `None`
    /// means such proposals never resolve automatically and stay open.
    pub fn resolution_policy(self) -> Option<ResolutionPolicy> {
        match self {
            ActionKind::SetRecoveryThreshold => None,
            ActionKind::AlwaysAcceptNoop => Some(ResolutionPolicy::AcceptAlways),
            ActionKind::AlwaysRejectNoop => Some(ResolutionPolicy::RejectAlways),
            ActionKind::AlwaysAcceptWithOneVote => Some(ResolutionPolicy::AcceptOnSingleYes),
            ActionKind::AlwaysRejectWithOneVote => Some(ResolutionPolicy::RejectOnSingleNo),
            ActionKind::AlwaysAcceptIfVotedByOperator => {
                Some(ResolutionPolicy::AcceptOnOperatorBallot)
            }
            // Removing a user requires proposer authority, the same rule
            // as the explicit operator-proposed marker.
            ActionKind::AlwaysAcceptIfProposedByOperator | ActionKind::RemoveUser => {
                Some(ResolutionPolicy::AcceptOnOperatorProposer)
            }
            ActionKind::AlwaysAcceptWithTwoVotes => Some(ResolutionPolicy::AcceptOnDoubleYes),
            ActionKind::AlwaysRejectWithTwoVotes => Some(ResolutionPolicy::RejectOnDoubleNo),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SetRecoveryThresholdArgs {
    threshold: u64,
}

#[derive(Debug, Deserialize)]
struct RemoveUserArgs {
    user_id: String,
}

fn parse_args<T: DeserializeOwned>(args: &ActionArgs) -> Option<T> {
    serde_json::from_value(Value::Object(args.clone())).ok()
}

impl ActionDefinition for ActionKind {
    fn validate(&self, args: &ActionArgs) -> bool {
        match self {
            ActionKind::SetRecoveryThreshold => parse_args::<SetRecoveryThresholdArgs>(args)
                .map(|parsed| parsed.threshold > 0 && parsed.threshold < 255)
                .unwrap_or(false),
            ActionKind::RemoveUser => parse_args::<RemoveUserArgs>(args).is_some(),
            // Marker actions place no constraint on their arguments.
            _ => true,
        }
    }

    fn apply(&self, args: &ActionArgs, store: &mut dyn KvWrite) -> GovernanceResult<()> {
        match self {
            ActionKind::RemoveUser => {
                let parsed: RemoveUserArgs =
                    parse_args(args).ok_or_else(|| GovernanceError::ApplyFailed {
                        name: self.name().to_string(),
                        detail: "user_id must be a string".to_string(),
                    })?;
                let user_id = UserId::new(parsed.user_id);
                tables::user_certs(&mut *store).delete(&user_id)?;
                tables::user_info(&mut *store).delete(&user_id)?;
                Ok(())
            }
            // The remaining built-ins have no persistent effect.
            _ => Ok(()),
        }
    }
}
