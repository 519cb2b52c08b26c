//! Conclave governance kernel: the decision engine for a replicated
//! governance process.
//!
//! Named actions with independent validation and application logic compose
//! into ordered proposals. A proposal is validated against the closed
//! action registry, voted on by members, deterministically resolved to
//! Accepted, Rejected, or Open, and, once accepted, applied to persistent
//! state exactly once.
//!
//! Every replica executing the same proposal, ballots, and store contents
//! must reach the same verdict and the same post-state, so nothing in this
//! crate consults a clock, draws randomness, or iterates an unordered
//! collection inside decision logic.
//!
//! The three decision entry points are effect-isolated by construction:
//!
//! - [`validate_proposal`] reads nothing mutable and accumulates every
//!   position-tagged error instead of short-circuiting.
//! - [`resolve`] is a pure function of the proposal, its proposer, the
//!   ballot sequence, and stored member records, read through a read-only
//!   store handle.
//! - [`apply_proposal`] is the only path that mutates governance state,
//!   and runs at most once per accepted proposal.
//!
//! [`ProposalEngine`] layers the pending-proposal lifecycle on top:
//! submission, balloting, withdrawal, and terminal dispositions.

#![deny(unsafe_code)]

pub mod action;
pub mod error;
pub mod executor;
pub mod lifecycle;
pub mod member;
pub mod proposal;
pub mod registry;
pub mod resolver;
pub mod tables;
pub mod validator;

pub use action::{ActionArgs, ActionDefinition, ActionKind, ResolutionPolicy};
pub use error::{GovernanceError, GovernanceResult};
pub use executor::apply_proposal;
pub use lifecycle::{Disposition, ProposalEngine, ProposalRecord, SubmitOutcome};
pub use member::{MemberId, MemberInfo, MemberStatus, UserId};
pub use proposal::{
    parse_votes, Proposal, ProposalId, ProposalParseError, ProposedAction, Vote,
};
pub use registry::ActionRegistry;
pub use resolver::{resolve, Verdict};
pub use validator::{validate_proposal, ValidationError, ValidationOutcome, ValidationReport};
