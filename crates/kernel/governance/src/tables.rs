//! Governance table schema over the typed store.
//!
//! One accessor per table. Wrappers are constructed per access and own no
//! data; pass `&store` for a read-only view or `&mut store` for the full
//! surface.

use crate::lifecycle::{Disposition, ProposalRecord};
use crate::member::{MemberIdConverter, MemberInfo, UserIdConverter};
use crate::proposal::{ProposalIdConverter, Vote};
use conclave_kernel_store::{JsonConverter, StringConverter, TypedMap, U64Converter};
use serde_json::Value;

pub const MEMBERS_INFO: &str = "governance.members.info";
pub const USERS_CERTS: &str = "governance.users.certs";
pub const USERS_INFO: &str = "governance.users.info";
pub const PROPOSALS: &str = "governance.proposals";
pub const BALLOTS: &str = "governance.ballots";
pub const DISPOSITIONS: &str = "governance.dispositions";
pub const VALUES: &str = "governance.values";

/// Key of the proposal-id counter in the values table.
pub const NEXT_PROPOSAL_ID: &str = "next_proposal_id";

/// Stored member records, keyed by member id.
pub fn members_info<S>(store: S) -> TypedMap<S, MemberIdConverter, JsonConverter<MemberInfo>> {
    TypedMap::new(store, MEMBERS_INFO)
}

/// User certificates (PEM), keyed by user id.
pub fn user_certs<S>(store: S) -> TypedMap<S, UserIdConverter, StringConverter> {
    TypedMap::new(store, USERS_CERTS)
}

/// Free-form user data, keyed by user id.
pub fn user_info<S>(store: S) -> TypedMap<S, UserIdConverter, JsonConverter<Value>> {
    TypedMap::new(store, USERS_INFO)
}

/// Pending proposals, keyed by proposal id.
pub fn proposals<S>(store: S) -> TypedMap<S, ProposalIdConverter, JsonConverter<ProposalRecord>> {
    TypedMap::new(store, PROPOSALS)
}

/// Ballot sequences for pending proposals, in arrival order.
pub fn ballots<S>(store: S) -> TypedMap<S, ProposalIdConverter, JsonConverter<Vec<Vote>>> {
    TypedMap::new(store, BALLOTS)
}

/// Terminal dispositions of completed proposals.
pub fn dispositions<S>(store: S) -> TypedMap<S, ProposalIdConverter, JsonConverter<Disposition>> {
    TypedMap::new(store, DISPOSITIONS)
}

/// Auxiliary counters (next proposal id).
pub fn values<S>(store: S) -> TypedMap<S, StringConverter, U64Converter> {
    TypedMap::new(store, VALUES)
}
