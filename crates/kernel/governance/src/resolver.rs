//! Deterministic proposal resolution.
//!
//! [`resolve`] is a pure function of the proposal, its proposer, the
//! ballot sequence, and currently stored member records. It never writes,
//! never consults a clock, and never draws randomness: every replica
//! evaluating the same inputs must reach the same verdict.

use crate::action::ResolutionPolicy;
use crate::error::GovernanceResult;
use crate::member::MemberId;
use crate::proposal::{Proposal, Vote};
use crate::registry::ActionRegistry;
use crate::tables;
use conclave_kernel_store::KvRead;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Verdict of one resolution pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    Rejected,
    Open,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Accepted => "Accepted",
            Verdict::Rejected => "Rejected",
            Verdict::Open => "Open",
        };
        f.write_str(text)
    }
}

/// Compute the current verdict for `proposal`.
///
/// Resolution policy is defined per single-action proposal shape: only
/// proposals containing exactly one action are special-cased, and a
/// proposal with zero or several actions always resolves `Open`. Unknown
/// action names and kinds without a policy also stay `Open`; a pending
/// proposal is never an error.
///
/// The two-vote policies inspect the ballots at positions 0 and 1 rather
/// than counting agreement. Callers may depend on that exact behavior, so
/// it is preserved as-is: a `[no, yes]` pair stays `Open` even though one
/// yes and one no were cast.
pub fn resolve<S: KvRead>(
    registry: &ActionRegistry,
    proposal: &Proposal,
    proposer: &MemberId,
    votes: &[Vote],
    store: &S,
) -> GovernanceResult<Verdict> {
    let Some(action) = proposal.single_action() else {
        return Ok(Verdict::Open);
    };
    let Some(kind) = registry.get(&action.name) else {
        return Ok(Verdict::Open);
    };
    let Some(policy) = kind.resolution_policy() else {
        return Ok(Verdict::Open);
    };

    let verdict = match policy {
        ResolutionPolicy::AcceptAlways => Verdict::Accepted,
        ResolutionPolicy::RejectAlways => Verdict::Rejected,
        ResolutionPolicy::AcceptOnSingleYes => {
            if votes.len() == 1 && votes[0].vote {
                Verdict::Accepted
            } else {
                Verdict::Open
            }
        }
        ResolutionPolicy::RejectOnSingleNo => {
            if votes.len() == 1 && !votes[0].vote {
                Verdict::Rejected
            } else {
                Verdict::Open
            }
        }
        ResolutionPolicy::AcceptOnOperatorBallot => {
            if any_operator_ballot(votes, store)? {
                Verdict::Accepted
            } else {
                Verdict::Open
            }
        }
        ResolutionPolicy::AcceptOnOperatorProposer => {
            if is_stored_operator(proposer, store)? {
                Verdict::Accepted
            } else {
                Verdict::Open
            }
        }
        ResolutionPolicy::AcceptOnDoubleYes => {
            if votes.len() == 2 && votes[0].vote && votes[1].vote {
                Verdict::Accepted
            } else {
                Verdict::Open
            }
        }
        ResolutionPolicy::RejectOnDoubleNo => {
            if votes.len() == 2 && !votes[0].vote && !votes[1].vote {
                Verdict::Rejected
            } else {
                Verdict::Open
            }
        }
    };
    debug!(action = %action.name, verdict = %verdict, "resolution pass");
    Ok(verdict)
}

/// Whether any cast ballot belongs to a stored operator. Ballots from
/// members with no stored record are skipped, not an error; a record that
/// fails to decode propagates as a fatal store error.
fn any_operator_ballot<S: KvRead>(votes: &[Vote], store: &S) -> GovernanceResult<bool> {
    let members = tables::members_info(store);
    for vote in votes {
        if let Some(info) = members.get(&vote.member_id)? {
            if info.is_operator {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn is_stored_operator<S: KvRead>(member: &MemberId, store: &S) -> GovernanceResult<bool> {
    let info = tables::members_info(store).get(member)?;
    Ok(info.map(|info| info.is_operator).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::error::GovernanceError;
    use crate::member::MemberInfo;
    use crate::proposal::ProposedAction;
    use conclave_kernel_store::{KvWrite, MemoryKv, StoreError};
    use proptest::prelude::*;
    use serde_json::Map;

    fn single(name: &str) -> Proposal {
        Proposal::new(vec![ProposedAction::new(name, Map::new())])
    }

    fn votes(pairs: &[(&str, bool)]) -> Vec<Vote> {
        pairs
            .iter()
            .map(|(member, vote)| Vote::new(*member, *vote))
            .collect()
    }

    fn store_with_members(members: &[(&str, bool)]) -> MemoryKv {
        let mut store = MemoryKv::new();
        for (id, is_operator) in members {
            let info = if *is_operator {
                MemberInfo::operator()
            } else {
                MemberInfo::active()
            };
            tables::members_info(&mut store)
                .set(&MemberId::new(*id), &info)
                .unwrap();
        }
        store
    }

    fn resolve_single(
        name: &str,
        proposer: &str,
        ballots: &[(&str, bool)],
        store: &MemoryKv,
    ) -> Verdict {
        resolve(
            &ActionRegistry::builtin(),
            &single(name),
            &MemberId::new(proposer),
            &votes(ballots),
            store,
        )
        .unwrap()
    }

    #[test]
    fn unconditional_markers_resolve_immediately() {
        let store = MemoryKv::new();
        assert_eq!(
            resolve_single("always_accept_noop", "m1", &[], &store),
            Verdict::Accepted
        );
        assert_eq!(
            resolve_single("always_accept_noop", "m1", &[("m2", false)], &store),
            Verdict::Accepted
        );
        assert_eq!(
            resolve_single("always_reject_noop", "m1", &[], &store),
            Verdict::Rejected
        );
    }

    #[test]
    fn single_vote_policies_require_exactly_one_ballot() {
        let store = MemoryKv::new();
        assert_eq!(
            resolve_single("always_accept_with_one_vote", "m1", &[("m2", true)], &store),
            Verdict::Accepted
        );
        assert_eq!(
            resolve_single("always_accept_with_one_vote", "m1", &[("m2", false)], &store),
            Verdict::Open
        );
        assert_eq!(
            resolve_single("always_accept_with_one_vote", "m1", &[], &store),
            Verdict::Open
        );
        assert_eq!(
            resolve_single(
                "always_accept_with_one_vote",
                "m1",
                &[("m2", true), ("m3", true)],
                &store
            ),
            Verdict::Open
        );

        assert_eq!(
            resolve_single("always_reject_with_one_vote", "m1", &[("m2", false)], &store),
            Verdict::Rejected
        );
        assert_eq!(
            resolve_single("always_reject_with_one_vote", "m1", &[("m2", true)], &store),
            Verdict::Open
        );
    }

    #[test]
    fn two_vote_policies_are_positional() {
        let store = MemoryKv::new();
        let name = "always_accept_with_two_votes";

        assert_eq!(
            resolve_single(name, "m1", &[("m1", true)], &store),
            Verdict::Open
        );
        assert_eq!(
            resolve_single(name, "m1", &[("m1", true), ("m2", true)], &store),
            Verdict::Accepted
        );
        // one yes and one no is not enough, and order does not rescue it
        assert_eq!(
            resolve_single(name, "m1", &[("m1", false), ("m2", true)], &store),
            Verdict::Open
        );
        assert_eq!(
            resolve_single(name, "m1", &[("m1", true), ("m2", true), ("m3", true)], &store),
            Verdict::Open
        );

        let name = "always_reject_with_two_votes";
        assert_eq!(
            resolve_single(name, "m1", &[("m1", false), ("m2", false)], &store),
            Verdict::Rejected
        );
        assert_eq!(
            resolve_single(name, "m1", &[("m1", true), ("m2", false)], &store),
            Verdict::Open
        );
    }

    #[test]
    fn operator_ballot_policy_reads_member_records() {
        let store = store_with_members(&[("op", true), ("plain", false)]);
        let name = "always_accept_if_voted_by_operator";

        assert_eq!(
            resolve_single(name, "m1", &[("plain", true), ("op", false)], &store),
            Verdict::Accepted
        );
        assert_eq!(
            resolve_single(name, "m1", &[("plain", true)], &store),
            Verdict::Open
        );
        // ballots from unknown members are skipped, not an error
        assert_eq!(
            resolve_single(name, "m1", &[("ghost", true)], &store),
            Verdict::Open
        );
        assert_eq!(
            resolve_single(name, "m1", &[("ghost", true), ("op", true)], &store),
            Verdict::Accepted
        );
        assert_eq!(resolve_single(name, "m1", &[], &store), Verdict::Open);
    }

    #[test]
    fn proposer_authority_policy_reads_the_proposer_record() {
        let store = store_with_members(&[("op", true), ("plain", false)]);

        for name in ["always_accept_if_proposed_by_operator", "remove_user"] {
            assert_eq!(resolve_single(name, "op", &[], &store), Verdict::Accepted);
            assert_eq!(
                resolve_single(name, "plain", &[("op", true)], &store),
                Verdict::Open
            );
            assert_eq!(resolve_single(name, "ghost", &[], &store), Verdict::Open);
        }
    }

    #[test]
    fn zero_or_multiple_actions_always_stay_open() {
        let store = MemoryKv::new();
        let registry = ActionRegistry::builtin();
        let proposer = MemberId::new("m1");

        let empty = Proposal::new(vec![]);
        assert_eq!(
            resolve(&registry, &empty, &proposer, &[], &store).unwrap(),
            Verdict::Open
        );

        let double = Proposal::new(vec![
            ProposedAction::new("always_accept_noop", Map::new()),
            ProposedAction::new("always_accept_noop", Map::new()),
        ]);
        assert_eq!(
            resolve(&registry, &double, &proposer, &votes(&[("m2", true)]), &store).unwrap(),
            Verdict::Open
        );
    }

    #[test]
    fn unknown_and_policy_free_actions_stay_open() {
        let store = MemoryKv::new();
        assert_eq!(
            resolve_single("frobnicate", "m1", &[("m2", true)], &store),
            Verdict::Open
        );
        assert_eq!(
            resolve_single("set_recovery_threshold", "m1", &[("m2", true)], &store),
            Verdict::Open
        );
    }

    #[test]
    fn corrupt_member_record_is_fatal() {
        let mut store = MemoryKv::new();
        store.put(tables::MEMBERS_INFO, b"op".to_vec(), b"not json".to_vec());

        let err = resolve(
            &ActionRegistry::builtin(),
            &single("always_accept_if_proposed_by_operator"),
            &MemberId::new("op"),
            &[],
            &store,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::Store(StoreError::Decode { .. })
        ));
    }

    fn ballot_strategy() -> impl Strategy<Value = Vec<(u8, bool)>> {
        proptest::collection::vec((0u8..4, any::<bool>()), 0..5)
    }

    proptest! {
        #[test]
        fn property_resolution_is_deterministic(
            ballots in ballot_strategy(),
            kind_index in 0usize..ActionKind::ALL.len(),
        ) {
            let store = store_with_members(&[("m0", true), ("m1", false), ("m2", false)]);
            let registry = ActionRegistry::builtin();
            let proposer = MemberId::new("m1");
            let proposal = single(ActionKind::ALL[kind_index].name());
            let votes: Vec<Vote> = ballots
                .iter()
                .map(|(slot, vote)| Vote::new(format!("m{}", slot % 3), *vote))
                .collect();

            let first = resolve(&registry, &proposal, &proposer, &votes, &store).unwrap();
            let second = resolve(&registry, &proposal, &proposer, &votes, &store).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn property_multi_action_proposals_never_resolve(ballots in ballot_strategy()) {
            let store = store_with_members(&[("m0", true)]);
            let registry = ActionRegistry::builtin();
            let proposal = Proposal::new(vec![
                ProposedAction::new("always_accept_noop", Map::new()),
                ProposedAction::new("always_reject_noop", Map::new()),
            ]);
            let votes: Vec<Vote> = ballots
                .iter()
                .map(|(slot, vote)| Vote::new(format!("m{}", slot % 3), *vote))
                .collect();

            let verdict = resolve(&registry, &proposal, &MemberId::new("m0"), &votes, &store)
                .unwrap();
            prop_assert_eq!(verdict, Verdict::Open);
        }
    }
}
