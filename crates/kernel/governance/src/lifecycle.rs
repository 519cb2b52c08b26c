//! Pending-proposal lifecycle: submission, balloting, withdrawal, and
//! terminal transitions.
//!
//! A pending proposal never stores its verdict; every evaluation
//! recomputes it from the stored document, the ballot sequence, and member
//! records. Only the terminal disposition is persisted, and a proposal
//! that leaves the pending table can never be applied again; that is the
//! exactly-once guard around the apply executor.
//!
//! Each method here is one synchronous run-to-completion invocation. The
//! enclosing replication layer serializes invocations and commits or
//! discards each invocation's effects atomically; this layer never rolls
//! back on its own.

use crate::error::{GovernanceError, GovernanceResult};
use crate::executor::apply_proposal;
use crate::member::MemberId;
use crate::proposal::{Proposal, ProposalId, Vote};
use crate::registry::ActionRegistry;
use crate::resolver::{resolve, Verdict};
use crate::tables;
use crate::validator::{validate_proposal, ValidationOutcome};
use conclave_kernel_store::{KvRead, KvWrite};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Stored record of a pending proposal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub proposer: MemberId,
    pub proposal: Proposal,
}

/// Terminal lifecycle record of a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    Accepted,
    Rejected,
    Withdrawn,
}

/// Result of a submission.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// The payload failed validation; the full report is returned and
    /// nothing was stored.
    Invalid(ValidationOutcome),
    /// The proposal was stored. Zero-ballot policies can complete it at
    /// submission, so the verdict may already be terminal.
    Submitted { id: ProposalId, verdict: Verdict },
}

/// Drives proposals from submission to a terminal disposition.
pub struct ProposalEngine {
    registry: ActionRegistry,
}

impl ProposalEngine {
    pub fn new(registry: ActionRegistry) -> Self {
        Self { registry }
    }

    pub fn with_builtin_actions() -> Self {
        Self::new(ActionRegistry::builtin())
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Validate and store a new proposal, then run one resolution pass.
    ///
    /// The proposer must be a stored active member. An invalid proposal is
    /// reported with every failing position and not stored, so the
    /// proposer can fix and resubmit in one round-trip.
    pub fn submit<S: KvWrite>(
        &self,
        store: &mut S,
        proposer: &MemberId,
        payload: &str,
    ) -> GovernanceResult<SubmitOutcome> {
        self.require_active(&*store, proposer)?;
        let proposal = Proposal::parse(payload)?;

        let report = validate_proposal(&self.registry, &proposal);
        if !report.is_valid() {
            warn!(
                proposer = %proposer,
                errors = report.errors().len(),
                "proposal rejected by validation"
            );
            return Ok(SubmitOutcome::Invalid(report.outcome()));
        }

        let id = self.allocate_id(store)?;
        let record = ProposalRecord {
            proposer: proposer.clone(),
            proposal,
        };
        tables::proposals(&mut *store).set(&id, &record)?;
        let no_ballots: Vec<Vote> = Vec::new();
        tables::ballots(&mut *store).set(&id, &no_ballots)?;
        info!(proposal = %id, proposer = %proposer, "proposal submitted");

        let verdict = self.evaluate(store, &id, &record)?;
        Ok(SubmitOutcome::Submitted { id, verdict })
    }

    /// Record a ballot on a pending proposal, then run one resolution pass.
    ///
    /// A repeat ballot from the same member replaces their earlier one in
    /// place, keeping its original arrival position, so the positional
    /// resolution policies stay stable under re-votes.
    pub fn vote<S: KvWrite>(
        &self,
        store: &mut S,
        voter: &MemberId,
        id: &ProposalId,
        ballot: bool,
    ) -> GovernanceResult<Verdict> {
        self.require_active(&*store, voter)?;
        let record = tables::proposals(&*store)
            .get(id)?
            .ok_or(GovernanceError::ProposalNotFound(*id))?;

        let mut votes = tables::ballots(&*store).get(id)?.unwrap_or_default();
        match votes.iter_mut().find(|vote| vote.member_id == *voter) {
            Some(existing) => existing.vote = ballot,
            None => votes.push(Vote::new(voter.clone(), ballot)),
        }
        tables::ballots(&mut *store).set(id, &votes)?;
        debug!(proposal = %id, voter = %voter, ballot, "ballot recorded");

        self.evaluate(store, id, &record)
    }

    /// Withdraw a pending proposal. Only its proposer may do so.
    pub fn withdraw<S: KvWrite>(
        &self,
        store: &mut S,
        caller: &MemberId,
        id: &ProposalId,
    ) -> GovernanceResult<()> {
        self.require_active(&*store, caller)?;
        let record = tables::proposals(&*store)
            .get(id)?
            .ok_or(GovernanceError::ProposalNotFound(*id))?;
        if record.proposer != *caller {
            return Err(GovernanceError::NotProposer {
                proposal: *id,
                caller: caller.clone(),
            });
        }

        self.finish(store, id, Disposition::Withdrawn)?;
        info!(proposal = %id, "proposal withdrawn");
        Ok(())
    }

    /// Currently pending proposals, in id order.
    pub fn pending<S: KvRead>(
        &self,
        store: &S,
    ) -> GovernanceResult<Vec<(ProposalId, ProposalRecord)>> {
        let mut out = Vec::new();
        tables::proposals(store).for_each(|id, record| out.push((id, record)))?;
        Ok(out)
    }

    /// Ballot sequence for a pending proposal, in arrival order.
    pub fn ballots<S: KvRead>(
        &self,
        store: &S,
        id: &ProposalId,
    ) -> GovernanceResult<Vec<Vote>> {
        Ok(tables::ballots(store).get(id)?.unwrap_or_default())
    }

    /// Terminal disposition of a completed proposal, if it completed.
    pub fn disposition<S: KvRead>(
        &self,
        store: &S,
        id: &ProposalId,
    ) -> GovernanceResult<Option<Disposition>> {
        Ok(tables::dispositions(store).get(id)?)
    }

    /// One resolution pass over a pending proposal; terminal verdicts are
    /// committed before returning.
    fn evaluate<S: KvWrite>(
        &self,
        store: &mut S,
        id: &ProposalId,
        record: &ProposalRecord,
    ) -> GovernanceResult<Verdict> {
        let votes = tables::ballots(&*store).get(id)?.unwrap_or_default();
        let verdict = resolve(&self.registry, &record.proposal, &record.proposer, &votes, &*store)?;

        match verdict {
            Verdict::Open => {}
            Verdict::Accepted => {
                apply_proposal(&self.registry, &record.proposal, store)?;
                self.finish(store, id, Disposition::Accepted)?;
                info!(proposal = %id, "proposal accepted and applied");
            }
            Verdict::Rejected => {
                self.finish(store, id, Disposition::Rejected)?;
                info!(proposal = %id, "proposal rejected");
            }
        }
        Ok(verdict)
    }

    fn finish<S: KvWrite>(
        &self,
        store: &mut S,
        id: &ProposalId,
        disposition: Disposition,
    ) -> GovernanceResult<()> {
        tables::proposals(&mut *store).delete(id)?;
        tables::ballots(&mut *store).delete(id)?;
        tables::dispositions(&mut *store).set(id, &disposition)?;
        Ok(())
    }

    fn require_active<S: KvRead>(&self, store: &S, member: &MemberId) -> GovernanceResult<()> {
        match tables::members_info(store).get(member)? {
            Some(info) if info.is_active() => Ok(()),
            _ => Err(GovernanceError::MemberNotActive(member.clone())),
        }
    }

    fn allocate_id<S: KvWrite>(&self, store: &mut S) -> GovernanceResult<ProposalId> {
        let key = tables::NEXT_PROPOSAL_ID.to_string();
        let mut values = tables::values(&mut *store);
        let next = values.get(&key)?.unwrap_or(1);
        values.set(&key, &(next + 1))?;
        Ok(ProposalId::new(next))
    }
}
