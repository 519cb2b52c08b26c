//! One-shot application of accepted proposals.

use crate::action::ActionDefinition;
use crate::error::{GovernanceError, GovernanceResult};
use crate::proposal::Proposal;
use crate::registry::ActionRegistry;
use conclave_kernel_store::KvWrite;
use tracing::debug;

/// Apply every action of an accepted proposal, in declared order.
///
/// The caller guarantees the proposal resolved `Accepted` and that this
/// runs exactly once for it; the verdict is not re-checked here. All
/// actions share the invocation's store snapshot and execute strictly
/// sequentially, so one action's writes are visible to the next.
///
/// A registry miss is a [`GovernanceError::ConsistencyViolation`]: a
/// proposal only reaches apply after validating against this registry, so
/// a missing definition means the registry drifted in between. On any
/// failure the executor stops immediately and performs no rollback; the
/// enclosing replicated-execution layer discards the whole invocation's
/// effects.
pub fn apply_proposal<S: KvWrite>(
    registry: &ActionRegistry,
    proposal: &Proposal,
    store: &mut S,
) -> GovernanceResult<()> {
    for (position, action) in proposal.actions.iter().enumerate() {
        let Some(kind) = registry.get(&action.name) else {
            return Err(GovernanceError::ConsistencyViolation {
                name: action.name.clone(),
                position,
            });
        };
        kind.apply(&action.args, store)?;
        debug!(action = %action.name, position, "action applied");
    }
    Ok(())
}
