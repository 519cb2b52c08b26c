//! The closed action registry.

use crate::action::ActionKind;
use std::collections::BTreeMap;

/// Immutable mapping from action name to kind, built once at startup.
///
/// Lookup is the only operation. Absence signals "unknown action", a
/// normal condition during validation and a consistency violation during
/// apply; the distinction belongs to the callers.
#[derive(Clone, Debug)]
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, ActionKind>,
}

impl ActionRegistry {
    /// Registry over every built-in action kind.
    pub fn builtin() -> Self {
        Self::from_kinds(&ActionKind::ALL)
    }

    /// Registry over a chosen subset of kinds.
    pub fn from_kinds(kinds: &[ActionKind]) -> Self {
        let actions = kinds.iter().map(|kind| (kind.name(), *kind)).collect();
        Self { actions }
    }

    pub fn get(&self, name: &str) -> Option<ActionKind> {
        self.actions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Registered names, in deterministic order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
