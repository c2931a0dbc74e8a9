//! Scope-aware conflict detection for prospective bindings

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConflictError;
use crate::model::{Command, CommandBinding, KeySequence, KeybindingScope, GLOBAL_SCOPE_NAME};

/// How an existing binding interacts with a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConflictType {
    /// Same scope, same chords: the existing binding would be overwritten
    ReplacesBindings,
    /// New non-Global binding makes an identical Global binding unreachable in its scope
    HidesGlobalBindings,
    /// New Global binding stays shadowed by identical bindings in narrower scopes
    HiddenInSomeScopes,
}

impl ConflictType {
    pub const ALL: [ConflictType; 3] = [
        ConflictType::ReplacesBindings,
        ConflictType::HidesGlobalBindings,
        ConflictType::HiddenInSomeScopes,
    ];
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictType::ReplacesBindings => write!(f, "Replaces bindings"),
            ConflictType::HidesGlobalBindings => write!(f, "Hides global bindings"),
            ConflictType::HiddenInSomeScopes => write!(f, "Hidden in some scopes"),
        }
    }
}

/// An existing binding affected by a candidate, together with its command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedBinding {
    pub binding: CommandBinding,
    pub command: Command,
}

/// All existing bindings affected in one particular way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingConflict {
    pub conflict_type: ConflictType,
    pub affected: Vec<AffectedBinding>,
}

/// Compares a candidate binding against the catalog's existing bindings
#[derive(Debug, Clone)]
pub struct ConflictDetector {
    global_scope_name: String,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        ConflictDetector::new(GLOBAL_SCOPE_NAME)
    }
}

impl ConflictDetector {
    pub fn new(global_scope_name: impl Into<String>) -> Self {
        ConflictDetector {
            global_scope_name: global_scope_name.into(),
        }
    }

    fn is_global(&self, scope: &KeybindingScope) -> bool {
        scope.is_named(&self.global_scope_name)
    }

    /// Classify an existing binding's scope relative to the candidate's scope
    fn classify(
        &self,
        candidate: &KeybindingScope,
        existing: &KeybindingScope,
    ) -> Option<ConflictType> {
        if candidate == existing {
            Some(ConflictType::ReplacesBindings)
        } else if self.is_global(candidate) && !self.is_global(existing) {
            Some(ConflictType::HiddenInSomeScopes)
        } else if !self.is_global(candidate) && self.is_global(existing) {
            Some(ConflictType::HidesGlobalBindings)
        } else {
            None
        }
    }

    /// Find every existing binding the candidate would replace, hide or be hidden by
    ///
    /// Groups are returned in `ConflictType::ALL` order; empty groups are omitted.
    pub fn find_conflicts(
        &self,
        commands: &[Command],
        scope: &KeybindingScope,
        sequence: &KeySequence,
    ) -> Vec<BindingConflict> {
        let mut groups: [Vec<AffectedBinding>; 3] = Default::default();

        for command in commands {
            for binding in &command.bindings {
                if binding.sequence != *sequence {
                    continue;
                }
                if let Some(conflict_type) = self.classify(scope, &binding.scope) {
                    groups[conflict_type as usize].push(AffectedBinding {
                        binding: binding.clone(),
                        command: command.clone(),
                    });
                }
            }
        }

        let conflicts: Vec<BindingConflict> = ConflictType::ALL
            .into_iter()
            .zip(groups)
            .filter(|(_, affected)| !affected.is_empty())
            .map(|(conflict_type, affected)| BindingConflict {
                conflict_type,
                affected,
            })
            .collect();

        tracing::debug!(
            "Conflict check for {}::{} found {} group(s)",
            scope.name,
            sequence,
            conflicts.len()
        );
        conflicts
    }

    /// Reject candidates that can never be added to the given scope
    pub fn validate_candidate(
        &self,
        scope: &KeybindingScope,
        sequence: &KeySequence,
    ) -> Result<(), ConflictError> {
        if sequence.is_empty() {
            return Err(ConflictError::EmptyBinding);
        }
        if !scope.allows_navigation_keys && sequence.first.is_navigation() {
            return Err(ConflictError::NavigationKeyNotAllowed {
                key: sequence.first.to_string(),
                scope: scope.name.clone(),
            });
        }
        Ok(())
    }
}
