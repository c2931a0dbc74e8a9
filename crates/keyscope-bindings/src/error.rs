//! Error types for keybinding operations

use thiserror::Error;

use crate::model::CommandId;

/// Errors that can occur while parsing host binding strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Missing scope separator '::' in binding: {0}")]
    MissingScopeSeparator(String),

    #[error("Unknown keybinding scope: {0}")]
    UnknownScope(String),

    #[error("Empty chord in binding: {0}")]
    EmptyChord(String),

    #[error("Chord has modifiers but no key: {0}")]
    MissingKey(String),

    #[error("Invalid modifier '{modifier}' in chord: {chord}")]
    InvalidModifier { modifier: String, chord: String },

    #[error("More than two chords in binding: {0}")]
    TooManyChords(String),

    #[error("Key sequence must contain at least one chord")]
    EmptySequence,
}

impl ParseError {
    /// Malformed text is treated as "unbound" by callers; everything else is a caller error.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ParseError::MissingScopeSeparator(_)
                | ParseError::EmptyChord(_)
                | ParseError::MissingKey(_)
                | ParseError::InvalidModifier { .. }
        )
    }
}

/// Errors reported by the host while enumerating scopes or commands
#[derive(Debug, Clone, Error)]
pub enum HostError {
    #[error("Host service unavailable: {0}")]
    Unavailable(String),

    #[error("Host enumeration failed: {0}")]
    Enumeration(String),
}

/// Errors that can occur while building or querying the command catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Binding parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Command not found: {0}")]
    CommandNotFound(CommandId),

    #[error("Command catalog not loaded")]
    NotLoaded,
}

/// Errors that reject a candidate binding before conflicts are computed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("Navigation key '{key}' cannot be bound in scope {scope}")]
    NavigationKeyNotAllowed { key: String, scope: String },

    #[error("Cannot add an empty binding")]
    EmptyBinding,
}

/// Errors that can occur while loading a host snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid GUID '{value}': {message}")]
    InvalidGuid { value: String, message: String },

    #[error("Duplicate scope in snapshot: {0}")]
    DuplicateScope(String),
}

/// Errors surfaced by the keybinding engine facade
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Conflict error: {0}")]
    Conflict(#[from] ConflictError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
