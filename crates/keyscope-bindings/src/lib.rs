//! Keybinding parsing and scope-aware conflict detection for IDE shortcut catalogs
//!
//! This crate provides the host-independent core of a shortcut manager:
//! - Parsing and rendering host binding strings (`Text Editor::Ctrl+R, Ctrl+O`)
//! - A read-only scope registry mirrored from the host
//! - A cached command catalog with parsed bindings
//! - Conflict detection between a new binding and existing ones across scopes
//! - Exact and fuzzy search over commands
//! - JSON host snapshots and file/environment configuration

pub mod catalog;
pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod filter;
pub mod host;
pub mod model;
pub mod parser;
pub mod scope;
pub mod snapshot;

// Re-export public types
pub use catalog::{CacheState, CommandCache, CommandCatalog};
pub use config::{ConfigError, ConfigLoader, EngineConfig};
pub use conflict::{AffectedBinding, BindingConflict, ConflictDetector, ConflictType};
pub use engine::{Candidate, KeybindingEngine};
pub use error::{CatalogError, ConflictError, EngineError, HostError, ParseError, SnapshotError};
pub use filter::{
    BuiltinMatcherProvider, CommandFilter, ExactFilter, FilterFactory, FuzzyFilter,
    MatcherProvider, NoMatcherProvider, NucleoMatcher, PatternMatcher, SearchOptions,
};
pub use host::{CommandHost, HostCommand, ScopeProvider};
pub use model::{
    BindingSequence, Command, CommandBinding, CommandId, KeySequence, KeybindingScope,
    ModifierKeys, ModifierNames, GLOBAL_SCOPE_NAME, TEXT_EDITOR_SCOPE_NAME,
};
pub use parser::BindingParser;
pub use scope::{ScopeCatalog, ScopeListEntry, ScopeLookup, ScopeRegistry};
pub use snapshot::HostSnapshot;
