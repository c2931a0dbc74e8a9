//! JSON snapshot of a host's scopes and commands
//!
//! A snapshot stands in for a live host: it implements both `ScopeProvider`
//! and `CommandHost`, so the engine can run against exported data.
//!
//! ```json
//! {
//!   "scopes": [
//!     { "name": "Global", "guid": "5efc7975-14bc-11cf-9b2b-00aa00573819" }
//!   ],
//!   "commands": [
//!     {
//!       "guid": "5efc7975-14bc-11cf-9b2b-00aa00573819",
//!       "id": 43,
//!       "display_name": "Undo",
//!       "canonical_name": "Edit.Undo",
//!       "bindings": ["Global::Ctrl+Z"]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{HostError, SnapshotError};
use crate::host::{CommandHost, HostCommand, ScopeProvider};
use crate::model::{CommandId, KeybindingScope};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScopeRecord {
    name: String,
    guid: String,
    #[serde(default)]
    allows_navigation_keys: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CommandRecord {
    guid: String,
    id: u32,
    display_name: String,
    #[serde(default)]
    canonical_name: String,
    #[serde(default)]
    bindings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    scopes: Vec<ScopeRecord>,
    #[serde(default)]
    commands: Vec<CommandRecord>,
}

/// Validated host snapshot
#[derive(Debug, Clone, Default)]
pub struct HostSnapshot {
    scopes: Vec<KeybindingScope>,
    commands: Vec<HostCommand>,
}

fn parse_guid(value: &str) -> Result<Uuid, SnapshotError> {
    let trimmed = value.trim().trim_start_matches('{').trim_end_matches('}');
    Uuid::parse_str(trimmed).map_err(|e| SnapshotError::InvalidGuid {
        value: value.to_string(),
        message: e.to_string(),
    })
}

impl HostSnapshot {
    /// Build a snapshot from in-memory host data
    pub fn new(
        scopes: Vec<KeybindingScope>,
        commands: Vec<HostCommand>,
    ) -> Result<Self, SnapshotError> {
        let mut guids = HashSet::new();
        let mut names = HashSet::new();
        for scope in &scopes {
            if !guids.insert(scope.guid) {
                return Err(SnapshotError::DuplicateScope(scope.guid.to_string()));
            }
            if !names.insert(scope.name.as_str()) {
                return Err(SnapshotError::DuplicateScope(scope.name.clone()));
            }
        }
        Ok(HostSnapshot { scopes, commands })
    }

    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        let document: SnapshotDocument = serde_json::from_str(content)
            .map_err(|e| SnapshotError::InvalidJson(e.to_string()))?;

        let scopes = document
            .scopes
            .into_iter()
            .map(|record| {
                Ok(KeybindingScope::new(
                    record.name,
                    parse_guid(&record.guid)?,
                    record.allows_navigation_keys,
                ))
            })
            .collect::<Result<Vec<_>, SnapshotError>>()?;

        let commands = document
            .commands
            .into_iter()
            .map(|record| {
                Ok(HostCommand::new(
                    CommandId::new(parse_guid(&record.guid)?, record.id),
                    record.display_name,
                    record.canonical_name,
                    record.bindings,
                ))
            })
            .collect::<Result<Vec<_>, SnapshotError>>()?;

        Self::new(scopes, commands)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let snapshot = Self::from_json(&content)?;
        tracing::debug!(
            "Loaded snapshot {}: {} scopes, {} commands",
            path.as_ref().display(),
            snapshot.scopes.len(),
            snapshot.commands.len()
        );
        Ok(snapshot)
    }

    /// Serialize back to the snapshot JSON format
    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        let document = SnapshotDocument {
            scopes: self
                .scopes
                .iter()
                .map(|scope| ScopeRecord {
                    name: scope.name.clone(),
                    guid: scope.guid.to_string(),
                    allows_navigation_keys: scope.allows_navigation_keys,
                })
                .collect(),
            commands: self
                .commands
                .iter()
                .map(|command| CommandRecord {
                    guid: command.id.guid.to_string(),
                    id: command.id.id,
                    display_name: command.display_name.clone(),
                    canonical_name: command.canonical_name.clone(),
                    bindings: command.bindings.clone(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&document).map_err(|e| SnapshotError::InvalidJson(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn scopes(&self) -> &[KeybindingScope] {
        &self.scopes
    }

    pub fn host_commands(&self) -> &[HostCommand] {
        &self.commands
    }
}

impl ScopeProvider for HostSnapshot {
    fn binding_scopes(&self) -> Result<Vec<KeybindingScope>, HostError> {
        Ok(self.scopes.clone())
    }
}

#[async_trait]
impl CommandHost for HostSnapshot {
    async fn commands(&self) -> Result<Vec<HostCommand>, HostError> {
        Ok(self.commands.clone())
    }
}
