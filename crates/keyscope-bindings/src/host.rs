//! Abstractions over the host IDE that owns scopes, commands and bindings

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::model::{CommandId, KeybindingScope};

/// A command as enumerated by the host, before its binding strings are parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCommand {
    pub id: CommandId,
    pub display_name: String,
    #[serde(default)]
    pub canonical_name: String,
    /// Host binding strings, e.g. `Text Editor::Ctrl+R, Ctrl+O`
    #[serde(default)]
    pub bindings: Vec<String>,
}

impl HostCommand {
    pub fn new(
        id: CommandId,
        display_name: impl Into<String>,
        canonical_name: impl Into<String>,
        bindings: Vec<String>,
    ) -> Self {
        HostCommand {
            id,
            display_name: display_name.into(),
            canonical_name: canonical_name.into(),
            bindings,
        }
    }
}

/// Source of the keybinding scopes the host defines
pub trait ScopeProvider: Send + Sync {
    /// Enumerate every scope, in host order
    fn binding_scopes(&self) -> Result<Vec<KeybindingScope>, HostError>;
}

/// Source of the full command list
#[async_trait]
pub trait CommandHost: Send + Sync {
    /// Enumerate every command together with its raw binding strings
    async fn commands(&self) -> Result<Vec<HostCommand>, HostError>;
}

impl<T: ScopeProvider + ?Sized> ScopeProvider for std::sync::Arc<T> {
    fn binding_scopes(&self) -> Result<Vec<KeybindingScope>, HostError> {
        (**self).binding_scopes()
    }
}

#[async_trait]
impl<T: CommandHost + ?Sized> CommandHost for std::sync::Arc<T> {
    async fn commands(&self) -> Result<Vec<HostCommand>, HostError> {
        (**self).commands().await
    }
}
