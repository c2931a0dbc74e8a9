//! Command catalog built from the host's command enumeration

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CatalogError, ParseError};
use crate::host::{CommandHost, HostCommand};
use crate::model::{Command, CommandBinding, CommandId};
use crate::parser::BindingParser;
use crate::scope::ScopeLookup;

/// Every command known to the host, with parsed bindings
#[derive(Debug, Clone, Default)]
pub struct CommandCatalog {
    commands: Vec<Command>,
    by_id: HashMap<CommandId, usize>,
}

impl CommandCatalog {
    /// Build a catalog from already-parsed commands
    pub fn new(commands: Vec<Command>) -> Self {
        let by_id = commands
            .iter()
            .enumerate()
            .map(|(index, command)| (command.id, index))
            .collect();
        CommandCatalog { commands, by_id }
    }

    /// Parse every host binding string into a catalog
    ///
    /// Malformed binding text is skipped as unbound, and a sequence of more
    /// than two chords is skipped with a warning. An unknown scope fails the
    /// whole build.
    pub fn build<L>(
        host_commands: Vec<HostCommand>,
        scopes: &L,
        parser: &BindingParser,
    ) -> Result<Self, CatalogError>
    where
        L: ScopeLookup + ?Sized,
    {
        let mut commands = Vec::with_capacity(host_commands.len());
        let mut skipped = 0usize;

        for host_command in host_commands {
            let mut bindings = Vec::with_capacity(host_command.bindings.len());
            for text in &host_command.bindings {
                match parser.parse(host_command.id, text, scopes) {
                    Ok(binding) => bindings.push(binding),
                    Err(e) if e.is_malformed() => {
                        tracing::debug!(
                            "Skipping malformed binding '{}' on {}: {}",
                            text,
                            host_command.id,
                            e
                        );
                        skipped += 1;
                    }
                    Err(ParseError::TooManyChords(chords)) => {
                        tracing::warn!(
                            "Skipping binding '{}' on {}: more than two chords in '{}'",
                            text,
                            host_command.id,
                            chords
                        );
                        skipped += 1;
                    }
                    Err(e) => {
                        if let ParseError::UnknownScope(scope) = &e {
                            tracing::warn!(
                                "Command {} references unknown scope '{}'",
                                host_command.id,
                                scope
                            );
                        }
                        return Err(e.into());
                    }
                }
            }

            commands.push(Command {
                id: host_command.id,
                display_name: host_command.display_name,
                canonical_name: host_command.canonical_name,
                bindings,
            });
        }

        let catalog = Self::new(commands);
        tracing::info!(
            "Built command catalog: {} commands, {} bindings, {} unusable skipped",
            catalog.len(),
            catalog.binding_count(),
            skipped
        );
        Ok(catalog)
    }

    /// Every command, including unnamed ones (used for conflict checks)
    pub fn all_commands(&self) -> &[Command] {
        &self.commands
    }

    /// Commands suitable for user-facing lists
    pub fn display_commands(&self) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|command| command.is_listable())
            .collect()
    }

    pub fn command(&self, id: &CommandId) -> Option<&Command> {
        self.by_id.get(id).map(|&index| &self.commands[index])
    }

    /// Find a command by its canonical dotted name
    pub fn command_by_name(&self, canonical_name: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|command| command.canonical_name == canonical_name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn binding_count(&self) -> usize {
        self.commands.iter().map(|command| command.bindings.len()).sum()
    }

    /// Host strings to submit so that `command` gains `binding`
    ///
    /// Existing bindings are kept in order; an identical one is not repeated.
    pub fn bindings_after_add(
        &self,
        command: &CommandId,
        binding: &CommandBinding,
        parser: &BindingParser,
    ) -> Result<Vec<String>, CatalogError> {
        let existing = self
            .command(command)
            .ok_or(CatalogError::CommandNotFound(*command))?;

        let mut rendered: Vec<String> = existing
            .bindings
            .iter()
            .map(|existing| parser.render(existing))
            .collect();

        if !existing
            .bindings
            .iter()
            .any(|existing| existing.same_shortcut(binding))
        {
            rendered.push(parser.render(binding));
        }
        Ok(rendered)
    }
}

/// Load state of the cached command catalog
#[derive(Debug, Clone, Default)]
pub enum CacheState {
    #[default]
    NotLoaded,
    Loaded(Arc<CommandCatalog>),
}

/// Fetch-once cache around the host's command enumeration
#[derive(Debug, Default)]
pub struct CommandCache {
    state: CacheState,
}

impl CommandCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the catalog from the host unless it is already cached
    pub async fn load<H, L>(
        &mut self,
        host: &H,
        scopes: &L,
        parser: &BindingParser,
    ) -> Result<Arc<CommandCatalog>, CatalogError>
    where
        H: CommandHost + ?Sized,
        L: ScopeLookup + ?Sized,
    {
        if let CacheState::Loaded(catalog) = &self.state {
            return Ok(Arc::clone(catalog));
        }

        tracing::debug!("Command catalog not loaded, fetching from host");
        let host_commands = host.commands().await?;
        let catalog = Arc::new(CommandCatalog::build(host_commands, scopes, parser)?);
        self.state = CacheState::Loaded(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// The cached catalog, if loaded
    pub fn get(&self) -> Option<Arc<CommandCatalog>> {
        match &self.state {
            CacheState::Loaded(catalog) => Some(Arc::clone(catalog)),
            CacheState::NotLoaded => None,
        }
    }

    /// The cached catalog, or `CatalogError::NotLoaded`
    pub fn require(&self) -> Result<Arc<CommandCatalog>, CatalogError> {
        self.get().ok_or(CatalogError::NotLoaded)
    }

    pub fn state(&self) -> &CacheState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, CacheState::Loaded(_))
    }

    /// Drop the cached catalog; the next `load` fetches again
    pub fn invalidate(&mut self) {
        if self.is_loaded() {
            tracing::debug!("Invalidating cached command catalog");
        }
        self.state = CacheState::NotLoaded;
    }
}
