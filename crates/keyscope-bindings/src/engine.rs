//! Keybinding engine that ties scopes, the command cache, parsing and search together

use std::sync::Arc;

use crate::catalog::{CommandCache, CommandCatalog};
use crate::config::EngineConfig;
use crate::conflict::{BindingConflict, ConflictDetector};
use crate::error::{CatalogError, EngineError};
use crate::filter::{BuiltinMatcherProvider, CommandFilter, FilterFactory, MatcherProvider};
use crate::host::{CommandHost, ScopeProvider};
use crate::model::{Command, CommandBinding, KeySequence, KeybindingScope};
use crate::parser::BindingParser;
use crate::scope::{ScopeListEntry, ScopeRegistry};

/// A binding the user is about to add, not yet assigned to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub scope: KeybindingScope,
    pub sequence: KeySequence,
}

/// Main entry point over a host's scopes and commands
pub struct KeybindingEngine<S, H> {
    scopes: ScopeRegistry<S>,
    host: H,
    cache: CommandCache,
    parser: BindingParser,
    detector: ConflictDetector,
    filter: Box<dyn CommandFilter>,
    config: EngineConfig,
}

impl<S, H> KeybindingEngine<S, H>
where
    S: ScopeProvider,
    H: CommandHost,
{
    /// Create an engine using the built-in fuzzy matcher
    pub fn new(scope_provider: S, host: H, config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_matcher_provider(scope_provider, host, config, &BuiltinMatcherProvider)
    }

    /// Create an engine, probing `matchers` once for a pattern matcher
    pub fn with_matcher_provider(
        scope_provider: S,
        host: H,
        config: EngineConfig,
        matchers: &dyn MatcherProvider,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let filter = FilterFactory::create(config.search, matchers);
        tracing::debug!("Using {} command filter", filter.name());

        Ok(KeybindingEngine {
            scopes: ScopeRegistry::with_pinned(scope_provider, config.pinned_scopes.clone()),
            host,
            cache: CommandCache::new(),
            parser: BindingParser::with_modifier_names(config.modifier_names.clone()),
            detector: ConflictDetector::new(config.global_scope_name.clone()),
            filter,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parser(&self) -> &BindingParser {
        &self.parser
    }

    /// Load the command catalog (once) and return it
    pub async fn catalog(&mut self) -> Result<Arc<CommandCatalog>, EngineError> {
        let scopes = self.scopes.catalog()?;
        let catalog = self.cache.load(&self.host, scopes, &self.parser).await?;
        Ok(catalog)
    }

    /// Drop the cached catalog and load it again from the host
    pub async fn refresh(&mut self) -> Result<Arc<CommandCatalog>, EngineError> {
        self.cache.invalidate();
        self.catalog().await
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_loaded()
    }

    /// Every command, including ones hidden from listings
    pub async fn all_commands(&mut self) -> Result<Vec<Command>, EngineError> {
        Ok(self.catalog().await?.all_commands().to_vec())
    }

    /// Commands suitable for display
    pub async fn display_commands(&mut self) -> Result<Vec<Command>, EngineError> {
        let catalog = self.catalog().await?;
        Ok(catalog.display_commands().into_iter().cloned().collect())
    }

    pub fn all_binding_scopes(&self) -> Result<&[KeybindingScope], EngineError> {
        Ok(self.scopes.all_binding_scopes()?)
    }

    pub fn scope_display_list(&self) -> Result<Vec<ScopeListEntry<'_>>, EngineError> {
        Ok(self.scopes.catalog()?.display_list())
    }

    /// Parse and validate user-entered binding text such as `Global::Ctrl+K, Ctrl+D`
    pub fn parse_candidate(&self, text: &str) -> Result<Candidate, EngineError> {
        let scopes = self.scopes.catalog()?;
        let (scope, sequence) = self.parser.parse_scoped(text, scopes)?;
        self.detector.validate_candidate(&scope, &sequence)?;
        Ok(Candidate { scope, sequence })
    }

    /// Conflicts the candidate would introduce against the current catalog
    pub async fn find_conflicts(
        &mut self,
        candidate: &Candidate,
    ) -> Result<Vec<BindingConflict>, EngineError> {
        let catalog = self.catalog().await?;
        Ok(self
            .detector
            .find_conflicts(catalog.all_commands(), &candidate.scope, &candidate.sequence))
    }

    /// Filter listable commands with the configured filter
    pub async fn search(&mut self, query: &str) -> Result<Vec<Command>, EngineError> {
        let catalog = self.catalog().await?;
        let listed = catalog.display_commands();
        Ok(self
            .filter
            .filter(&listed, query)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Filter listable commands with an explicit filter
    pub async fn search_with(
        &mut self,
        filter: &dyn CommandFilter,
        query: &str,
    ) -> Result<Vec<Command>, EngineError> {
        let catalog = self.catalog().await?;
        let listed = catalog.display_commands();
        Ok(filter.filter(&listed, query).into_iter().cloned().collect())
    }

    /// Binding strings to submit to the host so `canonical_name` gains `binding_text`
    pub async fn plan_binding(
        &mut self,
        canonical_name: &str,
        binding_text: &str,
    ) -> Result<Vec<String>, EngineError> {
        let catalog = self.catalog().await?;
        let command = catalog
            .command_by_name(canonical_name)
            .ok_or_else(|| EngineError::UnknownCommand(canonical_name.to_string()))?;

        let candidate = self.parse_candidate(binding_text)?;
        let binding = CommandBinding::new(command.id, candidate.scope, candidate.sequence);

        catalog
            .bindings_after_add(&command.id, &binding, &self.parser)
            .map_err(EngineError::from)
    }

    /// The cached catalog without triggering a load
    pub fn cached_catalog(&self) -> Result<Arc<CommandCatalog>, CatalogError> {
        self.cache.require()
    }
}
