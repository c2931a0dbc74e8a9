//! Read-only registry of the keybinding scopes known to the host

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use uuid::Uuid;

use crate::error::HostError;
use crate::host::ScopeProvider;
use crate::model::{KeybindingScope, GLOBAL_SCOPE_NAME, TEXT_EDITOR_SCOPE_NAME};

/// Resolves a scope by its display name
pub trait ScopeLookup {
    fn scope_by_name(&self, name: &str) -> Option<&KeybindingScope>;
}

impl ScopeLookup for [KeybindingScope] {
    fn scope_by_name(&self, name: &str) -> Option<&KeybindingScope> {
        self.iter().find(|scope| scope.name == name)
    }
}

impl ScopeLookup for Vec<KeybindingScope> {
    fn scope_by_name(&self, name: &str) -> Option<&KeybindingScope> {
        self.as_slice().scope_by_name(name)
    }
}

/// One row of a user-facing scope list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeListEntry<'a> {
    Scope(&'a KeybindingScope),
    Separator,
}

/// Loaded, immutable set of scopes
#[derive(Debug, Clone)]
pub struct ScopeCatalog {
    scopes: Vec<KeybindingScope>,
    by_guid: HashMap<Uuid, usize>,
    by_name: HashMap<String, usize>,
    pinned: Vec<String>,
}

impl ScopeCatalog {
    /// Build a catalog with the default pinned scopes (Global, Text Editor)
    pub fn new(scopes: Vec<KeybindingScope>) -> Self {
        Self::with_pinned(
            scopes,
            vec![
                GLOBAL_SCOPE_NAME.to_string(),
                TEXT_EDITOR_SCOPE_NAME.to_string(),
            ],
        )
    }

    /// Build a catalog; `pinned` names are listed first in display lists
    pub fn with_pinned(scopes: Vec<KeybindingScope>, pinned: Vec<String>) -> Self {
        let mut by_guid = HashMap::new();
        let mut by_name = HashMap::new();

        for (index, scope) in scopes.iter().enumerate() {
            by_guid.entry(scope.guid).or_insert(index);
            if by_name.contains_key(&scope.name) {
                tracing::warn!("Duplicate scope name from host: {}", scope.name);
                continue;
            }
            by_name.insert(scope.name.clone(), index);
        }

        ScopeCatalog {
            scopes,
            by_guid,
            by_name,
            pinned,
        }
    }

    /// Lookup by GUID
    pub fn by_guid(&self, guid: &Uuid) -> Option<&KeybindingScope> {
        self.by_guid.get(guid).map(|&index| &self.scopes[index])
    }

    /// Lookup by display name
    pub fn by_name(&self, name: &str) -> Option<&KeybindingScope> {
        self.by_name.get(name).map(|&index| &self.scopes[index])
    }

    /// All scopes in host order
    pub fn all(&self) -> &[KeybindingScope] {
        &self.scopes
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Pinned scopes first, then a separator, then the rest in host order
    pub fn display_list(&self) -> Vec<ScopeListEntry<'_>> {
        let pinned: Vec<&KeybindingScope> = self
            .pinned
            .iter()
            .filter_map(|name| self.by_name(name))
            .collect();

        let mut entries: Vec<ScopeListEntry<'_>> =
            pinned.iter().copied().map(ScopeListEntry::Scope).collect();
        if !entries.is_empty() {
            entries.push(ScopeListEntry::Separator);
        }

        entries.extend(
            self.scopes
                .iter()
                .filter(|scope| !pinned.iter().any(|p| std::ptr::eq(*p, *scope)))
                .map(ScopeListEntry::Scope),
        );
        entries
    }
}

impl ScopeLookup for ScopeCatalog {
    fn scope_by_name(&self, name: &str) -> Option<&KeybindingScope> {
        self.by_name(name)
    }
}

/// Lazily mirrors the host's scopes; loaded once and kept for the registry lifetime
pub struct ScopeRegistry<P> {
    provider: P,
    pinned: Vec<String>,
    catalog: OnceCell<ScopeCatalog>,
}

impl<P: ScopeProvider> ScopeRegistry<P> {
    pub fn new(provider: P) -> Self {
        Self::with_pinned(
            provider,
            vec![
                GLOBAL_SCOPE_NAME.to_string(),
                TEXT_EDITOR_SCOPE_NAME.to_string(),
            ],
        )
    }

    pub fn with_pinned(provider: P, pinned: Vec<String>) -> Self {
        ScopeRegistry {
            provider,
            pinned,
            catalog: OnceCell::new(),
        }
    }

    /// Get the scope catalog, loading it from the host on first access
    pub fn catalog(&self) -> Result<&ScopeCatalog, HostError> {
        self.catalog.get_or_try_init(|| {
            let scopes = self.provider.binding_scopes()?;
            tracing::debug!("Loaded {} keybinding scopes from host", scopes.len());
            Ok(ScopeCatalog::with_pinned(scopes, self.pinned.clone()))
        })
    }

    /// All scopes in host order
    pub fn all_binding_scopes(&self) -> Result<&[KeybindingScope], HostError> {
        Ok(self.catalog()?.all())
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingProvider {
        scopes: Vec<KeybindingScope>,
        calls: AtomicUsize,
    }

    impl ScopeProvider for CountingProvider {
        fn binding_scopes(&self) -> Result<Vec<KeybindingScope>, HostError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.scopes.clone())
        }
    }

    struct FailingProvider;

    impl ScopeProvider for FailingProvider {
        fn binding_scopes(&self) -> Result<Vec<KeybindingScope>, HostError> {
            Err(HostError::Unavailable("shell not ready".to_string()))
        }
    }

    fn scope(name: &str) -> KeybindingScope {
        KeybindingScope::new(name, Uuid::new_v4(), false)
    }

    fn names(entries: &[ScopeListEntry<'_>]) -> Vec<String> {
        entries
            .iter()
            .map(|entry| match entry {
                ScopeListEntry::Scope(scope) => scope.name.clone(),
                ScopeListEntry::Separator => "---".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_display_list_pins_global_and_text_editor() {
        let catalog = ScopeCatalog::new(vec![
            scope("Solution Explorer"),
            scope("Text Editor"),
            scope("HTML Editor"),
            scope("Global"),
        ]);

        assert_eq!(
            names(&catalog.display_list()),
            vec!["Global", "Text Editor", "---", "Solution Explorer", "HTML Editor"]
        );
    }

    #[test]
    fn test_display_list_without_pinned_scopes() {
        let catalog = ScopeCatalog::new(vec![scope("HTML Editor"), scope("Solution Explorer")]);
        assert_eq!(
            names(&catalog.display_list()),
            vec!["HTML Editor", "Solution Explorer"]
        );
    }

    #[test]
    fn test_lookup_by_name_and_guid() {
        let editor = scope("Text Editor");
        let guid = editor.guid;
        let catalog = ScopeCatalog::new(vec![scope("Global"), editor]);

        assert_eq!(catalog.by_guid(&guid).unwrap().name, "Text Editor");
        assert_eq!(catalog.by_name("Global").unwrap().name, "Global");
        assert!(catalog.by_name("global").is_none());
        assert!(catalog.by_guid(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_registry_loads_once() {
        let registry = ScopeRegistry::new(CountingProvider {
            scopes: vec![scope("Global"), scope("Text Editor")],
            calls: AtomicUsize::new(0),
        });

        assert!(!registry.is_loaded());
        assert_eq!(registry.all_binding_scopes().unwrap().len(), 2);
        assert_eq!(registry.catalog().unwrap().len(), 2);
        assert!(registry.is_loaded());
        assert_eq!(registry.provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_registry_propagates_host_failure() {
        let registry = ScopeRegistry::new(FailingProvider);
        assert!(matches!(
            registry.catalog(),
            Err(HostError::Unavailable(_))
        ));
        assert!(!registry.is_loaded());
    }
}
