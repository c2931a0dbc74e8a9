//! Core data models for commands, scopes and key chords

use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ParseError;

/// Name of the scope whose bindings apply everywhere
pub const GLOBAL_SCOPE_NAME: &str = "Global";

/// Name of the text editor scope, listed right after Global
pub const TEXT_EDITOR_SCOPE_NAME: &str = "Text Editor";

/// Host key names that move the caret or selection
pub const NAVIGATION_KEYS: &[&str] = &[
    "Up Arrow",
    "Down Arrow",
    "Left Arrow",
    "Right Arrow",
    "Home",
    "End",
    "PgUp",
    "PgDn",
];

/// Identifies a host command: a namespace GUID plus an ordinal within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommandId {
    pub guid: Uuid,
    pub id: u32,
}

impl CommandId {
    pub fn new(guid: Uuid, id: u32) -> Self {
        CommandId { guid, id }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}:{}", self.guid, self.id)
    }
}

bitflags! {
    /// Set of held modifier keys for one chord
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ModifierKeys: u8 {
        const WINDOWS = 1 << 0;
        const CONTROL = 1 << 1;
        const SHIFT = 1 << 2;
        const ALT = 1 << 3;
    }
}

impl ModifierKeys {
    /// Modifiers in the order they are rendered
    pub const RENDER_ORDER: [ModifierKeys; 4] = [
        ModifierKeys::WINDOWS,
        ModifierKeys::CONTROL,
        ModifierKeys::SHIFT,
        ModifierKeys::ALT,
    ];
}

/// Localizable names for each modifier key as they appear in binding text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierNames {
    pub windows: String,
    pub control: String,
    pub shift: String,
    pub alt: String,
}

impl Default for ModifierNames {
    fn default() -> Self {
        ModifierNames {
            windows: "Win".to_string(),
            control: "Ctrl".to_string(),
            shift: "Shift".to_string(),
            alt: "Alt".to_string(),
        }
    }
}

impl ModifierNames {
    /// Display name for a single modifier flag
    pub fn name_of(&self, modifier: ModifierKeys) -> &str {
        if modifier == ModifierKeys::WINDOWS {
            &self.windows
        } else if modifier == ModifierKeys::CONTROL {
            &self.control
        } else if modifier == ModifierKeys::SHIFT {
            &self.shift
        } else {
            &self.alt
        }
    }

    /// Resolve a modifier token, ignoring ASCII case
    pub fn lookup(&self, token: &str) -> Option<ModifierKeys> {
        let token = token.trim();
        let table = [
            (self.windows.as_str(), ModifierKeys::WINDOWS),
            ("Windows", ModifierKeys::WINDOWS),
            (self.control.as_str(), ModifierKeys::CONTROL),
            ("Control", ModifierKeys::CONTROL),
            (self.shift.as_str(), ModifierKeys::SHIFT),
            (self.alt.as_str(), ModifierKeys::ALT),
        ];
        table
            .iter()
            .find(|(name, _)| !name.is_empty() && name.eq_ignore_ascii_case(token))
            .map(|(_, flag)| *flag)
    }

    /// All configured names, in render order
    pub fn names(&self) -> [&str; 4] {
        [&self.windows, &self.control, &self.shift, &self.alt]
    }
}

/// A single chord: a modifier set plus one non-modifier key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingSequence {
    pub modifiers: ModifierKeys,
    pub key: String,
}

impl BindingSequence {
    /// Sentinel for "no binding"
    pub const EMPTY: BindingSequence = BindingSequence {
        modifiers: ModifierKeys::empty(),
        key: String::new(),
    };

    pub fn new(modifiers: ModifierKeys, key: impl Into<String>) -> Self {
        BindingSequence {
            modifiers,
            key: key.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty() && self.key.is_empty()
    }

    /// True for caret-movement keys pressed alone or with Shift only
    pub fn is_navigation(&self) -> bool {
        (self.modifiers - ModifierKeys::SHIFT).is_empty()
            && NAVIGATION_KEYS.contains(&self.key.as_str())
    }

    /// Render as `Mod+...+Key` using the given modifier names
    pub fn render(&self, names: &ModifierNames) -> String {
        let mut text = String::new();
        for modifier in ModifierKeys::RENDER_ORDER {
            if self.modifiers.contains(modifier) {
                text.push_str(names.name_of(modifier));
                text.push('+');
            }
        }
        text.push_str(&self.key);
        text
    }
}

impl fmt::Display for BindingSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&ModifierNames::default()))
    }
}

/// One or two chords pressed in succession
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySequence {
    pub first: BindingSequence,
    pub second: Option<BindingSequence>,
}

impl KeySequence {
    pub fn single(chord: BindingSequence) -> Self {
        KeySequence {
            first: chord,
            second: None,
        }
    }

    pub fn pair(first: BindingSequence, second: BindingSequence) -> Self {
        KeySequence {
            first,
            second: Some(second),
        }
    }

    /// Build from a chord list, rejecting anything outside one or two chords
    pub fn from_chords(chords: Vec<BindingSequence>) -> Result<Self, ParseError> {
        if chords.len() > 2 {
            let text = chords
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ParseError::TooManyChords(text));
        }

        let mut chords = chords.into_iter();
        let first = chords.next().ok_or(ParseError::EmptySequence)?;
        Ok(KeySequence {
            first,
            second: chords.next(),
        })
    }

    pub fn chord_count(&self) -> usize {
        if self.second.is_some() {
            2
        } else {
            1
        }
    }

    pub fn chords(&self) -> impl Iterator<Item = &BindingSequence> {
        std::iter::once(&self.first).chain(self.second.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_none()
    }

    pub fn render(&self, names: &ModifierNames) -> String {
        match &self.second {
            Some(second) => format!("{}, {}", self.first.render(names), second.render(names)),
            None => self.first.render(names),
        }
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&ModifierNames::default()))
    }
}

/// A context in which bindings apply, mirrored from the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeybindingScope {
    pub name: String,
    pub guid: Uuid,
    #[serde(default)]
    pub allows_navigation_keys: bool,
}

impl KeybindingScope {
    pub fn new(name: impl Into<String>, guid: Uuid, allows_navigation_keys: bool) -> Self {
        KeybindingScope {
            name: name.into(),
            guid,
            allows_navigation_keys,
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }

    /// Whether this is the default `Global` scope
    pub fn is_global(&self) -> bool {
        self.is_named(GLOBAL_SCOPE_NAME)
    }
}

impl PartialEq for KeybindingScope {
    fn eq(&self, other: &Self) -> bool {
        self.guid == other.guid
    }
}

impl Eq for KeybindingScope {}

impl Hash for KeybindingScope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.guid.hash(state);
    }
}

impl fmt::Display for KeybindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Assignment of a key sequence to a command within one scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandBinding {
    pub command: CommandId,
    pub scope: KeybindingScope,
    pub sequence: KeySequence,
}

impl CommandBinding {
    pub fn new(command: CommandId, scope: KeybindingScope, sequence: KeySequence) -> Self {
        CommandBinding {
            command,
            scope,
            sequence,
        }
    }

    /// Same scope and same chords, regardless of owning command
    pub fn same_shortcut(&self, other: &CommandBinding) -> bool {
        self.scope == other.scope && self.sequence == other.sequence
    }
}

impl fmt::Display for CommandBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.scope.name, self.sequence)
    }
}

/// A displayable host action and its current bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: CommandId,
    pub display_name: String,
    /// Dotted name such as `Edit.Undo`; empty for internal commands
    pub canonical_name: String,
    pub bindings: Vec<CommandBinding>,
}

impl Command {
    pub fn new(
        id: CommandId,
        display_name: impl Into<String>,
        canonical_name: impl Into<String>,
    ) -> Self {
        Command {
            id,
            display_name: display_name.into(),
            canonical_name: canonical_name.into(),
            bindings: Vec::new(),
        }
    }

    pub fn with_bindings(mut self, bindings: Vec<CommandBinding>) -> Self {
        self.bindings = bindings;
        self
    }

    /// Text shown in listings and matched by search
    pub fn display_text(&self) -> &str {
        if self.canonical_name.trim().is_empty() {
            &self.display_name
        } else {
            &self.canonical_name
        }
    }

    /// Commands without a usable name are hidden from user-facing lists
    pub fn is_listable(&self) -> bool {
        !self.canonical_name.trim().is_empty() && !self.display_name.trim().is_empty()
    }

    pub fn bindings_in_scope<'a>(
        &'a self,
        scope: &'a KeybindingScope,
    ) -> impl Iterator<Item = &'a CommandBinding> + 'a {
        self.bindings.iter().filter(move |binding| binding.scope == *scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(key: &str) -> BindingSequence {
        BindingSequence::new(ModifierKeys::CONTROL, key)
    }

    #[test]
    fn test_render_uses_fixed_modifier_order() {
        let chord = BindingSequence::new(
            ModifierKeys::ALT | ModifierKeys::SHIFT | ModifierKeys::CONTROL | ModifierKeys::WINDOWS,
            "K",
        );
        assert_eq!(chord.to_string(), "Win+Ctrl+Shift+Alt+K");
    }

    #[test]
    fn test_render_with_localized_names() {
        let names = ModifierNames {
            control: "Strg".to_string(),
            shift: "Umschalt".to_string(),
            ..ModifierNames::default()
        };
        let chord = BindingSequence::new(ModifierKeys::CONTROL | ModifierKeys::SHIFT, "A");
        assert_eq!(chord.render(&names), "Strg+Umschalt+A");
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(BindingSequence::EMPTY.is_empty());
        assert!(!ctrl("A").is_empty());
        assert_eq!(BindingSequence::EMPTY.to_string(), "");
    }

    #[test]
    fn test_modifier_lookup_ignores_case_and_accepts_aliases() {
        let names = ModifierNames::default();
        assert_eq!(names.lookup("ctrl"), Some(ModifierKeys::CONTROL));
        assert_eq!(names.lookup("Control"), Some(ModifierKeys::CONTROL));
        assert_eq!(names.lookup("WIN"), Some(ModifierKeys::WINDOWS));
        assert_eq!(names.lookup("Windows"), Some(ModifierKeys::WINDOWS));
        assert_eq!(names.lookup("R"), None);
    }

    #[test]
    fn test_key_sequence_from_chords() {
        let single = KeySequence::from_chords(vec![ctrl("A")]).unwrap();
        assert_eq!(single.chord_count(), 1);

        let pair = KeySequence::from_chords(vec![ctrl("R"), ctrl("O")]).unwrap();
        assert_eq!(pair.chord_count(), 2);
        assert_eq!(pair.to_string(), "Ctrl+R, Ctrl+O");

        assert_eq!(
            KeySequence::from_chords(vec![]),
            Err(ParseError::EmptySequence)
        );
        assert!(matches!(
            KeySequence::from_chords(vec![ctrl("A"), ctrl("B"), ctrl("C")]),
            Err(ParseError::TooManyChords(_))
        ));
    }

    #[test]
    fn test_sequence_equality_is_positional() {
        let forward = KeySequence::pair(ctrl("R"), ctrl("O"));
        let reversed = KeySequence::pair(ctrl("O"), ctrl("R"));
        assert_ne!(forward, reversed);
        assert_ne!(forward, KeySequence::single(ctrl("R")));
    }

    #[test]
    fn test_key_names_are_case_sensitive() {
        assert_ne!(ctrl("a"), ctrl("A"));
    }

    #[test]
    fn test_scope_equality_by_guid() {
        let guid = Uuid::new_v4();
        let a = KeybindingScope::new("Text Editor", guid, true);
        let b = KeybindingScope::new("Text Editor (renamed)", guid, false);
        assert_eq!(a, b);
        assert_ne!(a, KeybindingScope::new("Text Editor", Uuid::new_v4(), true));
    }

    #[test]
    fn test_navigation_keys() {
        assert!(BindingSequence::new(ModifierKeys::empty(), "Up Arrow").is_navigation());
        assert!(BindingSequence::new(ModifierKeys::SHIFT, "PgDn").is_navigation());
        assert!(!BindingSequence::new(ModifierKeys::CONTROL, "Home").is_navigation());
        assert!(!BindingSequence::new(ModifierKeys::empty(), "F5").is_navigation());
    }

    #[test]
    fn test_command_listability() {
        let id = CommandId::new(Uuid::new_v4(), 1);
        assert!(Command::new(id, "Undo", "Edit.Undo").is_listable());
        assert!(!Command::new(id, "Undo", "   ").is_listable());
        assert!(!Command::new(id, "", "Edit.Undo").is_listable());
        assert_eq!(Command::new(id, "Undo", "").display_text(), "Undo");
        assert_eq!(Command::new(id, "Undo", "Edit.Undo").display_text(), "Edit.Undo");
    }
}
