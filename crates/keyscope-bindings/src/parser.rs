//! Conversion between host binding strings and the structured binding model
//!
//! Host bindings have the form `<ScopeName>::<Chord>[,<Chord>]`, where each
//! chord is `Mod+...+Key`. Both `,` and `+` are also bindable keys, so the
//! splitting rules below resolve the ambiguity the same way the host does:
//!
//! - no comma, or a single comma that ends the text: one chord
//! - a single interior comma: two chords split there
//! - two or more commas: split at the first comma only
//! - a chord ending in `++` binds the plus key

use crate::error::ParseError;
use crate::model::{
    BindingSequence, CommandBinding, CommandId, KeySequence, KeybindingScope, ModifierKeys,
    ModifierNames,
};
use crate::scope::ScopeLookup;

/// Separator between the scope name and the chords
pub const SCOPE_SEPARATOR: &str = "::";

/// Parses and renders host binding strings
#[derive(Debug, Clone, Default)]
pub struct BindingParser {
    names: ModifierNames,
}

impl BindingParser {
    /// Create a parser using the default (English) modifier names
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with localized modifier names
    pub fn with_modifier_names(names: ModifierNames) -> Self {
        BindingParser { names }
    }

    pub fn modifier_names(&self) -> &ModifierNames {
        &self.names
    }

    /// Parse a host binding string owned by `command`
    pub fn parse<L>(
        &self,
        command: CommandId,
        text: &str,
        scopes: &L,
    ) -> Result<CommandBinding, ParseError>
    where
        L: ScopeLookup + ?Sized,
    {
        let (scope, sequence) = self.parse_scoped(text, scopes)?;
        Ok(CommandBinding::new(command, scope, sequence))
    }

    /// Parse a binding string into its scope and key sequence
    pub fn parse_scoped<L>(
        &self,
        text: &str,
        scopes: &L,
    ) -> Result<(KeybindingScope, KeySequence), ParseError>
    where
        L: ScopeLookup + ?Sized,
    {
        let (scope_name, chords) = text
            .split_once(SCOPE_SEPARATOR)
            .ok_or_else(|| ParseError::MissingScopeSeparator(text.to_string()))?;

        let scope_name = scope_name.trim();
        let scope = scopes
            .scope_by_name(scope_name)
            .ok_or_else(|| ParseError::UnknownScope(scope_name.to_string()))?
            .clone();

        let sequence = self.parse_sequence(chords)?;
        Ok((scope, sequence))
    }

    /// Parse the chord part of a binding (`Ctrl+R, Ctrl+O`)
    pub fn parse_sequence(&self, text: &str) -> Result<KeySequence, ParseError> {
        let chords = split_chords(text)?
            .into_iter()
            .map(|chord| self.parse_chord(chord))
            .collect::<Result<Vec<_>, _>>()?;
        KeySequence::from_chords(chords)
    }

    /// Parse a single chord (`Ctrl+Shift+A`)
    ///
    /// Modifier tokens are consumed from the left until one fails to resolve;
    /// that token and everything after it form the key name.
    pub fn parse_chord(&self, text: &str) -> Result<BindingSequence, ParseError> {
        let chord = text.trim();
        if chord.is_empty() {
            return Err(ParseError::EmptyChord(text.to_string()));
        }

        if chord == "+" {
            return Ok(BindingSequence::new(ModifierKeys::empty(), "+"));
        }

        if let Some(prefix) = chord.strip_suffix("++") {
            let mut modifiers = ModifierKeys::empty();
            if !prefix.is_empty() {
                for token in prefix.split('+') {
                    let modifier =
                        self.names
                            .lookup(token)
                            .ok_or_else(|| ParseError::InvalidModifier {
                                modifier: token.trim().to_string(),
                                chord: chord.to_string(),
                            })?;
                    modifiers |= modifier;
                }
            }
            return Ok(BindingSequence::new(modifiers, "+"));
        }

        if chord.ends_with('+') {
            return Err(ParseError::MissingKey(chord.to_string()));
        }

        let tokens: Vec<&str> = chord.split('+').collect();
        let mut modifiers = ModifierKeys::empty();
        let mut key_start = 0;
        while key_start < tokens.len() - 1 {
            match self.names.lookup(tokens[key_start]) {
                Some(modifier) => {
                    modifiers |= modifier;
                    key_start += 1;
                }
                None => break,
            }
        }

        let key = tokens[key_start..].join("+");
        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError::MissingKey(chord.to_string()));
        }

        Ok(BindingSequence::new(modifiers, key))
    }

    /// Render a binding back to host text
    pub fn render(&self, binding: &CommandBinding) -> String {
        self.render_scoped(&binding.scope, &binding.sequence)
    }

    /// Render a scope and sequence as `Scope::Chord[, Chord]`
    pub fn render_scoped(&self, scope: &KeybindingScope, sequence: &KeySequence) -> String {
        format!(
            "{}{}{}",
            scope.name,
            SCOPE_SEPARATOR,
            self.render_sequence(sequence)
        )
    }

    pub fn render_sequence(&self, sequence: &KeySequence) -> String {
        sequence.render(&self.names)
    }

    pub fn render_chord(&self, chord: &BindingSequence) -> String {
        chord.render(&self.names)
    }
}

/// Split chord text into one or two chord slices
fn split_chords(text: &str) -> Result<Vec<&str>, ParseError> {
    let trimmed = text.trim();
    let commas = trimmed.matches(',').count();

    if commas == 0 || (commas == 1 && trimmed.ends_with(',')) {
        return Ok(vec![trimmed]);
    }

    let separator = match chord_separator(trimmed) {
        Some(index) => index,
        None => return Ok(vec![trimmed]),
    };
    let first = &trimmed[..separator];
    let second = trimmed[separator + 1..].trim();

    // The rest stays in the second chord; only a trailing comma key may remain.
    let interior = second.trim_end_matches(',');
    if interior.contains(',') || second.ends_with(",,") {
        return Err(ParseError::TooManyChords(text.to_string()));
    }

    Ok(vec![first.trim(), second])
}

/// Byte index of the comma separating the two chords
///
/// A comma at the start of the text or right after `+` is the comma key
/// when another comma follows it (`Ctrl+,, Ctrl+K`).
fn chord_separator(text: &str) -> Option<usize> {
    let first = text.find(',')?;
    let is_key = first == 0 || text[..first].ends_with('+');
    if is_key && text[first + 1..].starts_with(',') {
        Some(first + 1)
    } else {
        Some(first)
    }
}
