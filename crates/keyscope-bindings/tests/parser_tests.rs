use keyscope_bindings::*;
use uuid::Uuid;

fn scopes() -> Vec<KeybindingScope> {
    vec![
        KeybindingScope::new("Global", Uuid::new_v4(), false),
        KeybindingScope::new("Text Editor", Uuid::new_v4(), true),
        KeybindingScope::new("Solution Explorer", Uuid::new_v4(), false),
    ]
}

fn command_id() -> CommandId {
    CommandId::new(Uuid::nil(), 42)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_chord_binding() {
        let parser = BindingParser::new();
        let binding = parser
            .parse(command_id(), "Text Editor::Ctrl+R, Ctrl+O", &scopes())
            .unwrap();

        assert_eq!(binding.scope.name, "Text Editor");
        assert_eq!(binding.command, command_id());
        assert_eq!(binding.sequence.chord_count(), 2);
        assert_eq!(
            binding.sequence.first,
            BindingSequence::new(ModifierKeys::CONTROL, "R")
        );
        assert_eq!(
            binding.sequence.second,
            Some(BindingSequence::new(ModifierKeys::CONTROL, "O"))
        );
    }

    #[test]
    fn test_parse_single_chord_with_two_modifiers() {
        let parser = BindingParser::new();
        let binding = parser
            .parse(command_id(), "Global::Ctrl+Shift+A", &scopes())
            .unwrap();

        assert_eq!(binding.scope.name, "Global");
        assert_eq!(binding.sequence.chord_count(), 1);
        assert_eq!(
            binding.sequence.first,
            BindingSequence::new(ModifierKeys::CONTROL | ModifierKeys::SHIFT, "A")
        );
    }

    #[test]
    fn test_parse_plus_key() {
        let parser = BindingParser::new();
        let binding = parser.parse(command_id(), "Global::Ctrl++", &scopes()).unwrap();
        assert_eq!(
            binding.sequence.first,
            BindingSequence::new(ModifierKeys::CONTROL, "+")
        );
        assert_eq!(parser.render(&binding), "Global::Ctrl++");
    }

    #[test]
    fn test_parse_comma_key() {
        let parser = BindingParser::new();
        let single = parser.parse(command_id(), "Global::Ctrl+,", &scopes()).unwrap();
        assert_eq!(single.sequence.chord_count(), 1);
        assert_eq!(single.sequence.first.key, ",");

        let pair = parser
            .parse(command_id(), "Text Editor::Ctrl+K, Ctrl+,", &scopes())
            .unwrap();
        assert_eq!(pair.sequence.chord_count(), 2);
        assert_eq!(
            pair.sequence.second,
            Some(BindingSequence::new(ModifierKeys::CONTROL, ","))
        );

        let leading = parser
            .parse(command_id(), "Text Editor::Ctrl+,, Ctrl+K", &scopes())
            .unwrap();
        assert_eq!(
            leading.sequence,
            KeySequence::pair(
                BindingSequence::new(ModifierKeys::CONTROL, ","),
                BindingSequence::new(ModifierKeys::CONTROL, "K")
            )
        );
        assert_eq!(parser.render(&leading), "Text Editor::Ctrl+,, Ctrl+K");
    }

    #[test]
    fn test_parse_missing_separator() {
        let parser = BindingParser::new();
        let result = parser.parse(command_id(), "Ctrl+S", &scopes());
        assert!(matches!(result, Err(ParseError::MissingScopeSeparator(_))));
        assert!(result.unwrap_err().is_malformed());
    }

    #[test]
    fn test_parse_unknown_scope_is_not_malformed() {
        let parser = BindingParser::new();
        let result = parser.parse(command_id(), "XAML Designer::Ctrl+S", &scopes());
        match result {
            Err(err @ ParseError::UnknownScope(_)) => assert!(!err.is_malformed()),
            other => panic!("expected UnknownScope, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_three_chords() {
        let parser = BindingParser::new();
        let result = parser.parse(command_id(), "Global::Ctrl+A, Ctrl+B, Ctrl+C", &scopes());
        assert!(matches!(result, Err(ParseError::TooManyChords(_))));
    }

    #[test]
    fn test_parse_modifiers_are_case_insensitive_keys_are_not() {
        let parser = BindingParser::new();
        let lower = parser.parse(command_id(), "Global::ctrl+a", &scopes()).unwrap();
        assert_eq!(lower.sequence.first.modifiers, ModifierKeys::CONTROL);
        assert_eq!(lower.sequence.first.key, "a");

        let upper = parser.parse(command_id(), "Global::Ctrl+A", &scopes()).unwrap();
        assert_ne!(lower.sequence, upper.sequence);
    }

    #[test]
    fn test_parse_unmodified_function_key() {
        let parser = BindingParser::new();
        let binding = parser
            .parse(command_id(), "Solution Explorer::F2", &scopes())
            .unwrap();
        assert!(binding.sequence.first.modifiers.is_empty());
        assert_eq!(binding.sequence.first.key, "F2");
    }

    #[test]
    fn test_render_normalizes_modifier_order() {
        let parser = BindingParser::new();
        let binding = parser
            .parse(command_id(), "Global::Alt+Shift+Ctrl+Win+F12", &scopes())
            .unwrap();
        assert_eq!(parser.render(&binding), "Global::Win+Ctrl+Shift+Alt+F12");
    }

    #[test]
    fn test_render_then_parse_is_equivalent() {
        let parser = BindingParser::new();
        let scopes = scopes();
        for text in [
            "Text Editor::Ctrl+R, Ctrl+O",
            "Global::Shift+Alt+Enter",
            "Global::Ctrl++",
            "Text Editor::Ctrl+K, Ctrl+,",
            "Text Editor::Ctrl+,, Ctrl+K",
            "Solution Explorer::Del",
        ] {
            let parsed = parser.parse(command_id(), text, &scopes).unwrap();
            let reparsed = parser
                .parse(command_id(), &parser.render(&parsed), &scopes)
                .unwrap();
            assert_eq!(parsed, reparsed, "round trip failed for {}", text);
        }
    }

    #[test]
    fn test_parse_against_scope_catalog() {
        let catalog = ScopeCatalog::new(scopes());
        let parser = BindingParser::new();
        let binding = parser
            .parse(command_id(), "Text Editor::Ctrl+E, Ctrl+D", &catalog)
            .unwrap();
        assert_eq!(binding.scope, *catalog.by_name("Text Editor").unwrap());
    }
}
