// Plain-text rendering of engine results

use std::fmt::Write;

use keyscope_bindings::{BindingConflict, BindingParser, Command, ScopeListEntry};

/// Line drawn between pinned and remaining scopes
pub const SCOPE_SEPARATOR_LINE: &str = "----------";

/// Conflicts grouped by type, each affected binding on its own line
pub fn format_conflicts(conflicts: &[BindingConflict], parser: &BindingParser) -> String {
    if conflicts.is_empty() {
        return "No conflicts\n".to_string();
    }

    let mut out = String::new();
    for conflict in conflicts {
        let _ = writeln!(out, "{}:", conflict.conflict_type);
        for affected in &conflict.affected {
            let _ = writeln!(
                out,
                "  {}  ({})",
                command_label(&affected.command),
                parser.render(&affected.binding)
            );
        }
    }
    out
}

/// One line per command: name followed by its rendered bindings
pub fn format_commands(commands: &[Command], parser: &BindingParser) -> String {
    let mut out = String::new();
    for command in commands {
        let bindings: Vec<String> = command
            .bindings
            .iter()
            .map(|binding| parser.render(binding))
            .collect();
        if bindings.is_empty() {
            let _ = writeln!(out, "{}", command.display_text());
        } else {
            let _ = writeln!(out, "{}  [{}]", command.display_text(), bindings.join("; "));
        }
    }
    out
}

pub fn format_scope_list(entries: &[ScopeListEntry<'_>]) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry {
            ScopeListEntry::Scope(scope) => {
                let _ = writeln!(out, "{}", scope.name);
            }
            ScopeListEntry::Separator => {
                let _ = writeln!(out, "{}", SCOPE_SEPARATOR_LINE);
            }
        }
    }
    out
}

fn command_label(command: &Command) -> String {
    if command.is_listable() {
        command.display_text().to_string()
    } else {
        format!("<unnamed {}>", command.id)
    }
}
