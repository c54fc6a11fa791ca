//! Export detection for base-query modules.
//!
//! This is a text-containment heuristic over top-level statements, not
//! semantic export resolution. A statement is considered to export `name` when
//! its text contains both `export` and `name`, so a mention inside a comment or
//! string literal of an exported statement is reported as an export.

use crate::parse::{SourceUnit, TopLevel};

/// Statement kinds that can carry an `export` keyword.
const DECLARATION_KINDS: &[&str] = &[
    "export_statement",
    "lexical_declaration",
    "variable_declaration",
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "abstract_class_declaration",
    "type_alias_declaration",
    "interface_declaration",
    "enum_declaration",
    "ambient_declaration",
];

/// Whether `unit` exports `target` (`"default"` for the default export).
pub fn exports_name(unit: &SourceUnit, target: &str) -> bool {
    let found = unit.top_level().iter().any(|stmt| statement_exports(stmt, target));
    tracing::debug!(file = unit.name(), target, found, "export check");
    found
}

fn statement_exports(stmt: &TopLevel<'_>, target: &str) -> bool {
    if !DECLARATION_KINDS.contains(&stmt.kind) {
        return false;
    }
    if stmt.kind == "export_statement" && stmt.is_assignment {
        // `export default <expr>` / `export = <expr>`
        return stmt.text.contains(target);
    }
    stmt.text.contains("export") && stmt.text.contains(target)
}
