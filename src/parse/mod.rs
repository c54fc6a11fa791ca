pub mod exports;

use crate::errors::{CodegenError, Result};
use std::path::Path;

/// A parsed TypeScript/JavaScript module.
pub struct SourceUnit {
    name: String,
    source: String,
    tree: tree_sitter::Tree,
}

/// A top-level statement of a [`SourceUnit`].
#[derive(Debug, Clone, Copy)]
pub struct TopLevel<'a> {
    /// tree-sitter node kind (`export_statement`, `lexical_declaration`, ...)
    pub kind: &'a str,
    pub text: &'a str,
    /// The statement carries a `default` keyword or an `=` (`export = x`)
    /// directly, i.e. it assigns the module's export rather than declaring one.
    pub is_assignment: bool,
}

impl SourceUnit {
    /// Parse source text. `name` picks the grammar: `.tsx`/`.jsx` use the TSX
    /// grammar, everything else the TypeScript grammar.
    pub fn parse(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();

        let language: tree_sitter::Language = if name.ends_with(".tsx") || name.ends_with(".jsx") {
            tree_sitter_typescript::LANGUAGE_TSX.into()
        } else {
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
        };

        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| CodegenError::ParseError {
                file: name.clone(),
                message: e.to_string(),
            })?;
        let tree = parser
            .parse(source.as_bytes(), None)
            .ok_or_else(|| CodegenError::ParseError {
                file: name.clone(),
                message: "parser produced no tree".to_string(),
            })?;

        if tree.root_node().has_error() {
            tracing::debug!(file = %name, "source contains syntax errors, continuing");
        }

        Ok(Self { name, source, tree })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(path.display().to_string(), source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level statements in source order.
    pub fn top_level(&self) -> Vec<TopLevel<'_>> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .map(|node| {
                let mut inner = node.walk();
                let is_assignment = node
                    .children(&mut inner)
                    .any(|child| !child.is_named() && matches!(child.kind(), "default" | "="));
                TopLevel {
                    kind: node.kind(),
                    text: node.utf8_text(self.source.as_bytes()).unwrap_or_default(),
                    is_assignment,
                }
            })
            .collect()
    }
}
