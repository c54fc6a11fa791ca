//! Renders a generated [`Module`] as TypeScript source.
//!
//! Two-space indentation, single-quoted strings, semicolons, and trailing
//! commas in multi-line object literals.

use crate::codegen::ast::{
    Binding, Expr, ImportDecl, Module, ObjectLit, Stmt, TemplatePart, TypeMember, TypeNode,
};
use crate::errors::Result;
use std::io::Write;

const INDENT: &str = "  ";

/// Render `module` into a string.
pub fn render(module: &Module) -> String {
    let mut printer = Printer::default();
    printer.module(module);
    printer.out
}

/// Write the rendered module to `writer`.
pub fn write_module<W: Write>(writer: &mut W, module: &Module) -> Result<()> {
    writer.write_all(render(module).as_bytes())?;
    Ok(())
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn module(&mut self, module: &Module) {
        let mut previous: Option<&Stmt> = None;
        for stmt in &module.statements {
            if let Some(prev) = previous {
                if !same_group(prev, stmt) {
                    self.out.push('\n');
                }
            }
            self.stmt(stmt);
            self.out.push('\n');
            previous = Some(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Import(decl) => self.import(decl),
            Stmt::Const {
                exported,
                binding,
                init,
            } => {
                if *exported {
                    self.out.push_str("export ");
                }
                self.out.push_str("const ");
                match binding {
                    Binding::Ident(name) => self.out.push_str(name),
                    Binding::ObjectPattern(names) if names.is_empty() => self.out.push_str("{}"),
                    Binding::ObjectPattern(names) => {
                        self.out.push_str("{ ");
                        self.out.push_str(&names.join(", "));
                        self.out.push_str(" }");
                    }
                }
                self.out.push_str(" = ");
                self.expr(init);
                self.out.push(';');
            }
            Stmt::TypeAlias { exported, name, ty } => {
                if *exported {
                    self.out.push_str("export ");
                }
                self.out.push_str("type ");
                self.out.push_str(name);
                self.out.push_str(" = ");
                self.ty(ty);
                self.out.push(';');
            }
        }
    }

    fn import(&mut self, decl: &ImportDecl) {
        self.out.push_str("import ");
        if let Some(default) = &decl.default {
            self.out.push_str(default);
            if !decl.named.is_empty() {
                self.out.push_str(", ");
            }
        }
        if !decl.named.is_empty() {
            let specifiers: Vec<String> = decl
                .named
                .iter()
                .map(|s| match &s.imported {
                    Some(imported) => format!("{imported} as {}", s.local),
                    None => s.local.clone(),
                })
                .collect();
            self.out.push_str("{ ");
            self.out.push_str(&specifiers.join(", "));
            self.out.push_str(" }");
        }
        self.out.push_str(" from ");
        self.out.push_str(&quote(&decl.source));
        self.out.push(';');
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.out.push_str(name),
            Expr::Str(value) => self.out.push_str(&quote(value)),
            Expr::Array(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(item);
                }
                self.out.push(']');
            }
            Expr::Object(lit) => self.object(lit),
            Expr::Call {
                callee,
                type_args,
                args,
            } => {
                self.expr(callee);
                if !type_args.is_empty() {
                    self.out.push('<');
                    for (i, ty) in type_args.iter().enumerate() {
                        if i > 0 {
                            self.out.push_str(", ");
                        }
                        self.ty(ty);
                    }
                    self.out.push('>');
                }
                self.out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg);
                }
                self.out.push(')');
            }
            Expr::Member { object, property } => {
                self.expr(object);
                if is_property_name(property) {
                    self.out.push('.');
                    self.out.push_str(property);
                } else {
                    self.out.push('[');
                    self.out.push_str(&quote(property));
                    self.out.push(']');
                }
            }
            Expr::Arrow { params, body } => {
                self.out.push('(');
                self.out.push_str(&params.join(", "));
                self.out.push_str(") => ");
                self.expr(body);
            }
            Expr::Paren(inner) => {
                self.out.push('(');
                self.expr(inner);
                self.out.push(')');
            }
            Expr::Template(parts) => {
                self.out.push('`');
                for part in parts {
                    match part {
                        TemplatePart::Text(text) => self.out.push_str(&escape_template(text)),
                        TemplatePart::Expr(e) => {
                            self.out.push_str("${");
                            self.expr(e);
                            self.out.push('}');
                        }
                    }
                }
                self.out.push('`');
            }
        }
    }

    fn object(&mut self, lit: &ObjectLit) {
        if lit.properties.is_empty() {
            self.out.push_str("{}");
            return;
        }

        if !lit.multiline {
            self.out.push_str("{ ");
            for (i, prop) in lit.properties.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.out.push_str(&property_key(&prop.key));
                self.out.push_str(": ");
                self.expr(&prop.value);
            }
            self.out.push_str(" }");
            return;
        }

        self.out.push_str("{\n");
        self.depth += 1;
        for prop in &lit.properties {
            self.indent();
            self.out.push_str(&property_key(&prop.key));
            self.out.push_str(": ");
            self.expr(&prop.value);
            self.out.push_str(",\n");
        }
        self.depth -= 1;
        self.indent();
        self.out.push('}');
    }

    fn ty(&mut self, ty: &TypeNode) {
        match ty {
            TypeNode::Ref(name) => self.out.push_str(name),
            TypeNode::StringLiteral(value) => self.out.push_str(&quote(value)),
            TypeNode::Array(inner) => {
                let wrap = matches!(**inner, TypeNode::Union(_) | TypeNode::Intersection(_));
                if wrap {
                    self.out.push('(');
                }
                self.ty(inner);
                if wrap {
                    self.out.push(')');
                }
                self.out.push_str("[]");
            }
            TypeNode::Union(members) => self.joined(members, " | "),
            TypeNode::Intersection(members) => self.joined(members, " & "),
            TypeNode::Object(members) => self.type_literal(members),
            TypeNode::Generic { name, args } => {
                self.out.push_str(name);
                self.out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.ty(arg);
                }
                self.out.push('>');
            }
        }
    }

    fn joined(&mut self, members: &[TypeNode], separator: &str) {
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                self.out.push_str(separator);
            }
            // unions nested in intersections (and vice versa) need grouping
            let wrap = matches!(member, TypeNode::Union(_) | TypeNode::Intersection(_));
            if wrap {
                self.out.push('(');
            }
            self.ty(member);
            if wrap {
                self.out.push(')');
            }
        }
    }

    fn type_literal(&mut self, members: &[TypeMember]) {
        if members.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{\n");
        self.depth += 1;
        for member in members {
            self.indent();
            self.out.push_str(&property_key(&member.name));
            if member.optional {
                self.out.push('?');
            }
            self.out.push_str(": ");
            self.ty(&member.ty);
            self.out.push_str(";\n");
        }
        self.depth -= 1;
        self.indent();
        self.out.push('}');
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }
}

/// Imports sit together, as do type aliases; everything else is spaced out.
fn same_group(previous: &Stmt, next: &Stmt) -> bool {
    matches!(
        (previous, next),
        (Stmt::Import(_), Stmt::Import(_)) | (Stmt::TypeAlias { .. }, Stmt::TypeAlias { .. })
    )
}

fn is_property_name(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn property_key(key: &str) -> String {
    if is_property_name(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('\'');
    quoted
}

fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}
