//! Syntax tree of the generated TypeScript module.
//!
//! Nodes are plain immutable values; printing lives in `output::printer`.

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Array(Vec<Expr>),
    Object(ObjectLit),
    /// `callee<type_args>(args)`
    Call {
        callee: Box<Expr>,
        type_args: Vec<TypeNode>,
        args: Vec<Expr>,
    },
    /// `object.property`
    Member { object: Box<Expr>, property: String },
    /// `(params) => body`
    Arrow { params: Vec<String>, body: Box<Expr> },
    Paren(Box<Expr>),
    /// Template literal; `Text` parts are emitted verbatim, `Expr` parts as `${...}`.
    Template(Vec<TemplatePart>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Text(String),
    Expr(Expr),
}

/// `key: value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: Expr,
}

/// Object literal. Property order is significant and kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLit {
    pub properties: Vec<Property>,
    /// Print one property per line.
    pub multiline: bool,
}

/// A type annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    /// Named type or keyword (`Pet`, `string`, `unknown`).
    Ref(String),
    StringLiteral(String),
    Array(Box<TypeNode>),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Object(Vec<TypeMember>),
    /// `name<args>`, e.g. `Record<string, number>`.
    Generic { name: String, args: Vec<TypeNode> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMember {
    pub name: String,
    pub optional: bool,
    pub ty: TypeNode,
}

/// `{ imported as local }`; `imported` is `None` when both names are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifier {
    pub imported: Option<String>,
    pub local: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub default: Option<String>,
    pub named: Vec<ImportSpecifier>,
    pub source: String,
}

/// Left-hand side of a `const`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Ident(String),
    /// `{ a, b, c }`
    ObjectPattern(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Import(ImportDecl),
    Const {
        exported: bool,
        binding: Binding,
        init: Expr,
    },
    TypeAlias {
        exported: bool,
        name: String,
        ty: TypeNode,
    },
}

/// A whole generated source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    pub statements: Vec<Stmt>,
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn member(object: Expr, property: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            type_args: Vec::new(),
            args,
        }
    }
}

impl TypeNode {
    pub fn named(name: impl Into<String>) -> Self {
        TypeNode::Ref(name.into())
    }
}
