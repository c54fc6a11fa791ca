//! Pure constructors for the fragments of a generated API module.

use crate::codegen::ast::{
    Binding, Expr, ImportDecl, ImportSpecifier, ObjectLit, Property, Stmt, TypeNode,
};
use crate::openapi::operations::EndpointKind;

/// Package the generated module imports `createApi` and `fetchBaseQuery` from.
pub const TOOLKIT_QUERY_PACKAGE: &str = "@reduxjs/toolkit/query";

/// Which toolkit entry point provides `createApi`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreateApiEntryPoint {
    #[default]
    Base,
    React,
}

impl CreateApiEntryPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreateApiEntryPoint::Base => "base",
            CreateApiEntryPoint::React => "react",
        }
    }
}

impl std::str::FromStr for CreateApiEntryPoint {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "base" => Ok(CreateApiEntryPoint::Base),
            "react" => Ok(CreateApiEntryPoint::React),
            _ => Err(format!("Unknown createApi entry point: {s} (expected base or react)")),
        }
    }
}

/// Object literal whose properties follow the input order exactly.
pub fn object_literal<K: Into<String>>(
    properties: impl IntoIterator<Item = (K, Expr)>,
    multiline: bool,
) -> ObjectLit {
    ObjectLit {
        properties: properties
            .into_iter()
            .map(|(key, value)| Property {
                key: key.into(),
                value,
            })
            .collect(),
        multiline,
    }
}

pub fn string_literal_array(items: &[String]) -> Expr {
    Expr::Array(items.iter().map(|s| Expr::string(s.as_str())).collect())
}

/// `import { a, b as c } from 'source'`. Each pair is (imported, local).
pub fn import_declaration<I, L>(source: &str, named: impl IntoIterator<Item = (I, L)>) -> ImportDecl
where
    I: Into<String>,
    L: Into<String>,
{
    ImportDecl {
        default: None,
        named: named
            .into_iter()
            .map(|(imported, local)| {
                let imported = imported.into();
                let local = local.into();
                ImportSpecifier {
                    imported: (imported != local).then_some(imported),
                    local,
                }
            })
            .collect(),
        source: source.to_string(),
    }
}

/// Inputs of the top-level `createApi` statement.
#[derive(Debug, Clone)]
pub struct CreateApiCall {
    pub export_name: String,
    pub reducer_path: Option<String>,
    pub create_api_fn: Expr,
    pub base_query: Expr,
    pub tag_types: Expr,
    /// Parameter name of the `endpoints` callback.
    pub endpoint_builder: String,
    pub endpoint_definitions: ObjectLit,
}

/// `export const <name> = createApi({ reducerPath?, baseQuery, tagTypes, endpoints: (build) => ({...}) })`
pub fn create_api_statement(call: CreateApiCall) -> Stmt {
    let mut properties: Vec<(&str, Expr)> = Vec::with_capacity(4);
    if let Some(reducer_path) = call.reducer_path {
        properties.push(("reducerPath", Expr::Str(reducer_path)));
    }
    properties.push(("baseQuery", call.base_query));
    properties.push(("tagTypes", call.tag_types));
    properties.push((
        "endpoints",
        Expr::Arrow {
            params: vec![call.endpoint_builder],
            body: Box::new(Expr::Paren(Box::new(Expr::Object(
                call.endpoint_definitions,
            )))),
        },
    ));

    Stmt::Const {
        exported: true,
        binding: Binding::Ident(call.export_name),
        init: Expr::call(
            call.create_api_fn,
            vec![Expr::Object(object_literal(properties, true))],
        ),
    }
}

/// Inputs of one `endpoints` entry.
#[derive(Debug, Clone)]
pub struct EndpointDefinition {
    pub operation_name: String,
    pub kind: EndpointKind,
    pub response_type: TypeNode,
    pub arg_type: TypeNode,
    pub query_fn: Expr,
    pub endpoint_builder: String,
    /// Extra properties appended after `query`, in order.
    pub extra_props: Vec<(String, Expr)>,
}

/// `<name>: build.<query|mutation><Response, Arg>({ query: ..., ...extra })`
pub fn endpoint_property(definition: EndpointDefinition) -> Property {
    let mut properties = vec![("query".to_string(), definition.query_fn)];
    properties.extend(definition.extra_props);

    Property {
        key: definition.operation_name,
        value: Expr::Call {
            callee: Box::new(Expr::member(
                Expr::Ident(definition.endpoint_builder),
                definition.kind.as_str(),
            )),
            type_args: vec![definition.response_type, definition.arg_type],
            args: vec![Expr::Object(object_literal(properties, true))],
        },
    }
}

/// Imports of `createApi` (and `fetchBaseQuery` when the default base query
/// is used). Hooks force the `react` entry point.
pub fn package_imports(
    entry_point: CreateApiEntryPoint,
    hooks: bool,
    uses_fetch_base_query: bool,
) -> Vec<Stmt> {
    let entry_point = if hooks {
        CreateApiEntryPoint::React
    } else {
        entry_point
    };

    let mut base_names = Vec::new();
    if entry_point == CreateApiEntryPoint::Base {
        base_names.push(("createApi", "createApi"));
    }
    if uses_fetch_base_query {
        base_names.push(("fetchBaseQuery", "fetchBaseQuery"));
    }

    let mut imports = Vec::new();
    if entry_point != CreateApiEntryPoint::Base {
        imports.push(Stmt::Import(import_declaration(
            &format!("{TOOLKIT_QUERY_PACKAGE}/{}", entry_point.as_str()),
            [("createApi", "createApi")],
        )));
    }
    if !base_names.is_empty() {
        imports.push(Stmt::Import(import_declaration(
            TOOLKIT_QUERY_PACKAGE,
            base_names,
        )));
    }
    imports
}
