//! Per-operation synthesis: the `query` function and the argument/response
//! type aliases of one endpoint.

use crate::codegen::ast::{Expr, Property, Stmt, TemplatePart, TypeMember, TypeNode};
use crate::codegen::builder::{endpoint_property, object_literal, EndpointDefinition};
use crate::openapi::naming;
use crate::openapi::schema_types::{schema_to_type, SCHEMA_REF_PREFIX};
use crate::openapi::{EndpointKind, OpenApiDocument, OperationDefinition};
use serde_json::Value;

/// Name of the single argument of generated `query` functions.
const QUERY_ARG: &str = "queryArg";

/// Settings shared by every endpoint of one generated module.
#[derive(Debug, Clone, Copy)]
pub struct EndpointSettings<'a> {
    pub document: &'a OpenApiDocument,
    pub arg_suffix: &'a str,
    pub response_suffix: &'a str,
    pub endpoint_builder: &'a str,
}

/// The `endpoints` entry of one operation plus the types it references.
#[derive(Debug, Clone)]
pub struct GeneratedEndpoint {
    pub property: Property,
    pub types: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone)]
struct Parameter {
    /// Name on the wire.
    name: String,
    /// Member name inside the generated `queryArg`.
    arg_key: String,
    location: ParamLocation,
    required: bool,
    ty: TypeNode,
}

struct RequestBody {
    required: bool,
    ty: TypeNode,
}

pub fn generate_endpoint(
    settings: &EndpointSettings<'_>,
    definition: &OperationDefinition,
    name: &str,
    kind: EndpointKind,
) -> GeneratedEndpoint {
    let parameters = collect_parameters(settings.document, definition);
    let body = request_body(settings.document, &definition.operation);

    let type_prefix = naming::upper_first(name);
    let response_name = format!("{type_prefix}{}", settings.response_suffix);
    let arg_name = format!("{type_prefix}{}", settings.arg_suffix);

    let types = vec![
        Stmt::TypeAlias {
            exported: true,
            name: response_name.clone(),
            ty: response_type(settings.document, &definition.operation),
        },
        Stmt::TypeAlias {
            exported: true,
            name: arg_name.clone(),
            ty: arg_type(&parameters, body.as_ref()),
        },
    ];

    let property = endpoint_property(EndpointDefinition {
        operation_name: name.to_string(),
        kind,
        response_type: TypeNode::named(response_name),
        arg_type: TypeNode::named(arg_name),
        query_fn: query_fn(definition, &parameters, body.as_ref()),
        endpoint_builder: settings.endpoint_builder.to_string(),
        extra_props: Vec::new(),
    });

    GeneratedEndpoint { property, types }
}

/// Follow a local `$ref` (`#/components/...`) inside the document.
fn resolve_ref<'a>(document: &'a OpenApiDocument, value: &'a Value) -> &'a Value {
    let mut current = value;
    // bounded to guard against reference cycles
    for _ in 0..16 {
        let Some(pointer) = current
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|r| r.strip_prefix('#'))
        else {
            break;
        };
        match document.value.pointer(pointer) {
            Some(target) => current = target,
            None => break,
        }
    }
    current
}

/// Component schema references stay named; other local references are inlined.
fn schema_type(document: &OpenApiDocument, schema: &Value) -> TypeNode {
    let names_component = schema
        .get("$ref")
        .and_then(Value::as_str)
        .is_some_and(|r| r.starts_with(SCHEMA_REF_PREFIX));
    if names_component {
        schema_to_type(schema)
    } else {
        schema_to_type(resolve_ref(document, schema))
    }
}

/// Path-item parameters overridden by operation parameters with the same name and location.
fn collect_parameters(document: &OpenApiDocument, definition: &OperationDefinition) -> Vec<Parameter> {
    let mut parameters: Vec<Parameter> = Vec::new();
    let sources = [
        definition.path_item.get("parameters"),
        definition.operation.get("parameters"),
    ];

    for list in sources.into_iter().flatten().filter_map(Value::as_array) {
        for raw in list {
            let raw = resolve_ref(document, raw);
            let Some(param) = parameter(document, raw) else {
                continue;
            };
            match parameters
                .iter_mut()
                .find(|p| p.name == param.name && p.location == param.location)
            {
                Some(existing) => *existing = param,
                None => parameters.push(param),
            }
        }
    }

    // `{name}` segments without a declaration still need a member in the argument
    for name in path_placeholders(&definition.path) {
        let declared = parameters
            .iter()
            .any(|p| p.location == ParamLocation::Path && p.name == name);
        if !declared {
            parameters.push(Parameter {
                name: name.to_string(),
                arg_key: arg_key(name),
                location: ParamLocation::Path,
                required: true,
                ty: TypeNode::named("string"),
            });
        }
    }
    parameters
}

fn arg_key(name: &str) -> String {
    if naming::is_identifier(name) {
        name.to_string()
    } else {
        naming::to_identifier(name)
    }
}

/// Names inside `{...}` segments of a path template, in order.
fn path_placeholders(path: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        names.push(&rest[open + 1..close]);
        rest = &rest[close + 1..];
    }
    names
}

fn parameter(document: &OpenApiDocument, raw: &Value) -> Option<Parameter> {
    let name = raw.get("name").and_then(Value::as_str)?.to_string();
    let location = match raw.get("in").and_then(Value::as_str)? {
        "path" => ParamLocation::Path,
        "query" => ParamLocation::Query,
        "header" => ParamLocation::Header,
        "cookie" => ParamLocation::Cookie,
        _ => return None,
    };
    let required = location == ParamLocation::Path
        || raw.get("required").and_then(Value::as_bool).unwrap_or(false);
    let ty = raw
        .get("schema")
        .map(|s| schema_type(document, s))
        .unwrap_or_else(|| TypeNode::named("unknown"));
    Some(Parameter {
        arg_key: arg_key(&name),
        name,
        location,
        required,
        ty,
    })
}

fn request_body(document: &OpenApiDocument, operation: &Value) -> Option<RequestBody> {
    let body = resolve_ref(document, operation.get("requestBody")?);
    let schema = preferred_content_schema(body.get("content")?);
    Some(RequestBody {
        required: body.get("required").and_then(Value::as_bool).unwrap_or(false),
        ty: schema
            .map(|s| schema_type(document, s))
            .unwrap_or_else(|| TypeNode::named("unknown")),
    })
}

/// Schema of `application/json` content, else of the first media type.
fn preferred_content_schema(content: &Value) -> Option<&Value> {
    let content = content.as_object()?;
    content
        .get("application/json")
        .or_else(|| content.values().next())
        .and_then(|media| media.get("schema"))
}

/// Type of the first 2xx response (in document order), else of `default`.
fn response_type(document: &OpenApiDocument, operation: &Value) -> TypeNode {
    let Some(responses) = operation.get("responses").and_then(Value::as_object) else {
        return TypeNode::named("unknown");
    };
    let chosen = responses
        .iter()
        .find(|(code, _)| code.starts_with('2'))
        .or_else(|| responses.iter().find(|(code, _)| code.as_str() == "default"))
        .map(|(_, response)| resolve_ref(document, response));

    chosen
        .and_then(|response| response.get("content"))
        .and_then(preferred_content_schema)
        .map(|schema| schema_type(document, schema))
        .unwrap_or_else(|| TypeNode::named("unknown"))
}

fn arg_type(parameters: &[Parameter], body: Option<&RequestBody>) -> TypeNode {
    let mut members: Vec<TypeMember> = parameters
        .iter()
        .map(|p| TypeMember {
            name: p.arg_key.clone(),
            optional: !p.required,
            ty: p.ty.clone(),
        })
        .collect();
    if let Some(body) = body {
        members.push(TypeMember {
            name: "body".to_string(),
            optional: !body.required,
            ty: body.ty.clone(),
        });
    }

    if members.is_empty() {
        TypeNode::named("void")
    } else {
        TypeNode::Object(members)
    }
}

/// `(queryArg) => ({ url, method, body, headers, params })`
fn query_fn(
    definition: &OperationDefinition,
    parameters: &[Parameter],
    body: Option<&RequestBody>,
) -> Expr {
    let arg = |key: &str| Expr::member(Expr::ident(QUERY_ARG), key);

    let mut properties: Vec<(String, Expr)> = vec![("url".to_string(), url_expr(&definition.path, parameters))];
    if !definition.verb.is_query() {
        properties.push((
            "method".to_string(),
            Expr::string(definition.verb.as_str().to_uppercase()),
        ));
    }
    if body.is_some() {
        properties.push(("body".to_string(), arg("body")));
    }
    for (key, location) in [
        ("cookies", ParamLocation::Cookie),
        ("headers", ParamLocation::Header),
        ("params", ParamLocation::Query),
    ] {
        let entries: Vec<(String, Expr)> = parameters
            .iter()
            .filter(|p| p.location == location)
            .map(|p| (p.name.clone(), arg(&p.arg_key)))
            .collect();
        if !entries.is_empty() {
            properties.push((key.to_string(), Expr::Object(object_literal(entries, false))));
        }
    }

    let takes_argument = !parameters.is_empty() || body.is_some();
    Expr::Arrow {
        params: if takes_argument {
            vec![QUERY_ARG.to_string()]
        } else {
            Vec::new()
        },
        body: Box::new(Expr::Paren(Box::new(Expr::Object(object_literal(
            properties, false,
        ))))),
    }
}

/// `/pet/{petId}` -> `` `/pet/${queryArg.petId}` ``; plain string without parameters.
fn url_expr(path: &str, parameters: &[Parameter]) -> Expr {
    if !path.contains('{') {
        return Expr::string(path);
    }

    let mut parts = Vec::new();
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        if open > 0 {
            parts.push(TemplatePart::Text(rest[..open].to_string()));
        }
        let name = &rest[open + 1..close];
        let key = parameters
            .iter()
            .find(|p| p.location == ParamLocation::Path && p.name == name)
            .map(|p| p.arg_key.clone())
            .unwrap_or_else(|| naming::to_identifier(name));
        parts.push(TemplatePart::Expr(Expr::member(Expr::ident(QUERY_ARG), key)));
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        parts.push(TemplatePart::Text(rest.to_string()));
    }
    Expr::Template(parts)
}
