use crate::codegen::ast::{TypeMember, TypeNode};
use crate::openapi::naming;
use serde_json::Value;

pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// TypeScript name of a component schema.
pub fn type_name(schema_name: &str) -> String {
    if naming::is_identifier(schema_name) {
        naming::upper_first(schema_name)
    } else {
        naming::pascal_case(schema_name)
    }
}

/// Map a JSON schema to a TypeScript type.
pub fn schema_to_type(schema: &Value) -> TypeNode {
    let base = non_nullable_type(schema);
    if schema.get("nullable").and_then(Value::as_bool) == Some(true) {
        union(vec![base, TypeNode::named("null")])
    } else {
        base
    }
}

fn non_nullable_type(schema: &Value) -> TypeNode {
    if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
        return match reference.strip_prefix(SCHEMA_REF_PREFIX) {
            Some(name) => TypeNode::named(type_name(name)),
            None => TypeNode::named("unknown"),
        };
    }
    if let Some(parts) = schema.get("allOf").and_then(Value::as_array) {
        return TypeNode::Intersection(parts.iter().map(schema_to_type).collect());
    }
    for key in ["oneOf", "anyOf"] {
        if let Some(parts) = schema.get(key).and_then(Value::as_array) {
            return union(parts.iter().map(schema_to_type).collect());
        }
    }
    if let Some(values) = schema.get("enum").and_then(Value::as_array) {
        return union(values.iter().map(enum_member).collect());
    }

    match schema.get("type") {
        Some(Value::Array(types)) => union(
            types
                .iter()
                .filter_map(Value::as_str)
                .map(|t| typed(t, schema))
                .collect(),
        ),
        Some(Value::String(t)) => typed(t, schema),
        _ if schema.get("properties").is_some() => object_type(schema),
        _ => TypeNode::named("unknown"),
    }
}

fn typed(type_name: &str, schema: &Value) -> TypeNode {
    match type_name {
        "string" if schema.get("format").and_then(Value::as_str) == Some("binary") => {
            TypeNode::named("Blob")
        }
        "string" => TypeNode::named("string"),
        "integer" | "number" => TypeNode::named("number"),
        "boolean" => TypeNode::named("boolean"),
        "null" => TypeNode::named("null"),
        "array" => TypeNode::Array(Box::new(
            schema
                .get("items")
                .map(schema_to_type)
                .unwrap_or_else(|| TypeNode::named("unknown")),
        )),
        "object" => object_type(schema),
        _ => TypeNode::named("unknown"),
    }
}

fn object_type(schema: &Value) -> TypeNode {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let members: Vec<TypeMember> = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, prop)| TypeMember {
                    name: name.clone(),
                    optional: !required.contains(&name.as_str()),
                    ty: schema_to_type(prop),
                })
                .collect()
        })
        .unwrap_or_default();

    match schema.get("additionalProperties") {
        Some(extra) if members.is_empty() && extra != &Value::Bool(false) => {
            let value = if extra.is_object() {
                schema_to_type(extra)
            } else {
                TypeNode::named("any")
            };
            TypeNode::Generic {
                name: "Record".to_string(),
                args: vec![TypeNode::named("string"), value],
            }
        }
        _ if members.is_empty() => TypeNode::Generic {
            name: "Record".to_string(),
            args: vec![TypeNode::named("string"), TypeNode::named("unknown")],
        },
        _ => TypeNode::Object(members),
    }
}

fn enum_member(value: &Value) -> TypeNode {
    match value {
        Value::String(s) => TypeNode::StringLiteral(s.clone()),
        Value::Null => TypeNode::named("null"),
        other => TypeNode::named(other.to_string()),
    }
}

fn union(mut members: Vec<TypeNode>) -> TypeNode {
    members.dedup();
    if members.len() == 1 {
        members.remove(0)
    } else {
        TypeNode::Union(members)
    }
}
