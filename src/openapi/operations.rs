use crate::errors::{CodegenError, Result};
use crate::openapi::document::OpenApiDocument;
use crate::openapi::naming;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use serde_json::Value;

/// HTTP verbs that may key an operation inside a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl Verb {
    /// Emission order of operations sharing a path.
    pub const ALL: [Verb; 8] = [
        Verb::Get,
        Verb::Put,
        Verb::Post,
        Verb::Delete,
        Verb::Options,
        Verb::Head,
        Verb::Patch,
        Verb::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Put => "put",
            Verb::Post => "post",
            Verb::Delete => "delete",
            Verb::Options => "options",
            Verb::Head => "head",
            Verb::Patch => "patch",
            Verb::Trace => "trace",
        }
    }

    /// Only GET reads; every other verb is treated as a write.
    pub fn is_query(&self) -> bool {
        matches!(self, Verb::Get)
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One (path, verb) pair of the document.
#[derive(Debug, Clone)]
pub struct OperationDefinition {
    pub path: String,
    pub verb: Verb,
    pub path_item: Value,
    pub operation: Value,
}

impl OperationDefinition {
    pub fn operation_id(&self) -> Option<&str> {
        self.operation.get("operationId").and_then(Value::as_str)
    }

    /// Generated identifier for this operation.
    pub fn name(&self) -> String {
        naming::operation_name(self.verb, &self.path, self.operation_id())
    }

    /// `GET /pet/{petId}`, for diagnostics.
    pub fn describe(&self) -> String {
        format!("{} {}", self.verb.as_str().to_uppercase(), self.path)
    }
}

/// Flatten the document's `paths` into operation definitions.
pub fn extract(document: &OpenApiDocument) -> Result<Vec<OperationDefinition>> {
    let paths = document.paths()?;
    let mut definitions = Vec::new();

    for (path, path_item) in paths {
        let item = path_item
            .as_object()
            .ok_or_else(|| CodegenError::InvalidSchema {
                location: document.location.clone(),
                message: format!("path item `{path}` is not an object"),
            })?;

        for verb in Verb::ALL {
            let Some(operation) = item.get(verb.as_str()) else {
                continue;
            };
            if !operation.is_object() {
                return Err(CodegenError::InvalidSchema {
                    location: document.location.clone(),
                    message: format!("operation `{verb} {path}` is not an object"),
                });
            }
            definitions.push(OperationDefinition {
                path: path.clone(),
                verb,
                path_item: path_item.clone(),
                operation: operation.clone(),
            });
        }
    }

    tracing::debug!(
        count = definitions.len(),
        location = %document.location,
        "extracted operations"
    );
    Ok(definitions)
}

/// Whether an endpoint is generated as `builder.query` or `builder.mutation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Query,
    Mutation,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Query => "query",
            EndpointKind::Mutation => "mutation",
        }
    }

    /// Suffix of the generated hook name.
    pub fn hook_suffix(&self) -> &'static str {
        match self {
            EndpointKind::Query => "Query",
            EndpointKind::Mutation => "Mutation",
        }
    }
}

/// Forces a kind on every operation whose name matches one of the patterns.
#[derive(Debug, Clone)]
pub struct EndpointOverride {
    patterns: GlobSet,
    kind: EndpointKind,
}

impl EndpointOverride {
    pub fn new(patterns: &[String], kind: EndpointKind) -> Result<Self> {
        Ok(Self {
            patterns: compile(patterns)?,
            kind,
        })
    }
}

/// Decides which operations are generated and how each one is classified.
#[derive(Debug, Clone, Default)]
pub struct OperationSelection {
    filter: Option<GlobSet>,
    overrides: Vec<EndpointOverride>,
}

impl OperationSelection {
    pub fn new(filter: &[String], overrides: Vec<EndpointOverride>) -> Result<Self> {
        let filter = if filter.is_empty() {
            None
        } else {
            Some(compile(filter)?)
        };
        Ok(Self { filter, overrides })
    }

    pub fn includes(&self, name: &str) -> bool {
        self.filter.as_ref().map_or(true, |set| set.is_match(name))
    }

    /// First matching override wins, then the verb decides.
    pub fn classify(&self, definition: &OperationDefinition) -> EndpointKind {
        let name = definition.name();
        self.overrides
            .iter()
            .find(|o| o.patterns.is_match(&name))
            .map(|o| o.kind)
            .unwrap_or(if definition.verb.is_query() {
                EndpointKind::Query
            } else {
                EndpointKind::Mutation
            })
    }
}

fn compile(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
