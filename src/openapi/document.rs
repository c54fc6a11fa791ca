use crate::errors::{CodegenError, Result};
use crate::resolve::fetch::{remote_url, RemoteFetcher};
use serde_json::{Map, Number, Value};
use std::path::Path;

/// A decoded OpenAPI document, kept as raw JSON with its key order intact.
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
    /// Where the document was loaded from (path or URL)
    pub location: String,
    pub value: Value,
}

impl OpenApiDocument {
    /// Load a document from a local path or an absolute http(s) URL.
    pub async fn load<F: RemoteFetcher>(location: &str, fetcher: &F) -> Result<Self> {
        if let Some(url) = remote_url(location) {
            tracing::info!(%url, "fetching OpenAPI document");
            let response = fetcher.fetch(&url).await?;
            if !response.is_ok() {
                return Err(CodegenError::UrlNotFound {
                    url: location.to_string(),
                    status: response.status,
                });
            }
            return Self::parse(url.path(), &response.text).map(|doc| doc.relocated(location));
        }

        let path = Path::new(location);
        if !path.is_file() {
            return Err(CodegenError::FileNotFound {
                module: location.to_string(),
            });
        }
        tracing::info!(path = %path.display(), "reading OpenAPI document");
        let content = std::fs::read_to_string(path)?;
        Self::parse(location, &content)
    }

    /// Decode document text, choosing the format from the location's extension.
    pub fn parse(location: &str, content: &str) -> Result<Self> {
        let ext = Path::new(location)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let value: Value = match ext {
            "yaml" | "yml" => parse_yaml(content)?,
            "json" => serde_json::from_str(content)?,
            // Try YAML first, fall back to JSON
            _ => parse_yaml(content)
                .or_else(|_| serde_json::from_str(content).map_err(CodegenError::from))?,
        };
        if !value.is_object() {
            return Err(CodegenError::InvalidSchema {
                location: location.to_string(),
                message: "document root is not an object".to_string(),
            });
        }
        Ok(Self::from_value(location, value))
    }

    pub fn from_value(location: impl Into<String>, value: Value) -> Self {
        Self {
            location: location.into(),
            value,
        }
    }

    fn relocated(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    /// The `paths` object.
    pub fn paths(&self) -> Result<&Map<String, Value>> {
        match self.value.get("paths") {
            None | Some(Value::Null) => Err(CodegenError::MissingPaths {
                location: self.location.clone(),
            }),
            Some(paths) => paths
                .as_object()
                .ok_or_else(|| CodegenError::InvalidSchema {
                    location: self.location.clone(),
                    message: "`paths` is not an object".to_string(),
                }),
        }
    }

    /// URLs listed under `servers`, in document order.
    pub fn servers(&self) -> Vec<String> {
        self.value
            .get("servers")
            .and_then(Value::as_array)
            .map(|servers| {
                servers
                    .iter()
                    .filter_map(|s| s.get("url").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `components.schemas`, if any.
    pub fn component_schemas(&self) -> Option<&Map<String, Value>> {
        self.value
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
    }
}

fn parse_yaml(content: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    Ok(yaml_to_json(yaml))
}

/// Convert YAML to JSON. Non-string mapping keys (response codes written as
/// bare `200:`) become their textual form.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    _ => continue,
                };
                map.insert(key, yaml_to_json(v));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}
