use crate::openapi::EndpointKind;
use serde::Deserialize;
use std::collections::BTreeMap;

/// TOML-deserializable config file. All fields are Option for layered merging.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
    /// OpenAPI document path or URL.
    pub schema_file: Option<String>,
    pub output_file: Option<String>,
    pub export_name: Option<String>,
    pub reducer_path: Option<String>,
    /// `<module>[:<export>]`
    pub base_query: Option<String>,
    pub base_query_fallback: Option<bool>,
    pub base_url: Option<String>,
    pub hooks: Option<bool>,
    pub tsconfig: Option<String>,
    pub arg_suffix: Option<String>,
    pub response_suffix: Option<String>,
    pub create_api_import_path: Option<String>,
    pub endpoint_builder: Option<String>,
    pub tag_types: Option<Vec<String>>,
    pub filter_endpoints: Option<Patterns>,
    #[serde(default)]
    pub endpoint_overrides: Vec<EndpointOverrideFileConfig>,
    /// Per-output-file generation runs, keyed by output path.
    #[serde(default)]
    pub output_files: BTreeMap<String, OutputFileConfig>,
}

/// A single glob or a list of globs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Patterns {
    One(String),
    Many(Vec<String>),
}

impl Patterns {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Patterns::One(p) => vec![p.clone()],
            Patterns::Many(ps) => ps.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointOverrideFileConfig {
    pub pattern: Patterns,
    #[serde(rename = "type")]
    pub kind: EndpointKind,
}

/// `[output_files."<path>"]`: settings that differ for one output file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputFileConfig {
    pub export_name: Option<String>,
    pub reducer_path: Option<String>,
    pub hooks: Option<bool>,
    pub filter_endpoints: Option<Patterns>,
    pub endpoint_overrides: Option<Vec<EndpointOverrideFileConfig>>,
}

impl FileConfig {
    /// Load from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml = r#"
schema_file = "petstore.yaml"
output_file = "src/api.ts"
export_name = "petApi"
base_query = "./src/customBaseQuery.ts:anotherNamedBaseQuery"
hooks = true
tag_types = ["Pet"]
filter_endpoints = ["get*", "addPet"]

[[endpoint_overrides]]
pattern = "loginUser"
type = "mutation"

[output_files."src/store.ts"]
filter_endpoints = "*Order*"
export_name = "storeApi"
"#;
        let config = FileConfig::from_toml(toml).unwrap();
        assert_eq!(config.schema_file.as_deref(), Some("petstore.yaml"));
        assert_eq!(config.hooks, Some(true));
        assert_eq!(
            config.filter_endpoints,
            Some(Patterns::Many(vec!["get*".into(), "addPet".into()]))
        );
        assert_eq!(config.endpoint_overrides.len(), 1);
        assert_eq!(config.endpoint_overrides[0].kind, EndpointKind::Mutation);
        assert_eq!(
            config.endpoint_overrides[0].pattern.to_vec(),
            vec!["loginUser".to_string()]
        );

        let store = &config.output_files["src/store.ts"];
        assert_eq!(store.export_name.as_deref(), Some("storeApi"));
        assert_eq!(
            store.filter_endpoints.as_ref().map(Patterns::to_vec),
            Some(vec!["*Order*".to_string()])
        );
    }

    #[test]
    fn parse_empty_config() {
        let config = FileConfig::from_toml("").unwrap();
        assert!(config.schema_file.is_none());
        assert!(config.output_files.is_empty());
        assert!(config.endpoint_overrides.is_empty());
    }

    #[test]
    fn rejects_unknown_endpoint_kind() {
        let toml = r#"
[[endpoint_overrides]]
pattern = "x"
type = "subscription"
"#;
        assert!(FileConfig::from_toml(toml).is_err());
    }
}
