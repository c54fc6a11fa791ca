use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Default,
    UserConfig(PathBuf),
    ProjectConfig(PathBuf),
    EnvVar(String),
    CliFlag(String),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Default => write!(f, "default"),
            Source::UserConfig(path) => write!(f, "user config ({})", path.display()),
            Source::ProjectConfig(path) => write!(f, "project config ({})", path.display()),
            Source::EnvVar(name) => write!(f, "env var ({})", name),
            Source::CliFlag(name) => write!(f, "CLI flag ({})", name),
        }
    }
}

/// Every setting `config show` reports, by key.
pub const SETTING_KEYS: &[&str] = &[
    "schema_file",
    "output_file",
    "export_name",
    "reducer_path",
    "hooks",
    "tag_types",
    "arg_suffix",
    "response_suffix",
    "create_api_import_path",
    "endpoint_builder",
    "base_query",
    "base_query_fallback",
    "base_url",
    "tsconfig",
    "filter_endpoints",
    "endpoint_overrides",
];

/// Tracks the source of each setting by key.
#[derive(Debug, Clone, Default)]
pub struct ProvenanceMap {
    entries: BTreeMap<String, Source>,
}

impl ProvenanceMap {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Every key in [`SETTING_KEYS`] attributed to the built-in defaults.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        for key in SETTING_KEYS {
            map.set(*key, Source::Default);
        }
        map
    }

    pub fn set(&mut self, key: impl Into<String>, source: Source) {
        self.entries.insert(key.into(), source);
    }

    pub fn get(&self, key: &str) -> Option<&Source> {
        self.entries.get(key)
    }

    /// Return all entries sorted by key.
    pub fn sorted_entries(&self) -> Vec<(&str, &Source)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }
}
