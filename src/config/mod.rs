pub mod provenance;
pub mod resolve;
pub mod schema;
pub mod show;
pub mod tsconfig;

use crate::codegen::CreateApiEntryPoint;
use crate::errors::Result;
use crate::openapi::operations::{EndpointOverride, OperationSelection};
use crate::openapi::EndpointKind;
use provenance::ProvenanceMap;
use std::path::PathBuf;

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    // Inputs
    pub schema_file: Option<String>,
    pub tsconfig: Option<PathBuf>,

    // Generated module
    pub output_file: Option<PathBuf>,
    pub export_name: String,
    pub reducer_path: Option<String>,
    pub hooks: bool,
    pub tag_types: Vec<String>,
    pub arg_suffix: String,
    pub response_suffix: String,
    pub create_api_import_path: CreateApiEntryPoint,
    pub endpoint_builder: String,

    // Base query
    pub base_query: Option<String>,
    pub base_query_fallback: bool,
    pub base_url: Option<String>,

    // Operation selection
    pub filter_endpoints: Vec<String>,
    pub endpoint_overrides: Vec<OverrideEntry>,

    // Per-output-file runs
    pub output_files: Vec<OutputFileEntry>,

    // Provenance
    pub provenance: ProvenanceMap,
    pub loaded_files: Vec<PathBuf>,
}

/// Operations whose name matches one of `patterns` are generated as `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEntry {
    pub patterns: Vec<String>,
    pub kind: EndpointKind,
}

/// An `[output_files."<path>"]` table; unset fields inherit the top level.
#[derive(Debug, Clone, Default)]
pub struct OutputFileEntry {
    pub output_file: PathBuf,
    pub export_name: Option<String>,
    pub reducer_path: Option<String>,
    pub hooks: Option<bool>,
    pub filter_endpoints: Option<Vec<String>>,
    pub endpoint_overrides: Option<Vec<OverrideEntry>>,
}

/// The settings of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// `None` writes to stdout.
    pub output_file: Option<PathBuf>,
    pub export_name: String,
    pub reducer_path: Option<String>,
    pub hooks: bool,
    pub filter_endpoints: Vec<String>,
    pub endpoint_overrides: Vec<OverrideEntry>,
}

impl OutputTarget {
    /// Compile the filter and override globs.
    pub fn selection(&self) -> Result<OperationSelection> {
        let overrides = self
            .endpoint_overrides
            .iter()
            .map(|o| EndpointOverride::new(&o.patterns, o.kind))
            .collect::<Result<Vec<_>>>()?;
        OperationSelection::new(&self.filter_endpoints, overrides)
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_file: None,
            tsconfig: None,
            output_file: None,
            export_name: "api".to_string(),
            reducer_path: None,
            hooks: false,
            tag_types: Vec::new(),
            arg_suffix: "ApiArg".to_string(),
            response_suffix: "ApiResponse".to_string(),
            create_api_import_path: CreateApiEntryPoint::Base,
            endpoint_builder: "build".to_string(),
            base_query: None,
            base_query_fallback: false,
            base_url: None,
            filter_endpoints: Vec::new(),
            endpoint_overrides: Vec::new(),
            output_files: Vec::new(),
            provenance: ProvenanceMap::new(),
            loaded_files: Vec::new(),
        }
    }
}

impl ResolvedConfig {
    /// One target per `[output_files]` entry, or a single target built from
    /// the top-level settings when there are none.
    pub fn targets(&self) -> Vec<OutputTarget> {
        if self.output_files.is_empty() {
            return vec![OutputTarget {
                output_file: self.output_file.clone(),
                export_name: self.export_name.clone(),
                reducer_path: self.reducer_path.clone(),
                hooks: self.hooks,
                filter_endpoints: self.filter_endpoints.clone(),
                endpoint_overrides: self.endpoint_overrides.clone(),
            }];
        }

        self.output_files
            .iter()
            .map(|entry| OutputTarget {
                output_file: Some(entry.output_file.clone()),
                export_name: entry
                    .export_name
                    .clone()
                    .unwrap_or_else(|| self.export_name.clone()),
                reducer_path: entry
                    .reducer_path
                    .clone()
                    .or_else(|| self.reducer_path.clone()),
                hooks: entry.hooks.unwrap_or(self.hooks),
                filter_endpoints: entry
                    .filter_endpoints
                    .clone()
                    .unwrap_or_else(|| self.filter_endpoints.clone()),
                endpoint_overrides: entry
                    .endpoint_overrides
                    .clone()
                    .unwrap_or_else(|| self.endpoint_overrides.clone()),
            })
            .collect()
    }
}
