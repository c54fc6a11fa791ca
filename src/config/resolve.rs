use crate::codegen::CreateApiEntryPoint;
use crate::config::provenance::{ProvenanceMap, Source};
use crate::config::schema::{EndpointOverrideFileConfig, FileConfig};
use crate::config::{OutputFileEntry, OverrideEntry, ResolvedConfig};
use crate::errors::{CodegenError, Result};
use crate::resolve::fetch::remote_url;
use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG_FILE: &str = ".rtk-codegen.toml";

/// CLI overrides extracted from command arguments.
#[derive(Debug, Default)]
pub struct CliOverrides {
    /// Explicit project config; replaces the upward search.
    pub config_file: Option<PathBuf>,
    pub schema_file: Option<String>,
    pub output_file: Option<PathBuf>,
    pub export_name: Option<String>,
    pub reducer_path: Option<String>,
    pub base_query: Option<String>,
    pub base_query_fallback: bool,
    pub base_url: Option<String>,
    pub hooks: bool,
    pub tsconfig: Option<PathBuf>,
    pub arg_suffix: Option<String>,
    pub response_suffix: Option<String>,
    pub create_api_import_path: Option<CreateApiEntryPoint>,
    pub endpoint_builder: Option<String>,
    pub tag_types: Vec<String>,
    pub filter_endpoints: Vec<String>,
}

/// Resolve configuration by applying layers bottom-up:
/// 1. Built-in defaults
/// 2. User config (~/.config/rtk-codegen/config.toml)
/// 3. Project config (`--config`, or the nearest .rtk-codegen.toml walking up from working_dir)
/// 4. Environment variables
/// 5. CLI overrides
pub fn resolve_config(working_dir: &Path, cli: &CliOverrides) -> Result<ResolvedConfig> {
    resolve_config_with_env(working_dir, cli, |name| std::env::var(name).ok())
}

/// [`resolve_config`] with an explicit environment lookup.
pub fn resolve_config_with_env(
    working_dir: &Path,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let mut prov = ProvenanceMap::with_defaults();
    let mut loaded_files = Vec::new();

    // 1. Start with built-in defaults
    let mut config = ResolvedConfig::default();

    // 2. User config
    if let Some(user_config_path) = find_user_config() {
        if user_config_path.exists() {
            let file_config = read_file_config(&user_config_path, "user")?;
            apply_file_config(
                &mut config,
                &file_config,
                Source::UserConfig(user_config_path.clone()),
                None,
                &mut prov,
            )?;
            loaded_files.push(user_config_path);
        }
    }

    // 3. Project config
    let project_config_path = match &cli.config_file {
        Some(explicit) => {
            let path = working_dir.join(explicit);
            if !path.is_file() {
                return Err(CodegenError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path)
        }
        None => find_project_config(working_dir),
    };
    if let Some(project_config_path) = project_config_path {
        let file_config = read_file_config(&project_config_path, "project")?;
        let base_dir = project_config_path.parent().map(Path::to_path_buf);
        apply_file_config(
            &mut config,
            &file_config,
            Source::ProjectConfig(project_config_path.clone()),
            base_dir.as_deref(),
            &mut prov,
        )?;
        loaded_files.push(project_config_path);
    }

    // 4. Environment variables
    apply_env_vars(&mut config, &mut prov, env);

    // 5. CLI overrides
    apply_cli_overrides(&mut config, cli, &mut prov);

    tracing::debug!(files = loaded_files.len(), "configuration resolved");
    config.provenance = prov;
    config.loaded_files = loaded_files;

    Ok(config)
}

fn read_file_config(path: &Path, kind: &str) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path).map_err(|_| {
        CodegenError::Config(format!("Could not read {kind} config: {}", path.display()))
    })?;
    FileConfig::from_toml(&content)
        .map_err(|e| CodegenError::Config(format!("Invalid {kind} config: {e}")))
}

fn find_user_config() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rtk-codegen").join("config.toml"))
}

fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Paths in a project config are relative to the file that declares them.
fn relative_to(base_dir: Option<&Path>, value: &str) -> PathBuf {
    match base_dir {
        Some(dir) => dir.join(value),
        None => PathBuf::from(value),
    }
}

fn override_entries(overrides: &[EndpointOverrideFileConfig]) -> Vec<OverrideEntry> {
    overrides
        .iter()
        .map(|o| OverrideEntry {
            patterns: o.pattern.to_vec(),
            kind: o.kind,
        })
        .collect()
}

fn apply_file_config(
    config: &mut ResolvedConfig,
    file: &FileConfig,
    source: Source,
    base_dir: Option<&Path>,
    prov: &mut ProvenanceMap,
) -> Result<()> {
    // Inputs
    if let Some(ref schema_file) = file.schema_file {
        config.schema_file = Some(if remote_url(schema_file).is_some() {
            schema_file.clone()
        } else {
            relative_to(base_dir, schema_file).display().to_string()
        });
        prov.set("schema_file", source.clone());
    }
    if let Some(ref tsconfig) = file.tsconfig {
        config.tsconfig = Some(relative_to(base_dir, tsconfig));
        prov.set("tsconfig", source.clone());
    }

    // Generated module
    if let Some(ref output_file) = file.output_file {
        config.output_file = Some(relative_to(base_dir, output_file));
        prov.set("output_file", source.clone());
    }
    if let Some(ref export_name) = file.export_name {
        config.export_name = export_name.clone();
        prov.set("export_name", source.clone());
    }
    if let Some(ref reducer_path) = file.reducer_path {
        config.reducer_path = Some(reducer_path.clone());
        prov.set("reducer_path", source.clone());
    }
    if let Some(hooks) = file.hooks {
        config.hooks = hooks;
        prov.set("hooks", source.clone());
    }
    if let Some(ref tag_types) = file.tag_types {
        config.tag_types = tag_types.clone();
        prov.set("tag_types", source.clone());
    }
    if let Some(ref arg_suffix) = file.arg_suffix {
        config.arg_suffix = arg_suffix.clone();
        prov.set("arg_suffix", source.clone());
    }
    if let Some(ref response_suffix) = file.response_suffix {
        config.response_suffix = response_suffix.clone();
        prov.set("response_suffix", source.clone());
    }
    if let Some(ref entry_point) = file.create_api_import_path {
        config.create_api_import_path = entry_point
            .parse::<CreateApiEntryPoint>()
            .map_err(CodegenError::Config)?;
        prov.set("create_api_import_path", source.clone());
    }
    if let Some(ref endpoint_builder) = file.endpoint_builder {
        config.endpoint_builder = endpoint_builder.clone();
        prov.set("endpoint_builder", source.clone());
    }

    // Base query. The module reference is resolved later by the module
    // resolver, relative to the working directory, so it is kept verbatim.
    if let Some(ref base_query) = file.base_query {
        config.base_query = Some(base_query.clone());
        prov.set("base_query", source.clone());
    }
    if let Some(fallback) = file.base_query_fallback {
        config.base_query_fallback = fallback;
        prov.set("base_query_fallback", source.clone());
    }
    if let Some(ref base_url) = file.base_url {
        config.base_url = Some(base_url.clone());
        prov.set("base_url", source.clone());
    }

    // Operation selection
    if let Some(ref filter) = file.filter_endpoints {
        config.filter_endpoints = filter.to_vec();
        prov.set("filter_endpoints", source.clone());
    }
    if !file.endpoint_overrides.is_empty() {
        config.endpoint_overrides = override_entries(&file.endpoint_overrides);
        prov.set("endpoint_overrides", source.clone());
    }

    // Output files
    if !file.output_files.is_empty() {
        config.output_files = file
            .output_files
            .iter()
            .map(|(path, entry)| OutputFileEntry {
                output_file: relative_to(base_dir, path),
                export_name: entry.export_name.clone(),
                reducer_path: entry.reducer_path.clone(),
                hooks: entry.hooks,
                filter_endpoints: entry.filter_endpoints.as_ref().map(|f| f.to_vec()),
                endpoint_overrides: entry.endpoint_overrides.as_deref().map(override_entries),
            })
            .collect();
        prov.set("output_files", source);
    }

    Ok(())
}

fn is_truthy(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

fn apply_env_vars(
    config: &mut ResolvedConfig,
    prov: &mut ProvenanceMap,
    env: impl Fn(&str) -> Option<String>,
) {
    if let Some(val) = env("RTK_CODEGEN_EXPORT_NAME") {
        config.export_name = val;
        prov.set("export_name", Source::EnvVar("RTK_CODEGEN_EXPORT_NAME".into()));
    }
    if let Some(val) = env("RTK_CODEGEN_HOOKS") {
        config.hooks = is_truthy(&val);
        prov.set("hooks", Source::EnvVar("RTK_CODEGEN_HOOKS".into()));
    }
    if let Some(val) = env("RTK_CODEGEN_BASE_URL") {
        config.base_url = Some(val);
        prov.set("base_url", Source::EnvVar("RTK_CODEGEN_BASE_URL".into()));
    }
}

fn apply_cli_overrides(config: &mut ResolvedConfig, cli: &CliOverrides, prov: &mut ProvenanceMap) {
    if let Some(ref schema_file) = cli.schema_file {
        config.schema_file = Some(schema_file.clone());
        prov.set("schema_file", Source::CliFlag("<SCHEMA>".into()));
    }
    if let Some(ref output_file) = cli.output_file {
        config.output_file = Some(output_file.clone());
        // An explicit output file replaces the configured output set.
        config.output_files.clear();
        prov.set("output_file", Source::CliFlag("--file".into()));
    }
    if let Some(ref export_name) = cli.export_name {
        config.export_name = export_name.clone();
        prov.set("export_name", Source::CliFlag("--export-name".into()));
    }
    if let Some(ref reducer_path) = cli.reducer_path {
        config.reducer_path = Some(reducer_path.clone());
        prov.set("reducer_path", Source::CliFlag("--reducer-path".into()));
    }
    if let Some(ref base_query) = cli.base_query {
        config.base_query = Some(base_query.clone());
        prov.set("base_query", Source::CliFlag("--base-query".into()));
    }
    if cli.base_query_fallback {
        config.base_query_fallback = true;
        prov.set(
            "base_query_fallback",
            Source::CliFlag("--base-query-fallback".into()),
        );
    }
    if let Some(ref base_url) = cli.base_url {
        config.base_url = Some(base_url.clone());
        prov.set("base_url", Source::CliFlag("--base-url".into()));
    }
    if cli.hooks {
        config.hooks = true;
        prov.set("hooks", Source::CliFlag("--hooks".into()));
    }
    if let Some(ref tsconfig) = cli.tsconfig {
        config.tsconfig = Some(tsconfig.clone());
        prov.set("tsconfig", Source::CliFlag("--tsconfig".into()));
    }
    if let Some(ref arg_suffix) = cli.arg_suffix {
        config.arg_suffix = arg_suffix.clone();
        prov.set("arg_suffix", Source::CliFlag("--arg-suffix".into()));
    }
    if let Some(ref response_suffix) = cli.response_suffix {
        config.response_suffix = response_suffix.clone();
        prov.set("response_suffix", Source::CliFlag("--response-suffix".into()));
    }
    if let Some(entry_point) = cli.create_api_import_path {
        config.create_api_import_path = entry_point;
        prov.set(
            "create_api_import_path",
            Source::CliFlag("--create-api-import-path".into()),
        );
    }
    if let Some(ref endpoint_builder) = cli.endpoint_builder {
        config.endpoint_builder = endpoint_builder.clone();
        prov.set("endpoint_builder", Source::CliFlag("--endpoint-builder".into()));
    }
    if !cli.tag_types.is_empty() {
        config.tag_types = cli.tag_types.clone();
        prov.set("tag_types", Source::CliFlag("--tag-types".into()));
    }
    if !cli.filter_endpoints.is_empty() {
        config.filter_endpoints = cli.filter_endpoints.clone();
        prov.set("filter_endpoints", Source::CliFlag("--filter".into()));
    }
}
