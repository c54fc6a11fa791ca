use crate::config::ResolvedConfig;
use std::io::Write;

/// Render `config show` output.
pub fn render_show<W: Write>(w: &mut W, config: &ResolvedConfig) -> std::io::Result<()> {
    if config.loaded_files.is_empty() {
        writeln!(w, "Loaded config files: (none)")?;
    } else {
        writeln!(w, "Loaded config files:")?;
        for (i, path) in config.loaded_files.iter().enumerate() {
            writeln!(w, "  {}. {}", i + 1, path.display())?;
        }
    }
    writeln!(w)?;

    writeln!(w, "Resolved settings:")?;
    for (key, source) in config.provenance.sorted_entries() {
        let value = value_for_key(config, key);
        writeln!(w, "  {key}: {value} <- {source}")?;
    }

    if !config.output_files.is_empty() {
        writeln!(w)?;
        writeln!(w, "Output files:")?;
        for target in config.targets() {
            let path = target
                .output_file
                .as_ref()
                .map_or_else(|| "(stdout)".to_string(), |p| p.display().to_string());
            writeln!(
                w,
                "  {path}: export_name={} hooks={} filter_endpoints={:?}",
                target.export_name, target.hooks, target.filter_endpoints
            )?;
        }
    }

    Ok(())
}

fn optional<T: ToString>(value: Option<T>, unset: &str) -> String {
    value.map_or_else(|| unset.to_string(), |v| v.to_string())
}

fn value_for_key(config: &ResolvedConfig, key: &str) -> String {
    match key {
        "schema_file" => optional(config.schema_file.as_deref(), "(unset)"),
        "output_file" => optional(
            config.output_file.as_ref().map(|p| p.display()),
            "(stdout)",
        ),
        "export_name" => config.export_name.clone(),
        "reducer_path" => optional(config.reducer_path.as_deref(), "(none)"),
        "hooks" => config.hooks.to_string(),
        "tag_types" => format!("{:?}", config.tag_types),
        "arg_suffix" => config.arg_suffix.clone(),
        "response_suffix" => config.response_suffix.clone(),
        "create_api_import_path" => config.create_api_import_path.as_str().to_string(),
        "endpoint_builder" => config.endpoint_builder.clone(),
        "base_query" => optional(config.base_query.as_deref(), "(fetchBaseQuery)"),
        "base_query_fallback" => config.base_query_fallback.to_string(),
        "base_url" => optional(config.base_url.as_deref(), "(from servers)"),
        "tsconfig" => optional(
            config.tsconfig.as_ref().map(|p| p.display()),
            "(tsconfig.json if present)",
        ),
        "filter_endpoints" => format!("{:?}", config.filter_endpoints),
        "endpoint_overrides" => config
            .endpoint_overrides
            .iter()
            .map(|o| format!("{:?} -> {}", o.patterns, o.kind.as_str()))
            .collect::<Vec<_>>()
            .join(", "),
        "output_files" => config.output_files.len().to_string(),
        _ => "(unknown)".to_string(),
    }
}
