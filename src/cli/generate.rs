use crate::codegen::CreateApiEntryPoint;
use crate::config::resolve::{resolve_config, CliOverrides};
use crate::errors::Result;
use crate::generate::generate;
use crate::output;
use crate::resolve::fetch::HttpFetcher;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// OpenAPI document (path or http(s) URL); may also come from the config file
    pub schema: Option<String>,

    /// Write the generated module here instead of stdout
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Name of the exported API object
    #[arg(long)]
    pub export_name: Option<String>,

    /// `reducerPath` of the generated API
    #[arg(long)]
    pub reducer_path: Option<String>,

    /// Base query module, `<module>` (default export) or `<module>:<exportName>`
    #[arg(long)]
    pub base_query: Option<String>,

    /// Use fetchBaseQuery with a warning when the base query cannot be imported
    #[arg(long)]
    pub base_query_fallback: bool,

    /// `baseUrl` for fetchBaseQuery (defaults to the document's first server)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Also export React hooks
    #[arg(long)]
    pub hooks: bool,

    /// tsconfig whose `paths` aliases are honored when resolving the base query
    #[arg(short = 'c', long)]
    pub tsconfig: Option<PathBuf>,

    /// Project config file (defaults to the nearest .rtk-codegen.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Suffix of generated argument types
    #[arg(long)]
    pub arg_suffix: Option<String>,

    /// Suffix of generated response types
    #[arg(long)]
    pub response_suffix: Option<String>,

    /// Entry point providing createApi
    #[arg(long, value_parser = parse_entry_point)]
    pub create_api_import_path: Option<CreateApiEntryPoint>,

    /// Parameter name of the `endpoints` builder
    #[arg(long)]
    pub endpoint_builder: Option<String>,

    /// `tagTypes` entries
    #[arg(long = "tag-types", value_delimiter = ',')]
    pub tag_types: Vec<String>,

    /// Only generate operations whose name matches one of these globs
    #[arg(long = "filter", value_delimiter = ',')]
    pub filter: Vec<String>,

    /// Working directory (defaults to current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

fn parse_entry_point(s: &str) -> std::result::Result<CreateApiEntryPoint, String> {
    s.parse()
}

impl GenerateArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config_file: self.config.clone(),
            schema_file: self.schema.clone(),
            output_file: self.file.clone(),
            export_name: self.export_name.clone(),
            reducer_path: self.reducer_path.clone(),
            base_query: self.base_query.clone(),
            base_query_fallback: self.base_query_fallback,
            base_url: self.base_url.clone(),
            hooks: self.hooks,
            tsconfig: self.tsconfig.clone(),
            arg_suffix: self.arg_suffix.clone(),
            response_suffix: self.response_suffix.clone(),
            create_api_import_path: self.create_api_import_path,
            endpoint_builder: self.endpoint_builder.clone(),
            tag_types: self.tag_types.clone(),
            filter_endpoints: self.filter.clone(),
        }
    }
}

pub async fn run(args: &GenerateArgs) -> Result<()> {
    let working_dir = super::resolve_working_dir(&args.path)?;
    let config = resolve_config(&working_dir, &args.overrides())?;

    let fetcher = HttpFetcher::new();
    let files = generate(&config, &working_dir, &fetcher).await?;
    for file in &files {
        output::emit(&file.module, file.output_file.as_deref(), &working_dir)?;
    }
    Ok(())
}
