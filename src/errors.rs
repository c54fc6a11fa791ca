use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CodegenError {
    #[error("Module not found: {module}")]
    #[diagnostic(
        code(rtk_codegen::file_not_found),
        help("check the path, or the `paths` mapping of your tsconfig")
    )]
    FileNotFound { module: String },

    #[error("Could not fetch {url}: HTTP {status}")]
    #[diagnostic(code(rtk_codegen::url_not_found))]
    UrlNotFound { url: String, status: u16 },

    #[error("{module} has no default export")]
    #[diagnostic(
        code(rtk_codegen::default_export_missing),
        help("export the base query as default, or pass `<module>:<exportName>`")
    )]
    DefaultExportMissing { module: String },

    #[error("{module} does not export `{name}`")]
    #[diagnostic(code(rtk_codegen::named_export_missing))]
    NamedExportMissing { module: String, name: String },

    #[error("OpenAPI document {location} has no `paths` object")]
    #[diagnostic(code(rtk_codegen::missing_paths))]
    MissingPaths { location: String },

    #[error("Invalid OpenAPI document {location}: {message}")]
    #[diagnostic(code(rtk_codegen::invalid_schema))]
    InvalidSchema { location: String, message: String },

    #[error("Operation name `{name}` is generated for both {first} and {second}")]
    #[diagnostic(
        code(rtk_codegen::duplicate_operation_name),
        help("give one of the operations a distinct operationId")
    )]
    DuplicateOperationName {
        name: String,
        first: String,
        second: String,
    },

    #[error("tsconfig not found: {path}")]
    #[diagnostic(code(rtk_codegen::tsconfig_not_found))]
    TsconfigNotFound { path: PathBuf },

    #[error("Invalid tsconfig {path}: {message}")]
    #[diagnostic(code(rtk_codegen::invalid_tsconfig))]
    InvalidTsconfig { path: PathBuf, message: String },

    #[error("Parse error in {file}: {message}")]
    #[diagnostic(code(rtk_codegen::parse_error))]
    ParseError { file: String, message: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(rtk_codegen::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(rtk_codegen::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(rtk_codegen::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(rtk_codegen::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    #[diagnostic(code(rtk_codegen::toml))]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    #[diagnostic(code(rtk_codegen::glob))]
    Glob(#[from] globset::Error),

    #[error(transparent)]
    #[diagnostic(code(rtk_codegen::http))]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CodegenError>;
