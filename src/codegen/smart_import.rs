//! Builds the single validated import of the user's base query.

use crate::codegen::ast::ImportDecl;
use crate::codegen::builder::import_declaration;
use crate::errors::{CodegenError, Result};
use crate::openapi::naming;
use crate::parse::exports::exports_name;
use crate::parse::SourceUnit;
use crate::resolve::alias::{has_module_extension, normalize};
use crate::resolve::fetch::RemoteFetcher;
use crate::resolve::{ModuleLocation, ModuleResolver};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_EXPORT: &str = "default";

/// Local name bound to a default-exported base query.
pub const DEFAULT_BASE_QUERY_ALIAS: &str = "customBaseQuery";

/// What to import and from where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    /// Export name, or `"default"`.
    pub import_target: String,
    /// Local binding in the generated module.
    pub import_alias: String,
    /// Raw path, path alias, or URL as the user wrote it.
    pub module_reference: String,
}

impl ImportTarget {
    /// Parse `<module>[:<export>]`.
    ///
    /// The split happens on the last `:` only when what follows is an
    /// identifier or `default`, so `https://host/bq.ts` and `C:\bq.ts` stay
    /// whole. A named export is bound under its own name; the default export
    /// under [`DEFAULT_BASE_QUERY_ALIAS`].
    pub fn from_argument(argument: &str) -> Self {
        let split = argument.rsplit_once(':').filter(|(module, name)| {
            !module.is_empty() && (*name == DEFAULT_EXPORT || naming::is_identifier(name))
        });

        match split {
            Some((module, DEFAULT_EXPORT)) => Self {
                import_target: DEFAULT_EXPORT.to_string(),
                import_alias: DEFAULT_BASE_QUERY_ALIAS.to_string(),
                module_reference: module.to_string(),
            },
            Some((module, name)) => Self {
                import_target: name.to_string(),
                import_alias: name.to_string(),
                module_reference: module.to_string(),
            },
            None => Self {
                import_target: DEFAULT_EXPORT.to_string(),
                import_alias: DEFAULT_BASE_QUERY_ALIAS.to_string(),
                module_reference: argument.to_string(),
            },
        }
    }

    fn missing_export(&self) -> CodegenError {
        if self.import_target == DEFAULT_EXPORT {
            CodegenError::DefaultExportMissing {
                module: self.module_reference.clone(),
            }
        } else {
            CodegenError::NamedExportMissing {
                module: self.module_reference.clone(),
                name: self.import_target.clone(),
            }
        }
    }
}

/// The import declaration and the identifier it binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    pub declaration: ImportDecl,
    pub alias: String,
}

/// Resolve `target`, verify the export exists, and build the import.
///
/// `containing_file` is the file the import is written into; local module
/// specifiers are made relative to its directory.
pub async fn build_import<F: RemoteFetcher>(
    target: &ImportTarget,
    containing_file: Option<&Path>,
    resolver: &ModuleResolver<'_, F>,
) -> Result<ResolvedImport> {
    let location = resolver.locate(&target.module_reference).await?;

    let (unit, specifier) = match location {
        ModuleLocation::LocalFile(file) => {
            let specifier = match containing_file {
                Some(containing) => {
                    let from = normalize(&resolver.root().join(containing));
                    let from_dir = from.parent().unwrap_or(Path::new(""));
                    relative_specifier(from_dir, &file)
                }
                None => relative_specifier(&normalize(resolver.root()), &file),
            };
            (SourceUnit::from_file(&file)?, specifier)
        }
        ModuleLocation::AliasResolvedFile(file) => (
            SourceUnit::from_file(&file)?,
            strip_module_extension(&target.module_reference),
        ),
        ModuleLocation::RemoteDocument { url, text } => {
            (
                SourceUnit::parse(url.path(), text)?,
                target.module_reference.clone(),
            )
        }
        ModuleLocation::UrlNotFound { url, status } => {
            return Err(CodegenError::UrlNotFound {
                url: url.to_string(),
                status,
            })
        }
        ModuleLocation::NotFound => {
            return Err(CodegenError::FileNotFound {
                module: target.module_reference.clone(),
            })
        }
    };

    if !exports_name(&unit, &target.import_target) {
        return Err(target.missing_export());
    }

    tracing::info!(
        module = %target.module_reference,
        export = %target.import_target,
        %specifier,
        "base query import resolved"
    );
    Ok(ResolvedImport {
        declaration: import_declaration(
            &specifier,
            [(target.import_target.as_str(), target.import_alias.as_str())],
        ),
        alias: target.import_alias.clone(),
    })
}

/// Drop a trailing `.ts`/`.js`.
fn strip_module_extension(reference: &str) -> String {
    let path = Path::new(reference);
    if has_module_extension(path) {
        if let Some((stem, _)) = reference.rsplit_once('.') {
            return stem.to_string();
        }
    }
    reference.to_string()
}

/// `./x`, `../lib/x`: `target` relative to `from_dir`, extension dropped.
fn relative_specifier(from_dir: &Path, target: &Path) -> String {
    let from: Vec<Component> = from_dir.components().collect();
    let to: Vec<Component> = target.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &to[common..] {
        relative.push(component.as_os_str());
    }

    let text = strip_module_extension(&relative.to_string_lossy().replace('\\', "/"));
    if text.starts_with("../") {
        text
    } else {
        format!("./{text}")
    }
}
