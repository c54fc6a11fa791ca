//! Reads `compilerOptions.baseUrl` and `compilerOptions.paths` from a tsconfig.

use crate::errors::{CodegenError, Result};
use crate::resolve::alias::normalize;
use crate::resolve::CompilerPathMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const DEFAULT_TSCONFIG: &str = "tsconfig.json";

const MAX_EXTENDS_DEPTH: usize = 16;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsconfigFile {
    extends: Option<String>,
    #[serde(default)]
    compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    base_url: Option<String>,
    paths: Option<Map<String, Value>>,
}

/// Effective options after following `extends`; paths are already absolute.
#[derive(Debug, Default)]
struct Layer {
    base_url: Option<PathBuf>,
    /// Alias table and the directory of the file that declared it.
    paths: Option<(Vec<(String, Vec<String>)>, PathBuf)>,
}

/// Load the path map for a run: `explicit` must exist; otherwise
/// `tsconfig.json` in `working_dir` is used when present.
pub fn find_path_map(working_dir: &Path, explicit: Option<&Path>) -> Result<Option<CompilerPathMap>> {
    match explicit {
        Some(path) => load_path_map(&working_dir.join(path)).map(Some),
        None => {
            let candidate = working_dir.join(DEFAULT_TSCONFIG);
            if candidate.is_file() {
                load_path_map(&candidate).map(Some)
            } else {
                Ok(None)
            }
        }
    }
}

/// Read `path`, following relative `extends`.
pub fn load_path_map(path: &Path) -> Result<CompilerPathMap> {
    if !path.is_file() {
        return Err(CodegenError::TsconfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let layer = read_layer(path, 0)?;
    let dir = parent_dir(path);

    let (paths, declared_in) = match layer.paths {
        Some((paths, declared_in)) => (paths, Some(declared_in)),
        None => (Vec::new(), None),
    };
    // `paths` without `baseUrl` resolve against the declaring tsconfig
    let base_url = layer.base_url.or(declared_in).unwrap_or(dir);

    tracing::debug!(
        tsconfig = %path.display(),
        base_url = %base_url.display(),
        aliases = paths.len(),
        "loaded tsconfig"
    );
    Ok(CompilerPathMap::new(base_url, paths))
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn read_layer(path: &Path, depth: usize) -> Result<Layer> {
    if depth > MAX_EXTENDS_DEPTH {
        return Err(CodegenError::InvalidTsconfig {
            path: path.to_path_buf(),
            message: "`extends` chain is too deep or cyclic".to_string(),
        });
    }

    let text = std::fs::read_to_string(path)?;
    let file: TsconfigFile =
        serde_json::from_str(&strip_jsonc(&text)).map_err(|e| CodegenError::InvalidTsconfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let dir = parent_dir(path);

    let mut layer = match file.extends.as_deref() {
        Some(parent) if parent.starts_with('.') || Path::new(parent).is_absolute() => {
            let mut parent_path = dir.join(parent);
            if parent_path.extension().is_none() {
                parent_path.set_extension("json");
            }
            if !parent_path.is_file() {
                return Err(CodegenError::TsconfigNotFound { path: parent_path });
            }
            read_layer(&normalize(&parent_path), depth + 1)?
        }
        Some(package) => {
            tracing::debug!(package, "ignoring package `extends`");
            Layer::default()
        }
        None => Layer::default(),
    };

    if let Some(base_url) = file.compiler_options.base_url {
        layer.base_url = Some(normalize(&dir.join(base_url)));
    }
    if let Some(paths) = file.compiler_options.paths {
        let table = paths
            .into_iter()
            .map(|(pattern, targets)| {
                let targets = match targets {
                    Value::Array(items) => items
                        .into_iter()
                        .filter_map(|t| t.as_str().map(str::to_string))
                        .collect(),
                    Value::String(single) => vec![single],
                    _ => Vec::new(),
                };
                (pattern, targets)
            })
            .collect();
        layer.paths = Some((table, dir));
    }
    Ok(layer)
}

/// Drop `//` and `/* */` comments, then trailing commas, outside string literals.
fn strip_jsonc(text: &str) -> String {
    drop_trailing_commas(&strip_comments(text))
}

/// Copy the string literal starting at `chars[i]` into `out`; returns the index after it.
fn copy_string(chars: &[char], mut i: usize, out: &mut String) -> usize {
    out.push(chars[i]);
    i += 1;
    while i < chars.len() {
        out.push(chars[i]);
        if chars[i] == '\\' && i + 1 < chars.len() {
            out.push(chars[i + 1]);
            i += 2;
            continue;
        }
        i += 1;
        if chars[i - 1] == '"' {
            break;
        }
    }
    i
}

fn strip_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => i = copy_string(&chars, i, &mut out),
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn drop_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => i = copy_string(&chars, i, &mut out),
            ',' => {
                let next = chars[i + 1..].iter().copied().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(',');
                }
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}
