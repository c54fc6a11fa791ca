use crate::errors::Result;
use globset::GlobBuilder;
use std::path::{Component, Path, PathBuf};

/// Extensions probed, in order, when a module reference has none.
pub const MODULE_EXTENSIONS: &[&str] = &["ts", "js"];

/// `compilerOptions.baseUrl` + `compilerOptions.paths` of a tsconfig.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerPathMap {
    /// Directory the `paths` targets are relative to. A relative base is
    /// taken relative to the resolver's working directory.
    pub base_url: PathBuf,
    /// Alias pattern -> substitution targets, in declaration order.
    pub paths: Vec<(String, Vec<String>)>,
}

impl CompilerPathMap {
    pub fn new(base_url: impl Into<PathBuf>, paths: Vec<(String, Vec<String>)>) -> Self {
        Self {
            base_url: base_url.into(),
            paths,
        }
    }

    /// Expand `reference` through the first alias pattern it matches.
    ///
    /// Returns the substituted candidate paths (before extension probing) in
    /// target order, or an empty list when no pattern matches.
    pub fn expand(&self, reference: &str, root: &Path) -> Result<Vec<PathBuf>> {
        let base = base_with_separator(&root.join(&self.base_url));

        for (pattern, targets) in &self.paths {
            let matcher = GlobBuilder::new(pattern)
                .literal_separator(false)
                .build()?
                .compile_matcher();
            if !matcher.is_match(reference) {
                continue;
            }

            let captured = wildcard_capture(pattern, reference);
            tracing::debug!(%pattern, reference, captured, "path alias matched");
            return Ok(targets
                .iter()
                .map(|target| {
                    let substituted = target.replacen('*', captured, 1);
                    if Path::new(&substituted).is_absolute() {
                        normalize(Path::new(&substituted))
                    } else {
                        normalize(Path::new(&format!("{base}{substituted}")))
                    }
                })
                .collect());
        }

        Ok(Vec::new())
    }
}

/// The part of `reference` matched by the pattern's `*`.
fn wildcard_capture<'a>(pattern: &str, reference: &'a str) -> &'a str {
    let Some((prefix, suffix)) = pattern.split_once('*') else {
        return "";
    };
    reference
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(suffix))
        .unwrap_or(reference)
}

fn base_with_separator(base: &Path) -> String {
    let mut base = base.to_string_lossy().replace('\\', "/");
    if !base.ends_with('/') {
        base.push('/');
    }
    base
}

/// Find the file a module path names: as-is when it carries a known
/// extension, otherwise with each known extension appended.
pub fn probe_file(path: &Path) -> Option<PathBuf> {
    if has_module_extension(path) {
        return path.is_file().then(|| path.to_path_buf());
    }
    MODULE_EXTENSIONS.iter().find_map(|ext| {
        let mut candidate = path.as_os_str().to_owned();
        candidate.push(".");
        candidate.push(ext);
        let candidate = PathBuf::from(candidate);
        tracing::trace!(candidate = %candidate.display(), "probing");
        candidate.is_file().then_some(candidate)
    })
}

pub fn has_module_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| MODULE_EXTENSIONS.contains(&e))
}

/// Lexically resolve `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> CompilerPathMap {
        CompilerPathMap::new(
            "src",
            vec![
                ("@/*".to_string(), vec!["./*".to_string()]),
                (
                    "~lib/*".to_string(),
                    vec!["vendor/*".to_string(), "lib/*".to_string()],
                ),
                ("config".to_string(), vec!["settings/index".to_string()]),
            ],
        )
    }

    #[test]
    fn expands_first_matching_pattern() {
        let root = Path::new("/project");
        assert_eq!(
            map().expand("@/customBaseQuery", root).unwrap(),
            vec![PathBuf::from("/project/src/customBaseQuery")]
        );
        assert_eq!(
            map().expand("~lib/http/client", root).unwrap(),
            vec![
                PathBuf::from("/project/src/vendor/http/client"),
                PathBuf::from("/project/src/lib/http/client"),
            ]
        );
        assert_eq!(
            map().expand("config", root).unwrap(),
            vec![PathBuf::from("/project/src/settings/index")]
        );
    }

    #[test]
    fn pattern_is_anchored() {
        let root = Path::new("/project");
        assert!(map().expand("x@/customBaseQuery", root).unwrap().is_empty());
        assert!(map().expand("configuration", root).unwrap().is_empty());
        assert!(map().expand("./customBaseQuery", root).unwrap().is_empty());
    }

    #[test]
    fn base_url_with_or_without_trailing_separator() {
        let root = Path::new("/project");
        let with = CompilerPathMap::new("src/", map().paths);
        assert_eq!(
            with.expand("@/a", root).unwrap(),
            map().expand("@/a", root).unwrap()
        );
    }

    #[test]
    fn probes_extensions_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("both.ts"), "").unwrap();
        std::fs::write(tmp.path().join("both.js"), "").unwrap();
        std::fs::write(tmp.path().join("only.js"), "").unwrap();

        assert_eq!(probe_file(&tmp.path().join("both")), Some(tmp.path().join("both.ts")));
        assert_eq!(probe_file(&tmp.path().join("only")), Some(tmp.path().join("only.js")));
        assert_eq!(
            probe_file(&tmp.path().join("only.js")),
            Some(tmp.path().join("only.js"))
        );
        assert_eq!(probe_file(&tmp.path().join("only.ts")), None);
        assert_eq!(probe_file(&tmp.path().join("missing")), None);
    }

    #[test]
    fn normalizes_dot_segments() {
        assert_eq!(normalize(Path::new("src/./a/../b.ts")), PathBuf::from("src/b.ts"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
    }
}
