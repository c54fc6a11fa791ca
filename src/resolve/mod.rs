pub mod alias;
pub mod fetch;

pub use alias::CompilerPathMap;

use crate::errors::Result;
use alias::{normalize, probe_file};
use fetch::{remote_url, RemoteFetcher};
use std::path::{Path, PathBuf};
use url::Url;

/// Where a module reference was found, and by which strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleLocation {
    /// The reference itself names a file on disk.
    LocalFile(PathBuf),
    /// The reference matched a tsconfig path alias; the expanded file.
    AliasResolvedFile(PathBuf),
    /// The reference is a URL that answered with a success status.
    RemoteDocument { url: Url, text: String },
    /// The reference is a URL that answered with a non-success status.
    UrlNotFound { url: Url, status: u16 },
    NotFound,
}

/// Locates module references relative to a working directory.
pub struct ModuleResolver<'a, F> {
    root: PathBuf,
    paths: Option<&'a CompilerPathMap>,
    fetcher: &'a F,
}

impl<'a, F: RemoteFetcher> ModuleResolver<'a, F> {
    pub fn new(root: impl Into<PathBuf>, paths: Option<&'a CompilerPathMap>, fetcher: &'a F) -> Self {
        Self {
            root: root.into(),
            paths,
            fetcher,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `reference`, trying in order: a local file, a path alias
    /// (only when a path map was supplied), then a remote URL.
    ///
    /// Transport failures while fetching are returned as errors; a non-success
    /// status is reported as [`ModuleLocation::UrlNotFound`].
    pub async fn locate(&self, reference: &str) -> Result<ModuleLocation> {
        if let Some(file) = probe_file(&normalize(&self.root.join(reference))) {
            tracing::debug!(reference, file = %file.display(), "resolved local module");
            return Ok(ModuleLocation::LocalFile(file));
        }

        let Some(paths) = self.paths else {
            tracing::debug!(reference, "no path map supplied, module not found");
            return Ok(ModuleLocation::NotFound);
        };

        let candidates = paths.expand(reference, &self.root)?;
        if let Some(file) = candidates.iter().find_map(|c| probe_file(c)) {
            tracing::debug!(reference, file = %file.display(), "resolved aliased module");
            return Ok(ModuleLocation::AliasResolvedFile(file));
        }

        if let Some(url) = remote_url(reference) {
            let response = self.fetcher.fetch(&url).await?;
            if !response.is_ok() {
                tracing::debug!(%url, status = response.status, "remote module unavailable");
                return Ok(ModuleLocation::UrlNotFound {
                    url,
                    status: response.status,
                });
            }
            tracing::debug!(%url, "resolved remote module");
            return Ok(ModuleLocation::RemoteDocument {
                url,
                text: response.text,
            });
        }

        Ok(ModuleLocation::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::fetch::test_support::StaticFetcher;

    fn alias_map() -> CompilerPathMap {
        CompilerPathMap::new("src", vec![("@/*".to_string(), vec!["./*".to_string()])])
    }

    #[tokio::test]
    async fn local_file_resolution_is_stable() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("customBaseQuery.ts"), "export default 1;").unwrap();
        let fetcher = StaticFetcher::default();
        let resolver = ModuleResolver::new(tmp.path(), None, &fetcher);

        let first = resolver.locate("customBaseQuery.ts").await.unwrap();
        let second = resolver.locate("customBaseQuery.ts").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            ModuleLocation::LocalFile(tmp.path().join("customBaseQuery.ts"))
        );
        assert_eq!(
            resolver.locate("./customBaseQuery").await.unwrap(),
            ModuleLocation::LocalFile(tmp.path().join("customBaseQuery.ts"))
        );
    }

    #[tokio::test]
    async fn alias_resolution() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("src")).unwrap();
        std::fs::write(tmp.path().join("src/customBaseQuery.ts"), "").unwrap();
        let fetcher = StaticFetcher::default();
        let map = alias_map();
        let resolver = ModuleResolver::new(tmp.path(), Some(&map), &fetcher);

        let expected = ModuleLocation::AliasResolvedFile(tmp.path().join("src/customBaseQuery.ts"));
        assert_eq!(resolver.locate("@/customBaseQuery").await.unwrap(), expected);
        assert_eq!(resolver.locate("@/customBaseQuery.ts").await.unwrap(), expected);
        assert_eq!(
            resolver.locate("@/hoge/fuga/nonExistantFile").await.unwrap(),
            ModuleLocation::NotFound
        );
    }

    #[tokio::test]
    async fn without_path_map_only_local_files_resolve() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher =
            StaticFetcher::default().with("https://example.com/bq.ts", "export default 1;");
        let resolver = ModuleResolver::new(tmp.path(), None, &fetcher);
        assert_eq!(
            resolver.locate("https://example.com/bq.ts").await.unwrap(),
            ModuleLocation::NotFound
        );
    }

    #[tokio::test]
    async fn remote_documents() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher =
            StaticFetcher::default().with("https://example.com/bq.ts", "export default 1;");
        let map = CompilerPathMap::default();
        let resolver = ModuleResolver::new(tmp.path(), Some(&map), &fetcher);

        match resolver.locate("https://example.com/bq.ts").await.unwrap() {
            ModuleLocation::RemoteDocument { url, text } => {
                assert_eq!(url.as_str(), "https://example.com/bq.ts");
                assert_eq!(text, "export default 1;");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            resolver.locate("https://example.com/missing.ts").await.unwrap(),
            ModuleLocation::UrlNotFound { status: 404, .. }
        ));
    }

    #[tokio::test]
    async fn unknown_reference_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = StaticFetcher::default();
        let map = alias_map();
        let resolver = ModuleResolver::new(tmp.path(), Some(&map), &fetcher);
        assert_eq!(
            resolver.locate("nonExistantFile.ts").await.unwrap(),
            ModuleLocation::NotFound
        );
    }
}
