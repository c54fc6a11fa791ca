use crate::errors::Result;
use url::Url;

/// Body and status of a remote GET.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub text: String,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves remote text. A non-2xx answer is a response, not an error;
/// only transport failures are errors.
#[allow(async_fn_in_trait)]
pub trait RemoteFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse>;
}

/// Parse `reference` as an absolute http(s) URL.
pub fn remote_url(reference: &str) -> Option<Url> {
    let url = Url::parse(reference).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        tracing::debug!(%url, status, bytes = text.len(), "fetched");
        Ok(FetchResponse { status, text })
    }
}
