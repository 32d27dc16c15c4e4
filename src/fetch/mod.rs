//! Page fetching with proxy fallback.
//!
//! Public wiki pages are often blocked for direct programmatic access, so
//! [`FallbackFetcher`] tries each [`FetchRoute`] in order and returns the
//! body of the first successful response.
//!
//! # Architecture
//!
//! - [`PageFetcher`] - Async capability trait: URL in, page text out
//! - [`FallbackFetcher`] - Direct request, then text proxy, then pass-through proxy
//! - [`FetchRoute`] - One retrieval route and its request URL
//! - [`FetchSettings`] - Timeouts and proxy base URLs
//!
//! # Example
//!
//! ```no_run
//! use flashdeck_core::fetch::{FallbackFetcher, FetchSettings, PageFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = FallbackFetcher::new(FetchSettings::default())?;
//! if let Some(text) = fetcher.fetch("https://example.notion.site/page").await {
//!     println!("{} bytes", text.len());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod http_client;
mod route;

pub use error::FetchError;
pub use route::FetchRoute;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

/// Default text-extraction proxy base URL.
pub const DEFAULT_TEXT_PROXY_BASE: &str = "https://r.jina.ai";

/// Default raw pass-through proxy base URL.
pub const DEFAULT_PASSTHROUGH_PROXY_BASE: &str = "https://api.allorigins.win";

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default whole-request timeout in seconds.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Capability to retrieve the text of a page.
///
/// Implementations swallow failures: `None` means no route produced the page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the page text, or `None` if it could not be retrieved.
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// Timeouts and proxy endpoints used by [`FallbackFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub read_timeout_secs: u64,
    /// Base URL of the text-extraction proxy.
    pub text_proxy_base: String,
    /// Base URL of the raw pass-through proxy.
    pub passthrough_proxy_base: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            text_proxy_base: DEFAULT_TEXT_PROXY_BASE.to_string(),
            passthrough_proxy_base: DEFAULT_PASSTHROUGH_PROXY_BASE.to_string(),
        }
    }
}

/// Fetcher that falls back from a direct request to two proxy routes.
///
/// Each route gets exactly one attempt; any failure escalates straight to
/// the next route. Any 2xx body is accepted as-is.
#[derive(Debug, Clone)]
pub struct FallbackFetcher {
    client: Client,
    settings: FetchSettings,
}

impl FallbackFetcher {
    /// Creates a fetcher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = http_client::build_fetch_client(&settings)?;
        Ok(Self { client, settings })
    }

    /// Returns the settings this fetcher was built with.
    #[must_use]
    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Performs one GET through `route`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] for network errors, timeouts, non-2xx
    /// statuses and unreadable bodies.
    #[instrument(skip(self), fields(route = %route))]
    pub async fn fetch_via(&self, route: FetchRoute, url: &str) -> Result<String, FetchError> {
        let request_url = route.request_url(url, &self.settings);
        let response = self
            .client
            .get(&request_url)
            .send()
            .await
            .map_err(|source| FetchError::from_send(&request_url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: request_url,
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: request_url,
            source,
        })
    }
}

#[async_trait]
impl PageFetcher for FallbackFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Option<String> {
        for route in FetchRoute::ALL {
            match self.fetch_via(route, url).await {
                Ok(text) => {
                    info!(route = %route, bytes = text.len(), "Fetched page");
                    return Some(text);
                }
                Err(error) => {
                    debug!(route = %route, error = %error, "Fetch route failed; trying next");
                }
            }
        }

        warn!(url, "All fetch routes failed");
        None
    }
}
