//! Retrieval routes tried by the fallback fetcher.

use std::fmt;

use super::FetchSettings;

/// One way of retrieving a page, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRoute {
    /// Request the page URL itself.
    Direct,
    /// Text-extraction proxy keyed by the URL without its scheme.
    TextProxy,
    /// Raw pass-through proxy keyed by the percent-encoded URL.
    PassthroughProxy,
}

impl FetchRoute {
    /// All routes, in the order they are attempted.
    pub const ALL: [Self; 3] = [Self::Direct, Self::TextProxy, Self::PassthroughProxy];

    /// Returns the stable label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::TextProxy => "text_proxy",
            Self::PassthroughProxy => "passthrough_proxy",
        }
    }

    /// Builds the request URL this route uses for `url`.
    #[must_use]
    pub fn request_url(self, url: &str, settings: &FetchSettings) -> String {
        match self {
            Self::Direct => url.to_string(),
            Self::TextProxy => format!(
                "{}/http://{}",
                settings.text_proxy_base.trim_end_matches('/'),
                strip_http_scheme(url)
            ),
            Self::PassthroughProxy => format!(
                "{}/raw?url={}",
                settings.passthrough_proxy_base.trim_end_matches('/'),
                urlencoding::encode(url)
            ),
        }
    }
}

impl fmt::Display for FetchRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn strip_http_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}
