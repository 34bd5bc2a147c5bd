use url::Url;

/// A fetched HTML page, already decoded to UTF-8.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub url_final: Url,
    pub body_utf8: String,
}

impl PageResponse {
    /// Wraps markup that did not come from the network (tests, fixtures).
    pub fn from_html(url: Url, html: impl Into<String>) -> Self {
        Self {
            url_final: url,
            body_utf8: html.into(),
        }
    }
}
