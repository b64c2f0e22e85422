/*!
 * Webpage text extraction.
 *
 * Fetches a page with an ordered list of strategies, the first being a
 * browser-like request and the last a plain one, and reduces the main content
 * area to a single line of readable text.
 */

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::app_config::ScraperConfig;
use crate::errors::ScrapeError;

/// Marker text of the anti-bot interstitial page
const CHALLENGE_MARKER: &str = "Verify you are human";

/// Line width handed to the HTML renderer; whitespace is collapsed afterwards
const RENDER_WIDTH: usize = 10_000;

static RE_SCRIPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static RE_STYLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static RE_NOSCRIPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<noscript[^>]*>.*?</noscript>").unwrap());
static RE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static RE_MAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<main(?:\s[^>]*)?>(.*?)</main>").unwrap());
static RE_ARTICLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<article(?:\s[^>]*)?>(.*?)</article>").unwrap());
static RE_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<body(?:\s[^>]*)?>(.*?)(?:</body>|\z)").unwrap());
/// Inline tags the renderer would decorate (links become footnotes, emphasis gets asterisks)
static RE_INLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?(?:a|img|em|strong|b|i|u|span|abbr|small)\b[^>]*>").unwrap());
/// Headings are rendered with `#` prefixes; turn them into paragraphs
static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<(/?)h[1-6]\b[^>]*>").unwrap());
static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());

/// One way of fetching a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Browser user agent and headers; challenge pages count as failure
    BrowserProfile,
    /// Plain HTTP request
    Plain,
}

/// Extracts readable text from web pages
#[derive(Debug, Clone)]
pub struct WebScraper {
    browser_client: Client,
    plain_client: Client,
    strategies: Vec<FetchStrategy>,
}

impl WebScraper {
    pub fn new(config: &ScraperConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        Self {
            browser_client: Client::builder()
                .timeout(timeout)
                .user_agent(config.user_agent.clone())
                .build()
                .unwrap_or_default(),
            plain_client: Client::builder()
                .timeout(timeout)
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            strategies: vec![FetchStrategy::BrowserProfile, FetchStrategy::Plain],
        }
    }

    /// Replace the ordered list of strategies
    pub fn with_strategies(mut self, strategies: Vec<FetchStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Fetch `url` and return its main text.
    ///
    /// Strategies are tried in order; the error of the last one is returned
    /// when none produces text.
    pub async fn scrape(&self, url: &str) -> Result<String, ScrapeError> {
        let parsed = Url::parse(url.trim()).map_err(|e| ScrapeError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScrapeError::InvalidUrl(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        let mut last_error = ScrapeError::NoContent;
        for strategy in &self.strategies {
            match self.fetch(*strategy, &parsed).await.and_then(|html| extract_text(&html)) {
                Ok(text) => {
                    info!("Scraped {} characters from {} ({:?})", text.chars().count(), parsed, strategy);
                    return Ok(text);
                }
                Err(e) => {
                    warn!("{:?} fetch of {} failed: {}", strategy, parsed, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn fetch(&self, strategy: FetchStrategy, url: &Url) -> Result<String, ScrapeError> {
        let request = match strategy {
            FetchStrategy::BrowserProfile => self
                .browser_client
                .get(url.clone())
                .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
                .header("Accept-Language", "en-US,en;q=0.9"),
            FetchStrategy::Plain => self.plain_client.get(url.clone()),
        };

        let response = request
            .send()
            .await
            .map_err(|e| ScrapeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(ScrapeError::Http(status.as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::RequestFailed(e.to_string()))?;

        if strategy == FetchStrategy::BrowserProfile && html.contains(CHALLENGE_MARKER) {
            return Err(ScrapeError::Challenge);
        }

        debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }
}

/// Reduce an HTML document to the collapsed text of its main content area.
///
/// The first `<main>` wins, then `<article>`, then `<body>`, then the whole document.
pub fn extract_text(html: &str) -> Result<String, ScrapeError> {
    let cleaned = RE_SCRIPT.replace_all(html, "");
    let cleaned = RE_STYLE.replace_all(&cleaned, "");
    let cleaned = RE_NOSCRIPT.replace_all(&cleaned, "");
    let cleaned = RE_COMMENT.replace_all(&cleaned, "");

    let fragment = [&RE_MAIN, &RE_ARTICLE, &RE_BODY]
        .iter()
        .find_map(|re| re.captures(&cleaned).and_then(|c| c.get(1)).map(|m| m.as_str()))
        .unwrap_or(&*cleaned);

    let simplified = RE_INLINE.replace_all(fragment, "");
    let simplified = RE_HEADING.replace_all(&simplified, "<${1}p>");

    let rendered = match html2text::from_read(simplified.as_bytes(), RENDER_WIDTH) {
        Ok(text) => text,
        Err(e) => {
            warn!("HTML rendering failed, falling back to tag stripping: {}", e);
            RE_TAG.replace_all(&simplified, " ").to_string()
        }
    };

    let text = rendered.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        Err(ScrapeError::NoContent)
    } else {
        Ok(text)
    }
}
