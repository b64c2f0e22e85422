/*!
 * Webpage extraction tests against a local server
 */

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use polytrans::app_config::ScraperConfig;
use polytrans::errors::ScrapeError;
use polytrans::scraper::{FetchStrategy, WebScraper};

const ARTICLE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Brokers</title><style>body { color: red; }</style></head>
<body>
  <header>Site navigation</header>
  <main>
    <h2>Best forex brokers in [country]</h2>
    <p>Compare <strong>spreads</strong>, fees and
       regulation.</p>
  </main>
  <footer>Copyright</footer>
</body>
</html>"#;

const CHALLENGE_PAGE: &str = "<html><body><p>Verify you are human by completing the action below.</p></body></html>";

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

/// Test extraction of the main content area
#[tokio::test]
async fn test_scrape_withMainElement_shouldReturnCollapsedText() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brokers"))
        .respond_with(html(ARTICLE_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = WebScraper::new(&ScraperConfig::default());
    let text = scraper.scrape(&format!("{}/brokers", server.uri())).await.unwrap();

    assert_eq!(text, "Best forex brokers in [country] Compare spreads, fees and regulation.");
}

/// Test that a challenge page makes the scraper fall back to a plain request
#[tokio::test]
async fn test_scrape_withChallengePage_shouldFallBackToPlainFetch() {
    let server = MockServer::start().await;
    let plain_agent = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
    Mock::given(method("GET"))
        .and(header("user-agent", plain_agent))
        .respond_with(html(ARTICLE_PAGE))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html(CHALLENGE_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = WebScraper::new(&ScraperConfig::default());
    let text = scraper.scrape(&server.uri()).await.unwrap();

    assert!(text.starts_with("Best forex brokers"));
}

/// Test that only the browser profile treats the challenge marker as failure
#[tokio::test]
async fn test_scrape_browserOnly_withChallengePage_shouldReportChallenge() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(CHALLENGE_PAGE))
        .mount(&server)
        .await;

    let scraper = WebScraper::new(&ScraperConfig::default()).with_strategies(vec![FetchStrategy::BrowserProfile]);
    let err = scraper.scrape(&server.uri()).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Challenge));
}

/// Test that a missing page is reported with its status
#[tokio::test]
async fn test_scrape_withNotFound_shouldReturnHttpStatus() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let scraper = WebScraper::new(&ScraperConfig::default());
    let err = scraper.scrape(&format!("{}/missing", server.uri())).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Http(404)));
    assert_eq!(err.to_string(), "HTTP 404");
}

/// Test that a page without text is reported as empty
#[tokio::test]
async fn test_scrape_withEmptyBody_shouldReturnNoContent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<html><body><script>track()</script></body></html>"))
        .mount(&server)
        .await;

    let scraper = WebScraper::new(&ScraperConfig::default()).with_strategies(vec![FetchStrategy::Plain]);
    let err = scraper.scrape(&server.uri()).await.unwrap_err();

    assert!(matches!(err, ScrapeError::NoContent));
}
