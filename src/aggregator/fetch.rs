use crate::error::AppResult;
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "feedloop";
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// One fetched feed document, alive only for the duration of a cycle.
/// Unknown XML elements are ignored and missing optional elements
/// deserialize to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawFeedDocument {
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(rename = "item")]
    pub entries: Vec<RawFeedEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawFeedEntry {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Raw publication date, normalized later by the ingestor.
    #[serde(rename = "pubDate")]
    pub pub_date: String,
}

#[derive(Debug, Deserialize)]
struct RssEnvelope {
    channel: RawFeedDocument,
}

pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    /// Build a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Issue a single GET for the feed URL and parse the body. No
    /// retries; the next scheduled tick is the retry.
    pub async fn fetch(&self, url: &str) -> AppResult<RawFeedDocument> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let envelope: RssEnvelope = quick_xml::de::from_str(&body)?;
        let mut document = envelope.channel;

        // Feeds routinely double-escape HTML entities; decode them in the
        // channel metadata and in every entry.
        decode_entities(&mut document.title);
        decode_entities(&mut document.description);
        for entry in &mut document.entries {
            decode_entities(&mut entry.title);
            decode_entities(&mut entry.description);
        }

        Ok(document)
    }
}

/// Decode HTML-escaped entities in place, leaving the text unchanged
/// when it contains sequences the decoder rejects.
fn decode_entities(text: &mut String) {
    if let Ok(decoded) = htmlescape::decode_html(text) {
        *text = decoded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Boot &amp;amp; Dev Blog</title>
    <link>https://example.com</link>
    <description>News &amp;amp; updates</description>
    <language>en-us</language>
    <item>
      <title>Post one &amp;amp; a half</title>
      <link>https://example.com/a</link>
      <description>First &amp;lt;b&amp;gt;post&amp;lt;/b&amp;gt;</description>
      <pubDate>Mon, 02 Jan 2006 15:04:05 MST</pubDate>
      <guid>ignored</guid>
    </item>
    <item>
      <title>Post two &amp;amp; change</title>
      <link>https://example.com/b</link>
      <description>Second post</description>
      <pubDate>2006-01-02T15:04:05Z</pubDate>
    </item>
  </channel>
</rss>"#;

    async fn serve(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("Content-Type", "application/rss+xml"),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn fetches_and_parses_a_feed() {
        let server = serve(FEED_BODY).await;
        let fetcher = FeedFetcher::new().unwrap();

        let document = fetcher.fetch(&format!("{}/feed", server.uri())).await.unwrap();

        assert_eq!(document.title, "Boot & Dev Blog");
        assert_eq!(document.description, "News & updates");
        assert_eq!(document.link, "https://example.com");
        assert_eq!(document.entries.len(), 2);
        assert_eq!(document.entries[0].link, "https://example.com/a");
        assert_eq!(document.entries[0].pub_date, "Mon, 02 Jan 2006 15:04:05 MST");
        assert_eq!(document.entries[1].pub_date, "2006-01-02T15:04:05Z");
    }

    #[tokio::test]
    async fn decodes_entities_in_every_entry_not_only_the_first() {
        let server = serve(FEED_BODY).await;
        let fetcher = FeedFetcher::new().unwrap();

        let document = fetcher.fetch(&format!("{}/feed", server.uri())).await.unwrap();

        assert_eq!(document.entries[0].title, "Post one & a half");
        assert_eq!(document.entries[0].description, "First <b>post</b>");
        assert_eq!(document.entries[1].title, "Post two & change");
    }

    #[tokio::test]
    async fn sends_identifying_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("User-Agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = FeedFetcher::new().unwrap();
        fetcher.fetch(&server.uri()).await.unwrap();
    }

    #[tokio::test]
    async fn missing_optional_fields_default_to_empty() {
        let sparse = r#"<rss version="2.0"><channel>
            <title>Sparse</title>
            <item><link>https://example.com/only-link</link></item>
        </channel></rss>"#;

        let server = serve(sparse).await;
        let fetcher = FeedFetcher::new().unwrap();

        let document = fetcher.fetch(&format!("{}/feed", server.uri())).await.unwrap();

        assert_eq!(document.description, "");
        assert_eq!(document.entries.len(), 1);
        assert_eq!(document.entries[0].title, "");
        assert_eq!(document.entries[0].pub_date, "");
    }

    #[tokio::test]
    async fn no_items_parses_as_empty_entry_list() {
        let empty = r#"<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
        let server = serve(empty).await;
        let fetcher = FeedFetcher::new().unwrap();

        let document = fetcher.fetch(&format!("{}/feed", server.uri())).await.unwrap();

        assert!(document.entries.is_empty());
    }

    #[tokio::test]
    async fn malformed_xml_is_a_parse_error() {
        let server = serve("<rss><channel><title>broken").await;
        let fetcher = FeedFetcher::new().unwrap();

        match fetcher.fetch(&format!("{}/feed", server.uri())).await {
            Err(AppError::Parse(_)) => {}
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_error_status_is_a_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = FeedFetcher::new().unwrap();
        match fetcher.fetch(&server.uri()).await {
            Err(AppError::Fetch(_)) => {}
            other => panic!("Expected Fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn timeout_is_a_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(FEED_BODY)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let fetcher = FeedFetcher::with_timeout(Duration::from_millis(50)).unwrap();
        match fetcher.fetch(&server.uri()).await {
            Err(AppError::Fetch(e)) => assert!(e.is_timeout()),
            other => panic!("Expected Fetch error, got {:?}", other),
        }
    }
}
