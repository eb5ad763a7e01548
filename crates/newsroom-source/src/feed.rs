//! Feed sources: where poll results come from.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use newsroom_ipc::PollResult;

use crate::error::SourceError;

/// A source of feed observations.
///
/// `poll` returns the newest item currently visible in the feed, or `None`
/// when the feed is empty. Identity comparison and debouncing happen
/// downstream; a source just reports what it sees.
pub trait FeedSource: Send {
    /// One poll cycle against the upstream feed.
    fn poll(&mut self) -> Result<Option<PollResult>, SourceError>;
}

/// JSON Feed (jsonfeed.org, v1.x) document, reduced to the fields we read.
#[derive(Debug, Deserialize)]
struct JsonFeedDocument {
    #[serde(default)]
    items: Vec<JsonFeedItem>,
}

#[derive(Debug, Deserialize)]
struct JsonFeedItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content_text: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    attachments: Vec<JsonFeedAttachment>,
}

#[derive(Debug, Deserialize)]
struct JsonFeedAttachment {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl JsonFeedItem {
    /// Stable identity: explicit id, falling back to the item url.
    fn identity(&self) -> Result<String, SourceError> {
        self.id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| self.url.clone().filter(|url| !url.is_empty()))
            .ok_or(SourceError::MissingIdentity)
    }

    /// Image reference: `image` field first, then the first image attachment.
    fn image_url(&self) -> Option<String> {
        if self.image.is_some() {
            return self.image.clone();
        }
        self.attachments
            .iter()
            .find(|a| {
                a.mime_type
                    .as_deref()
                    .is_some_and(|m| m.starts_with("image/"))
            })
            .and_then(|a| a.url.clone())
    }
}

/// Polls a JSON Feed over HTTP with a blocking client.
pub struct JsonFeedSource {
    feed_url: Url,
    client: reqwest::blocking::Client,
}

impl JsonFeedSource {
    /// Default per-request timeout.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a source for the given feed URL.
    pub fn new(feed_url: &str) -> Result<Self, SourceError> {
        let feed_url =
            Url::parse(feed_url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::RequestFailed(e.to_string()))?;

        Ok(Self { feed_url, client })
    }

    fn parse_document(&self, body: &str) -> Result<Option<PollResult>, SourceError> {
        let document: JsonFeedDocument = serde_json::from_str(body)
            .map_err(|e| SourceError::MalformedFeed(e.to_string()))?;

        let Some(latest) = document.items.into_iter().next() else {
            debug!("Feed has no items");
            return Ok(None);
        };

        let item_id = latest.identity()?;
        Ok(Some(PollResult {
            item_id,
            title: latest.title.clone().unwrap_or_else(|| "Untitled".to_string()),
            summary: latest
                .content_text
                .clone()
                .or_else(|| latest.summary.clone())
                .unwrap_or_default(),
            link: latest.url.clone().unwrap_or_default(),
            image_url: latest.image_url(),
            observed_unix: chrono::Utc::now().timestamp(),
        }))
    }
}

impl FeedSource for JsonFeedSource {
    fn poll(&mut self) -> Result<Option<PollResult>, SourceError> {
        debug!(url = %self.feed_url, "Polling feed");

        let response = self
            .client
            .get(self.feed_url.clone())
            .send()
            .map_err(|e| SourceError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::BadStatus(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| SourceError::RequestFailed(e.to_string()))?;

        self.parse_document(&body)
    }
}

/// A deterministic source backed by a prepared sequence of poll outcomes.
///
/// Each `poll` pops the next outcome; once the script runs out, every poll
/// repeats the final outcome. Used by tests and the demo mode.
pub struct ScriptedSource {
    script: VecDeque<Option<PollResult>>,
    last: Option<PollResult>,
}

impl ScriptedSource {
    /// Create a scripted source from a sequence of poll outcomes.
    pub fn new(script: impl IntoIterator<Item = Option<PollResult>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: None,
        }
    }
}

impl FeedSource for ScriptedSource {
    fn poll(&mut self) -> Result<Option<PollResult>, SourceError> {
        match self.script.pop_front() {
            Some(outcome) => {
                if outcome.is_some() {
                    self.last = outcome.clone();
                }
                Ok(outcome)
            }
            None => Ok(self.last.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> JsonFeedSource {
        JsonFeedSource::new("https://example.com/feed.json").unwrap()
    }

    #[test]
    fn test_parse_item_with_id() {
        let body = r#"{
            "version": "https://jsonfeed.org/version/1.1",
            "title": "Wire",
            "items": [
                {"id": "guid-1", "url": "https://example.com/1",
                 "title": "First", "content_text": "Body text"}
            ]
        }"#;
        let result = source().parse_document(body).unwrap().unwrap();
        assert_eq!(result.item_id, "guid-1");
        assert_eq!(result.title, "First");
        assert_eq!(result.summary, "Body text");
    }

    #[test]
    fn test_identity_falls_back_to_url() {
        let body = r#"{"items": [{"url": "https://example.com/2", "title": "Second"}]}"#;
        let result = source().parse_document(body).unwrap().unwrap();
        assert_eq!(result.item_id, "https://example.com/2");
    }

    #[test]
    fn test_item_without_identity_is_an_error() {
        let body = r#"{"items": [{"title": "Orphan"}]}"#;
        assert!(matches!(
            source().parse_document(body),
            Err(SourceError::MissingIdentity)
        ));
    }

    #[test]
    fn test_empty_feed_is_no_update() {
        let body = r#"{"items": []}"#;
        assert!(source().parse_document(body).unwrap().is_none());
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(matches!(
            source().parse_document("not json"),
            Err(SourceError::MalformedFeed(_))
        ));
    }

    #[test]
    fn test_image_from_attachment() {
        let body = r#"{"items": [
            {"id": "guid-3", "title": "Third",
             "attachments": [
                {"url": "https://example.com/a.mp3", "mime_type": "audio/mpeg"},
                {"url": "https://example.com/a.jpg", "mime_type": "image/jpeg"}
             ]}
        ]}"#;
        let result = source().parse_document(body).unwrap().unwrap();
        assert_eq!(result.image_url.as_deref(), Some("https://example.com/a.jpg"));
    }

    #[test]
    fn test_scripted_source_repeats_last_outcome() {
        let item = PollResult {
            item_id: "guid-1".to_string(),
            title: "T".to_string(),
            summary: String::new(),
            link: String::new(),
            image_url: None,
            observed_unix: 0,
        };
        let mut source = ScriptedSource::new(vec![None, Some(item.clone())]);
        assert!(source.poll().unwrap().is_none());
        assert_eq!(source.poll().unwrap().unwrap().item_id, "guid-1");
        // Script exhausted: keeps reporting the same newest item.
        assert_eq!(source.poll().unwrap().unwrap().item_id, "guid-1");
    }
}
