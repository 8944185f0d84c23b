//! Feed retrieval.
//!
//! `FeedSource` abstracts where track data comes from so the bootstrapper
//! can be exercised against in-memory fixtures; `HttpFeedSource` is the
//! production implementation talking to the track endpoint.

use crate::data::feed::TrackFeed;
use crate::{Error, Result};
use async_trait::async_trait;

/// Path the upstream service serves per-vehicle GeoJSON from.
pub const DEFAULT_FEED_PATH: &str = "/by_vehicle_geojson";

/// A source of track feed payloads.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<TrackFeed>;
}

/// Fetches the feed over HTTP from a base URL.
pub struct HttpFeedSource {
    client: reqwest::Client,
    base_url: String,
    path: String,
}

impl HttpFeedSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            path: DEFAULT_FEED_PATH.to_string(),
        }
    }

    /// Overrides the request path, keeping the base URL.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<TrackFeed> {
        let url = self.url();
        log::debug!("fetching track feed from {}", url);

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Feed(format!(
                "feed request to {} returned HTTP {}",
                url, status
            ))
            .into());
        }

        let body = resp.text().await?;
        log::debug!("feed payload ({} bytes): {}", body.len(), body);

        let feed = TrackFeed::from_json(&body)?;
        feed.validate()?;
        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let source = HttpFeedSource::new("http://127.0.0.1:5000");
        assert_eq!(source.url(), "http://127.0.0.1:5000/by_vehicle_geojson");

        let trailing = HttpFeedSource::new("http://127.0.0.1:5000/");
        assert_eq!(trailing.url(), "http://127.0.0.1:5000/by_vehicle_geojson");
    }

    #[test]
    fn test_with_path_overrides_default() {
        let source = HttpFeedSource::new("http://example.com").with_path("/tracks.json");
        assert_eq!(source.url(), "http://example.com/tracks.json");
    }
}
