// KML map layer descriptor

use crate::stash::StashClient;
use crate::types::AppResult;
use crate::utils::filename_from_url;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A map layer backed by a KML document at `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmlLayer {
    pub url: String,
    pub title: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl KmlLayer {
    /// Visible layer titled after the last segment of `url`
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let title = filename_from_url(&url).to_string();
        Self {
            url,
            title,
            visible: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// The id the stash handed out, i.e. the last segment of the layer url
    pub fn stash_id(&self) -> &str {
        filename_from_url(&self.url)
    }

    /// Fetch the KML document behind this layer
    pub async fn load(&self, client: &StashClient) -> AppResult<Bytes> {
        client.fetch_stashed(&self.url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layer() {
        let layer = KmlLayer::new("https://h/stashutility/stash/deadbeef-1234");
        assert_eq!(layer.title, "deadbeef-1234");
        assert_eq!(layer.stash_id(), "deadbeef-1234");
        assert!(layer.visible);

        let titled = layer.with_title("roads.kml");
        assert_eq!(titled.title, "roads.kml");
        assert_eq!(titled.stash_id(), "deadbeef-1234");
    }

    #[test]
    fn test_layer_json() {
        let layer = KmlLayer::new("https://h/stash/abc.kml");
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["url"], "https://h/stash/abc.kml");
        assert_eq!(json["visible"], true);

        let parsed: KmlLayer =
            serde_json::from_str(r#"{"url":"https://h/stash/x","title":"x"}"#).unwrap();
        assert!(parsed.visible);
    }

    #[tokio::test]
    async fn test_load() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/stash/abc")
            .with_status(200)
            .with_body("<kml/>")
            .create_async()
            .await;

        let layer = KmlLayer::new(format!("{}/stash/abc", server.url()));
        let content = layer.load(&StashClient::new()).await.unwrap();
        assert_eq!(&content[..], b"<kml/>");
    }
}
