//! Stash relay: download a KML file, upload it to a stash, and build a layer
//! pointing at the stashed copy.

use crate::layer::KmlLayer;
use crate::stash::{Deferred, StashClient};
use crate::types::{AppError, AppResult, StashFile};
use crate::utils::{filename_from_url, layer_url, DiagnosticSink, TracingSink};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{info, warn};

#[derive(Clone)]
pub struct StashRelay {
    client: StashClient,
    sink: Arc<dyn DiagnosticSink>,
}

impl StashRelay {
    pub fn new(client: StashClient) -> Self {
        Self::with_sink(client, Arc::new(TracingSink))
    }

    pub fn with_sink(client: StashClient, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { client, sink }
    }

    /// Download `kml_url` and stash it at `stash_url`.
    ///
    /// The form key is the part of `kml_url` after its last `/`. The layer
    /// points at `stash_url + "/" + id` where `id` is the first element of the
    /// stash's response.
    ///
    /// A successful response of `[]` or `[""]` is not turned into a layer at
    /// `stash_url + "/"`: the stash writes `""` for a file it could not store,
    /// so both are reported as `AppError::Upload`.
    pub async fn relay(&self, kml_url: &str, stash_url: &str) -> AppResult<KmlLayer> {
        let content = self
            .client
            .download(kml_url, |progress| self.sink.progress(progress))
            .await?;

        let filename = filename_from_url(kml_url);
        if filename.is_empty() {
            warn!("{} ends with '/'; stashing under an empty form key", kml_url);
        }

        let ids = self
            .client
            .stash(stash_url, vec![StashFile::new(filename, content)])
            .await?;

        let id = match ids.into_iter().next() {
            Some(id) if !id.is_empty() => id,
            Some(_) => {
                return Err(AppError::Upload(format!(
                    "{} could not store {}",
                    stash_url, filename
                )))
            }
            None => return Err(AppError::Upload(format!("{} returned no id", stash_url))),
        };

        Ok(KmlLayer::new(layer_url(stash_url, &id)).with_title(filename))
    }

    /// Fire-and-forget form of [`StashRelay::relay`].
    ///
    /// Returns at once; the relay runs on the tokio runtime. On success the
    /// deferred resolves with the layer. On failure one diagnostic goes to
    /// the sink and the deferred never resolves.
    pub fn create_stashed_kml_layer(
        &self,
        kml_url: impl Into<String>,
        stash_url: impl Into<String>,
    ) -> Deferred<KmlLayer> {
        let relay = self.clone();
        let kml_url = kml_url.into();
        let stash_url = stash_url.into();
        let (tx, rx) = oneshot::channel();

        let worker = tokio::spawn(async move {
            match relay.relay(&kml_url, &stash_url).await {
                Ok(layer) => {
                    info!("Stashed {} as {}", kml_url, layer.url);
                    let _ = tx.send(layer);
                }
                Err(AppError::Download(e)) => {
                    relay.sink.failure(&format!("Error downloading file: {}", e));
                }
                Err(e) => {
                    relay.sink.failure(&format!("Error stashing file: {}", e));
                }
            }
        });

        Deferred::new(rx, Some(worker))
    }
}
