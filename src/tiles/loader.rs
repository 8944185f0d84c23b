use crate::core::geo::TileCoord;
use crate::tiles::source::TileSource;
use crossbeam_channel::{Receiver, Sender};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Shared HTTP client with a custom User-Agent so that public tile servers
/// (e.g. OpenStreetMap) don't reject the request. Building the client once
/// avoids TLS and connection pool setup for every tile.
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent("tracklet/0.1 (+https://github.com/example/tracklet)")
        .build()
        .unwrap_or_default()
});

/// Fetches tiles on background tasks and reports the resulting bytes back
/// over a channel, so the map thread never blocks on the network.
pub struct TileLoader {
    tx: Sender<(TileCoord, Vec<u8>)>,
}

impl TileLoader {
    /// Creates a loader together with the receiving end for completed tiles.
    pub fn new() -> (Self, Receiver<(TileCoord, Vec<u8>)>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }

    /// Starts downloading the specified tile on a detached task. Failed
    /// downloads are logged and dropped; the tile simply never arrives on
    /// the channel.
    pub fn queue(&self, source: &Arc<dyn TileSource>, coord: TileCoord) {
        let url = source.url(coord);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            log::debug!("fetching tile {:?} from {}", coord, url);
            let result = async {
                let resp = HTTP_CLIENT.get(&url).send().await?;
                let resp = resp.error_for_status()?;
                let bytes = resp.bytes().await?;
                Ok::<_, reqwest::Error>(bytes.to_vec())
            }
            .await;

            match result {
                Ok(data) => {
                    log::debug!("tile {:?} downloaded ({} bytes)", coord, data.len());
                    let _ = tx.send((coord, data));
                }
                Err(e) => {
                    log::warn!("tile {:?} download failed: {}", coord, e);
                }
            }
        });
    }
}
