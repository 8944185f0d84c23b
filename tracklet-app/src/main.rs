//! Headless runner: brings up the map against a feed server and replays
//! the tracks, printing progress to stdout.
//!
//! Usage: `tracklet-app [BASE_URL]` where BASE_URL defaults to the local
//! development feed server.

use anyhow::Result;
use std::time::Duration;
use tracklet::bootstrap::BASEMAP_LAYER_ID;
use tracklet::{Bootstrapper, HttpFeedSource, LayerTrait, TileLayer};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    log::info!("using feed server at {}", base_url);

    let feed = HttpFeedSource::new(base_url);
    let mut boot = Bootstrapper::new(Box::new(feed));
    boot.run().await.map_err(|e| anyhow::anyhow!(e))?;

    {
        let map = boot
            .map()
            .ok_or_else(|| anyhow::anyhow!("bootstrap did not produce a map"))?;
        println!(
            "map ready at ({:.6}, {:.6}) zoom {} with layers {:?}",
            map.viewport.center.lat,
            map.viewport.center.lng,
            map.viewport.zoom,
            map.list_layers()
        );
    }

    match boot.playback() {
        Some(overlay) => println!(
            "playback running: {} tracks, cursor at {}",
            overlay.track_count(),
            overlay.current_time()
        ),
        None => {
            println!("no track feed available; showing basemap only");
            return Ok(());
        }
    }

    // Drive the map at ~20 fps until playback finishes
    let mut ticker = tokio::time::interval(Duration::from_millis(50));
    loop {
        ticker.tick().await;

        if let Some(map) = boot.map_mut() {
            let viewport = map.viewport().clone();
            let _ = map.with_layer_mut(BASEMAP_LAYER_ID, |layer| {
                if let Some(tiles) = layer.as_any_mut().downcast_mut::<TileLayer>() {
                    tiles.request_visible(&viewport);
                }
            });
            if let Err(e) = map.update(50.0) {
                log::warn!("update failed: {}", e);
            }
        }

        let Some(overlay) = boot.playback() else { break };
        let live = overlay
            .current_positions()
            .iter()
            .filter(|p| p.is_some())
            .count();
        println!(
            "t={} progress={:.0}% vehicles={}",
            overlay.current_time(),
            overlay.progress() * 100.0,
            live
        );

        if !overlay.is_playing() {
            break;
        }
    }

    println!("playback finished");
    Ok(())
}
