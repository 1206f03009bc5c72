use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use crate::catalog::resolve_url;
use crate::playback::PlaybackError;

/// Download the bytes behind a track URL.
pub(super) fn fetch_source(
    client: Option<&reqwest::blocking::Client>,
    base_url: &str,
    url: &str,
) -> Result<Arc<[u8]>, PlaybackError> {
    let full = resolve_url(base_url, url);
    let fetch_err = |reason: String| PlaybackError::Fetch {
        url: full.clone(),
        reason,
    };

    let client = client.ok_or_else(|| fetch_err("http client unavailable".to_string()))?;
    let resp = client
        .get(&full)
        .send()
        .map_err(|e| fetch_err(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(fetch_err(format!("status {status}")));
    }
    let bytes = resp.bytes().map_err(|e| fetch_err(e.to_string()))?;
    Ok(Arc::from(bytes.as_ref()))
}

/// Outcome of a background download, tagged with the bind it belongs to.
pub(super) struct Fetched {
    pub generation: u64,
    pub result: Result<Arc<[u8]>, PlaybackError>,
}

/// Download `url` on a worker thread and report the outcome on `tx`.
///
/// Returns immediately. Results for a source that has been rebound since are
/// recognized by `generation` on the receiving side and dropped there.
pub(super) fn spawn_fetch(
    client: Option<reqwest::blocking::Client>,
    base_url: String,
    url: String,
    generation: u64,
    tx: Sender<Fetched>,
) {
    thread::spawn(move || {
        let result = fetch_source(client.as_ref(), &base_url, &url);
        // The audio thread may be gone already.
        let _ = tx.send(Fetched { generation, result });
    });
}

/// Position after scrubbing `secs` from `elapsed`, clamped at zero.
pub(super) fn seek_target(elapsed: Duration, secs: i32) -> Duration {
    let cur = elapsed.as_secs() as i64;
    Duration::from_secs((cur + secs as i64).max(0) as u64)
}

pub(super) fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}
