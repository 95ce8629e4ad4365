use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use sha2::{Digest, Sha256};

use crate::error::{ApoteoError, Result};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Cache file for a source identifier: hex SHA-256 of the identifier,
/// so distinct endpoints never collide.
pub fn cache_path(cache_dir: &Path, source: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    cache_dir.join(format!("{}.cache", hex::encode(hasher.finalize())))
}

/// A cached body is fresh while its mtime is within the TTL window.
pub fn is_fresh(path: &Path, ttl: Duration) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = meta.modified() else {
        return false;
    };
    match modified.elapsed() {
        Ok(age) => age < ttl,
        // mtime in the future: treat as fresh rather than refetch-loop
        Err(_) => true,
    }
}

fn download(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| ApoteoError::SourceUnavailable(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| ApoteoError::SourceUnavailable(format!("{url}: {e}")))?;
    let bytes = response
        .bytes()
        .map_err(|e| ApoteoError::SourceUnavailable(format!("{url}: {e}")))?;
    Ok(bytes.to_vec())
}

/// Fetch a remote body through the disk cache. One attempt, no retries;
/// a fresh cached copy short-circuits the network entirely.
pub fn fetch(url: &str, cache_dir: &Path, ttl: Duration, refresh: bool) -> Result<Vec<u8>> {
    let path = cache_path(cache_dir, url);

    if !refresh && is_fresh(&path, ttl) {
        debug!("cache hit for {url} ({})", path.display());
        return Ok(std::fs::read(&path)?);
    }

    debug!("fetching {url}");
    let body = download(url)?;

    if let Err(e) = std::fs::create_dir_all(cache_dir)
        .and_then(|_| std::fs::write(&path, &body))
    {
        // The report can still be built from the in-memory body.
        warn!("could not write cache file {}: {e}", path.display());
    }

    Ok(body)
}
