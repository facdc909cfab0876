//! # Picon Cache
//!
//! Station logos and program picons are downloaded once into the cache dir
//! and referenced by key from infoscreen notifications. The file extension
//! comes from the `Content-Type` reported by a HEAD request, so the display
//! can resolve `<key>.<ext>` regardless of what the source serves.

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};

/// Keys for picons an external cleanup job may purge (live channel logos).
pub fn tmp_key(key: &str) -> String {
    format!("tmp_{key}")
}

/// Download `url` into `dir` as `<key>.<ext>` unless it is already cached.
/// Returns the cached filename, or `None` when the source is unusable.
pub async fn download_picon(
    client: &reqwest::Client,
    dir: &Path,
    key: &str,
    url: &str,
) -> io::Result<Option<String>> {
    fs::create_dir_all(dir)?;

    let head = match client.head(url).send().await {
        Ok(res) if res.status().is_success() => res,
        Ok(res) => {
            warn!("picon HEAD {} failed: HTTP {}", url, res.status());
            return Ok(None);
        }
        Err(e) => {
            warn!("picon HEAD {} failed: {}", url, e);
            return Ok(None);
        }
    };

    let ext = head
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split('/').next_back())
        .map(|ext| ext.split(';').next().unwrap_or(ext).trim().to_string());
    let ext = match ext {
        Some(e) if !e.is_empty() => e,
        _ => {
            warn!("picon {} has no usable content type", url);
            return Ok(None);
        }
    };

    let filename = format!("{key}.{ext}");
    let path = dir.join(&filename);
    if path.is_file() {
        return Ok(Some(filename));
    }

    let res = match client.get(url).send().await {
        Ok(res) if res.status().is_success() => res,
        Ok(res) => {
            warn!("picon GET {} failed: HTTP {}", url, res.status());
            return Ok(None);
        }
        Err(e) => {
            warn!("picon GET {} failed: {}", url, e);
            return Ok(None);
        }
    };

    let bytes = res.bytes().await.map_err(io::Error::other)?;
    fs::write(&path, &bytes)?;
    debug!("cached picon {} ({} bytes)", filename, bytes.len());
    Ok(Some(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmp_key() {
        assert_eq!(tmp_key("daserste"), "tmp_daserste");
    }
}
