//! File-download plumbing: turn a backend file response into a saved file.
//!
//! The save mechanics live behind [`SaveEnvironment`] so the core logic
//! (derive a filename, build the blob, pick a save path, schedule object-URL
//! cleanup) stays testable without any real delivery environment. The
//! portal's production environment is [`ResponseDelivery`], which hands the
//! blob back to the HTTP handler as an attachment or inline response.

use bytes::Bytes;
use http::HeaderMap;
use http::header::CONTENT_TYPE;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::services::api_client::ClientError;

/// Delay before a created object URL is released.
pub const URL_REVOKE_DELAY_MS: u64 = 100;

// The backend quotes filenames either way; same-quote pairs are matched
// explicitly since the regex engine has no backreferences.
static FILENAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"filename[^;=\n]*=("[^"\n]*"|'[^'\n]*'|[^;\n]*)"#).expect("valid filename pattern")
});

/// An HTTP response representing a file: header map plus raw body bytes.
#[derive(Debug, Clone)]
pub struct FileResponse {
    pub headers: HeaderMap,
    pub content_type: String,
    pub body: Bytes,
}

impl FileResponse {
    pub async fn from_response(response: reqwest::Response) -> Result<Self, ClientError> {
        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = response.bytes().await?;

        Ok(Self {
            headers,
            content_type,
            body,
        })
    }
}

/// A binary blob with its declared content type.
#[derive(Debug, Clone)]
pub struct Blob {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Capability interface for persisting a blob as a file in the user's
/// environment. Capability detection stays at this boundary.
pub trait SaveEnvironment: Send + Sync {
    /// Whether a native save-blob capability exists.
    fn supports_save_blob(&self) -> bool;
    /// Save the blob directly under `filename` (may be empty).
    fn save_blob(&self, blob: Blob, filename: &str);

    /// Create a URL addressing the blob; released later via
    /// [`SaveEnvironment::revoke_object_url`].
    fn create_object_url(&self, blob: Blob) -> String;
    fn revoke_object_url(&self, url: &str);

    /// Whether a download can be triggered through a hidden anchor.
    fn supports_anchor_download(&self) -> bool;
    fn anchor_download(&self, url: &str, filename: &str);

    /// Navigate to `url`, letting the environment decide how to show it.
    fn navigate(&self, url: &str);
}

/// Derive a filename from the `content-disposition` header, best effort.
///
/// Only `attachment` dispositions are considered; surrounding quotes are
/// stripped. Returns an empty string when nothing can be derived.
pub fn filename_from_headers(headers: &HeaderMap) -> String {
    let Some(disposition) = headers
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
    else {
        return String::new();
    };

    if !disposition.contains("attachment") {
        return String::new();
    }

    match FILENAME_PATTERN
        .captures(disposition)
        .and_then(|captures| captures.get(1))
    {
        Some(matched) => matched.as_str().replace(['\'', '"'], ""),
        None => String::new(),
    }
}

/// Persist a file response through `env`.
///
/// Save-path priority: native save-blob, then anchor download (when a
/// filename was derived), then plain navigation. Whenever an object URL was
/// created its release is scheduled once, after [`URL_REVOKE_DELAY_MS`],
/// independent of which fallback path ran.
pub fn download_file(response: FileResponse, env: &Arc<dyn SaveEnvironment>) {
    let filename = filename_from_headers(&response.headers);
    let blob = Blob {
        content_type: response.content_type,
        bytes: response.body,
    };

    if env.supports_save_blob() {
        env.save_blob(blob, &filename);
        return;
    }

    let url = env.create_object_url(blob);

    if filename.is_empty() {
        env.navigate(&url);
    } else if env.supports_anchor_download() {
        env.anchor_download(&url, &filename);
    } else {
        env.navigate(&url);
    }

    let env = Arc::clone(env);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(URL_REVOKE_DELAY_MS)).await;
        env.revoke_object_url(&url);
    });
}

/// What a download resolved to, as delivered over HTTP.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Serve as `content-disposition: attachment` under `filename`.
    Attachment { filename: String, blob: Blob },
    /// Serve inline; the browser decides how to render it.
    Inline { blob: Blob },
}

/// Production [`SaveEnvironment`]: records the outcome for the download
/// handler to turn into an HTTP response. Exposes the native save path, so
/// the object-URL machinery only runs for environments that lack one.
#[derive(Default)]
pub struct ResponseDelivery {
    outcome: Mutex<Option<DownloadOutcome>>,
    object_urls: Mutex<HashMap<String, Blob>>,
}

impl ResponseDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_outcome(&self) -> Option<DownloadOutcome> {
        self.outcome.lock().ok().and_then(|mut slot| slot.take())
    }

    fn record(&self, outcome: DownloadOutcome) {
        if let Ok(mut slot) = self.outcome.lock() {
            *slot = Some(outcome);
        }
    }

    fn blob_for(&self, url: &str) -> Option<Blob> {
        self.object_urls
            .lock()
            .ok()
            .and_then(|urls| urls.get(url).cloned())
    }
}

impl SaveEnvironment for ResponseDelivery {
    fn supports_save_blob(&self) -> bool {
        true
    }

    fn save_blob(&self, blob: Blob, filename: &str) {
        if filename.is_empty() {
            self.record(DownloadOutcome::Inline { blob });
        } else {
            self.record(DownloadOutcome::Attachment {
                filename: filename.to_string(),
                blob,
            });
        }
    }

    fn create_object_url(&self, blob: Blob) -> String {
        let url = format!("blob:{}", Uuid::new_v4());
        if let Ok(mut urls) = self.object_urls.lock() {
            urls.insert(url.clone(), blob);
        }
        url
    }

    fn revoke_object_url(&self, url: &str) {
        if let Ok(mut urls) = self.object_urls.lock() {
            urls.remove(url);
        }
    }

    fn supports_anchor_download(&self) -> bool {
        false
    }

    fn anchor_download(&self, url: &str, filename: &str) {
        if let Some(blob) = self.blob_for(url) {
            self.record(DownloadOutcome::Attachment {
                filename: filename.to_string(),
                blob,
            });
        }
    }

    fn navigate(&self, url: &str) {
        if let Some(blob) = self.blob_for(url) {
            self.record(DownloadOutcome::Inline { blob });
        }
    }
}
