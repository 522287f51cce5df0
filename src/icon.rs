//! Author icon resolution
//!
//! An icon reference is either empty (bundled default), a `data:` URI, an
//! `http(s)` URL or a local file. Resolution produces decoded RGBA pixels;
//! every failure is an `ImageResolutionError`, which callers absorb by
//! falling back to the bundled icon.

use crate::{Error, Result};
use data_url::DataUrl;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Bundled default icon
pub const DEFAULT_ICON_PNG: &[u8] = include_bytes!("../assets/default-icon.png");

/// Upper bound for fetched or embedded icon payloads
pub const MAX_ICON_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    Default,
    DataUri(String),
    Remote(String),
    File(PathBuf),
    Unsupported(String),
}

impl IconSource {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return IconSource::Default;
        }
        if value.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data:")) {
            return IconSource::DataUri(value.to_string());
        }
        match url::Url::parse(value) {
            Ok(u) => match u.scheme() {
                "http" | "https" => IconSource::Remote(u.to_string()),
                "file" => u
                    .to_file_path()
                    .map(IconSource::File)
                    .unwrap_or_else(|_| IconSource::Unsupported(value.to_string())),
                // Windows drive letters parse as one-letter schemes
                s if s.len() == 1 => IconSource::File(PathBuf::from(value)),
                _ => IconSource::Unsupported(value.to_string()),
            },
            Err(_) => IconSource::File(PathBuf::from(value)),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, IconSource::Default)
    }
}

/// Fetches remote icon bytes. Implementations may block.
pub trait IconFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetcher for builds or environments without network access
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineFetcher;

impl IconFetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        Err(Error::ImageResolutionError(format!(
            "remote icons are disabled; cannot fetch {}",
            url
        )))
    }
}

/// Blocking HTTP fetcher.
///
/// A client is built per call: the blocking client must not be dropped on an
/// async runtime thread, and exports are one-shot anyway.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout: Duration,
    user_agent: String,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            user_agent: format!("ogpcard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(feature = "http")]
impl IconFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| Error::ImageResolutionError(format!("failed to build HTTP client: {}", e)))?;

        let resp = client
            .get(url)
            .send()
            .map_err(|e| Error::ImageResolutionError(format!("failed to fetch {}: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::ImageResolutionError(format!(
                "fetching {} returned HTTP {}",
                url, status
            )));
        }

        let body = resp
            .bytes()
            .map_err(|e| Error::ImageResolutionError(format!("failed to read {}: {}", url, e)))?;
        if body.len() > MAX_ICON_BYTES {
            return Err(Error::ImageResolutionError(format!(
                "{} is larger than {} bytes",
                url, MAX_ICON_BYTES
            )));
        }
        Ok(body.to_vec())
    }
}

/// The fetcher used by default: HTTP when the `http` feature is on
pub fn default_fetcher(timeout: Duration) -> Arc<dyn IconFetcher> {
    #[cfg(feature = "http")]
    {
        Arc::new(HttpFetcher::new(timeout))
    }
    #[cfg(not(feature = "http"))]
    {
        let _ = timeout;
        Arc::new(OfflineFetcher)
    }
}

/// Decode the payload of a `data:` URI (base64 or percent-encoded)
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let url = DataUrl::process(uri)
        .map_err(|e| Error::ImageResolutionError(format!("malformed data URI: {:?}", e)))?;
    let (bytes, _) = url
        .decode_to_vec()
        .map_err(|e| Error::ImageResolutionError(format!("invalid base64 in data URI: {:?}", e)))?;
    if bytes.len() > MAX_ICON_BYTES {
        return Err(Error::ImageResolutionError("embedded icon is too large".into()));
    }
    Ok(bytes)
}

/// Turns icon references into pixels
#[derive(Clone)]
pub struct IconResolver {
    fetcher: Arc<dyn IconFetcher>,
}

impl IconResolver {
    pub fn new(fetcher: Arc<dyn IconFetcher>) -> Self {
        Self { fetcher }
    }

    /// Resolver that never touches the network
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineFetcher))
    }

    /// Raw encoded bytes for a source
    pub fn load_bytes(&self, source: &IconSource) -> Result<Vec<u8>> {
        match source {
            IconSource::Default => Ok(DEFAULT_ICON_PNG.to_vec()),
            IconSource::DataUri(uri) => decode_data_uri(uri),
            IconSource::Remote(url) => self.fetcher.fetch(url),
            IconSource::File(path) => std::fs::read(path).map_err(|e| {
                Error::ImageResolutionError(format!("failed to read {}: {}", path.display(), e))
            }),
            IconSource::Unsupported(value) => Err(Error::ImageResolutionError(format!(
                "unsupported icon reference '{}'",
                value
            ))),
        }
    }

    /// Fetch and decode a source
    pub fn resolve(&self, source: &IconSource) -> Result<RgbaImage> {
        let bytes = self.load_bytes(source)?;
        let img = image::load_from_memory(&bytes)
            .map_err(|e| Error::ImageResolutionError(format!("failed to decode icon: {}", e)))?;
        Ok(img.to_rgba8())
    }

    /// Resolve a source, substituting the bundled icon on failure.
    ///
    /// Returns `None` only if the bundled icon itself cannot be decoded; the
    /// caller then leaves the icon area transparent.
    pub fn resolve_or_default(&self, source: &IconSource) -> Option<RgbaImage> {
        match self.resolve(source) {
            Ok(img) => Some(img),
            Err(e) => {
                if !source.is_default() {
                    log::warn!("{}; using the default icon", e);
                }
                match self.resolve(&IconSource::Default) {
                    Ok(img) => Some(img),
                    Err(e) => {
                        log::warn!("default icon unavailable: {}", e);
                        None
                    }
                }
            }
        }
    }
}

impl Default for IconResolver {
    fn default() -> Self {
        Self::new(default_fetcher(Duration::from_secs(10)))
    }
}

/// Center-crop to a square and resample to `side × side` (object-fit: cover)
pub fn cover_square(img: &RgbaImage, side: u32) -> RgbaImage {
    let min_dim = img.width().min(img.height()).max(1);
    let left = (img.width().saturating_sub(min_dim)) / 2;
    let top = (img.height().saturating_sub(min_dim)) / 2;
    let cropped = image::imageops::crop_imm(img, left, top, min_dim, min_dim).to_image();
    image::imageops::resize(
        &cropped,
        side.max(1),
        side.max(1),
        image::imageops::FilterType::Lanczos3,
    )
}
