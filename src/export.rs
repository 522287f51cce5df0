//! Export controller
//!
//! Owns the `Idle`/`Exporting` flag, runs the blocking render on tokio's
//! blocking pool and hands the finished PNG to an [`ArtifactSink`].

use crate::rendering::CardRenderer;
use crate::{CardConfig, Error, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

pub const PNG_MIME: &str = "image/png";

/// A finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn mime_type(&self) -> &'static str {
        PNG_MIME
    }

    /// Hex SHA-256 of the PNG bytes
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

/// Destination for exported artifacts
pub trait ArtifactSink: Send + Sync {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<()>;
}

/// Writes artifacts into a directory.
///
/// Bytes go to a hidden temp file first and are renamed into place, so a
/// failed write never leaves a partial `ogp-*.png` behind.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!(".{}.part", artifact.filename));
        let dest = self.path_for(&artifact.filename);
        if let Err(e) = fs::write(&tmp, &artifact.bytes).and_then(|_| fs::rename(&tmp, &dest)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        log::info!("wrote {}", dest.display());
        Ok(())
    }
}

/// Keeps artifacts in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<ExportArtifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> Vec<ExportArtifact> {
        self.artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.artifacts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactSink for MemorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<()> {
        self.artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(artifact.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Exporting,
}

/// Returns the controller to `Idle` when the export work ends
struct ExportGuard(Arc<AtomicBool>);

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ExportController {
    renderer: Arc<CardRenderer>,
    sink: Arc<dyn ArtifactSink>,
    density: f32,
    exporting: Arc<AtomicBool>,
    last_stamp: AtomicU64,
}

impl ExportController {
    pub fn new(renderer: Arc<CardRenderer>, sink: Arc<dyn ArtifactSink>) -> Self {
        Self {
            renderer,
            sink,
            density: 1.0,
            exporting: Arc::new(AtomicBool::new(false)),
            last_stamp: AtomicU64::new(0),
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn state(&self) -> ExportState {
        if self.exporting.load(Ordering::Acquire) {
            ExportState::Exporting
        } else {
            ExportState::Idle
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.state() == ExportState::Exporting
    }

    /// Next `ogp-<millis>.png` name; stamps never repeat on one controller
    pub fn next_filename(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let prev = self
            .last_stamp
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(now.max(prev + 1))
            })
            .unwrap_or(0);
        format!("ogp-{}.png", now.max(prev + 1))
    }

    /// Render `config` at full preset resolution and deliver it.
    ///
    /// Returns `AlreadyInProgress` immediately if another export is running.
    /// The controller stays `Exporting` until the render and delivery finish,
    /// even if this future is dropped first.
    pub async fn export(&self, config: CardConfig) -> Result<ExportArtifact> {
        if self
            .exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("export requested while another is running");
            return Err(Error::AlreadyInProgress);
        }
        let guard = ExportGuard(Arc::clone(&self.exporting));

        let filename = self.next_filename();
        log::info!("exporting {} ({:?}, {:?})", filename, config.size, config.theme);

        let renderer = Arc::clone(&self.renderer);
        let sink = Arc::clone(&self.sink);
        let density = self.density;
        let task = tokio::task::spawn_blocking(move || -> Result<ExportArtifact> {
            let _guard = guard;
            let shot = renderer.render(&config, density)?;
            let artifact = ExportArtifact {
                filename,
                width: shot.width,
                height: shot.height,
                bytes: shot.png_data,
            };
            sink.deliver(&artifact).map_err(|e| match e {
                Error::RasterizationError(_) => e,
                other => Error::RasterizationError(format!(
                    "failed to deliver {}: {}",
                    artifact.filename, other
                )),
            })?;
            Ok(artifact)
        });

        let artifact = task
            .await
            .map_err(|e| Error::RasterizationError(format!("export task failed: {}", e)))??;

        log::info!(
            "exported {} {}x{} ({} bytes)",
            artifact.filename,
            artifact.width,
            artifact.height,
            artifact.bytes.len()
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str) -> ExportArtifact {
        ExportArtifact {
            filename: name.to_string(),
            width: 1,
            height: 1,
            bytes: b"png".to_vec(),
        }
    }

    #[test]
    fn digest_is_hex_sha256() {
        let a = artifact("x.png");
        assert_eq!(
            a.digest(),
            "8f8cbb7dcf46e0bc7d53265749a6c17d116093a6ba95e442764060c76fd4a86c"
        );
        assert_eq!(a.mime_type(), "image/png");
    }

    #[test]
    fn filenames_are_distinct_and_increasing() {
        let renderer = CardRenderer::from_parts(
            None,
            crate::icon::IconResolver::offline(),
            crate::text::default_classifier(),
            crate::Locale::En,
        );
        let controller = ExportController::new(Arc::new(renderer), Arc::new(MemorySink::new()));
        let stamp = |name: String| -> u64 {
            name.trim_start_matches("ogp-")
                .trim_end_matches(".png")
                .parse()
                .unwrap()
        };
        let stamps: Vec<u64> = (0..50).map(|_| stamp(controller.next_filename())).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
        assert!(stamps[0] > 1_600_000_000_000);
    }

    #[test]
    fn memory_sink_collects() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.deliver(&artifact("a.png")).unwrap();
        sink.deliver(&artifact("b.png")).unwrap();
        let names: Vec<String> = sink.artifacts().into_iter().map(|a| a.filename).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn directory_sink_leaves_no_temp_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out");
        let sink = DirectorySink::new(&dir);
        sink.deliver(&artifact("ogp-1.png")).unwrap();
        assert_eq!(fs::read(dir.join("ogp-1.png")).unwrap(), b"png");
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
