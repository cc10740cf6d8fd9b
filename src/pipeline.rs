//! Request pipeline orchestration
//!
//! One upload runs the full sequence inside a single ephemeral workspace:
//! persist the bytes, transcode if the format requires it, run the
//! separation engine, zip the stems. The workspace is a `TempDir`, so it
//! is removed on every exit path when the guard drops, including early
//! error returns. Steps are strictly sequential and never retried; the
//! first failure aborts the request.

use crate::binaries::BinaryResolver;
use crate::error::{Error, Result};
use crate::util::file_stem_lossy;
use crate::{package, separate, transcode};
use std::fmt;
use std::path::Path;
use tracing::{info, instrument};

/// Outcome of a successful pipeline run
pub struct SeparatedArchive {
    /// Complete zip archive, ready for streaming
    pub archive: Vec<u8>,
    /// Suggested download filename (`<original stem>_stems.zip`)
    pub download_name: String,
    /// Separation model that produced the stems
    pub model: String,
}

impl fmt::Debug for SeparatedArchive {
    // Manual impl so assertion failures print the archive size, not
    // megabytes of raw bytes
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeparatedArchive")
            .field("archive_bytes", &self.archive.len())
            .field("download_name", &self.download_name)
            .field("model", &self.model)
            .finish()
    }
}

/// The stem separation pipeline for one request
pub struct SeparationPipeline {
    model: String,
    resolver: BinaryResolver,
}

impl SeparationPipeline {
    pub fn new(model: String, resolver: BinaryResolver) -> Self {
        Self { model, resolver }
    }

    /// Run the full pipeline over one uploaded file.
    ///
    /// `filename` is the client-supplied name; only its base component is
    /// honored, so path traversal in the upload name cannot escape the
    /// workspace.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn handle(&self, filename: &str, data: &[u8]) -> Result<SeparatedArchive> {
        if filename.is_empty() {
            return Err(Error::InvalidRequest("file required".to_string()));
        }
        let base_name = Path::new(filename)
            .file_name()
            .ok_or_else(|| Error::InvalidRequest("upload has no usable filename".to_string()))?;

        // Workspace guard: dropped (and the directory deleted) on every
        // return path below.
        let workspace = tempfile::tempdir()?;
        let workdir = workspace.path();

        let input_path = workdir.join(base_name);
        tokio::fs::write(&input_path, data).await?;
        info!(input = %input_path.display(), "upload persisted to workspace");

        let processed = transcode::transcode_if_needed(&input_path, workdir, &self.resolver).await?;

        let output_root = workdir.join("separated");
        let stem_dir =
            separate::separate(&processed, &output_root, &self.model, &self.resolver).await?;

        let archive = package::package_stems(&stem_dir).await?;
        info!(archive_bytes = archive.len(), "stem archive assembled");

        Ok(SeparatedArchive {
            archive,
            download_name: format!("{}_stems.zip", file_stem_lossy(&input_path)),
            model: self.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `Result<SeparatedArchive, _>::unwrap_err` in the integration tests
    // needs this type to be Debug; keep the impl compact rather than
    // dumping archive contents.
    #[test]
    fn debug_reports_archive_size_not_contents() {
        let result = SeparatedArchive {
            archive: vec![0xAB; 64],
            download_name: "song_stems.zip".to_string(),
            model: "htdemucs".to_string(),
        };

        let rendered = format!("{result:?}");
        assert!(rendered.contains("archive_bytes: 64"), "got: {rendered}");
        assert!(rendered.contains("song_stems.zip"));
        assert!(!rendered.contains("171"), "raw bytes leaked: {rendered}");
    }
}
