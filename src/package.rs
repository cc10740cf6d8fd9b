//! Stem archive assembly
//!
//! Collects whichever of the four recognized stems the engine produced
//! into an in-memory deflate zip, flat-named (`drums.wav`, not nested).
//! Iteration order is fixed so repeated runs over the same stems yield
//! the same entry layout.

use crate::error::{Error, Result};
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// The recognized stem tracks, in archive order
pub const STEM_NAMES: [&str; 4] = ["drums", "bass", "vocals", "other"];

/// Bundle the stems in `stem_dir` into a zip archive in memory.
///
/// Missing stems are simply omitted; an archive with no entries is a
/// packaging failure, never returned.
pub async fn package_stems(stem_dir: &Path) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut found_any = false;
    for stem in STEM_NAMES {
        let stem_path = stem_dir.join(format!("{stem}.wav"));
        if !stem_path.is_file() {
            continue;
        }

        let data = tokio::fs::read(&stem_path).await?;
        debug!(stem = stem, bytes = data.len(), "adding stem to archive");

        writer
            .start_file(format!("{stem}.wav"), options)
            .map_err(|e| Error::Packaging(format!("failed to open archive entry: {e}")))?;
        writer
            .write_all(&data)
            .map_err(|e| Error::Packaging(format!("failed to write archive entry: {e}")))?;
        found_any = true;
    }

    if !found_any {
        return Err(Error::Packaging(
            "no stems produced by the separation engine".to_string(),
        ));
    }

    let cursor = writer
        .finish()
        .map_err(|e| Error::Packaging(format!("failed to finalize archive: {e}")))?;
    Ok(cursor.into_inner())
}
