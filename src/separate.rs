//! Separation engine invocation
//!
//! Runs Demucs as a subprocess and locates its output by the engine's
//! documented layout: stems land in `<output_root>/<model>/<input stem>/`.
//! The engine is a black box; the only contract is the argument list and
//! that directory convention.

use crate::binaries::{BinaryKind, BinaryResolver};
use crate::error::{Error, Result};
use crate::util::{diagnostics, file_stem_lossy};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

/// Run the separation engine on `input`, writing under `output_root`.
///
/// Returns the directory holding the produced stem files. A zero exit
/// without that directory is still a separation failure; some engine
/// wrappers exit cleanly after doing nothing.
pub async fn separate(
    input: &Path,
    output_root: &Path,
    model: &str,
    resolver: &BinaryResolver,
) -> Result<PathBuf> {
    let demucs = resolver.resolve(BinaryKind::Separator)?;

    info!(
        engine = %demucs.display(),
        model = model,
        input = %input.display(),
        "running source separation"
    );

    let output = Command::new(&demucs)
        .args(["-n", model, "-o"])
        .arg(output_root)
        .arg(input)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| Error::Separation(format!("failed to spawn separation engine: {e}")))?;

    if !output.status.success() {
        return Err(Error::Separation(format!(
            "engine exited with {}: {}",
            output.status,
            diagnostics(&output)
        )));
    }

    let stem_dir = output_root.join(model).join(file_stem_lossy(input));
    if !stem_dir.is_dir() {
        return Err(Error::Separation(format!(
            "engine output missing at {}",
            stem_dir.display()
        )));
    }

    info!(stem_dir = %stem_dir.display(), "separation complete");
    Ok(stem_dir)
}
