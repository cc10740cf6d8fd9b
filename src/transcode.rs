//! Conditional transcoding to a Demucs-friendly format
//!
//! Formats the engine accepts directly (wav, flac, mp3, m4a, ogg) pass
//! through untouched. Anything else (e.g. browser-recorded webm) is
//! rewritten as 44.1 kHz stereo WAV with ffmpeg before separation.

use crate::binaries::{BinaryKind, BinaryResolver};
use crate::error::{Error, Result};
use crate::util::{diagnostics, file_stem_lossy};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Extensions Demucs ingests without help
const ACCEPTED_EXTENSIONS: [&str; 5] = ["wav", "flac", "mp3", "m4a", "ogg"];

/// True if the file's extension is in the accepted set (case-insensitive)
pub fn is_accepted_format(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_EXTENSIONS.iter().any(|a| *a == ext)
        })
        .unwrap_or(false)
}

/// Transcode `input` into the workspace if its format requires it,
/// returning the path to feed the separation engine.
///
/// Accepted formats return the input path unchanged without spawning
/// anything. Other formats require a resolvable ffmpeg; its absence is a
/// configuration error rather than a transcode error, since no work was
/// attempted.
pub async fn transcode_if_needed(
    input: &Path,
    workspace: &Path,
    resolver: &BinaryResolver,
) -> Result<PathBuf> {
    if is_accepted_format(input) {
        debug!(input = %input.display(), "format accepted, skipping transcode");
        return Ok(input.to_path_buf());
    }

    let ffmpeg = resolver.try_resolve(BinaryKind::Transcoder).ok_or_else(|| {
        Error::Config(
            "transcoding required for this format but no ffmpeg installed \
             (install ffmpeg or upload wav/flac/mp3/m4a/ogg)"
                .to_string(),
        )
    })?;

    let output_path = workspace.join(format!("{}.wav", file_stem_lossy(input)));
    info!(
        input = %input.display(),
        output = %output_path.display(),
        "transcoding to 44.1 kHz stereo wav"
    );

    let output = Command::new(&ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(input)
        .args(["-ar", "44100", "-ac", "2"])
        .arg(&output_path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| Error::Transcode(format!("failed to spawn ffmpeg: {e}")))?;

    if !output.status.success() || !output_path.exists() {
        return Err(Error::Transcode(format!(
            "ffmpeg could not transcode input: {}",
            diagnostics(&output)
        )));
    }

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binaries::BinaryResolver;

    fn empty_resolver() -> BinaryResolver {
        BinaryResolver::with_paths(None, None, None, vec![])
    }

    #[tokio::test]
    async fn accepted_formats_pass_through_without_a_transcoder() {
        let workspace = tempfile::tempdir().unwrap();
        for name in ["a.wav", "b.flac", "c.mp3", "d.m4a", "e.ogg", "F.WAV"] {
            let input = workspace.path().join(name);
            let out = transcode_if_needed(&input, workspace.path(), &empty_resolver())
                .await
                .unwrap();
            assert_eq!(out, input);
        }
    }

    #[tokio::test]
    async fn unaccepted_format_without_transcoder_is_config_error() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("clip.webm");
        let err = transcode_if_needed(&input, workspace.path(), &empty_resolver())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn extension_sniffing() {
        assert!(is_accepted_format(Path::new("x.ogg")));
        assert!(!is_accepted_format(Path::new("x.webm")));
        assert!(!is_accepted_format(Path::new("noext")));
    }
}
