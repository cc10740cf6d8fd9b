//! Small shared helpers

use std::process::Output;

/// Diagnostic text from a finished subprocess: stderr when present,
/// otherwise stdout
pub(crate) fn diagnostics(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        return stderr.into_owned();
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// File stem (name without extension) as a lossy string
pub(crate) fn file_stem_lossy(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
