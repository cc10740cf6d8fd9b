//! External binary resolution
//!
//! Locates the separation engine (demucs) and the transcoder (ffmpeg) by
//! walking an ordered candidate chain: explicit override, then every
//! directory on PATH, then known local install locations (a project-local
//! `.venv`, covering both Unix and Windows executable layouts). Candidates
//! are evaluated lazily and the first hit wins. Nothing is cached; each
//! request resolves afresh.

use crate::config::Config;
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

/// Which external tool to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryKind {
    /// The source-separation engine (required)
    Separator,
    /// The audio transcoder (optional; only needed for disallowed formats)
    Transcoder,
}

impl BinaryKind {
    /// Command name as installed on PATH
    pub fn command_name(self) -> &'static str {
        match self {
            BinaryKind::Separator => "demucs",
            BinaryKind::Transcoder => "ffmpeg",
        }
    }

    /// Environment variable that overrides resolution for this kind
    fn override_var(self) -> &'static str {
        match self {
            BinaryKind::Separator => "DEMUCS_BIN",
            BinaryKind::Transcoder => "FFMPEG_BIN",
        }
    }
}

/// Resolves executable paths for the external tools
pub struct BinaryResolver {
    separator_override: Option<PathBuf>,
    transcoder_override: Option<PathBuf>,
    search_path: Option<OsString>,
    local_roots: Vec<PathBuf>,
}

impl BinaryResolver {
    /// Build a resolver from service configuration plus the process environment
    pub fn from_config(config: &Config) -> Self {
        Self::with_paths(
            config.demucs_bin.clone(),
            config.ffmpeg_bin.clone(),
            std::env::var_os("PATH"),
            default_local_roots(),
        )
    }

    /// Build a resolver with explicit search inputs (no environment access)
    pub fn with_paths(
        separator_override: Option<PathBuf>,
        transcoder_override: Option<PathBuf>,
        search_path: Option<OsString>,
        local_roots: Vec<PathBuf>,
    ) -> Self {
        Self {
            separator_override,
            transcoder_override,
            search_path,
            local_roots,
        }
    }

    /// Resolve a required binary, failing with a configuration error if no
    /// candidate exists
    pub fn resolve(&self, kind: BinaryKind) -> Result<PathBuf> {
        self.try_resolve(kind).ok_or_else(|| {
            Error::Config(format!(
                "{} not found. Install it on PATH or in a local .venv, or set {} to override.",
                kind.command_name(),
                kind.override_var()
            ))
        })
    }

    /// Resolve a binary, returning None if no candidate exists
    pub fn try_resolve(&self, kind: BinaryKind) -> Option<PathBuf> {
        // An explicit override is honored as-is, even if the file is missing;
        // a misconfigured override should surface as a spawn failure, not be
        // silently replaced by a different executable.
        let override_path = match kind {
            BinaryKind::Separator => &self.separator_override,
            BinaryKind::Transcoder => &self.transcoder_override,
        };
        if let Some(path) = override_path {
            debug!(kind = kind.command_name(), path = %path.display(), "using override binary");
            return Some(path.clone());
        }

        let found = self.candidates(kind).find(|p| is_executable_file(p));
        if let Some(path) = &found {
            debug!(kind = kind.command_name(), path = %path.display(), "resolved binary");
        }
        found
    }

    /// Ordered candidate paths after the override tier: PATH entries first,
    /// then local install locations
    fn candidates(&self, kind: BinaryKind) -> impl Iterator<Item = PathBuf> + '_ {
        let name = kind.command_name();

        let path_entries = self
            .search_path
            .iter()
            .flat_map(|p| std::env::split_paths(p).collect::<Vec<_>>())
            .flat_map(move |dir| {
                exe_names(name)
                    .into_iter()
                    .map(move |exe| dir.join(exe))
                    .collect::<Vec<_>>()
            });

        let local_entries = self.local_roots.iter().flat_map(move |root| {
            [
                root.join(".venv").join("bin").join(name),
                root.join(".venv").join("Scripts").join(format!("{name}.exe")),
            ]
        });

        path_entries.chain(local_entries)
    }
}

/// True for a regular file the process could actually spawn. On Unix the
/// executable bits matter; a plain data file named `demucs` on PATH must
/// not be selected.
fn is_executable_file(path: &std::path::Path) -> bool {
    let Ok(metadata) = path.metadata() else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Platform filename variants for a command on PATH
fn exe_names(name: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![format!("{name}.exe"), name.to_string()]
    } else {
        vec![name.to_string()]
    }
}

/// Directories whose `.venv` may hold a local install: the working directory
/// and the directory containing this executable
fn default_local_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            roots.push(dir.to_path_buf());
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch_executable(path: &std::path::Path) {
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn override_wins_over_path_match() {
        let dir = tempfile::tempdir().unwrap();
        let path_hit = dir.path().join("demucs");
        touch_executable(&path_hit);

        let override_path = PathBuf::from("/opt/custom/demucs");
        let resolver = BinaryResolver::with_paths(
            Some(override_path.clone()),
            None,
            Some(dir.path().as_os_str().to_os_string()),
            vec![],
        );

        assert_eq!(
            resolver.resolve(BinaryKind::Separator).unwrap(),
            override_path
        );
    }

    #[test]
    fn path_search_finds_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path_hit = dir.path().join("demucs");
        touch_executable(&path_hit);

        let resolver = BinaryResolver::with_paths(
            None,
            None,
            Some(dir.path().as_os_str().to_os_string()),
            vec![],
        );

        assert_eq!(resolver.resolve(BinaryKind::Separator).unwrap(), path_hit);
    }

    #[test]
    fn local_venv_is_last_resort() {
        let root = tempfile::tempdir().unwrap();
        let bin_dir = root.path().join(".venv").join("bin");
        fs::create_dir_all(&bin_dir).unwrap();
        let venv_hit = bin_dir.join("demucs");
        touch_executable(&venv_hit);

        let resolver =
            BinaryResolver::with_paths(None, None, None, vec![root.path().to_path_buf()]);

        assert_eq!(resolver.resolve(BinaryKind::Separator).unwrap(), venv_hit);
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_path_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let data_file = dir.path().join("demucs");
        fs::write(&data_file, "not a binary").unwrap();
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&data_file, fs::Permissions::from_mode(0o644)).unwrap();

        let resolver = BinaryResolver::with_paths(
            None,
            None,
            Some(dir.path().as_os_str().to_os_string()),
            vec![],
        );

        let err = resolver.resolve(BinaryKind::Separator).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_required_binary_is_config_error() {
        let resolver = BinaryResolver::with_paths(None, None, None, vec![]);
        let err = resolver.resolve(BinaryKind::Separator).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_transcoder_is_not_an_error_here() {
        let resolver = BinaryResolver::with_paths(None, None, None, vec![]);
        assert!(resolver.try_resolve(BinaryKind::Transcoder).is_none());
    }
}
