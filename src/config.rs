//! Configuration for stemserve
//!
//! All settings come from the command line or environment (clap `env`
//! fallbacks); there is no config file and nothing is persisted.

use clap::Parser;
use std::path::PathBuf;

/// Default Demucs model when none is configured
pub const DEFAULT_MODEL: &str = "htdemucs";

/// Command-line / environment options
#[derive(Debug, Parser)]
#[command(name = "stemserve", version, about = "Audio stem separation service")]
pub struct Args {
    /// Port to listen on
    #[arg(long, env = "STEMSERVE_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Demucs model name passed to the engine with -n
    #[arg(long, env = "DEMUCS_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Explicit path to the demucs executable (skips PATH / local search)
    #[arg(long, env = "DEMUCS_BIN")]
    pub demucs_bin: Option<PathBuf>,

    /// Explicit path to the ffmpeg executable (skips PATH / local search)
    #[arg(long, env = "FFMPEG_BIN")]
    pub ffmpeg_bin: Option<PathBuf>,
}

/// Resolved service configuration shared with HTTP handlers
#[derive(Debug, Clone)]
pub struct Config {
    /// Demucs model name (drives the engine's output directory layout)
    pub model: String,
    /// Override path for the separation engine binary
    pub demucs_bin: Option<PathBuf>,
    /// Override path for the transcoder binary
    pub ffmpeg_bin: Option<PathBuf>,
}

impl Config {
    pub fn from_args(args: &Args) -> Self {
        Self {
            model: args.model.clone(),
            demucs_bin: args.demucs_bin.clone(),
            ffmpeg_bin: args.ffmpeg_bin.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            demucs_bin: None,
            ffmpeg_bin: None,
        }
    }
}
