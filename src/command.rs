//! Turns the current settings and a URL into a companion invocation.

use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::settings::{is_known_bitrate, is_known_format, Settings};

/// File name of the companion downloader shipped next to this binary.
pub fn companion_file_name() -> String {
    format!("spotdl{}", std::env::consts::EXE_SUFFIX)
}

/// The companion is looked up beside the running executable, never on `PATH`,
/// so the bundled version is the one that runs.
pub fn companion_path() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    let path = dir.join(companion_file_name());
    debug!("Resolved companion path: {}", path.display());
    Ok(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no URL was provided")]
    EmptyUrl,

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported bitrate: {0}")]
    UnsupportedBitrate(String),
}

/// A validated URL plus the settings it will be downloaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub settings: Settings,
}

impl DownloadRequest {
    pub fn new(settings: &Settings, raw_url: &str) -> Result<Self, ValidationError> {
        let url = raw_url.trim();
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        if !is_known_format(&settings.format) {
            return Err(ValidationError::UnsupportedFormat(settings.format.clone()));
        }
        if !is_known_bitrate(&settings.bitrate) {
            return Err(ValidationError::UnsupportedBitrate(settings.bitrate.clone()));
        }

        Ok(Self {
            url: url.to_string(),
            settings: settings.clone(),
        })
    }
}

/// Program plus arguments, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
}

impl Invocation {
    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The full argument vector, program first.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl From<(&DownloadRequest, &Path)> for Invocation {
    fn from((request, executable): (&DownloadRequest, &Path)) -> Self {
        let settings = &request.settings;
        Self {
            program: executable.to_path_buf(),
            args: vec![
                "--audio".to_string(),
                settings.audio_provider.clone(),
                "--format".to_string(),
                settings.format.clone(),
                "--bitrate".to_string(),
                settings.bitrate.clone(),
                "--output".to_string(),
                settings.output_dir.clone(),
                request.url.clone(),
            ],
        }
    }
}

pub fn build(
    settings: &Settings,
    raw_url: &str,
    executable: &Path,
) -> Result<Invocation, ValidationError> {
    let request = DownloadRequest::new(settings, raw_url)?;
    let invocation = Invocation::from((&request, executable));
    debug!("Built command: {}", invocation.argv().join(" "));
    Ok(invocation)
}
