//! Interfaces to the image I/O side of the application.
//!
//! The session never decodes volumes. A viewer implements [`CaseLoader`] to
//! display a case and [`MaskWriter`] to persist an edited mask; the session
//! only cares whether loading worked and where the new mask ended up.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::case::Case;
use crate::config::ReviewConfig;
use crate::error::{ReviewError, Result};

const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Outcome of loading a case for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Image and mask (if any) loaded.
    Loaded,
    /// Image loaded, mask failed.
    ImageOnly { reason: String },
    /// Image failed to load.
    Failed { reason: String },
}

impl LoadOutcome {
    /// Check if the image itself could be shown.
    pub fn image_loaded(&self) -> bool {
        !matches!(self, LoadOutcome::Failed { .. })
    }
}

/// Loads a case into viewable form.
pub trait CaseLoader {
    fn load_case(&self, image: &Path, mask: Option<&Path>) -> LoadOutcome;
}

/// Persists an edited mask and reports where it was written.
pub trait MaskWriter {
    fn write_mask(&self, case: &Case, bytes: &[u8]) -> Result<PathBuf>;
}

/// Loader that only checks both files can be opened.
///
/// Useful for front-ends without a renderer and as a pre-flight check.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCaseLoader;

impl CaseLoader for FileCaseLoader {
    fn load_case(&self, image: &Path, mask: Option<&Path>) -> LoadOutcome {
        if let Err(e) = File::open(image) {
            return LoadOutcome::Failed {
                reason: e.to_string(),
            };
        }
        match mask.map(File::open) {
            Some(Err(e)) => LoadOutcome::ImageOnly {
                reason: e.to_string(),
            },
            _ => LoadOutcome::Loaded,
        }
    }
}

/// Writes edited masks next to the original under a timestamped name.
///
/// `p1_mask.nii.gz` edited at 14:03:07 becomes
/// `p1_mask_2024-05-02_14-03-07.nii.gz`. A case without a mask gets one named
/// after its image and the mask marker. An existing file is never replaced; a
/// numeric suffix is added instead.
#[derive(Debug, Clone)]
pub struct TimestampedMaskWriter {
    mask_marker: String,
    extension: String,
    fixed_time: Option<DateTime<Local>>,
}

impl TimestampedMaskWriter {
    /// Writer using the mask naming of `config`.
    pub fn from_config(config: &ReviewConfig) -> Self {
        Self {
            mask_marker: config.mask_marker.clone(),
            extension: config.scan_mask_extension.clone(),
            fixed_time: None,
        }
    }

    /// Stamp every file with `time` instead of the current time.
    pub fn at(mut self, time: DateTime<Local>) -> Self {
        self.fixed_time = Some(time);
        self
    }

    /// File name the next edit of `case` would start from.
    pub fn base_path(&self, case: &Case) -> PathBuf {
        let (source, marker) = match case.mask() {
            Some(mask) => (mask, ""),
            None => (case.image_path.as_path(), self.mask_marker.as_str()),
        };

        let name = source
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = name.split('.').next().unwrap_or_default();
        let stamp = self
            .fixed_time
            .unwrap_or_else(Local::now)
            .format(STAMP_FORMAT);

        source.with_file_name(format!("{}{}_{}", stem, marker, stamp))
    }
}

impl Default for TimestampedMaskWriter {
    fn default() -> Self {
        Self::from_config(&ReviewConfig::default())
    }
}

impl MaskWriter for TimestampedMaskWriter {
    fn write_mask(&self, case: &Case, bytes: &[u8]) -> Result<PathBuf> {
        let base = self.base_path(case);

        let mut attempt = 0usize;
        loop {
            let mut name = base.clone().into_os_string();
            if attempt > 0 {
                name.push(format!("_{}", attempt));
            }
            name.push(&self.extension);
            let path = PathBuf::from(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(bytes)
                        .and_then(|_| file.flush())
                        .map_err(|source| ReviewError::MaskWrite {
                            path: path.clone(),
                            source,
                        })?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(source) => return Err(ReviewError::MaskWrite { path, source }),
            }
        }
    }
}
