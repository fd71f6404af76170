//! Configuration for case discovery and session files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReviewError, Result};

/// Name of the optional per-root configuration file.
pub const ROOT_CONFIG_FILE: &str = "segreview.json";

/// File names and naming conventions used by a review session.
///
/// Every field has a default matching the layout reviewers already use, so a
/// JSON override only needs the keys it changes:
///
/// ```
/// use segreview::ReviewConfig;
///
/// let config: ReviewConfig = serde_json::from_str(r#"{"mask_marker": "_seg"}"#).unwrap();
/// assert_eq!(config.mask_marker, "_seg");
/// assert_eq!(config.annotations_file, "annotations.csv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// File name endings accepted as images (and masks).
    pub image_extensions: Vec<String>,
    /// Substring that marks a file as an image during a directory scan.
    pub scan_image_marker: String,
    /// Substring that marks a file as a mask; also the suffix of scanned masks.
    pub mask_marker: String,
    /// Extension of the sibling mask expected by a directory scan.
    pub scan_mask_extension: String,
    /// Mapping table without subject grouping.
    pub mapping_file: String,
    /// Mapping table with subject grouping; wins over `mapping_file`.
    pub unique_mapping_file: String,
    /// Append-only annotation log.
    pub annotations_file: String,
    /// Append-only diagnostic trail.
    pub trail_file: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            image_extensions: vec![".nii".into(), ".nii.gz".into(), ".nrrd".into()],
            scan_image_marker: ".nii".into(),
            mask_marker: "_mask".into(),
            scan_mask_extension: ".nii.gz".into(),
            mapping_file: "mapping.csv".into(),
            unique_mapping_file: "mapping_unique.csv".into(),
            annotations_file: "annotations.csv".into(),
            trail_file: "segmentation_review.log".into(),
        }
    }
}

impl ReviewConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ReviewError::io(path, e))?;
        let config: ReviewConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Use `segreview.json` from the root when it exists, defaults otherwise.
    pub fn for_root(root: impl AsRef<Path>) -> Result<Self> {
        let candidate = root.as_ref().join(ROOT_CONFIG_FILE);
        if candidate.is_file() {
            Self::from_json_file(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Set the accepted image extensions.
    pub fn with_image_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the mask marker used for scans.
    pub fn with_mask_marker(mut self, marker: impl Into<String>) -> Self {
        self.mask_marker = marker.into();
        self
    }

    /// Set the annotation log file name.
    pub fn with_annotations_file(mut self, name: impl Into<String>) -> Self {
        self.annotations_file = name.into();
        self
    }

    /// Set the diagnostic trail file name.
    pub fn with_trail_file(mut self, name: impl Into<String>) -> Self {
        self.trail_file = name.into();
        self
    }

    /// Whether a path ends with one of the recognized image extensions.
    pub fn has_image_extension(&self, path: &str) -> bool {
        self.image_extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }

    fn validate(&self) -> Result<()> {
        if self.image_extensions.is_empty() {
            return Err(ReviewError::Config(
                "image_extensions must not be empty".to_string(),
            ));
        }
        if self.mask_marker.is_empty() || self.scan_image_marker.is_empty() {
            return Err(ReviewError::Config(
                "scan_image_marker and mask_marker must not be empty".to_string(),
            ));
        }
        let names = [
            &self.mapping_file,
            &self.unique_mapping_file,
            &self.annotations_file,
            &self.trail_file,
        ];
        if names.iter().any(|name| name.is_empty()) {
            return Err(ReviewError::Config("file names must not be empty".to_string()));
        }
        Ok(())
    }
}
