//! Reviewable cases and the vocabulary used to judge them.

mod rating;
mod status;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use rating::{Rating, RatingCounts};
pub use status::MaskStatus;

/// One image, plus an optional mask, awaiting a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// Absolute (root-joined) path of the image.
    pub image_path: PathBuf,
    /// Path of the mask, when one could be attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_path: Option<PathBuf>,
    /// Classification of the mask.
    pub mask_status: MaskStatus,
    /// Subject grouping, only set by a unique-subject mapping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
}

impl Case {
    /// Create a case without a mask.
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
            mask_path: None,
            mask_status: MaskStatus::NoMaskFound,
            subject_id: None,
        }
    }

    /// Attach a loadable mask.
    pub fn with_mask(mut self, mask_path: impl Into<PathBuf>) -> Self {
        self.mask_path = Some(mask_path.into());
        self.mask_status = MaskStatus::MaskLoaded;
        self
    }

    /// Set the mask status without a mask path.
    pub fn with_status(mut self, status: MaskStatus) -> Self {
        self.mask_status = status;
        self
    }

    /// Set the subject this case is a candidate for.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    /// File name of the image, for display.
    pub fn name(&self) -> String {
        self.image_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image_path.display().to_string())
    }

    /// Mask path, if any.
    pub fn mask(&self) -> Option<&Path> {
        self.mask_path.as_deref()
    }

    /// Replace the mask with an edited one.
    pub(crate) fn mark_edited(&mut self, mask_path: PathBuf) {
        self.mask_path = Some(mask_path);
        self.mask_status = MaskStatus::MaskEdited;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let case = Case::new("/data/p1.nii")
            .with_mask("/data/p1_mask.nii.gz")
            .with_subject("P1");

        assert_eq!(case.mask_status, MaskStatus::MaskLoaded);
        assert_eq!(case.mask(), Some(Path::new("/data/p1_mask.nii.gz")));
        assert_eq!(case.subject_id.as_deref(), Some("P1"));
        assert_eq!(case.name(), "p1.nii");
    }

    #[test]
    fn test_mark_edited() {
        let mut case = Case::new("/data/p1.nii").with_status(MaskStatus::MaskPathInvalid);
        case.mark_edited(PathBuf::from("/data/p1_mask_2024.nii.gz"));

        assert_eq!(case.mask_status, MaskStatus::MaskEdited);
        assert_eq!(case.mask(), Some(Path::new("/data/p1_mask_2024.nii.gz")));
    }
}
