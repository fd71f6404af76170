//! A single durable verdict.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::case::{Case, MaskStatus, Rating};

/// One row of the annotation log.
///
/// Field order is the column order of the headerless log file:
/// `file, annotation, comment, mask_path, mask_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Image path relative to the session root.
    #[serde(rename = "file")]
    pub relative_image_path: String,

    /// Reviewer verdict.
    #[serde(rename = "annotation")]
    pub rating: Rating,

    /// Free-text comment.
    pub comment: String,

    /// Mask path relative to the session root, empty when there is none.
    #[serde(rename = "mask_path")]
    pub relative_mask_path: String,

    /// Mask status at the time of the verdict.
    pub mask_status: MaskStatus,
}

impl AnnotationRecord {
    /// Build the record for a verdict on `case`.
    pub fn from_case(
        case: &Case,
        root: &Path,
        rating: Rating,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            relative_image_path: relative_to(root, &case.image_path),
            rating,
            comment: comment.into(),
            relative_mask_path: case
                .mask()
                .map(|mask| relative_to(root, mask))
                .unwrap_or_default(),
            mask_status: case.mask_status,
        }
    }

    /// Resolve the stored image path against a session root.
    pub fn image_path(&self, root: &Path) -> PathBuf {
        root.join(&self.relative_image_path)
    }

    /// Resolve the stored mask path against a session root.
    pub fn mask_path(&self, root: &Path) -> Option<PathBuf> {
        if self.relative_mask_path.is_empty() {
            None
        } else {
            Some(root.join(&self.relative_mask_path))
        }
    }
}

/// Express `path` relative to `root`, keeping it unchanged when it lies
/// outside the root.
pub fn relative_to(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_case_strips_root() {
        let root = Path::new("/mnt/review");
        let case = Case::new("/mnt/review/imgs/p1.nii.gz").with_mask("/mnt/review/masks/p1.nii.gz");

        let record = AnnotationRecord::from_case(&case, root, Rating::AcceptableMinorChanges, "ok");

        assert_eq!(record.relative_image_path, "imgs/p1.nii.gz");
        assert_eq!(record.relative_mask_path, "masks/p1.nii.gz");
        assert_eq!(record.mask_status, MaskStatus::MaskLoaded);
        assert_eq!(record.image_path(root), case.image_path);
    }

    #[test]
    fn test_from_case_without_mask() {
        let root = Path::new("/mnt/review");
        let case = Case::new("/mnt/review/p2.nii");

        let record = AnnotationRecord::from_case(&case, root, Rating::BadImages, "");

        assert_eq!(record.relative_mask_path, "");
        assert_eq!(record.mask_path(root), None);
        assert_eq!(record.mask_status, MaskStatus::NoMaskFound);
    }

    #[test]
    fn test_relative_to_outside_root() {
        let path = Path::new("/elsewhere/p3.nii");
        assert_eq!(relative_to(Path::new("/mnt/review"), path), "/elsewhere/p3.nii");
    }

    #[test]
    fn test_portable_across_mount_points() {
        let case = Case::new("/mnt/a/p1.nii");
        let record = AnnotationRecord::from_case(&case, Path::new("/mnt/a"), Rating::BadImages, "");

        assert_eq!(
            record.image_path(Path::new("/media/b")),
            PathBuf::from("/media/b/p1.nii")
        );
    }
}
