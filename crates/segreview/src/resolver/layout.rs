//! Input layout detection.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ReviewConfig;

/// How the cases of a root are discovered.
///
/// Chosen once per session from the files present in the root, in priority
/// order: unique-subject mapping, plain mapping, directory scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LayoutMode {
    /// Every image file in the root, masks found by naming convention.
    Scan,
    /// Rows of `img_path, mask_path`.
    Mapping { table: PathBuf },
    /// Rows of `subj_id, img_path, mask_path`; one accepted case per subject.
    UniqueMapping { table: PathBuf },
}

impl LayoutMode {
    /// Pick the layout for a root.
    pub fn detect(root: &Path, config: &ReviewConfig) -> Self {
        let unique = root.join(&config.unique_mapping_file);
        if unique.is_file() {
            return LayoutMode::UniqueMapping { table: unique };
        }

        let plain = root.join(&config.mapping_file);
        if plain.is_file() {
            return LayoutMode::Mapping { table: plain };
        }

        LayoutMode::Scan
    }

    /// Check if cases are grouped by subject.
    pub fn groups_subjects(&self) -> bool {
        matches!(self, LayoutMode::UniqueMapping { .. })
    }

    /// Mapping table backing this layout, if any.
    pub fn table(&self) -> Option<&Path> {
        match self {
            LayoutMode::Scan => None,
            LayoutMode::Mapping { table } | LayoutMode::UniqueMapping { table } => Some(table),
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::Scan => write!(f, "directory scan"),
            LayoutMode::Mapping { .. } => write!(f, "mapping"),
            LayoutMode::UniqueMapping { .. } => write!(f, "unique-subject mapping"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_detect_priority() {
        let dir = TempDir::new().unwrap();
        let config = ReviewConfig::default();

        assert_eq!(LayoutMode::detect(dir.path(), &config), LayoutMode::Scan);

        fs::write(dir.path().join("mapping.csv"), "img_path,mask_path\n").unwrap();
        let mode = LayoutMode::detect(dir.path(), &config);
        assert!(matches!(mode, LayoutMode::Mapping { .. }));
        assert!(!mode.groups_subjects());

        fs::write(dir.path().join("mapping_unique.csv"), "subj_id,img_path,mask_path\n").unwrap();
        let mode = LayoutMode::detect(dir.path(), &config);
        assert!(mode.groups_subjects());
        assert_eq!(mode.table(), Some(dir.path().join("mapping_unique.csv").as_path()));
    }
}
