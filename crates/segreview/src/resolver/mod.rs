//! Discovery of reviewable cases.
//!
//! The layout of a root is decided once by [`LayoutMode::detect`] and the
//! matching strategy builds the ordered candidate list:
//!
//! | Layout          | Trigger                | Order           |
//! |-----------------|------------------------|-----------------|
//! | `UniqueMapping` | `mapping_unique.csv`   | table row order |
//! | `Mapping`       | `mapping.csv`          | table row order |
//! | `Scan`          | neither table present  | file name order |
//!
//! Missing masks and unusable rows degrade the affected case instead of
//! failing resolution; every decision is written to the diagnostic trail.

mod layout;
mod mapping;
mod scan;

use std::fs;
use std::path::Path;

use crate::annotation::DiagnosticTrail;
use crate::case::Case;
use crate::config::ReviewConfig;
use crate::error::{ReviewError, Result};

pub use layout::LayoutMode;
pub use scan::mask_name_for;

/// Candidate cases of a root, in discovery order.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Layout the cases were discovered with.
    pub layout: LayoutMode,
    /// Every candidate, before any already-reviewed filtering.
    pub cases: Vec<Case>,
}

impl Resolution {
    /// Number of candidates with a loadable mask.
    pub fn with_masks(&self) -> usize {
        self.cases
            .iter()
            .filter(|case| case.mask_status.has_mask())
            .count()
    }
}

/// Builds the candidate list of a session root.
#[derive(Debug, Clone, Default)]
pub struct CaseResolver {
    config: ReviewConfig,
}

impl CaseResolver {
    /// Create a resolver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with a custom configuration.
    pub fn with_config(config: ReviewConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Resolve the candidate cases of `root`.
    ///
    /// Fails only when the root cannot be read or a mapping table is
    /// malformed as a whole.
    pub fn resolve(&self, root: &Path, trail: &DiagnosticTrail) -> Result<Resolution> {
        // Fail early on an unreadable root, whatever the layout.
        fs::read_dir(root).map_err(|e| ReviewError::io(root, e))?;

        let layout = LayoutMode::detect(root, &self.config);
        let cases = match &layout {
            LayoutMode::UniqueMapping { table } => {
                trail.info("Found mappings between subjects, files and masks");
                mapping::resolve_mapping(root, table, true, &self.config, trail)?
            }
            LayoutMode::Mapping { table } => {
                trail.info("Found mappings between files and masks");
                mapping::resolve_mapping(root, table, false, &self.config, trail)?
            }
            LayoutMode::Scan => {
                trail.info("No mappings between files and masks");
                scan::scan_directory(root, &self.config, trail)?
            }
        };

        tracing::debug!(
            root = %root.display(),
            layout = %layout,
            cases = cases.len(),
            "Resolved cases"
        );

        Ok(Resolution { layout, cases })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_root_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = CaseResolver::new().resolve(&missing, &DiagnosticTrail::disabled());
        assert!(matches!(result, Err(ReviewError::Io { .. })));
    }

    #[test]
    fn test_with_masks() {
        let resolution = Resolution {
            layout: LayoutMode::Scan,
            cases: vec![
                Case::new("/r/a.nii").with_mask("/r/a_mask.nii.gz"),
                Case::new("/r/b.nii"),
            ],
        };
        assert_eq!(resolution.with_masks(), 1);
    }
}
