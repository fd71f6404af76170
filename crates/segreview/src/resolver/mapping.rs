//! Case resolution from mapping tables.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::annotation::DiagnosticTrail;
use crate::case::{Case, MaskStatus};
use crate::config::ReviewConfig;
use crate::error::{ReviewError, Result};

const SUBJECT_COLUMN: &str = "subj_id";
const IMAGE_COLUMN: &str = "img_path";
const MASK_COLUMN: &str = "mask_path";

/// Column positions found in the header row.
struct Columns {
    subject: Option<usize>,
    image: usize,
    mask: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord, with_subjects: bool, table: &Path) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let image = position(IMAGE_COLUMN).ok_or_else(|| ReviewError::MappingTable {
            path: table.to_path_buf(),
            message: format!("missing required column '{}'", IMAGE_COLUMN),
        })?;

        let subject = if with_subjects {
            Some(position(SUBJECT_COLUMN).ok_or_else(|| ReviewError::MappingTable {
                path: table.to_path_buf(),
                message: format!("missing required column '{}'", SUBJECT_COLUMN),
            })?)
        } else {
            None
        };

        Ok(Self {
            subject,
            image,
            mask: position(MASK_COLUMN),
        })
    }
}

/// Resolve every usable row of a mapping table, in row order.
///
/// Rows whose image is missing or has an unrecognized extension are skipped,
/// as are repeats of an image already listed. Subject ids are kept as-is,
/// duplicates included.
pub(super) fn resolve_mapping(
    root: &Path,
    table: &Path,
    with_subjects: bool,
    config: &ReviewConfig,
    trail: &DiagnosticTrail,
) -> Result<Vec<Case>> {
    let file = File::open(table).map_err(|e| ReviewError::io(table, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| ReviewError::MappingTable {
        path: table.to_path_buf(),
        message: e.to_string(),
    })?;
    let columns = Columns::from_headers(headers, with_subjects, table)?;

    let mut cases = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    for (index, result) in reader.records().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                trail.warn(format!("Skipping unreadable mapping row {}: {}", line, e));
                continue;
            }
        };

        let image = row.get(columns.image).unwrap_or("");
        if image.is_empty() {
            trail.info(format!("Mapping row {} has no image path, skipping", line));
            continue;
        }

        let image_path = root.join(image);
        if !image_path.is_file() || !config.has_image_extension(image) {
            trail.info(format!(
                "File {} does not exist or has wrong extension, skipping",
                image
            ));
            continue;
        }

        if !seen.insert(image_path.clone()) {
            trail.warn(format!(
                "File {} is listed again on row {}, skipping",
                image, line
            ));
            continue;
        }

        let mask = columns.mask.and_then(|i| row.get(i)).unwrap_or("");
        let (mask_path, status) = classify_mask(root, mask, config);
        match status {
            MaskStatus::MaskLoaded => trail.info(format!("Found mask for {}", image)),
            MaskStatus::MaskPathInvalid => {
                trail.info(format!("Cannot load mask for {}, check path", image))
            }
            _ => trail.info(format!("No mask provided for {}", image)),
        }

        let mut case = Case::new(image_path).with_status(status);
        case.mask_path = mask_path;

        if let Some(subject_column) = columns.subject {
            match row.get(subject_column).filter(|s| !s.is_empty()) {
                Some(subject) => case = case.with_subject(subject),
                None => trail.warn(format!(
                    "Mapping row {} has no subject id, {} is reviewed on its own",
                    line, image
                )),
            }
        }

        cases.push(case);
    }

    Ok(cases)
}

/// Classify the mask named by a mapping row.
///
/// A mask with a recognized extension is either loaded (file exists) or
/// invalid (it does not). An empty entry, or one with any other extension,
/// counts as no mask at all.
pub(super) fn classify_mask(
    root: &Path,
    mask: &str,
    config: &ReviewConfig,
) -> (Option<PathBuf>, MaskStatus) {
    if mask.is_empty() || !config.has_image_extension(mask) {
        return (None, MaskStatus::NoMaskFound);
    }

    let mask_path = root.join(mask);
    if mask_path.is_file() {
        (Some(mask_path), MaskStatus::MaskLoaded)
    } else {
        (None, MaskStatus::MaskPathInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.nii.gz"), b"img").unwrap();
        fs::write(dir.path().join("a_seg.nii.gz"), b"mask").unwrap();
        dir
    }

    #[test]
    fn test_classify_mask() {
        let dir = fixture();
        let config = ReviewConfig::default();

        let (path, status) = classify_mask(dir.path(), "a_seg.nii.gz", &config);
        assert_eq!(status, MaskStatus::MaskLoaded);
        assert_eq!(path, Some(dir.path().join("a_seg.nii.gz")));

        let (path, status) = classify_mask(dir.path(), "missing.nii.gz", &config);
        assert_eq!(status, MaskStatus::MaskPathInvalid);
        assert_eq!(path, None);

        let (_, status) = classify_mask(dir.path(), "", &config);
        assert_eq!(status, MaskStatus::NoMaskFound);

        let (_, status) = classify_mask(dir.path(), "a_seg.png", &config);
        assert_eq!(status, MaskStatus::NoMaskFound);
    }

    #[test]
    fn test_missing_image_column_is_fatal() {
        let dir = fixture();
        let table = dir.path().join("mapping.csv");
        fs::write(&table, "image,mask\na.nii.gz,a_seg.nii.gz\n").unwrap();

        let result = resolve_mapping(
            dir.path(),
            &table,
            false,
            &ReviewConfig::default(),
            &DiagnosticTrail::disabled(),
        );
        assert!(matches!(result, Err(ReviewError::MappingTable { .. })));
    }

    #[test]
    fn test_missing_subject_column_is_fatal_in_unique_mode() {
        let dir = fixture();
        let table = dir.path().join("mapping_unique.csv");
        fs::write(&table, "img_path,mask_path\na.nii.gz,\n").unwrap();

        let result = resolve_mapping(
            dir.path(),
            &table,
            true,
            &ReviewConfig::default(),
            &DiagnosticTrail::disabled(),
        );
        assert!(matches!(result, Err(ReviewError::MappingTable { .. })));
    }

    #[test]
    fn test_mask_column_is_optional() {
        let dir = fixture();
        let table = dir.path().join("mapping.csv");
        fs::write(&table, "img_path\na.nii.gz\n").unwrap();

        let cases = resolve_mapping(
            dir.path(),
            &table,
            false,
            &ReviewConfig::default(),
            &DiagnosticTrail::disabled(),
        )
        .unwrap();

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].mask_status, MaskStatus::NoMaskFound);
    }
}
