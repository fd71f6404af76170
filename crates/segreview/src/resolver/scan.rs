//! Case resolution by scanning the root directory.

use std::fs;
use std::path::Path;

use crate::annotation::DiagnosticTrail;
use crate::case::Case;
use crate::config::ReviewConfig;
use crate::error::{ReviewError, Result};

/// Collect every image in `root`, sorted by file name.
///
/// A file is an image when its name contains the image marker and not the
/// mask marker. Its mask is `<base><mask marker><mask extension>`, where the
/// base is the name up to the first `.`.
pub(super) fn scan_directory(
    root: &Path,
    config: &ReviewConfig,
    trail: &DiagnosticTrail,
) -> Result<Vec<Case>> {
    let mut names: Vec<String> = fs::read_dir(root)
        .map_err(|e| ReviewError::io(root, e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    // read_dir order is platform dependent; resumption needs a stable order.
    names.sort();

    let mut cases = Vec::new();
    for name in names {
        if !is_candidate_image(&name, config) {
            trail.info(format!("File {} is not a candidate image, skipping", name));
            continue;
        }

        let mask_name = mask_name_for(&name, config);
        let mask_path = root.join(&mask_name);
        let case = if mask_path.is_file() {
            trail.info(format!("Found mask for {}", name));
            Case::new(root.join(&name)).with_mask(mask_path)
        } else {
            trail.info(format!("No mask for {}", name));
            Case::new(root.join(&name))
        };
        cases.push(case);
    }

    Ok(cases)
}

fn is_candidate_image(name: &str, config: &ReviewConfig) -> bool {
    name.contains(config.scan_image_marker.as_str()) && !name.contains(config.mask_marker.as_str())
}

/// Sibling mask file name for an image file name.
pub fn mask_name_for(image_name: &str, config: &ReviewConfig) -> String {
    let base = image_name.split('.').next().unwrap_or(image_name);
    format!("{}{}{}", base, config.mask_marker, config.scan_mask_extension)
}
