//! CLI command implementations.

pub mod queue;
pub mod rate;
pub mod review;
pub mod status;

use std::path::{Path, PathBuf};

use colored::Colorize;
use segreview::{Case, MaskStatus, ReviewConfig, ReviewSession};

/// Open the session at `dir`, using an explicit config file when given.
pub fn open_session(dir: &Path, config: Option<PathBuf>) -> segreview::Result<ReviewSession> {
    tracing::debug!(root = %dir.display(), config = ?config, "Opening session");
    ReviewSession::open_with_config(dir, load_config(dir, config)?)
}

/// Open the session at `dir` for viewing only; the diagnostic trail is not written.
pub fn inspect_session(dir: &Path, config: Option<PathBuf>) -> segreview::Result<ReviewSession> {
    tracing::debug!(root = %dir.display(), config = ?config, "Inspecting session");
    ReviewSession::inspect(dir, load_config(dir, config)?)
}

fn load_config(dir: &Path, config: Option<PathBuf>) -> segreview::Result<ReviewConfig> {
    match config {
        Some(path) => ReviewConfig::from_json_file(path),
        None => ReviewConfig::for_root(dir),
    }
}

/// Path of `path` relative to the session root, for display.
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Print one case block.
pub fn print_case(root: &Path, case: &Case) {
    println!("  Image:   {}", display_path(root, &case.image_path).white().bold());
    match case.mask() {
        Some(mask) => println!("  Mask:    {}", display_path(root, mask)),
        None => println!("  Mask:    {}", "-".dimmed()),
    }
    println!("  Status:  {}", colored_status(case.mask_status));
    if let Some(subject) = &case.subject_id {
        println!("  Subject: {}", subject.cyan());
    }
}

pub fn colored_status(status: MaskStatus) -> colored::ColoredString {
    match status {
        MaskStatus::MaskLoaded => status.label().green(),
        MaskStatus::MaskEdited => status.label().blue(),
        MaskStatus::MaskPathInvalid => status.label().red(),
        MaskStatus::NoMaskFound => status.label().yellow(),
    }
}
