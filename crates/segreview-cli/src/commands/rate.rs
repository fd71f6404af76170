//! Rate command - record one verdict without an interactive prompt.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use segreview::TimestampedMaskWriter;

use super::{display_path, open_session};

pub fn run(
    dir: PathBuf,
    config: Option<PathBuf>,
    score: u8,
    comment: String,
    mask: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(&dir, config)?;

    if session.is_finished() {
        return Err(format!("All files in {} are already checked", dir.display()).into());
    }

    if let Some(mask_file) = mask {
        let bytes = fs::read(&mask_file)
            .map_err(|e| format!("Cannot read {}: {}", mask_file.display(), e))?;
        let writer = TimestampedMaskWriter::from_config(session.config());
        let root = session.root().to_path_buf();
        let case = session.overwrite_mask(&writer, &bytes)?;
        if verbose {
            if let Some(stored) = case.mask() {
                println!("Stored edited mask as {}", display_path(&root, stored));
            }
        }
    }

    let record = session.submit_score(score, &comment)?;
    println!(
        "{} {} as {} ({})",
        "Rated".green().bold(),
        record.relative_image_path.white(),
        record.rating,
        record.mask_status
    );

    match session.current_case() {
        Some(next) => println!(
            "Next: {} ({} left)",
            display_path(session.root(), &next.image_path),
            session.progress().remaining()
        ),
        None => println!("{}", "All files checked.".green()),
    }

    Ok(())
}
