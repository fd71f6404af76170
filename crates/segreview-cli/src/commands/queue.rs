//! Queue command - list the cases still waiting for a verdict.

use std::path::PathBuf;

use colored::Colorize;

use super::{colored_status, display_path, inspect_session};

pub fn run(
    dir: PathBuf,
    config: Option<PathBuf>,
    limit: Option<usize>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = inspect_session(&dir, config)?;
    let upcoming = session.upcoming();
    let shown = &upcoming[..limit.unwrap_or(upcoming.len()).min(upcoming.len())];

    if json_output {
        let queue = serde_json::json!({
            "root": session.root(),
            "layout": session.layout(),
            "pending": upcoming.len(),
            "cases": shown,
        });
        println!("{}", serde_json::to_string_pretty(&queue)?);
        return Ok(());
    }

    if upcoming.is_empty() {
        println!("{}", "All files checked.".green());
        return Ok(());
    }

    println!(
        "{} {} ({} pending)",
        "Queue for".cyan().bold(),
        dir.display().to_string().white(),
        upcoming.len()
    );
    println!();

    for (index, case) in shown.iter().enumerate() {
        let subject = case
            .subject_id
            .as_deref()
            .map(|s| format!(" [{}]", s))
            .unwrap_or_default();
        println!(
            "{:>4}. {}{}  {}",
            index + 1,
            display_path(session.root(), &case.image_path),
            subject.cyan(),
            colored_status(case.mask_status)
        );
    }

    if shown.len() < upcoming.len() {
        println!("  ... and {} more", upcoming.len() - shown.len());
    }

    Ok(())
}
