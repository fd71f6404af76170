//! Status command - show review progress and verdict counts.

use std::path::PathBuf;

use colored::Colorize;
use segreview::{AnnotationLog, Rating};

use super::inspect_session;

pub fn run(
    dir: PathBuf,
    config: Option<PathBuf>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = inspect_session(&dir, config)?;
    let records = session.log().load()?;
    let counts = AnnotationLog::summarize(&records);
    let progress = session.progress();

    let handled = progress.handled();
    let total = progress.previously_reviewed + progress.total;
    let fraction = progress.overall_fraction();

    if json_output {
        let status = serde_json::json!({
            "root": session.root(),
            "layout": session.layout(),
            "reviewed": progress.previously_reviewed,
            "pending": progress.remaining(),
            "skipped_subjects": progress.skipped,
            "accepted_subjects": session.accepted_subjects().len(),
            "verdicts": counts,
            "is_complete": session.is_finished(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Review status for".cyan().bold(),
        dir.display().to_string().white()
    );
    println!("Layout: {}", session.layout());
    println!();

    let bar_width = 30;
    let filled = (fraction * bar_width as f64).round() as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);
    println!(
        "Progress: {} {}/{} ({:.0}%)",
        bar.cyan(),
        handled.to_string().white().bold(),
        total,
        fraction * 100.0
    );
    println!();

    println!("{}", "Verdicts:".yellow().bold());
    for rating in Rating::ALL {
        let count = counts.get(rating).to_string();
        let count = if rating.is_accept() {
            count.green()
        } else {
            count.red()
        };
        println!("  [{}] {:<34} {}", rating.score(), rating.label(), count);
    }
    println!();

    if session.layout().groups_subjects() {
        println!(
            "Subjects accepted: {}",
            session.accepted_subjects().len().to_string().green()
        );
        println!();
    }

    if session.is_finished() {
        println!("{}", "All files checked.".green().bold());
    } else {
        println!(
            "Run {} to continue.",
            format!("segreview review {}", dir.display()).yellow()
        );
    }

    Ok(())
}
