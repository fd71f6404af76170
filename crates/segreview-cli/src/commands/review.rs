//! Review command - walk the pending cases in the terminal.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use segreview::{FileCaseLoader, LoadOutcome, Rating, TimestampedMaskWriter};

use super::{colored_status, display_path, open_session, print_case};

enum Action {
    Rate(Rating),
    ReplaceMask,
    Quit,
}

pub fn run(
    dir: PathBuf,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(&dir, config)?;
    let writer = TimestampedMaskWriter::from_config(session.config());
    let theme = ColorfulTheme::default();

    let progress = session.progress();
    println!(
        "{} {} ({})",
        "Reviewing".cyan().bold(),
        dir.display().to_string().white(),
        session.layout()
    );
    if progress.previously_reviewed > 0 {
        println!(
            "Resuming: {} already reviewed, {} left",
            progress.previously_reviewed,
            progress.remaining()
        );
    }
    println!();

    let mut options: Vec<String> = Rating::ALL
        .iter()
        .map(|r| format!("[{}] {}", r.score(), r.label()))
        .collect();
    options.push("Replace mask from file...".to_string());
    options.push("Quit".to_string());

    while let Some(case) = session.current_case() {
        let progress = session.progress();
        println!(
            "{} {}/{}",
            "Case".yellow().bold(),
            progress.submitted + progress.skipped + 1,
            progress.total
        );
        print_case(session.root(), case);

        if let Some(outcome) = session.load_current(&FileCaseLoader) {
            match outcome {
                LoadOutcome::Loaded => {}
                LoadOutcome::ImageOnly { reason } => {
                    println!("  {} mask could not be opened: {}", "Warning:".yellow(), reason)
                }
                LoadOutcome::Failed { reason } => {
                    println!("  {} image could not be opened: {}", "Warning:".red(), reason)
                }
            }
        }

        let selection = Select::with_theme(&theme)
            .with_prompt("Verdict")
            .items(&options)
            .default(0)
            .interact()?;

        let action = match selection {
            i if i < Rating::ALL.len() => Action::Rate(Rating::ALL[i]),
            i if i == Rating::ALL.len() => Action::ReplaceMask,
            _ => Action::Quit,
        };

        match action {
            Action::Rate(rating) => {
                let comment: String = Input::with_theme(&theme)
                    .with_prompt("Comment")
                    .allow_empty(true)
                    .interact_text()?;

                let record = session.submit(rating, comment.trim())?;
                println!(
                    "{} {} as {}",
                    "Saved".green(),
                    record.relative_image_path,
                    rating.label()
                );
                if verbose {
                    println!("  Log: {}", session.log().path().display());
                }
            }
            Action::ReplaceMask => {
                let source: String = Input::with_theme(&theme)
                    .with_prompt("Edited mask file")
                    .interact_text()?;

                match fs::read(source.trim()) {
                    Ok(bytes) => {
                        let root = session.root().to_path_buf();
                        let case = session.overwrite_mask(&writer, &bytes)?;
                        if let Some(mask) = case.mask() {
                            println!(
                                "{} {} ({})",
                                "Stored".green(),
                                display_path(&root, mask),
                                colored_status(case.mask_status)
                            );
                        }
                    }
                    Err(e) => println!("{} cannot read {}: {}", "Error:".red(), source.trim(), e),
                }
            }
            Action::Quit => {
                println!("Progress saved. Run the same command to resume.");
                return Ok(());
            }
        }
        println!();
    }

    println!("{}", "All files checked.".green().bold());
    Ok(())
}
