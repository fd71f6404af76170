//! Example: Summarize the review state of a session root.
//!
//! Usage:
//!   cargo run --example summarize -- <session_root>
//!
//! Example:
//!   cargo run --example summarize -- /data/liver_batch

use std::env;
use std::path::Path;

use segreview::{AnnotationLog, Rating, ReviewSession};

fn main() -> segreview::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example summarize -- <session_root>");
        std::process::exit(1);
    }

    let root = Path::new(&args[1]);
    if !root.is_dir() {
        eprintln!("Error: Not a directory: {}", root.display());
        std::process::exit(1);
    }

    let session = ReviewSession::open(root)?;
    let records = session.log().load()?;
    let counts = AnnotationLog::summarize(&records);
    let progress = session.progress();

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("Review Summary: {}", root.display());
    println!("{}", separator);
    println!();

    println!("## Session");
    println!("  Layout: {}", session.layout());
    println!("  Reviewed: {}", progress.previously_reviewed);
    println!("  Pending: {}", progress.remaining());
    println!();

    println!("## Verdicts");
    for rating in Rating::ALL {
        println!("  [{}] {:<34} {}", rating.score(), rating.label(), counts.get(rating));
    }
    println!("  Acceptable: {} of {}", counts.acceptable(), counts.total());
    println!();

    if let Some(case) = session.current_case() {
        println!("## Next Case");
        println!("  Image: {}", case.image_path.display());
        println!("  Mask: {}", case.mask_status);
        if let Some(subject) = &case.subject_id {
            println!("  Subject: {}", subject);
        }
    } else {
        println!("All files checked.");
    }

    Ok(())
}
