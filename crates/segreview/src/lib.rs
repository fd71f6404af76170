//! segreview: resumable review sessions for image/mask segmentation batches.
//!
//! A reviewer points a session at a directory of images and masks, gives each
//! case a verdict, and can stop at any moment. Verdicts land in an append-only
//! `annotations.csv` next to the data; reopening the directory rebuilds the
//! exact remaining work from that file.
//!
//! # Core Principles
//!
//! - **Append-only**: Verdicts are never rewritten; the log is the only state
//! - **Replayable**: Remaining work = resolved cases minus logged images
//! - **Degrade, don't fail**: A missing mask or bad row costs one case, not the session
//!
//! # Example
//!
//! ```no_run
//! use segreview::{Rating, ReviewSession};
//!
//! let mut session = ReviewSession::open("/data/liver_batch").unwrap();
//!
//! if let Some(case) = session.current_case() {
//!     println!("Image: {}", case.image_path.display());
//!     println!("Mask status: {}", case.mask_status);
//! }
//!
//! session.submit(Rating::AcceptableMinorChanges, "leaks into the IVC").unwrap();
//! println!("Remaining: {}", session.progress().remaining());
//! ```

pub mod annotation;
pub mod case;
pub mod config;
pub mod error;
pub mod resolver;
pub mod session;

pub use annotation::{AnnotationLog, AnnotationRecord, DiagnosticTrail};
pub use case::{Case, MaskStatus, Rating, RatingCounts};
pub use config::ReviewConfig;
pub use error::{Result, ReviewError};
pub use resolver::{CaseResolver, LayoutMode, Resolution};
pub use session::{
    CaseLoader, FileCaseLoader, LoadOutcome, MaskWriter, ReviewSession, SessionProgress,
    SessionState, TimestampedMaskWriter,
};
