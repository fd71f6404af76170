//! Review sessions over a root directory.

mod collaborator;
#[allow(clippy::module_inception)]
mod session;

pub use collaborator::{CaseLoader, FileCaseLoader, LoadOutcome, MaskWriter, TimestampedMaskWriter};
pub use session::{ReviewSession, SessionProgress, SessionState};
