//! Durable review outcomes.
//!
//! A session root holds two append-only files next to the data:
//!
//! ```text
//! review_root/
//! ├── scan001.nii
//! ├── scan001_mask.nii.gz
//! ├── annotations.csv             # one row per verdict, read back on restart
//! └── segmentation_review.log     # timestamped trail, never read back
//! ```
//!
//! The annotation log is the only state that survives a restart; the pending
//! queue of a new session is the resolved cases minus the images it lists.

mod log;
mod record;
mod trail;

pub use log::{read_records, AnnotationLog};
pub use record::{relative_to, AnnotationRecord};
pub use trail::DiagnosticTrail;
