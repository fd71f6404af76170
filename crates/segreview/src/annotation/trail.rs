//! Human-readable diagnostic trail kept next to the data.

use std::fmt::Display;
use std::path::Path;

use tracing::Dispatch;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::error::{ReviewError, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Append-only, timestamped log of resolution and review decisions.
///
/// The trail is write-only: nothing in the crate reads it back. Each trail
/// owns its own dispatcher, so sessions over different roots never write into
/// each other's files and the process-wide subscriber is left alone. Messages
/// are also emitted at `debug` level under the `segreview::trail` target.
#[derive(Clone)]
pub struct DiagnosticTrail {
    dispatch: Dispatch,
}

impl DiagnosticTrail {
    /// Open (or create) `file_name` inside `root` in append mode.
    pub fn open(root: &Path, file_name: &str) -> Result<Self> {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(root)
            .map_err(|e| {
                ReviewError::Trail(format!(
                    "Failed to open '{}' in '{}': {}",
                    file_name,
                    root.display(),
                    e
                ))
            })?;

        let subscriber = tracing_subscriber::fmt()
            .with_writer(appender)
            .with_ansi(false)
            .with_target(false)
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_max_level(tracing::Level::INFO)
            .finish();

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// A trail that discards everything.
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Record an informational entry.
    pub fn info(&self, message: impl Display) {
        tracing::debug!(target: "segreview::trail", "{}", message);
        tracing::dispatcher::with_default(&self.dispatch, || tracing::info!("{}", message));
    }

    /// Record a warning entry.
    pub fn warn(&self, message: impl Display) {
        tracing::debug!(target: "segreview::trail", "{}", message);
        tracing::dispatcher::with_default(&self.dispatch, || tracing::warn!("{}", message));
    }
}

impl std::fmt::Debug for DiagnosticTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticTrail").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_trail_appends_timestamped_lines() {
        let dir = tempfile::TempDir::new().unwrap();

        let trail = DiagnosticTrail::open(dir.path(), "review.log").unwrap();
        trail.info("Found mask for p1.nii");
        drop(trail);

        let reopened = DiagnosticTrail::open(dir.path(), "review.log").unwrap();
        reopened.warn("No mask for p2.nii");

        let contents = fs::read_to_string(dir.path().join("review.log")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].ends_with("Found mask for p1.nii"));
        assert!(lines[1].contains("WARN"));
        assert!(lines[1].ends_with("No mask for p2.nii"));
        // Timestamp leads each line: YYYY-MM-DD
        assert_eq!(&lines[0][4..5], "-");
    }

    #[test]
    fn test_disabled_trail_writes_nothing() {
        let trail = DiagnosticTrail::disabled();
        trail.info("ignored");
    }
}
