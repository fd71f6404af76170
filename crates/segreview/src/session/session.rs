//! The review state machine.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::annotation::{relative_to, AnnotationLog, AnnotationRecord, DiagnosticTrail};
use crate::case::{Case, Rating};
use crate::config::ReviewConfig;
use crate::error::{ReviewError, Result};
use crate::resolver::{CaseResolver, LayoutMode, Resolution};

use super::collaborator::{CaseLoader, LoadOutcome, MaskWriter};

/// Whether there is a case left to review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Active,
    Finished,
}

/// Progress through the pending queue of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionProgress {
    /// Verdicts recorded by this session.
    pub submitted: usize,
    /// Cases passed over because their subject was already accepted.
    pub skipped: usize,
    /// Cases pending when the session started.
    pub total: usize,
    /// Candidates excluded at start because the log already lists them.
    pub previously_reviewed: usize,
}

impl SessionProgress {
    /// Cases still ahead of the cursor, the current one included.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.submitted + self.skipped)
    }

    /// Fraction of the queue behind the cursor (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.submitted + self.skipped) as f64 / self.total as f64
    }

    /// Candidates dealt with across every session over the root: logged
    /// verdicts plus candidates passed over for an accepted subject.
    pub fn handled(&self) -> usize {
        self.previously_reviewed + self.submitted + self.skipped
    }

    /// Fraction of all resolved candidates handled (0.0 to 1.0).
    pub fn overall_fraction(&self) -> f64 {
        let candidates = self.previously_reviewed + self.total;
        if candidates == 0 {
            return 1.0;
        }
        self.handled() as f64 / candidates as f64
    }
}

/// A resumable review of one session root.
///
/// The pending queue is rebuilt from scratch on every open: resolved cases
/// minus the images the annotation log already lists. Each verdict is
/// appended to the log before the cursor moves, so a crash at any point
/// reopens at the first case without a row.
///
/// ```no_run
/// use segreview::{Rating, ReviewSession};
///
/// let mut session = ReviewSession::open("/data/liver_batch")?;
/// while let Some(case) = session.current_case() {
///     println!("Reviewing {}", case.name());
///     session.submit(Rating::AcceptableNoChanges, "")?;
/// }
/// # Ok::<(), segreview::ReviewError>(())
/// ```
#[derive(Debug)]
pub struct ReviewSession {
    root: PathBuf,
    config: ReviewConfig,
    layout: LayoutMode,
    queue: Vec<Case>,
    cursor: usize,
    accepted_subjects: HashSet<String>,
    log: AnnotationLog,
    trail: DiagnosticTrail,
    progress: SessionProgress,
}

impl ReviewSession {
    /// Open a session over `root`, using `segreview.json` there if present.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let config = ReviewConfig::for_root(root.as_ref())?;
        Self::open_with_config(root, config)
    }

    /// Open a session over `root` with an explicit configuration.
    pub fn open_with_config(root: impl AsRef<Path>, config: ReviewConfig) -> Result<Self> {
        let root = root.as_ref();
        ensure_root(root)?;
        let trail = DiagnosticTrail::open(root, &config.trail_file)?;
        Self::start(root, config, trail)
    }

    /// Open a session without writing to the diagnostic trail.
    ///
    /// For read-only views of a root such as listings and summaries. Verdicts
    /// submitted through it still reach the annotation log.
    pub fn inspect(root: impl AsRef<Path>, config: ReviewConfig) -> Result<Self> {
        let root = root.as_ref();
        ensure_root(root)?;
        Self::start(root, config, DiagnosticTrail::disabled())
    }

    fn start(root: &Path, config: ReviewConfig, trail: DiagnosticTrail) -> Result<Self> {
        let resolution = CaseResolver::with_config(config.clone()).resolve(root, &trail)?;

        let log = AnnotationLog::new(root, &config.annotations_file);
        let records = log.load()?;

        Ok(Self::replay(root, config, resolution, &records, log, trail))
    }

    /// Point the session at another root, discarding all in-memory state.
    ///
    /// On failure the current session is left untouched.
    pub fn reopen(&mut self, root: impl AsRef<Path>) -> Result<()> {
        *self = Self::open_with_config(root, self.config.clone())?;
        Ok(())
    }

    /// Fold the logged verdicts over the resolved cases.
    fn replay(
        root: &Path,
        config: ReviewConfig,
        resolution: Resolution,
        records: &[AnnotationRecord],
        log: AnnotationLog,
        trail: DiagnosticTrail,
    ) -> Self {
        let with_masks = resolution.with_masks();
        let Resolution { layout, cases } = resolution;
        let reviewed = log.already_reviewed_image_paths(records);

        // Known limitation: a hand-edited log may accept one subject twice.
        let accepted_subjects: HashSet<String> = if layout.groups_subjects() {
            let subject_of: HashMap<&Path, &str> = cases
                .iter()
                .filter_map(|case| {
                    case.subject_id
                        .as_deref()
                        .map(|subject| (case.image_path.as_path(), subject))
                })
                .collect();

            records
                .iter()
                .filter(|record| record.rating.is_accept())
                .filter_map(|record| {
                    subject_of
                        .get(record.image_path(root).as_path())
                        .map(|subject| subject.to_string())
                })
                .collect()
        } else {
            HashSet::new()
        };

        let candidates = cases.len();
        let queue: Vec<Case> = cases
            .into_iter()
            .filter(|case| !reviewed.contains(&case.image_path))
            .collect();

        if log.exists() {
            trail.info(format!(
                "Found session, restoring annotations {} files left",
                queue.len()
            ));
        }
        trail.info(format!(
            "Total images loaded: {}, images with masks: {}",
            candidates, with_masks
        ));

        let progress = SessionProgress {
            total: queue.len(),
            previously_reviewed: candidates - queue.len(),
            ..SessionProgress::default()
        };

        let mut session = Self {
            root: root.to_path_buf(),
            config,
            layout,
            queue,
            cursor: 0,
            accepted_subjects,
            log,
            trail,
            progress,
        };
        session.skip_accepted_subjects();
        if session.is_finished() {
            session.trail.info("All files checked");
        }
        session
    }

    /// Session root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configuration the session was opened with.
    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Layout the cases were discovered with.
    pub fn layout(&self) -> &LayoutMode {
        &self.layout
    }

    /// Annotation log backing the session.
    pub fn log(&self) -> &AnnotationLog {
        &self.log
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        if self.cursor < self.queue.len() {
            SessionState::Active
        } else {
            SessionState::Finished
        }
    }

    /// Check if every pending case has been handled.
    pub fn is_finished(&self) -> bool {
        self.state() == SessionState::Finished
    }

    /// The case to show, or `None` once finished.
    pub fn current_case(&self) -> Option<&Case> {
        self.queue.get(self.cursor)
    }

    /// Position of the cursor in the pending queue.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The whole pending queue, as it was when the session opened.
    pub fn queue(&self) -> &[Case] {
        &self.queue
    }

    /// Cases from the cursor onwards.
    ///
    /// In subject mode this may still include candidates for subjects that
    /// get accepted before the cursor reaches them.
    pub fn upcoming(&self) -> &[Case] {
        &self.queue[self.cursor.min(self.queue.len())..]
    }

    /// Subjects with an accepted candidate.
    pub fn accepted_subjects(&self) -> &HashSet<String> {
        &self.accepted_subjects
    }

    /// Progress counters.
    pub fn progress(&self) -> SessionProgress {
        self.progress
    }

    /// Record a verdict for the current case and move on.
    ///
    /// The row is appended before the cursor advances. In subject mode an
    /// accept also passes over every later candidate of the same subject.
    pub fn submit(&mut self, rating: Rating, comment: &str) -> Result<AnnotationRecord> {
        let case = self
            .queue
            .get(self.cursor)
            .ok_or(ReviewError::SessionFinished)?;

        let record = AnnotationRecord::from_case(case, &self.root, rating, comment);
        self.log.append(&record)?;
        self.trail.info(format!(
            "Annotated {} as {} ({})",
            record.relative_image_path, rating, record.mask_status
        ));

        if self.layout.groups_subjects() && rating.is_accept() {
            if let Some(subject) = case.subject_id.clone() {
                self.trail
                    .info(format!("Subject {} accepted with {}", subject, case.name()));
                self.accepted_subjects.insert(subject);
            }
        }

        self.progress.submitted += 1;
        self.cursor += 1;
        self.skip_accepted_subjects();

        if self.is_finished() {
            self.trail.info("All files checked");
        }

        Ok(record)
    }

    /// Record a verdict given as a score from 1 to 5.
    pub fn submit_score(&mut self, score: u8, comment: &str) -> Result<AnnotationRecord> {
        let rating = Rating::try_from(score)?;
        self.submit(rating, comment)
    }

    /// Replace the current case's mask with an edited one.
    ///
    /// The writer persists the bytes; the case then points at the new file
    /// with status `MaskEdited`, which the next [`submit`](Self::submit)
    /// records. The log itself is not touched.
    pub fn overwrite_mask(&mut self, writer: &dyn MaskWriter, bytes: &[u8]) -> Result<&Case> {
        let cursor = self.cursor;
        let case = self
            .queue
            .get(cursor)
            .ok_or(ReviewError::SessionFinished)?;

        let path = writer.write_mask(case, bytes)?;
        self.trail.info(format!(
            "Saved edited mask for {} to {}",
            case.name(),
            relative_to(&self.root, &path)
        ));

        let case = &mut self.queue[cursor];
        case.mark_edited(path);
        Ok(&*case)
    }

    /// Ask a loader to display the current case.
    ///
    /// Failures are written to the trail and returned; the session state does
    /// not change, and the case can still be rated.
    pub fn load_current(&self, loader: &dyn CaseLoader) -> Option<LoadOutcome> {
        let case = self.current_case()?;
        let outcome = loader.load_case(&case.image_path, case.mask());

        match &outcome {
            LoadOutcome::Loaded => {
                tracing::debug!(case = %case.name(), "Loaded case");
            }
            LoadOutcome::ImageOnly { reason } => {
                self.trail
                    .warn(format!("Cannot load mask for {}: {}", case.name(), reason));
            }
            LoadOutcome::Failed { reason } => {
                self.trail
                    .warn(format!("Cannot load image {}: {}", case.name(), reason));
            }
        }

        Some(outcome)
    }

    /// Move the cursor past candidates of already-accepted subjects.
    fn skip_accepted_subjects(&mut self) {
        if !self.layout.groups_subjects() {
            return;
        }

        while let Some(case) = self.queue.get(self.cursor) {
            match &case.subject_id {
                Some(subject) if self.accepted_subjects.contains(subject) => {
                    self.trail.info(format!(
                        "Subject {} already accepted, skipping {}",
                        subject,
                        case.name()
                    ));
                    self.cursor += 1;
                    self.progress.skipped += 1;
                }
                _ => break,
            }
        }
    }
}

fn ensure_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        return Ok(());
    }
    Err(ReviewError::io(
        root,
        io::Error::new(io::ErrorKind::NotFound, "session root is not a directory"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fraction() {
        let progress = SessionProgress {
            submitted: 2,
            skipped: 1,
            total: 6,
            previously_reviewed: 4,
        };
        assert_eq!(progress.remaining(), 3);
        assert!((progress.fraction() - 0.5).abs() < f64::EPSILON);

        assert_eq!(SessionProgress::default().fraction(), 1.0);
    }

    #[test]
    fn test_overall_fraction_counts_skipped_subjects() {
        // 2 logged earlier, 3 pending at open: 1 rated, 2 passed over.
        let progress = SessionProgress {
            submitted: 1,
            skipped: 2,
            total: 3,
            previously_reviewed: 2,
        };
        assert_eq!(progress.handled(), 5);
        assert_eq!(progress.remaining(), 0);
        assert!((progress.overall_fraction() - 1.0).abs() < f64::EPSILON);

        let fresh = SessionProgress {
            total: 4,
            ..SessionProgress::default()
        };
        assert_eq!(fresh.overall_fraction(), 0.0);
        assert_eq!(SessionProgress::default().overall_fraction(), 1.0);
    }

    #[test]
    fn test_replay_excludes_reviewed_and_settles_on_accepted_subject() {
        let root = Path::new("/r");
        let resolution = Resolution {
            layout: LayoutMode::UniqueMapping {
                table: root.join("mapping_unique.csv"),
            },
            cases: vec![
                Case::new("/r/s1_a.nii").with_subject("S1"),
                Case::new("/r/s1_b.nii").with_subject("S1"),
                Case::new("/r/s2_a.nii").with_subject("S2"),
            ],
        };
        let records = vec![AnnotationRecord {
            relative_image_path: "s1_a.nii".to_string(),
            rating: Rating::AcceptableNoChanges,
            comment: String::new(),
            relative_mask_path: String::new(),
            mask_status: crate::case::MaskStatus::NoMaskFound,
        }];

        let session = ReviewSession::replay(
            root,
            ReviewConfig::default(),
            resolution,
            &records,
            AnnotationLog::new(root, "annotations.csv"),
            DiagnosticTrail::disabled(),
        );

        assert_eq!(session.queue().len(), 2);
        assert!(session.accepted_subjects().contains("S1"));
        assert_eq!(
            session.current_case().map(|c| c.image_path.clone()),
            Some(PathBuf::from("/r/s2_a.nii"))
        );
        assert_eq!(session.progress().skipped, 1);
        assert_eq!(session.progress().previously_reviewed, 1);
    }
}
