//! Review verdict categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// The five-point verdict a reviewer gives a segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    /// Category 1: the mask is usable as-is.
    #[serde(rename = "Acceptable with no changes")]
    AcceptableNoChanges,
    /// Category 2.
    #[serde(rename = "Acceptable with minor changes")]
    AcceptableMinorChanges,
    /// Category 3.
    #[serde(rename = "Unacceptable with major changes")]
    UnacceptableMajorChanges,
    /// Category 4: the structure is not visible in the image.
    #[serde(rename = "Unacceptable and not visible")]
    UnacceptableNotVisible,
    /// Category 5: the image itself is unusable.
    #[serde(rename = "Bad images")]
    BadImages,
}

impl Rating {
    /// All ratings, in score order.
    pub const ALL: [Rating; 5] = [
        Rating::AcceptableNoChanges,
        Rating::AcceptableMinorChanges,
        Rating::UnacceptableMajorChanges,
        Rating::UnacceptableNotVisible,
        Rating::BadImages,
    ];

    /// Human-readable label, as stored in the annotation log.
    pub fn label(&self) -> &'static str {
        match self {
            Rating::AcceptableNoChanges => "Acceptable with no changes",
            Rating::AcceptableMinorChanges => "Acceptable with minor changes",
            Rating::UnacceptableMajorChanges => "Unacceptable with major changes",
            Rating::UnacceptableNotVisible => "Unacceptable and not visible",
            Rating::BadImages => "Bad images",
        }
    }

    /// Numeric score from 1 to 5.
    pub fn score(&self) -> u8 {
        match self {
            Rating::AcceptableNoChanges => 1,
            Rating::AcceptableMinorChanges => 2,
            Rating::UnacceptableMajorChanges => 3,
            Rating::UnacceptableNotVisible => 4,
            Rating::BadImages => 5,
        }
    }

    /// Check if this verdict accepts the candidate for its subject.
    pub fn is_accept(&self) -> bool {
        matches!(self, Rating::AcceptableNoChanges)
    }
}

impl TryFrom<u8> for Rating {
    type Error = ReviewError;

    fn try_from(score: u8) -> Result<Self, Self::Error> {
        match score {
            1 => Ok(Rating::AcceptableNoChanges),
            2 => Ok(Rating::AcceptableMinorChanges),
            3 => Ok(Rating::UnacceptableMajorChanges),
            4 => Ok(Rating::UnacceptableNotVisible),
            5 => Ok(Rating::BadImages),
            other => Err(ReviewError::InvalidRating(other)),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rating {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rating::ALL
            .into_iter()
            .find(|rating| rating.label() == s.trim())
            .ok_or_else(|| ReviewError::UnknownLabel(s.to_string()))
    }
}

/// Counts of annotations by rating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCounts {
    pub acceptable_no_changes: usize,
    pub acceptable_minor_changes: usize,
    pub unacceptable_major_changes: usize,
    pub unacceptable_not_visible: usize,
    pub bad_images: usize,
}

impl RatingCounts {
    /// Create new counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every rating in an iterator.
    pub fn tally(ratings: impl IntoIterator<Item = Rating>) -> Self {
        let mut counts = Self::new();
        for rating in ratings {
            counts.add(rating);
        }
        counts
    }

    /// Record one rating.
    pub fn add(&mut self, rating: Rating) {
        match rating {
            Rating::AcceptableNoChanges => self.acceptable_no_changes += 1,
            Rating::AcceptableMinorChanges => self.acceptable_minor_changes += 1,
            Rating::UnacceptableMajorChanges => self.unacceptable_major_changes += 1,
            Rating::UnacceptableNotVisible => self.unacceptable_not_visible += 1,
            Rating::BadImages => self.bad_images += 1,
        }
    }

    /// Count for one rating.
    pub fn get(&self, rating: Rating) -> usize {
        match rating {
            Rating::AcceptableNoChanges => self.acceptable_no_changes,
            Rating::AcceptableMinorChanges => self.acceptable_minor_changes,
            Rating::UnacceptableMajorChanges => self.unacceptable_major_changes,
            Rating::UnacceptableNotVisible => self.unacceptable_not_visible,
            Rating::BadImages => self.bad_images,
        }
    }

    /// Total number of annotations.
    pub fn total(&self) -> usize {
        Rating::ALL.iter().map(|r| self.get(*r)).sum()
    }

    /// Number of usable masks (categories 1 and 2).
    pub fn acceptable(&self) -> usize {
        self.acceptable_no_changes + self.acceptable_minor_changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_map_to_categories() {
        for score in 1..=5u8 {
            let rating = Rating::try_from(score).unwrap();
            assert_eq!(rating.score(), score);
        }
        assert!(matches!(Rating::try_from(0), Err(ReviewError::InvalidRating(0))));
        assert!(matches!(Rating::try_from(6), Err(ReviewError::InvalidRating(6))));
    }

    #[test]
    fn test_only_first_category_accepts() {
        assert!(Rating::AcceptableNoChanges.is_accept());
        assert!(!Rating::AcceptableMinorChanges.is_accept());
        assert!(!Rating::BadImages.is_accept());
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(
            "Unacceptable and not visible".parse::<Rating>().unwrap(),
            Rating::UnacceptableNotVisible
        );
        assert!("Fine".parse::<Rating>().is_err());
    }

    #[test]
    fn test_rating_counts() {
        let counts = RatingCounts::tally([
            Rating::AcceptableNoChanges,
            Rating::AcceptableNoChanges,
            Rating::AcceptableMinorChanges,
            Rating::BadImages,
        ]);

        assert_eq!(counts.total(), 4);
        assert_eq!(counts.acceptable(), 3);
        assert_eq!(counts.get(Rating::BadImages), 1);
        assert_eq!(counts.get(Rating::UnacceptableMajorChanges), 0);
    }
}
