//! Mask availability status of a case.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// Whether and how a case's mask could be loaded.
///
/// Resolution assigns one of the first three; [`MaskStatus::MaskEdited`] is only
/// reached when the reviewer overwrites the mask during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskStatus {
    /// No mask was provided or found.
    #[serde(rename = "No mask")]
    NoMaskFound,
    /// A mask path was given but does not point to a loadable file.
    #[serde(rename = "Cannot load mask")]
    MaskPathInvalid,
    /// The mask exists alongside the image.
    #[serde(rename = "Mask loaded")]
    MaskLoaded,
    /// The reviewer replaced the mask with an edited one.
    #[serde(rename = "Mask edited")]
    MaskEdited,
}

impl MaskStatus {
    /// All statuses, in classification order.
    pub const ALL: [MaskStatus; 4] = [
        MaskStatus::NoMaskFound,
        MaskStatus::MaskPathInvalid,
        MaskStatus::MaskLoaded,
        MaskStatus::MaskEdited,
    ];

    /// Human-readable label, as stored in the annotation log.
    pub fn label(&self) -> &'static str {
        match self {
            MaskStatus::NoMaskFound => "No mask",
            MaskStatus::MaskPathInvalid => "Cannot load mask",
            MaskStatus::MaskLoaded => "Mask loaded",
            MaskStatus::MaskEdited => "Mask edited",
        }
    }

    /// Check if a usable mask file is attached to the case.
    pub fn has_mask(&self) -> bool {
        matches!(self, MaskStatus::MaskLoaded | MaskStatus::MaskEdited)
    }
}

impl fmt::Display for MaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MaskStatus {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaskStatus::ALL
            .into_iter()
            .find(|status| status.label() == s.trim())
            .ok_or_else(|| ReviewError::UnknownLabel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for status in MaskStatus::ALL {
            assert_eq!(status.label().parse::<MaskStatus>().unwrap(), status);
        }
        assert!("Mask missing".parse::<MaskStatus>().is_err());
    }

    #[test]
    fn test_has_mask() {
        assert!(!MaskStatus::NoMaskFound.has_mask());
        assert!(!MaskStatus::MaskPathInvalid.has_mask());
        assert!(MaskStatus::MaskLoaded.has_mask());
        assert!(MaskStatus::MaskEdited.has_mask());
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&MaskStatus::MaskEdited).unwrap();
        assert_eq!(json, "\"Mask edited\"");
    }
}
