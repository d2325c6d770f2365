//! Ordering descriptors for the pivot view
//!
//! Caller-supplied order keys are parsed into a tagged representation
//! instead of being spliced into SQL, so the ranking code matches on
//! structure and the storage layer never sees a caller-controlled string.

use crate::phase::{normalize_token, Phase};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which of the two status vocabularies a dimension refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum StatusFamily {
    Work,
    Approval,
}

/// Sort direction for the primary dimension.
///
/// Missing values sort last under both directions, and the fixed secondary
/// keys (asset name, relation) stay ascending under both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid SortDirection: {}", s)),
        }
    }
}

/// Tagged primary sort dimension for the pivot view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum SortKey {
    /// Asset name, case-insensitive.
    ByName,
    /// Relation/take, case-insensitive.
    ByRelation,
    /// Pipeline phase of the representative row.
    ByPhase,
    /// A status value; `phase: None` reads the representative row,
    /// `Some(p)` reads that phase's column.
    ByStatus {
        phase: Option<Phase>,
        family: StatusFamily,
    },
    /// A submitted/modified timestamp; `phase` selects the column the same
    /// way as `ByStatus`.
    ByTimestamp { phase: Option<Phase> },
}

impl SortKey {
    /// Parse a caller-facing order key.
    ///
    /// Vocabulary: `name`, `relation`, `phase`, `submitted_at_utc`,
    /// `modified_at_utc` (and their short forms), plus the phase-qualified
    /// columns `<code>_work`, `<code>_appr`, `<code>_submitted`. Returns
    /// `None` for anything else; callers treat that as the default ordering
    /// (name, relation, submitted) rather than an error.
    pub fn parse(raw: &str) -> Option<SortKey> {
        let token = normalize_token(raw);
        match token.as_str() {
            "name" | "asset" | "assetname" => return Some(SortKey::ByName),
            "relation" => return Some(SortKey::ByRelation),
            "phase" => return Some(SortKey::ByPhase),
            "submitted" | "submittedat" | "submittedatutc" | "modified" | "modifiedat"
            | "modifiedatutc" => return Some(SortKey::ByTimestamp { phase: None }),
            _ => {}
        }
        // The vocabulary is ASCII; anything else can't name a column.
        if token.len() < 4 || !token.is_ascii() {
            return None;
        }
        // Phase-qualified dimensions are <3-letter code><dimension>.
        let (code, dimension) = token.split_at(3);
        let phase = code.parse::<Phase>().ok()?;
        match dimension {
            "work" => Some(SortKey::ByStatus {
                phase: Some(phase),
                family: StatusFamily::Work,
            }),
            "appr" | "approval" => Some(SortKey::ByStatus {
                phase: Some(phase),
                family: StatusFamily::Approval,
            }),
            "submitted" | "submittedat" | "submittedatutc" => {
                Some(SortKey::ByTimestamp { phase: Some(phase) })
            }
            _ => None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_keys() {
        assert_eq!(SortKey::parse("name"), Some(SortKey::ByName));
        assert_eq!(SortKey::parse("relation"), Some(SortKey::ByRelation));
        assert_eq!(SortKey::parse("phase"), Some(SortKey::ByPhase));
        assert_eq!(
            SortKey::parse("submitted_at_utc"),
            Some(SortKey::ByTimestamp { phase: None })
        );
        assert_eq!(
            SortKey::parse("modified_at_utc"),
            Some(SortKey::ByTimestamp { phase: None })
        );
    }

    #[test]
    fn test_parse_phase_qualified_keys() {
        assert_eq!(
            SortKey::parse("mdl_work"),
            Some(SortKey::ByStatus {
                phase: Some(Phase::Model),
                family: StatusFamily::Work,
            })
        );
        assert_eq!(
            SortKey::parse("ldv_appr"),
            Some(SortKey::ByStatus {
                phase: Some(Phase::LookDev),
                family: StatusFamily::Approval,
            })
        );
        assert_eq!(
            SortKey::parse("rig_submitted"),
            Some(SortKey::ByTimestamp {
                phase: Some(Phase::Rig)
            })
        );
    }

    #[test]
    fn test_parse_is_case_and_separator_insensitive() {
        assert_eq!(
            SortKey::parse("MDL-Work"),
            Some(SortKey::ByStatus {
                phase: Some(Phase::Model),
                family: StatusFamily::Work,
            })
        );
        assert_eq!(SortKey::parse("  Name "), Some(SortKey::ByName));
    }

    #[test]
    fn test_parse_unknown_keys_return_none() {
        assert_eq!(SortKey::parse(""), None);
        assert_eq!(SortKey::parse("thumbnail"), None);
        assert_eq!(SortKey::parse("mdl"), None);
        assert_eq!(SortKey::parse("mdl_thumbnail"), None);
        assert_eq!(SortKey::parse("xyz_work"), None);
        // Multi-byte input must be rejected, not split mid-character.
        assert_eq!(SortKey::parse("naïve_work"), None);
    }

    #[test]
    fn test_direction_parse_and_default() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("sideways".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::default(), SortDirection::Asc);
    }
}
