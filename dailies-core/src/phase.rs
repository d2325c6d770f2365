//! Pipeline phase enum for dailies entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pipeline phase an asset is reviewed in.
///
/// Declaration order is pipeline order, and `Ord` follows it: modeling
/// comes before rigging, and so on down the pipeline. Phase-sorted views
/// rely on this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Modeling (`mdl`)
    #[serde(rename = "mdl")]
    Model,
    /// Rigging (`rig`)
    #[serde(rename = "rig")]
    Rig,
    /// Build / assembly (`bld`)
    #[serde(rename = "bld")]
    Build,
    /// Design (`dsn`)
    #[serde(rename = "dsn")]
    Design,
    /// Look development (`ldv`)
    #[serde(rename = "ldv")]
    LookDev,
}

impl Phase {
    /// All phases in pipeline order. The pivot row carries exactly one
    /// column per entry, in this order.
    pub const ALL: [Phase; 5] = [
        Phase::Model,
        Phase::Rig,
        Phase::Build,
        Phase::Design,
        Phase::LookDev,
    ];

    /// Number of tracked phases.
    pub const COUNT: usize = Self::ALL.len();

    /// Short pipeline code used in storage, sort keys, and pivot columns.
    pub fn code(&self) -> &'static str {
        match self {
            Phase::Model => "mdl",
            Phase::Rig => "rig",
            Phase::Build => "bld",
            Phase::Design => "dsn",
            Phase::LookDev => "ldv",
        }
    }

    /// Position in pipeline order, 0-based.
    pub fn pipeline_index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "mdl" | "model" | "modeling" | "modelling" => Ok(Phase::Model),
            "rig" | "rigging" => Ok(Phase::Rig),
            "bld" | "build" | "assembly" => Ok(Phase::Build),
            "dsn" | "design" => Ok(Phase::Design),
            "ldv" | "lookdev" | "lookdevelopment" => Ok(Phase::LookDev),
            _ => Err(format!("Invalid Phase: {}", s)),
        }
    }
}

/// Normalize a token for parsing: strip whitespace/underscores/hyphens,
/// lowercase the rest.
pub(crate) fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display_uses_codes() {
        assert_eq!(Phase::Model.to_string(), "mdl");
        assert_eq!(Phase::Rig.to_string(), "rig");
        assert_eq!(Phase::Build.to_string(), "bld");
        assert_eq!(Phase::Design.to_string(), "dsn");
        assert_eq!(Phase::LookDev.to_string(), "ldv");
    }

    #[test]
    fn test_phase_from_str_codes_and_names() {
        assert_eq!("mdl".parse::<Phase>().unwrap(), Phase::Model);
        assert_eq!("Modeling".parse::<Phase>().unwrap(), Phase::Model);
        assert_eq!("look-dev".parse::<Phase>().unwrap(), Phase::LookDev);
        assert_eq!("look_dev".parse::<Phase>().unwrap(), Phase::LookDev);
        assert_eq!(" RIG ".parse::<Phase>().unwrap(), Phase::Rig);
        assert!("comp".parse::<Phase>().is_err());
    }

    #[test]
    fn test_phase_roundtrip_through_code() {
        for phase in Phase::ALL {
            assert_eq!(phase.code().parse::<Phase>().unwrap(), phase);
        }
    }

    #[test]
    fn test_phase_ord_is_pipeline_order() {
        assert!(Phase::Model < Phase::Rig);
        assert!(Phase::Rig < Phase::Build);
        assert!(Phase::Build < Phase::Design);
        assert!(Phase::Design < Phase::LookDev);
    }

    #[test]
    fn test_pipeline_index_matches_all() {
        for (i, phase) in Phase::ALL.iter().enumerate() {
            assert_eq!(phase.pipeline_index(), i);
        }
    }

    #[test]
    fn test_phase_serde_uses_codes() {
        let json = serde_json::to_string(&Phase::LookDev).unwrap();
        assert_eq!(json, "\"ldv\"");
        let back: Phase = serde_json::from_str("\"mdl\"").unwrap();
        assert_eq!(back, Phase::Model);
    }
}
