//! Two-letter codes used by the archive for basins, subbasins and storm classifications.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A code string that does not belong to the expected code table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} code '{code}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}

impl UnknownCode {
    fn new(kind: &'static str, code: &str) -> Self {
        Self {
            kind,
            code: code.to_string(),
        }
    }
}

/// Ocean basin in which a storm is located or formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Basin {
    /// `NA`
    NorthAtlantic,
    /// `EP`
    EasternPacific,
    /// `WP`
    WesternPacific,
    /// `NI`
    NorthIndian,
    /// `SI`
    SouthIndian,
    /// `SP`
    SouthPacific,
    /// `SA`
    SouthAtlantic,
}

impl Basin {
    pub const ALL: [Basin; 7] = [
        Basin::NorthAtlantic,
        Basin::EasternPacific,
        Basin::WesternPacific,
        Basin::NorthIndian,
        Basin::SouthIndian,
        Basin::SouthPacific,
        Basin::SouthAtlantic,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Basin::NorthAtlantic => "NA",
            Basin::EasternPacific => "EP",
            Basin::WesternPacific => "WP",
            Basin::NorthIndian => "NI",
            Basin::SouthIndian => "SI",
            Basin::SouthPacific => "SP",
            Basin::SouthAtlantic => "SA",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Basin::NorthAtlantic => "North Atlantic",
            Basin::EasternPacific => "Eastern Pacific",
            Basin::WesternPacific => "Western North Pacific",
            Basin::NorthIndian => "North Indian",
            Basin::SouthIndian => "South Indian",
            Basin::SouthPacific => "South Pacific",
            Basin::SouthAtlantic => "South Atlantic",
        }
    }

    /// Southern-hemisphere basins run their season from July to June.
    pub fn is_southern_hemisphere(&self) -> bool {
        matches!(
            self,
            Basin::SouthIndian | Basin::SouthPacific | Basin::SouthAtlantic
        )
    }
}

impl FromStr for Basin {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Basin::ALL
            .into_iter()
            .find(|basin| basin.code() == s)
            .ok_or_else(|| UnknownCode::new("basin", s))
    }
}

impl fmt::Display for Basin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Finer-grained region within a basin. `MM` marks a point outside every subbasin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subbasin {
    Missing,
    CaribbeanSea,
    GulfOfMexico,
    CentralPacific,
    BayOfBengal,
    ArabianSea,
    WesternAustralia,
    EasternAustralia,
    NorthAtlantic,
}

impl Subbasin {
    pub const ALL: [Subbasin; 9] = [
        Subbasin::Missing,
        Subbasin::CaribbeanSea,
        Subbasin::GulfOfMexico,
        Subbasin::CentralPacific,
        Subbasin::BayOfBengal,
        Subbasin::ArabianSea,
        Subbasin::WesternAustralia,
        Subbasin::EasternAustralia,
        Subbasin::NorthAtlantic,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Subbasin::Missing => "MM",
            Subbasin::CaribbeanSea => "CS",
            Subbasin::GulfOfMexico => "GM",
            Subbasin::CentralPacific => "CP",
            Subbasin::BayOfBengal => "BB",
            Subbasin::ArabianSea => "AS",
            Subbasin::WesternAustralia => "WA",
            Subbasin::EasternAustralia => "EA",
            Subbasin::NorthAtlantic => "NA",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Subbasin::Missing => "Missing",
            Subbasin::CaribbeanSea => "Caribbean Sea",
            Subbasin::GulfOfMexico => "Gulf of Mexico",
            Subbasin::CentralPacific => "Central Pacific",
            Subbasin::BayOfBengal => "Bay of Bengal",
            Subbasin::ArabianSea => "Arabian Sea",
            Subbasin::WesternAustralia => "Western Australia",
            Subbasin::EasternAustralia => "Eastern Australia",
            Subbasin::NorthAtlantic => "North Atlantic",
        }
    }
}

impl FromStr for Subbasin {
    type Err = UnknownCode;

    /// A blank subbasin is read as `MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Subbasin::Missing);
        }
        Subbasin::ALL
            .into_iter()
            .find(|subbasin| subbasin.code() == s)
            .ok_or_else(|| UnknownCode::new("subbasin", s))
    }
}

impl fmt::Display for Subbasin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Nature of the system at one observation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Tropical,
    Subtropical,
    Extratropical,
    Disturbance,
    NotReported,
    /// Agencies disagree on the nature of the system.
    Mixture,
}

impl Classification {
    pub const ALL: [Classification; 6] = [
        Classification::Tropical,
        Classification::Subtropical,
        Classification::Extratropical,
        Classification::Disturbance,
        Classification::NotReported,
        Classification::Mixture,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Classification::Tropical => "TS",
            Classification::Subtropical => "SS",
            Classification::Extratropical => "ET",
            Classification::Disturbance => "DS",
            Classification::NotReported => "NR",
            Classification::Mixture => "MX",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Classification::Tropical => "Tropical",
            Classification::Subtropical => "Subtropical",
            Classification::Extratropical => "Extratropical",
            Classification::Disturbance => "Disturbance",
            Classification::NotReported => "Not Reported",
            Classification::Mixture => "Mixture (Agencies Contradict)",
        }
    }

    /// Whether the system counts as organized for the purpose of genesis.
    pub fn is_organized(&self) -> bool {
        !matches!(
            self,
            Classification::Disturbance | Classification::NotReported
        )
    }
}

impl FromStr for Classification {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Classification::ALL
            .into_iter()
            .find(|classification| classification.code() == s)
            .ok_or_else(|| UnknownCode::new("classification", s))
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
