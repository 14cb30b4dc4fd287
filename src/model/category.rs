use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker colour used for categories without a dedicated colour
pub const DEFAULT_MARKER_COLOR: &str = "#1a73e8";

/// The fixed set of problem types a citizen can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Road Damage")]
    RoadDamage,
    #[serde(rename = "Garbage")]
    Garbage,
    #[serde(rename = "Water Supply")]
    WaterSupply,
    #[serde(rename = "Electricity")]
    Electricity,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Every category, in the order the report form lists them
    pub const ALL: [Category; 5] = [
        Category::RoadDamage,
        Category::Garbage,
        Category::WaterSupply,
        Category::Electricity,
        Category::Other,
    ];

    /// Display label, also the value stored on report documents
    pub fn label(&self) -> &'static str {
        match self {
            Category::RoadDamage => "Road Damage",
            Category::Garbage => "Garbage",
            Category::WaterSupply => "Water Supply",
            Category::Electricity => "Electricity",
            Category::Other => "Other",
        }
    }

    /// Map pin colour for this category
    pub fn marker_color(&self) -> &'static str {
        match self {
            Category::RoadDamage => "#EA4335",
            Category::Garbage => "#FBBC04",
            Category::WaterSupply => "#4285F4",
            Category::Electricity => "#34A853",
            Category::Other => DEFAULT_MARKER_COLOR,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string is not one of the known category labels
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}
