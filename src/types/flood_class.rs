//! Defines the `FloodClass` enum, mapping the gauge classification strings reported by
//! the government flood-warning feed to ordered severity variants.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Classification tier of a flood-gauge station, in ascending order of severity.
///
/// The feed reports these as free-form strings ("Below Minor", "major", ...).
/// Matching is case-insensitive and anything unrecognised maps to [`FloodClass::Unknown`].
///
/// ```
/// use flood_alert::FloodClass;
///
/// assert_eq!(FloodClass::from_label("Below Minor"), FloodClass::BelowMinor);
/// assert_eq!(FloodClass::from_label("flooding?"), FloodClass::Unknown);
/// assert!(FloodClass::Major > FloodClass::Moderate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FloodClass {
    #[default]
    Unknown,
    BelowMinor,
    Minor,
    Moderate,
    Major,
}

impl FloodClass {
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "below minor" => FloodClass::BelowMinor,
            "minor" => FloodClass::Minor,
            "moderate" => FloodClass::Moderate,
            "major" => FloodClass::Major,
            _ => FloodClass::Unknown,
        }
    }

    /// The lower-case label used by the feed.
    pub fn label(&self) -> &'static str {
        match self {
            FloodClass::Unknown => "unknown",
            FloodClass::BelowMinor => "below minor",
            FloodClass::Minor => "minor",
            FloodClass::Moderate => "moderate",
            FloodClass::Major => "major",
        }
    }

    /// Marker/overlay colour for this class as a `#rrggbb` string.
    pub fn color(&self) -> &'static str {
        match self {
            FloodClass::Unknown => "#707070",
            FloodClass::BelowMinor => "#29ccb9",
            FloodClass::Minor => "#007502",
            FloodClass::Moderate => "#f0b01d",
            FloodClass::Major => "#c71c1c",
        }
    }
}

impl fmt::Display for FloodClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for FloodClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for FloodClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .as_deref()
            .map(FloodClass::from_label)
            .unwrap_or_default())
    }
}
