//! Coordinate primitives shared by every marker type, plus the lenient wire
//! representation the backend uses for latitude/longitude fields.

use haversine::{distance, Location as HaversineLocation, Units};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use flood_alert::LatLon;
///
/// let brisbane = LatLon(-27.4698, 153.0251);
/// assert_eq!(brisbane.0, -27.4698); // Latitude
/// assert_eq!(brisbane.1, 153.0251); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    /// Returns `true` when latitude is within `[-90, 90]` and longitude within `[-180, 180]`.
    /// NaN never validates.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.0) && (-180.0..=180.0).contains(&self.1)
    }

    /// Parses a pair of textual coordinates, returning `None` unless both parse as
    /// numbers and fall within range.
    ///
    /// ```
    /// use flood_alert::LatLon;
    ///
    /// assert_eq!(LatLon::parse("-27.5", "153.1"), Some(LatLon(-27.5, 153.1)));
    /// assert_eq!(LatLon::parse("-97.5", "153.1"), None);
    /// assert_eq!(LatLon::parse("abc", "153.1"), None);
    /// ```
    pub fn parse(lat: &str, lon: &str) -> Option<LatLon> {
        let latitude = lat.trim().parse::<f64>().ok()?;
        let longitude = lon.trim().parse::<f64>().ok()?;
        let point = LatLon(latitude, longitude);
        point.is_valid().then_some(point)
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_m(&self, other: LatLon) -> f64 {
        distance(
            HaversineLocation {
                latitude: self.0,
                longitude: self.1,
            },
            HaversineLocation {
                latitude: other.0,
                longitude: other.1,
            },
            Units::Kilometers,
        ) * 1000.0
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.0, self.1)
    }
}

/// Checks a textual latitude/longitude pair as received from the backend.
///
/// Returns `true` iff both values parse as numbers, latitude lies in `[-90, 90]`
/// and longitude lies in `[-180, 180]`.
pub fn is_valid_coordinates(lat: &str, lon: &str) -> bool {
    LatLon::parse(lat, lon).is_some()
}

/// A coordinate (or any scalar) as it appears on the wire: the backend has sent
/// both JSON numbers and numeric strings across revisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub(crate) fn as_text(&self) -> String {
        match self {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s.clone(),
        }
    }

    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Validates a raw coordinate pair the way every marker conversion does. Missing or
/// `null` fields never validate.
pub(crate) fn parse_wire_coordinates(
    lat: &Option<NumberOrText>,
    lon: &Option<NumberOrText>,
) -> Option<LatLon> {
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return None;
    };
    LatLon::parse(&lat.as_text(), &lon.as_text())
}
