//! User-submitted flood reports ("special warnings") and the data needed to submit one.

use crate::types::coordinates::{parse_wire_coordinates, LatLon, NumberOrText};
use crate::types::hazard::{Hazard, HazardKind};
use log::debug;
use serde::{Deserialize, Serialize};

/// A community flood report with an attached photo and crowd-sourced credibility counts.
///
/// The server is authoritative for every field here; refetch after verify/deny instead
/// of patching a local copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialWarning {
    pub id: String,
    pub description: String,
    pub coordinates: LatLon,
    pub image_url: Option<String>,
    pub created_at: String,
    /// Username of the submitter.
    pub created_by: String,
    /// Avatar of the submitter.
    pub profile_picture: Option<String>,
    pub verified_count: usize,
    pub denied_count: usize,
    /// Whether the viewing user already verified this warning.
    pub has_verified: bool,
    /// Whether the viewing user already denied this warning.
    pub has_denied: bool,
    /// Whether the viewing user submitted this warning.
    pub is_creator: bool,
}

impl SpecialWarning {
    /// `true` when the viewer can still cast a verify/deny vote.
    pub fn awaits_vote(&self) -> bool {
        !(self.is_creator || self.has_verified || self.has_denied)
    }
}

impl Hazard for SpecialWarning {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.description
    }

    fn coordinates(&self) -> LatLon {
        self.coordinates
    }

    fn kind(&self) -> HazardKind {
        HazardKind::SpecialWarning
    }
}

/// A `specialwarning/warnings` entry as sent by the backend. Counts arrive either as
/// voter lists or as explicit numbers depending on the backend revision.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawSpecialWarning {
    id: NumberOrText,
    #[serde(default)]
    name: String,
    #[serde(default)]
    lat: Option<NumberOrText>,
    #[serde(default)]
    long: Option<NumberOrText>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    created_by: Option<NumberOrText>,
    #[serde(default)]
    profile_picture: Option<String>,
    #[serde(default)]
    verified_by: Vec<serde_json::Value>,
    #[serde(default)]
    denied_by: Vec<serde_json::Value>,
    #[serde(default)]
    verified_count: Option<usize>,
    #[serde(default)]
    denied_count: Option<usize>,
    #[serde(default)]
    has_verified: bool,
    #[serde(default)]
    has_denied: bool,
    #[serde(default)]
    is_creator: bool,
}

impl RawSpecialWarning {
    pub(crate) fn into_special_warning(self) -> Option<SpecialWarning> {
        let Some(coordinates) = parse_wire_coordinates(&self.lat, &self.long) else {
            debug!(
                "Dropping special warning {} with invalid coordinates",
                self.id.as_text()
            );
            return None;
        };
        Some(SpecialWarning {
            id: self.id.as_text(),
            description: self.name,
            coordinates,
            image_url: self.image,
            created_at: self.created_at.unwrap_or_default(),
            created_by: self.created_by.map(|c| c.as_text()).unwrap_or_default(),
            profile_picture: self.profile_picture,
            verified_count: self.verified_count.unwrap_or(self.verified_by.len()),
            denied_count: self.denied_count.unwrap_or(self.denied_by.len()),
            has_verified: self.has_verified,
            has_denied: self.has_denied,
            is_creator: self.is_creator,
        })
    }
}

pub(crate) fn special_warnings_from_raw(raw: Vec<RawSpecialWarning>) -> Vec<SpecialWarning> {
    raw.into_iter()
        .filter_map(RawSpecialWarning::into_special_warning)
        .collect()
}

/// Everything needed to submit a new special warning.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSpecialWarning {
    pub description: String,
    pub location: LatLon,
    /// JPEG bytes of the attached photo.
    pub image: Vec<u8>,
    pub image_file_name: String,
}

impl NewSpecialWarning {
    pub fn new(description: impl Into<String>, location: LatLon, image: Vec<u8>) -> Self {
        Self {
            description: description.into(),
            location,
            image,
            image_file_name: "upload.jpeg".to_string(),
        }
    }

    /// Returns the first missing or invalid field, if any.
    pub(crate) fn missing_field(&self) -> Option<&'static str> {
        if self.description.trim().is_empty() {
            Some("description")
        } else if self.image.is_empty() {
            Some("image")
        } else if !self.location.is_valid() {
            Some("location")
        } else {
            None
        }
    }
}
