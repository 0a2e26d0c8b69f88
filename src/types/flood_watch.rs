//! Defines the flood-gauge station record served by the `govapi` endpoint, both in its
//! raw wire shape and in the validated form the rest of the crate works with.

use crate::types::coordinates::{parse_wire_coordinates, LatLon, NumberOrText};
use crate::types::flood_class::FloodClass;
use crate::types::hazard::{Hazard, HazardKind};
use log::debug;
use serde::{Deserialize, Serialize};

const BOM_CHART_BASE_URL: &str = "http://www.bom.gov.au/fwo";

/// A government-monitored flood-gauge station with its latest observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodWatch {
    /// Station number (e.g. "540683").
    pub id: String,
    /// Station name (e.g. "Brisbane R at City Gauge").
    pub name: String,
    /// Validated station location.
    pub coordinates: LatLon,
    /// Classification tier of the latest observation.
    pub class: FloodClass,
    /// Observed water height in metres, if the station reported one.
    pub height: Option<f64>,
    /// Observation timestamp exactly as reported by the feed.
    pub observation_time: String,
    /// Crossing name, if any.
    pub xing_name: Option<String>,
    /// Rising/falling/steady indicator, if reported.
    pub tendency: Option<String>,
    /// Bureau forecast area the station belongs to.
    pub area_id: Option<String>,
}

impl FloodWatch {
    /// URL of the Bureau-of-Meteorology chart image for this gauge, when the station
    /// has a forecast area.
    ///
    /// ```
    /// # use flood_alert::{FloodWatch, FloodClass, LatLon};
    /// let watch = FloodWatch {
    ///     id: "40683".into(),
    ///     name: "Brisbane R at City Gauge".into(),
    ///     coordinates: LatLon(-27.47, 153.03),
    ///     class: FloodClass::BelowMinor,
    ///     height: Some(1.2),
    ///     observation_time: "2024-05-01T12:00:00".into(),
    ///     xing_name: None,
    ///     tendency: None,
    ///     area_id: Some("60300".into()),
    /// };
    /// assert_eq!(
    ///     watch.chart_url().unwrap(),
    ///     "http://www.bom.gov.au/fwo/IDQ60300/IDQ60300.040683.png"
    /// );
    /// ```
    pub fn chart_url(&self) -> Option<String> {
        let area = self.area_id.as_deref()?;
        Some(format!(
            "{BOM_CHART_BASE_URL}/IDQ{area}/IDQ{area}.{:0>6}.png",
            self.id
        ))
    }
}

impl Hazard for FloodWatch {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn coordinates(&self) -> LatLon {
        self.coordinates
    }

    fn kind(&self) -> HazardKind {
        HazardKind::FloodWatch
    }
}

/// A `govapi` entry as sent by the backend.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawFloodWatch {
    stn_num: NumberOrText,
    #[serde(default)]
    name: String,
    #[serde(default)]
    lat: Option<NumberOrText>,
    #[serde(default)]
    long: Option<NumberOrText>,
    #[serde(default)]
    class: FloodClass,
    #[serde(default)]
    hgt: Option<NumberOrText>,
    #[serde(default)]
    obs_time: Option<String>,
    #[serde(default)]
    xingname: Option<String>,
    #[serde(default)]
    tendency: Option<String>,
    #[serde(default)]
    area_id: Option<NumberOrText>,
}

impl RawFloodWatch {
    /// Converts into a [`FloodWatch`], or `None` when the coordinates don't validate.
    pub(crate) fn into_flood_watch(self) -> Option<FloodWatch> {
        let Some(coordinates) = parse_wire_coordinates(&self.lat, &self.long) else {
            debug!(
                "Dropping flood watch {} with invalid coordinates",
                self.stn_num.as_text()
            );
            return None;
        };
        Some(FloodWatch {
            id: self.stn_num.as_text(),
            name: self.name,
            coordinates,
            class: self.class,
            height: self.hgt.as_ref().and_then(NumberOrText::as_f64),
            observation_time: self.obs_time.unwrap_or_default(),
            xing_name: self.xingname,
            tendency: self.tendency,
            area_id: self.area_id.map(|a| a.as_text()),
        })
    }
}

/// Converts a `govapi` payload, dropping entries with invalid coordinates.
pub(crate) fn flood_watches_from_raw(raw: Vec<RawFloodWatch>) -> Vec<FloodWatch> {
    raw.into_iter()
        .filter_map(RawFloodWatch::into_flood_watch)
        .collect()
}
