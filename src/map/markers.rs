//! The three marker layers shown on the map and the regions that frame them.

use crate::proximity::locate_hazard::HazardLocator;
use crate::types::coordinates::LatLon;
use crate::types::flood_watch::FloodWatch;
use crate::types::friend::FriendLocation;
use crate::types::special_warning::SpecialWarning;

/// Smallest span a computed region is allowed to have, in degrees.
const MIN_REGION_DELTA: f64 = 0.005;

/// Everything currently plotted on the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerSet {
    pub flood_watches: Vec<FloodWatch>,
    pub special_warnings: Vec<SpecialWarning>,
    pub friend_locations: Vec<FriendLocation>,
}

/// A borrowed marker from one of the three layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerRef<'a> {
    FloodWatch(&'a FloodWatch),
    SpecialWarning(&'a SpecialWarning),
    Friend(&'a FriendLocation),
}

impl MarkerRef<'_> {
    pub fn id(&self) -> &str {
        match self {
            MarkerRef::FloodWatch(m) => &m.id,
            MarkerRef::SpecialWarning(m) => &m.id,
            MarkerRef::Friend(m) => &m.id,
        }
    }

    pub fn coordinates(&self) -> LatLon {
        match self {
            MarkerRef::FloodWatch(m) => m.coordinates,
            MarkerRef::SpecialWarning(m) => m.coordinates,
            MarkerRef::Friend(m) => m.coordinates,
        }
    }

    /// Callout title.
    pub fn title(&self) -> &str {
        match self {
            MarkerRef::FloodWatch(m) => &m.name,
            MarkerRef::SpecialWarning(m) => &m.description,
            MarkerRef::Friend(m) => &m.id,
        }
    }
}

impl MarkerSet {
    pub fn len(&self) -> usize {
        self.flood_watches.len() + self.special_warnings.len() + self.friend_locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All markers, flood watches first, then special warnings, then friends.
    pub fn iter(&self) -> impl Iterator<Item = MarkerRef<'_>> {
        self.flood_watches
            .iter()
            .map(MarkerRef::FloodWatch)
            .chain(self.special_warnings.iter().map(MarkerRef::SpecialWarning))
            .chain(self.friend_locations.iter().map(MarkerRef::Friend))
    }

    /// Finds a marker by id. Ids are only unique per layer, so the first match in
    /// [`MarkerSet::iter`] order wins.
    pub fn find(&self, id: &str) -> Option<MarkerRef<'_>> {
        self.iter().find(|marker| marker.id() == id)
    }

    /// Spatial index over the two hazard layers. Friends are not hazards.
    pub fn hazard_locator(&self) -> HazardLocator {
        HazardLocator::new(&self.flood_watches, &self.special_warnings)
    }

    /// Region framing every marker, or `None` when there are none.
    pub fn region(&self, padding: f64) -> Option<Region> {
        let points: Vec<LatLon> = self.iter().map(|m| m.coordinates()).collect();
        Region::bounding(&points, padding)
    }
}

/// A map viewport: centre plus latitude/longitude span in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    /// A square region of `delta` degrees centred on `point`.
    pub fn around(point: LatLon, delta: f64) -> Self {
        Self {
            latitude: point.0,
            longitude: point.1,
            latitude_delta: delta,
            longitude_delta: delta,
        }
    }

    /// The smallest region containing all `points`, grown by `padding` (a fraction of
    /// the span, `0.2` adds 20%). Returns `None` for an empty slice.
    ///
    /// ```
    /// use flood_alert::{LatLon, Region};
    ///
    /// let region = Region::bounding(&[LatLon(-27.0, 153.0), LatLon(-28.0, 152.0)], 0.0).unwrap();
    /// assert_eq!((region.latitude, region.longitude), (-27.5, 152.5));
    /// assert_eq!((region.latitude_delta, region.longitude_delta), (1.0, 1.0));
    /// ```
    pub fn bounding(points: &[LatLon], padding: f64) -> Option<Self> {
        let first = points.first()?;
        let (mut min_lat, mut max_lat) = (first.0, first.0);
        let (mut min_lon, mut max_lon) = (first.1, first.1);
        for p in &points[1..] {
            min_lat = min_lat.min(p.0);
            max_lat = max_lat.max(p.0);
            min_lon = min_lon.min(p.1);
            max_lon = max_lon.max(p.1);
        }
        let grow = 1.0 + padding.max(0.0);
        Some(Self {
            latitude: (min_lat + max_lat) / 2.0,
            longitude: (min_lon + max_lon) / 2.0,
            latitude_delta: ((max_lat - min_lat) * grow).max(MIN_REGION_DELTA),
            longitude_delta: ((max_lon - min_lon) * grow).max(MIN_REGION_DELTA),
        })
    }

    pub fn center(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }

    pub fn contains(&self, point: LatLon) -> bool {
        (point.0 - self.latitude).abs() <= self.latitude_delta / 2.0
            && (point.1 - self.longitude).abs() <= self.longitude_delta / 2.0
    }
}
