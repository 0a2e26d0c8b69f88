//! Distance filtering of hazards around the user's position.
//!
//! Hazard lists are small (tens of items), so [`within_radius`] is a plain
//! filter-map-sort. [`HazardLocator`] additionally indexes both hazard lists in an
//! R-tree for the "nearest hazard" banner and for bounding-box pre-filtering.

use crate::types::coordinates::LatLon;
use crate::types::flood_watch::FloodWatch;
use crate::types::hazard::{AnyHazard, Hazard};
use crate::types::special_warning::SpecialWarning;
use ordered_float::OrderedFloat;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// Metres per degree of latitude on the haversine sphere (R = 6371 km).
const METRES_PER_DEGREE: f64 = 111_194.93;

/// Distance under which the nearest hazard is flagged as "nearby".
pub const NEARBY_THRESHOLD_M: f64 = 100.0;

/// An item paired with its great-circle distance from the query origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Nearby<T> {
    pub item: T,
    pub distance_m: f64,
}

/// Returns the items within `radius_m` of `origin` (inclusive), closest first.
///
/// Items at equal distance keep their input order.
///
/// ```
/// use flood_alert::{within_radius, LatLon, FloodWatch, FloodClass};
///
/// let gauge = |id: &str, lat: f64| FloodWatch {
///     id: id.into(), name: id.into(), coordinates: LatLon(lat, 153.0),
///     class: FloodClass::Minor, height: None, observation_time: String::new(),
///     xing_name: None, tendency: None, area_id: None,
/// };
/// let gauges = [gauge("far", -27.0), gauge("near", -27.499)];
/// let found = within_radius(LatLon(-27.5, 153.0), &gauges, 3_000.0);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].item.id, "near");
/// ```
pub fn within_radius<T: Hazard + Clone>(
    origin: LatLon,
    items: &[T],
    radius_m: f64,
) -> Vec<Nearby<T>> {
    let mut found: Vec<Nearby<T>> = items
        .iter()
        .filter_map(|item| {
            let distance_m = origin.distance_m(item.coordinates());
            (distance_m <= radius_m).then(|| Nearby {
                item: item.clone(),
                distance_m,
            })
        })
        .collect();
    found.sort_by_key(|n| OrderedFloat(n.distance_m));
    found
}

/// Special warnings within `verify_radius_m` that the viewer can still vote on,
/// closest first.
pub fn verification_candidates(
    origin: LatLon,
    warnings: &[SpecialWarning],
    verify_radius_m: f64,
) -> Vec<Nearby<SpecialWarning>> {
    within_radius(origin, warnings, verify_radius_m)
        .into_iter()
        .filter(|n| n.item.awaits_vote())
        .collect()
}

/// The single closest hazard to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestHazard {
    pub hazard: AnyHazard,
    pub distance_m: f64,
    /// `true` when within [`NEARBY_THRESHOLD_M`].
    pub nearby: bool,
}

#[derive(Debug, Clone)]
struct IndexedHazard {
    point: [f64; 2],
    hazard: AnyHazard,
}

impl RTreeObject for IndexedHazard {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedHazard {
    // Squared distance in degree space; only used to order candidates; final
    // distances are always haversine.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over both hazard lists.
#[derive(Debug, Clone)]
pub struct HazardLocator {
    rtree: RTree<IndexedHazard>,
}

impl HazardLocator {
    pub fn new(flood_watches: &[FloodWatch], special_warnings: &[SpecialWarning]) -> Self {
        let hazards = flood_watches
            .iter()
            .cloned()
            .map(AnyHazard::FloodWatch)
            .chain(
                special_warnings
                    .iter()
                    .cloned()
                    .map(AnyHazard::SpecialWarning),
            )
            .map(|hazard| {
                let c = hazard.coordinates();
                IndexedHazard {
                    point: [c.0, c.1],
                    hazard,
                }
            })
            .collect();
        Self {
            rtree: RTree::bulk_load(hazards),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// All hazards within `radius_m` of `origin`, closest first.
    ///
    /// Candidates are walked in degree-space order and the walk stops once they are
    /// further than the radius can reach in degrees. Close to the poles or the
    /// antimeridian that bound is not representable and every hazard is checked instead.
    pub fn within(&self, origin: LatLon, radius_m: f64) -> Vec<Nearby<AnyHazard>> {
        let query_point = [origin.0, origin.1];
        let candidates: Vec<&IndexedHazard> = match search_radius_deg(origin, radius_m) {
            Some(max_deg) => {
                let max_distance_2 = max_deg * max_deg;
                self.rtree
                    .nearest_neighbor_iter(&query_point)
                    .take_while(|indexed| indexed.distance_2(&query_point) <= max_distance_2)
                    .collect()
            }
            None => self.rtree.iter().collect(),
        };

        let mut found: Vec<Nearby<AnyHazard>> = candidates
            .into_iter()
            .filter_map(|indexed| {
                let distance_m = origin.distance_m(indexed.hazard.coordinates());
                (distance_m <= radius_m).then(|| Nearby {
                    item: indexed.hazard.clone(),
                    distance_m,
                })
            })
            .collect();
        found.sort_by_key(|n| OrderedFloat(n.distance_m));
        found
    }

    /// The closest hazard to `origin`, if any hazards are indexed.
    pub fn nearest(&self, origin: LatLon) -> Option<NearestHazard> {
        // Degree-space order only approximates haversine order (longitude shrinks
        // towards the poles), so walk outwards until no unvisited point can beat the
        // best haversine distance seen so far.
        let query = [origin.0, origin.1];
        let mut best: Option<(&IndexedHazard, f64)> = None;
        let mut bound_2 = f64::INFINITY;
        for indexed in self.rtree.nearest_neighbor_iter(&query) {
            if indexed.distance_2(&query) > bound_2 {
                break;
            }
            let distance_m = origin.distance_m(indexed.hazard.coordinates());
            if best.map_or(true, |(_, best_m)| distance_m < best_m) {
                best = Some((indexed, distance_m));
                bound_2 = search_radius_deg(origin, distance_m)
                    .map_or(f64::INFINITY, |max_deg| max_deg * max_deg);
            }
        }
        best.map(|(indexed, distance_m)| NearestHazard {
            hazard: indexed.hazard.clone(),
            distance_m,
            nearby: distance_m <= NEARBY_THRESHOLD_M,
        })
    }
}

/// Degree-space distance that covers every point within `radius_m` of `origin`.
fn search_radius_deg(origin: LatLon, radius_m: f64) -> Option<f64> {
    // 1% slack absorbs rounding at the edge.
    let lat_delta = radius_m / METRES_PER_DEGREE * 1.01;
    let min_lat = origin.0 - lat_delta;
    let max_lat = origin.0 + lat_delta;
    if min_lat <= -89.0 || max_lat >= 89.0 {
        return None;
    }
    let widest_cos = min_lat.abs().max(max_lat.abs()).to_radians().cos();
    let lon_delta = lat_delta / widest_cos;
    if origin.1 - lon_delta < -180.0 || origin.1 + lon_delta > 180.0 {
        return None;
    }
    Some(lat_delta.max(lon_delta) * std::f64::consts::SQRT_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::flood_class::FloodClass;

    const ORIGIN: LatLon = LatLon(-27.5, 153.0);

    fn gauge(id: &str, coordinates: LatLon) -> FloodWatch {
        FloodWatch {
            id: id.to_string(),
            name: format!("Gauge {id}"),
            coordinates,
            class: FloodClass::Minor,
            height: Some(1.0),
            observation_time: String::new(),
            xing_name: None,
            tendency: None,
            area_id: None,
        }
    }

    fn warning(id: &str, coordinates: LatLon) -> SpecialWarning {
        SpecialWarning {
            id: id.to_string(),
            description: format!("Warning {id}"),
            coordinates,
            image_url: None,
            created_at: String::new(),
            created_by: "someone".to_string(),
            profile_picture: None,
            verified_count: 0,
            denied_count: 0,
            has_verified: false,
            has_denied: false,
            is_creator: false,
        }
    }

    /// A point `metres` due north of `ORIGIN`.
    fn north(metres: f64) -> LatLon {
        LatLon(ORIGIN.0 + metres / METRES_PER_DEGREE, ORIGIN.1)
    }

    #[test]
    fn test_within_radius_filters_and_sorts() {
        let gauges = vec![
            gauge("900m", north(900.0)),
            gauge("1500m", north(1_500.0)),
            gauge("500m", north(500.0)),
        ];
        let found = within_radius(ORIGIN, &gauges, 1_000.0);
        let ids: Vec<&str> = found.iter().map(|n| n.item.id.as_str()).collect();
        assert_eq!(ids, ["500m", "900m"]);
        assert!((found[0].distance_m - 500.0).abs() < 1.0);
        assert!((found[1].distance_m - 900.0).abs() < 1.0);
    }

    #[test]
    fn test_within_radius_edge_cases() {
        let empty: Vec<FloodWatch> = Vec::new();
        assert!(within_radius(ORIGIN, &empty, 1_000.0).is_empty());

        let here = vec![gauge("here", ORIGIN)];
        let found = within_radius(ORIGIN, &here, 0.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].distance_m, 0.0);
    }

    #[test]
    fn test_verification_candidates_skip_voted_and_own() {
        let mut own = warning("own", north(20.0));
        own.is_creator = true;
        let mut verified = warning("verified", north(30.0));
        verified.has_verified = true;
        let mut denied = warning("denied", north(40.0));
        denied.has_denied = true;
        let open = warning("open", north(50.0));
        let far = warning("far", north(500.0));

        let found = verification_candidates(ORIGIN, &[own, verified, denied, open, far], 100.0);
        let ids: Vec<&str> = found.iter().map(|n| n.item.id.as_str()).collect();
        assert_eq!(ids, ["open"]);
    }

    #[test]
    fn test_locator_matches_linear_filter() {
        let gauges: Vec<FloodWatch> = (0..40)
            .map(|i| gauge(&format!("g{i}"), north(i as f64 * 150.0)))
            .collect();
        let warnings: Vec<SpecialWarning> = (0..10)
            .map(|i| {
                warning(
                    &format!("w{i}"),
                    LatLon(ORIGIN.0, ORIGIN.1 + i as f64 * 0.004),
                )
            })
            .collect();
        let locator = HazardLocator::new(&gauges, &warnings);
        assert_eq!(locator.len(), 50);

        let indexed = locator.within(ORIGIN, 3_000.0);
        let mut expected: Vec<(String, f64)> = within_radius(ORIGIN, &gauges, 3_000.0)
            .into_iter()
            .map(|n| (n.item.id, n.distance_m))
            .chain(
                within_radius(ORIGIN, &warnings, 3_000.0)
                    .into_iter()
                    .map(|n| (n.item.id, n.distance_m)),
            )
            .collect();
        expected.sort_by_key(|(_, d)| OrderedFloat(*d));

        assert_eq!(indexed.len(), expected.len());
        for (found, (id, d)) in indexed.iter().zip(expected.iter()) {
            assert!((found.distance_m - d).abs() < 1e-6);
            // Ties (g0 and w0 both at the origin) may come in either order.
            if found.distance_m > 0.0 {
                assert_eq!(found.item.id(), id);
            }
        }
        assert!(indexed.windows(2).all(|w| w[0].distance_m <= w[1].distance_m));
    }

    #[test]
    fn test_locator_near_antimeridian_falls_back_to_scan() {
        let origin = LatLon(-16.0, 179.999);
        let across = gauge("across", LatLon(-16.0, -179.999));
        let locator = HazardLocator::new(&[across], &[]);
        let found = locator.within(origin, 1_000.0);
        assert_eq!(found.len(), 1);
        assert!(found[0].distance_m < 300.0);
    }

    #[test]
    fn test_nearest_flags_nearby() {
        let locator = HazardLocator::new(
            &[gauge("far", north(2_000.0))],
            &[warning("close", north(60.0))],
        );
        let nearest = locator.nearest(ORIGIN).unwrap();
        assert_eq!(nearest.hazard.id(), "close");
        assert!(nearest.nearby);

        let locator = HazardLocator::new(&[gauge("far", north(2_000.0))], &[]);
        let nearest = locator.nearest(ORIGIN).unwrap();
        assert!(!nearest.nearby);

        assert!(HazardLocator::new(&[], &[]).nearest(ORIGIN).is_none());
    }

    #[test]
    fn test_nearest_at_high_latitude() {
        // At 70°N a degree of longitude is about a third of a degree of latitude, so
        // plenty of points look closer than `east` in degree space but are not.
        let origin = LatLon(70.0, 0.0);
        let mut gauges: Vec<FloodWatch> = (0..25)
            .map(|i| gauge(&format!("decoy-{i}"), LatLon(70.21 + i as f64 * 0.009, 0.0)))
            .collect();
        gauges.push(gauge("north", LatLon(70.2, 0.0)));
        let locator = HazardLocator::new(&gauges, &[warning("east", LatLon(70.0, 0.5))]);

        let nearest = locator.nearest(origin).unwrap();
        assert_eq!(nearest.hazard.id(), "east");
        assert!((nearest.distance_m - 19_015.0).abs() < 100.0, "{}", nearest.distance_m);

        let linear = within_radius(origin, &gauges, 1_000_000.0);
        assert!(linear[0].distance_m > nearest.distance_m);
    }
}
