//! Centre the map on one marker and open its callout.

use crate::map::markers::{MarkerRef, MarkerSet, Region};
use log::debug;
use std::time::Duration;

/// Duration of the camera animation when focusing a marker.
pub const FOCUS_ANIMATION: Duration = Duration::from_millis(1000);

/// The map widget, as far as this crate needs to drive it.
pub trait MapView {
    fn animate_to_region(&self, region: Region, duration: Duration);
    fn show_callout(&self, marker: MarkerRef<'_>);
}

/// Animates `view` to the marker with `id`, waits `delay`, then opens its callout.
///
/// Best effort: returns `false` (and touches nothing) when no layer contains `id`.
/// The callout is not re-checked after the delay; if the host removed the marker in
/// the meantime the call is simply ignored on its side.
pub async fn focus_marker<V: MapView + ?Sized>(
    view: &V,
    markers: &MarkerSet,
    id: &str,
    region_delta: f64,
    delay: Duration,
) -> bool {
    let Some(marker) = markers.find(id) else {
        debug!("No marker with id {} to focus", id);
        return false;
    };
    view.animate_to_region(Region::around(marker.coordinates(), region_delta), FOCUS_ANIMATION);
    tokio::time::sleep(delay).await;
    view.show_callout(marker);
    true
}
