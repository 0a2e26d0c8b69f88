//! Turns "a hazard is close to the user" into a de-duplicated local notification.

use crate::notify::dedup::{dedup_key, NotificationDeduplicator};
use crate::proximity::locate_hazard::HazardLocator;
use crate::types::coordinates::LatLon;
use crate::types::hazard::{AnyHazard, Hazard};
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;

pub const NOTIFICATION_TITLE: &str = "Floods near your place";

/// A local notification ready to be handed to the device.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub hazard: AnyHazard,
    pub distance_m: f64,
}

impl Notification {
    pub fn for_hazard(hazard: AnyHazard, distance_m: f64) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: format!(
                "There's a nearby flood. Approximately {:.1} Km from your place",
                distance_m / 1000.0
            ),
            hazard,
            distance_m,
        }
    }
}

/// Hands notifications to whatever delivers them (the OS notification service in the
/// app, a recorder in tests). Delivery is fire-and-forget.
pub trait NotificationScheduler: Send + Sync {
    fn schedule(&self, notification: Notification);
}

impl<S: NotificationScheduler + ?Sized> NotificationScheduler for Arc<S> {
    fn schedule(&self, notification: Notification) {
        (**self).schedule(notification)
    }
}

/// Notifies each hazard inside `radius_m` at most once per de-duplication window.
pub struct ProximityNotifier<S> {
    dedup: Arc<NotificationDeduplicator>,
    scheduler: S,
    radius_m: f64,
}

impl<S: NotificationScheduler> ProximityNotifier<S> {
    pub fn new(dedup: Arc<NotificationDeduplicator>, scheduler: S, radius_m: f64) -> Self {
        Self {
            dedup,
            scheduler,
            radius_m,
        }
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Checks `position` against every indexed hazard and schedules a notification
    /// for each one in range that has not been notified within the window.
    /// Returns how many notifications were scheduled.
    pub fn check(&self, position: LatLon, hazards: &HazardLocator, now: DateTime<Utc>) -> usize {
        let mut scheduled = 0;
        for nearby in hazards.within(position, self.radius_m) {
            if !self.dedup.should_notify(&dedup_key(&nearby.item), now) {
                continue;
            }
            info!(
                "Notifying {} '{}' at {:.0} m",
                nearby.item.kind(),
                nearby.item.name(),
                nearby.distance_m
            );
            self.scheduler
                .schedule(Notification::for_hazard(nearby.item, nearby.distance_m));
            scheduled += 1;
        }
        scheduled
    }
}
