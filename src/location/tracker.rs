//! Consumes the device position feed: proximity alerts plus throttled location sharing.

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::location::throttle::SendThrottle;
use crate::notify::proximity_notifier::{NotificationScheduler, ProximityNotifier};
use crate::proximity::locate_hazard::{HazardLocator, NearestHazard};
use crate::types::coordinates::LatLon;
use chrono::Utc;
use futures_util::{Stream, StreamExt};
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Where shared positions go. Implemented by [`ApiClient`] (`user/sendLocation`).
pub trait LocationReporter {
    fn report_location(&self, position: LatLon) -> impl Future<Output = Result<(), ApiError>>;
}

impl LocationReporter for ApiClient {
    async fn report_location(&self, position: LatLon) -> Result<(), ApiError> {
        self.send_location(position).await
    }
}

impl<R: LocationReporter + ?Sized> LocationReporter for Arc<R> {
    async fn report_location(&self, position: LatLon) -> Result<(), ApiError> {
        (**self).report_location(position).await
    }
}

/// What happened for one position update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionUpdate {
    pub nearest: Option<NearestHazard>,
    pub notified: usize,
    pub location_sent: bool,
}

/// Per-position pipeline: remember the position, alert on nearby hazards (unless the
/// user turned alerts off) and, if the user shares their location, report it at most
/// once per throttle interval.
pub struct LocationTracker<R, S> {
    reporter: R,
    notifier: ProximityNotifier<S>,
    hazards: HazardLocator,
    throttle: SendThrottle,
    share_location: bool,
    notifications_enabled: bool,
    last_position: Option<LatLon>,
}

impl<R: LocationReporter, S: NotificationScheduler> LocationTracker<R, S> {
    pub fn new(
        reporter: R,
        notifier: ProximityNotifier<S>,
        hazards: HazardLocator,
        throttle: SendThrottle,
        share_location: bool,
    ) -> Self {
        Self {
            reporter,
            notifier,
            hazards,
            throttle,
            share_location,
            notifications_enabled: true,
            last_position: None,
        }
    }

    pub fn last_position(&self) -> Option<LatLon> {
        self.last_position
    }

    /// Replaces the hazards positions are checked against, e.g. after a marker refresh.
    pub fn set_hazards(&mut self, hazards: HazardLocator) {
        self.hazards = hazards;
    }

    pub fn set_share_location(&mut self, share: bool) {
        self.share_location = share;
    }

    /// Turns proximity alerts on or off. The nearest hazard is still reported.
    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        self.notifications_enabled = enabled;
    }

    /// Handles a single position. Invalid coordinates are ignored; a failed send is
    /// logged and otherwise swallowed.
    pub async fn update(&mut self, position: LatLon) -> PositionUpdate {
        if !position.is_valid() {
            warn!("Ignoring invalid position {}", position);
            return PositionUpdate::default();
        }
        self.last_position = Some(position);

        let nearest = self.hazards.nearest(position);
        let notified = if self.notifications_enabled {
            self.notifier.check(position, &self.hazards, Utc::now())
        } else {
            0
        };

        let mut location_sent = false;
        if self.share_location && self.throttle.try_acquire(Instant::now()) {
            match self.reporter.report_location(position).await {
                Ok(()) => {
                    debug!("Shared location {}", position);
                    location_sent = true;
                }
                Err(e) => warn!("Failed to share location {}: {}", position, e),
            }
        }

        PositionUpdate {
            nearest,
            notified,
            location_sent,
        }
    }

    /// Runs until the position stream ends. Returns the number of positions handled.
    pub async fn run<P>(&mut self, positions: P) -> usize
    where
        P: Stream<Item = LatLon>,
    {
        let mut positions = std::pin::pin!(positions);
        let mut handled = 0;
        while let Some(position) = positions.next().await {
            self.update(position).await;
            handled += 1;
        }
        info!("Position feed ended after {} updates", handled);
        handled
    }
}
