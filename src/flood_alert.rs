//! The main entry point: one object owning the API client, the sign-in session and the
//! notification cache, with per-area sub-clients for warnings, friends and the account.

use crate::api::client::ApiClient;
use crate::auth::session::{AuthState, Session};
use crate::auth::token_store::{FileTokenStore, TokenStore};
use crate::clients::account_client::AccountClient;
use crate::clients::friends_client::FriendsClient;
use crate::clients::warnings_client::WarningsClient;
use crate::config::ClientConfig;
use crate::error::FloodAlertError;
use crate::location::throttle::SendThrottle;
use crate::location::tracker::LocationTracker;
use crate::map::focus::{focus_marker, MapView};
use crate::map::markers::MarkerSet;
use crate::notify::dedup::NotificationDeduplicator;
use crate::notify::proximity_notifier::{NotificationScheduler, ProximityNotifier};
use crate::proximity::locate_hazard::{HazardLocator, Nearby};
use crate::types::coordinates::LatLon;
use crate::types::hazard::AnyHazard;
use crate::types::user::Acknowledgement;
use bon::bon;
use futures_util::Stream;
use log::{info, warn};
use std::sync::Arc;

/// Client for the flood-alert service.
///
/// ```no_run
/// use flood_alert::{ClientConfig, FloodAlert, FloodAlertError, LatLon};
///
/// # async fn run() -> Result<(), FloodAlertError> {
/// let app = FloodAlert::new(ClientConfig::from_env())?;
/// app.restore().await?;
///
/// let markers = app.markers().await?;
/// println!("{} markers on the map", markers.len());
///
/// let nearby = app
///     .nearby_hazards()
///     .location(LatLon(-27.5263, 153.0954))
///     .radius_m(1_000.0)
///     .call()
///     .await?;
/// for hazard in nearby {
///     println!("{:.0} m away", hazard.distance_m);
/// }
/// # Ok(())
/// # }
/// ```
pub struct FloodAlert {
    api: Arc<ApiClient>,
    session: Session,
    dedup: Arc<NotificationDeduplicator>,
}

#[bon]
impl FloodAlert {
    /// Uses a [`FileTokenStore`] in `config.token_dir`, or the platform data dir.
    pub fn new(config: ClientConfig) -> Result<Self, FloodAlertError> {
        let store = match &config.token_dir {
            Some(dir) => FileTokenStore::in_dir(dir)?,
            None => FileTokenStore::new()?,
        };
        Self::with_token_store(config, Arc::new(store))
    }

    pub fn with_token_store(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, FloodAlertError> {
        let dedup = Arc::new(NotificationDeduplicator::new(config.dedup_window));
        let api = Arc::new(ApiClient::new(config)?);
        Ok(Self {
            session: Session::new(api.clone(), store),
            api,
            dedup,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    /// The underlying REST client, for endpoints not wrapped by a sub-client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn auth_state(&self) -> AuthState {
        self.session.state()
    }

    pub fn notification_cache(&self) -> &NotificationDeduplicator {
        &self.dedup
    }

    pub(crate) fn require_session(&self) -> Result<(), FloodAlertError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(FloodAlertError::NotSignedIn)
        }
    }

    pub async fn sign_in(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthState, FloodAlertError> {
        self.session.sign_in(username, password).await
    }

    pub async fn sign_up(
        &self,
        username: &str,
        password: &str,
        password2: &str,
    ) -> Result<Acknowledgement, FloodAlertError> {
        self.session.sign_up(username, password, password2).await
    }

    /// Signs out and forgets which hazards were already notified.
    pub fn sign_out(&self) -> Result<(), FloodAlertError> {
        self.dedup.clear();
        self.session.sign_out()
    }

    pub async fn restore(&self) -> Result<AuthState, FloodAlertError> {
        self.session.restore().await
    }

    /// Fetches flood watches, special warnings and (when signed in) friend locations
    /// concurrently.
    ///
    /// Either hazard layer failing fails the call. A failed friend layer is logged and
    /// left empty so the hazards still reach the map.
    pub async fn markers(&self) -> Result<MarkerSet, FloodAlertError> {
        let hazards = async {
            tokio::try_join!(self.api.flood_watches(), self.api.special_warnings())
        };
        let friends = async {
            if !self.session.is_authenticated() {
                return Vec::new();
            }
            match self.api.friend_locations().await {
                Ok(locations) => locations,
                Err(e) => {
                    warn!("Could not fetch friend locations ({}), showing hazards only", e);
                    Vec::new()
                }
            }
        };
        let (hazards, friend_locations) = tokio::join!(hazards, friends);
        let (flood_watches, special_warnings) = hazards?;
        Ok(MarkerSet {
            flood_watches,
            special_warnings,
            friend_locations,
        })
    }

    /// Hazards (flood watches and special warnings) around `location`, closest first.
    /// `radius_m` defaults to [`ClientConfig::proximity_radius_m`].
    #[builder]
    pub async fn nearby_hazards(
        &self,
        location: LatLon,
        radius_m: Option<f64>,
    ) -> Result<Vec<Nearby<AnyHazard>>, FloodAlertError> {
        let radius_m = radius_m.unwrap_or(self.config().proximity_radius_m);
        let (flood_watches, special_warnings) =
            tokio::try_join!(self.api.flood_watches(), self.api.special_warnings())?;
        Ok(HazardLocator::new(&flood_watches, &special_warnings).within(location, radius_m))
    }

    pub fn warnings(&self) -> WarningsClient<'_> {
        WarningsClient::new(self)
    }

    pub fn friends(&self) -> FriendsClient<'_> {
        FriendsClient::new(self)
    }

    pub fn account(&self) -> AccountClient<'_> {
        AccountClient::new(self)
    }

    /// Centres `view` on the marker with `id` using the configured region size and
    /// callout delay. Returns `false` if no marker has that id.
    pub async fn focus_marker<V: MapView + ?Sized>(
        &self,
        view: &V,
        markers: &MarkerSet,
        id: &str,
    ) -> bool {
        let config = self.config();
        focus_marker(view, markers, id, config.focus_region_delta, config.focus_delay).await
    }

    /// A tracker checking positions against the hazards in `markers`. Proximity
    /// alerts follow [`ClientConfig::notifications_enabled`].
    pub fn tracker<S: NotificationScheduler>(
        &self,
        markers: &MarkerSet,
        scheduler: S,
        share_location: bool,
    ) -> LocationTracker<Arc<ApiClient>, S> {
        let config = self.config();
        let mut tracker = LocationTracker::new(
            self.api.clone(),
            ProximityNotifier::new(self.dedup.clone(), scheduler, config.notify_radius_m),
            markers.hazard_locator(),
            SendThrottle::new(config.send_location_interval),
            share_location,
        );
        tracker.set_notifications_enabled(config.notifications_enabled);
        tracker
    }

    /// Fetches the current markers and follows `positions` until the stream ends,
    /// notifying nearby hazards through `scheduler`.
    ///
    /// The position is shared with friends only while signed in and only if the
    /// account allows it. Returns the number of positions handled.
    pub async fn track_location<P, S>(
        &self,
        positions: P,
        scheduler: S,
    ) -> Result<usize, FloodAlertError>
    where
        P: Stream<Item = LatLon>,
        S: NotificationScheduler,
    {
        let markers = self.markers().await?;
        let share_location = if self.session.is_authenticated() {
            match self.api.location_sharing().await {
                Ok(allowed) => allowed,
                Err(e) => {
                    warn!("Could not read location-sharing setting ({}), not sharing", e);
                    false
                }
            }
        } else {
            false
        };
        info!(
            "Tracking location against {} hazards (sharing: {})",
            markers.flood_watches.len() + markers.special_warnings.len(),
            share_location
        );
        Ok(self
            .tracker(&markers, scheduler, share_location)
            .run(positions)
            .await)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::canned_server::CannedServer;
    use crate::api::error::ApiError;
    use crate::auth::token_store::MemoryTokenStore;
    use crate::map::markers::tests::sample_markers;
    use crate::map::markers::{MarkerRef, Region};
    use crate::notify::proximity_notifier::tests::RecordingScheduler;
    use futures_util::stream;
    use std::sync::Mutex;
    use std::time::Duration;

    /// A client whose API never answers (connection refused on port 9).
    pub(crate) fn offline_app() -> FloodAlert {
        FloodAlert::with_token_store(
            ClientConfig::builder()
                .base_url("http://127.0.0.1:9/api")
                .request_timeout(Duration::from_secs(2))
                .focus_delay(Duration::from_millis(10))
                .build(),
            Arc::new(MemoryTokenStore::new()),
        )
        .unwrap()
    }

    /// A client talking to `server`, signed in with a token the server never checks.
    pub(crate) fn signed_in_app(server: &CannedServer) -> FloodAlert {
        let app = FloodAlert::with_token_store(
            ClientConfig::builder()
                .base_url(server.base_url())
                .focus_delay(Duration::from_millis(10))
                .build(),
            Arc::new(MemoryTokenStore::new()),
        )
        .unwrap();
        app.session().establish("tok".to_string()).unwrap();
        app
    }

    #[test]
    fn test_new_with_token_dir() {
        let dir = tempfile::tempdir().unwrap();
        let app = FloodAlert::new(
            ClientConfig::builder()
                .token_dir(dir.path().to_path_buf())
                .build(),
        )
        .unwrap();
        assert_eq!(app.auth_state(), AuthState::default());
        assert!(dir.path().exists());
    }

    #[test]
    fn test_sign_out_clears_notification_cache() {
        let app = offline_app();
        app.session().establish("tok".to_string()).unwrap();
        assert!(app
            .notification_cache()
            .should_notify("a|floodwatch", chrono::Utc::now()));
        assert!(!app.notification_cache().is_empty());

        app.sign_out().unwrap();
        assert!(app.notification_cache().is_empty());
        assert_eq!(app.auth_state().authenticated, Some(false));
    }

    #[tokio::test]
    async fn test_markers_network_failure_is_an_api_error() {
        let app = offline_app();
        let err = app.markers().await.unwrap_err();
        let FloodAlertError::Api(api) = &err else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(api.status(), None);
        assert_eq!(
            err.user_message(),
            "Network error. Please check your connection and try again."
        );
    }

    #[tokio::test]
    async fn test_nearby_hazards_builder_propagates_errors() {
        let app = offline_app();
        let result = app
            .nearby_hazards()
            .location(LatLon(-27.5, 153.0))
            .radius_m(500.0)
            .call()
            .await;
        assert!(matches!(result, Err(FloodAlertError::Api(_))));
    }

    #[derive(Default)]
    struct CalloutRecorder {
        callouts: Mutex<Vec<String>>,
        regions: Mutex<Vec<Region>>,
    }

    impl MapView for CalloutRecorder {
        fn animate_to_region(&self, region: Region, _duration: Duration) {
            self.regions.lock().unwrap().push(region);
        }

        fn show_callout(&self, marker: MarkerRef<'_>) {
            self.callouts.lock().unwrap().push(marker.id().to_string());
        }
    }

    #[tokio::test]
    async fn test_focus_marker_uses_config() {
        let app = offline_app();
        let view = CalloutRecorder::default();
        assert!(app.focus_marker(&view, &sample_markers(), "540200").await);
        assert_eq!(*view.callouts.lock().unwrap(), vec!["540200".to_string()]);
        assert_eq!(view.regions.lock().unwrap()[0].latitude_delta, 0.01);
    }

    #[tokio::test]
    async fn test_tracker_without_sharing_stays_offline() {
        let app = offline_app();
        let scheduler = Arc::new(RecordingScheduler::default());
        let mut tracker = app.tracker(&sample_markers(), scheduler.clone(), false);

        // Within 3 km of the "Road under water" warning, far from the gauge.
        let handled = tracker
            .run(stream::iter(vec![LatLon(-27.47, 153.03), LatLon(-27.47, 153.031)]))
            .await;
        assert_eq!(handled, 2);
        assert_eq!(scheduler.count(), 1);
        assert!(!app.notification_cache().is_empty());
    }

    #[tokio::test]
    async fn test_track_location_fails_when_markers_unavailable() {
        let app = offline_app();
        let scheduler = Arc::new(RecordingScheduler::default());
        let result = app
            .track_location(stream::iter(vec![LatLon(-27.5, 153.0)]), scheduler)
            .await;
        assert!(matches!(result, Err(FloodAlertError::Api(_))));
    }

    const GAUGE_JSON: &str = r#"[{"stn_num": "540200", "name": "Oxley Ck at Rocklea", "lat": -27.55, "long": 152.98, "class": "minor"}]"#;
    const WARNING_JSON: &str = r#"[{"id": 7, "name": "Road under water", "lat": "-27.47", "long": "153.02"}]"#;

    #[tokio::test]
    async fn test_markers_keep_hazards_when_friend_layer_fails() {
        let server = CannedServer::start(|request| match request.path.as_str() {
            "/api/govapi" => (200, GAUGE_JSON.to_string()),
            "/api/specialwarning/warnings" => (200, WARNING_JSON.to_string()),
            _ => (401, r#"{"detail": "Invalid token."}"#.to_string()),
        })
        .await;
        let app = signed_in_app(&server);

        let markers = app.markers().await.unwrap();
        assert_eq!(markers.flood_watches.len(), 1);
        assert_eq!(markers.special_warnings.len(), 1);
        assert!(markers.friend_locations.is_empty());

        let mut lines = server.request_lines();
        lines.sort();
        assert_eq!(
            lines,
            vec![
                "GET /api/govapi",
                "GET /api/specialwarning/warnings",
                "GET /api/user/sendLocation",
            ]
        );
    }

    #[tokio::test]
    async fn test_markers_fail_when_a_hazard_layer_fails() {
        let server = CannedServer::start(|request| match request.path.as_str() {
            "/api/govapi" => (500, String::new()),
            "/api/specialwarning/warnings" => (200, WARNING_JSON.to_string()),
            _ => (200, "[]".to_string()),
        })
        .await;
        let app = signed_in_app(&server);

        let err = app.markers().await.unwrap_err();
        assert!(matches!(err, FloodAlertError::Api(ApiError::Server { .. })));
    }

    #[tokio::test]
    async fn test_tracker_respects_disabled_notifications() {
        let app = FloodAlert::with_token_store(
            ClientConfig::builder()
                .base_url("http://127.0.0.1:9/api")
                .notifications_enabled(false)
                .build(),
            Arc::new(MemoryTokenStore::new()),
        )
        .unwrap();
        let scheduler = Arc::new(RecordingScheduler::default());
        let mut tracker = app.tracker(&sample_markers(), scheduler.clone(), false);

        let update = tracker.update(LatLon(-27.47, 153.03)).await;
        assert_eq!(update.notified, 0);
        assert!(update.nearest.is_some());
        assert_eq!(scheduler.count(), 0);
        assert!(app.notification_cache().is_empty());
    }
}
