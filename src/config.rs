//! Client configuration. Every field has a default matching the production service,
//! so `ClientConfig::default()` is enough for most callers.

use bon::Builder;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://si-banjir-be.vercel.app/api";

/// Environment variable that overrides [`ClientConfig::base_url`] in [`ClientConfig::from_env`].
pub const BASE_URL_ENV: &str = "FLOOD_ALERT_API_URL";

/// Tunables for the API client and the on-device alerting logic.
///
/// ```
/// use flood_alert::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .base_url("http://10.0.2.2:8000/api")
///     .proximity_radius_m(1_000.0)
///     .dedup_window(Duration::from_secs(60))
///     .build();
/// assert_eq!(config.base_url, "http://10.0.2.2:8000/api");
/// assert_eq!(config.verify_radius_m, 100.0);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    /// Base url of the REST API, without trailing slash.
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,

    /// Timeout applied to every request.
    #[builder(default = Duration::from_secs(30))]
    pub request_timeout: Duration,

    /// Timeout for `user/searchFriend`, the one endpoint that is retried.
    #[builder(default = Duration::from_secs(10))]
    pub search_timeout: Duration,

    /// How many times a timed-out friend search is retried.
    #[builder(default = 1)]
    pub search_retries: u32,

    /// Radius for the "hazards near me" list.
    #[builder(default = 3_000.0)]
    pub proximity_radius_m: f64,

    /// Radius within which a viewer is asked to verify or deny special warnings.
    #[builder(default = 100.0)]
    pub verify_radius_m: f64,

    /// Distance under which a hazard triggers a push notification.
    #[builder(default = 3_000.0)]
    pub notify_radius_m: f64,

    /// Whether proximity alerts are scheduled at all. The user can turn them off in
    /// the app preferences.
    #[builder(default = true)]
    pub notifications_enabled: bool,

    /// Repeat alerts for the same hazard are suppressed within this window.
    #[builder(default = Duration::from_secs(15 * 60))]
    pub dedup_window: Duration,

    /// Minimum interval between two `user/sendLocation` calls.
    #[builder(default = Duration::from_secs(5))]
    pub send_location_interval: Duration,

    /// Delay between animating to a marker and opening its callout.
    #[builder(default = Duration::from_millis(500))]
    pub focus_delay: Duration,

    /// Latitude/longitude span of the region shown when focusing a single marker.
    #[builder(default = 0.01)]
    pub focus_region_delta: f64,

    /// Directory holding the persisted auth token. Defaults to the platform data dir.
    pub token_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientConfig {
    /// Default configuration with the base url taken from `FLOOD_ALERT_API_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                info!("Using API base url from {}: {}", BASE_URL_ENV, url);
                config.base_url = url.to_string();
            }
        }
        config
    }

    /// Joins an endpoint path onto the base url.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
