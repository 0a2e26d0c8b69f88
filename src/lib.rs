mod api;
mod auth;
mod clients;
mod config;
mod error;
mod flood_alert;
mod location;
mod map;
mod notify;
mod proximity;
mod types;
mod utils;

pub use error::FloodAlertError;
pub use flood_alert::*;

pub use clients::account_client::*;
pub use clients::friends_client::*;
pub use clients::warnings_client::*;

pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL};

pub use api::client::ApiClient;
pub use api::error::{compose_error_message, ApiError};
pub use api::warnings::Vote;

pub use auth::error::TokenStoreError;
pub use auth::session::{AuthState, Session};
pub use auth::token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

pub use types::coordinates::{is_valid_coordinates, LatLon};
pub use types::flood_class::FloodClass;
pub use types::flood_watch::FloodWatch;
pub use types::friend::{Friend, FriendLocation, Invitation};
pub use types::hazard::{AnyHazard, Hazard, HazardKind};
pub use types::special_warning::{NewSpecialWarning, SpecialWarning};
pub use types::user::{Acknowledgement, NotificationRecord, UserProfile};

pub use proximity::locate_hazard::{
    verification_candidates, within_radius, HazardLocator, NearestHazard, Nearby,
    NEARBY_THRESHOLD_M,
};

pub use notify::dedup::{dedup_key, NotificationDeduplicator};
pub use notify::proximity_notifier::{
    Notification, NotificationScheduler, ProximityNotifier, NOTIFICATION_TITLE,
};

pub use map::focus::{focus_marker, MapView, FOCUS_ANIMATION};
pub use map::markers::{MarkerRef, MarkerSet, Region};

pub use location::throttle::SendThrottle;
pub use location::tracker::{LocationReporter, LocationTracker, PositionUpdate};
