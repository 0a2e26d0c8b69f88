//! Map marker feeds: flood gauges, special warnings and friend locations.

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::types::flood_watch::{flood_watches_from_raw, FloodWatch, RawFloodWatch};
use crate::types::friend::{friend_locations_from_raw, FriendLocation, RawFriendLocation};
use crate::types::special_warning::{
    special_warnings_from_raw, RawSpecialWarning, SpecialWarning,
};
use log::info;

pub(crate) const GOVAPI_PATH: &str = "govapi";
pub(crate) const WARNINGS_PATH: &str = "specialwarning/warnings";
pub(crate) const SEND_LOCATION_PATH: &str = "user/sendLocation";

impl ApiClient {
    /// Fetches all flood-gauge stations, dropping any with invalid coordinates.
    pub async fn flood_watches(&self) -> Result<Vec<FloodWatch>, ApiError> {
        let raw: Vec<RawFloodWatch> = self.get_json(GOVAPI_PATH).await?;
        let total = raw.len();
        let watches = flood_watches_from_raw(raw);
        info!("Fetched {} flood watches ({} valid)", total, watches.len());
        Ok(watches)
    }

    /// Fetches all special warnings, dropping any with invalid coordinates.
    pub async fn special_warnings(&self) -> Result<Vec<SpecialWarning>, ApiError> {
        let raw: Vec<RawSpecialWarning> = self.get_json(WARNINGS_PATH).await?;
        let total = raw.len();
        let warnings = special_warnings_from_raw(raw);
        info!("Fetched {} special warnings ({} valid)", total, warnings.len());
        Ok(warnings)
    }

    /// Fetches the last shared location of every friend who allows sharing.
    pub async fn friend_locations(&self) -> Result<Vec<FriendLocation>, ApiError> {
        let raw: Vec<RawFriendLocation> = self.get_json(SEND_LOCATION_PATH).await?;
        let total = raw.len();
        let locations = friend_locations_from_raw(raw);
        info!("Fetched {} friend locations ({} shared)", total, locations.len());
        Ok(locations)
    }
}
