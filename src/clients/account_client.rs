//! Provides the `AccountClient` for the signed-in user's profile, privacy setting and
//! notification history. Obtained via [`FloodAlert::account()`].

use crate::{FloodAlert, FloodAlertError, LatLon, NotificationRecord, UserProfile};
use log::info;

pub struct AccountClient<'a> {
    client: &'a FloodAlert,
}

impl<'a> AccountClient<'a> {
    pub(crate) fn new(client: &'a FloodAlert) -> Self {
        Self { client }
    }

    pub async fn profile(&self) -> Result<UserProfile, FloodAlertError> {
        self.client.require_session()?;
        Ok(self.client.api().me().await?)
    }

    pub async fn location_sharing(&self) -> Result<bool, FloodAlertError> {
        self.client.require_session()?;
        Ok(self.client.api().location_sharing().await?)
    }

    /// Turns location sharing on or off and returns the stored value.
    pub async fn set_location_sharing(&self, allow: bool) -> Result<bool, FloodAlertError> {
        self.client.require_session()?;
        let stored = self.client.api().set_location_sharing(allow).await?;
        info!("Location sharing is now {}", if stored { "on" } else { "off" });
        Ok(stored)
    }

    /// Shares a single position right away, bypassing the tracker's throttle.
    pub async fn send_location(&self, position: LatLon) -> Result<(), FloodAlertError> {
        self.client.require_session()?;
        Ok(self.client.api().send_location(position).await?)
    }

    pub async fn notification_history(&self) -> Result<Vec<NotificationRecord>, FloodAlertError> {
        self.client.require_session()?;
        Ok(self.client.api().notification_history().await?)
    }
}
