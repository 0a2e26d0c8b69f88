//! Provides the `FriendsClient` for the friend graph: search, invitations and shared
//! locations. Obtained via [`FloodAlert::friends()`]. Every call requires a signed-in
//! session.

use crate::types::user::Acknowledgement;
use crate::{FloodAlert, FloodAlertError, Friend, FriendLocation, Invitation, UserProfile};
use log::info;

pub struct FriendsClient<'a> {
    client: &'a FloodAlert,
}

impl<'a> FriendsClient<'a> {
    pub(crate) fn new(client: &'a FloodAlert) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Friend>, FloodAlertError> {
        self.client.require_session()?;
        Ok(self.client.api().friends().await?)
    }

    /// Last shared positions of friends who allow location sharing.
    pub async fn locations(&self) -> Result<Vec<FriendLocation>, FloodAlertError> {
        self.client.require_session()?;
        Ok(self.client.api().friend_locations().await?)
    }

    /// Looks up users by username. A blank query returns no results without a request.
    pub async fn search(&self, username: &str) -> Result<Vec<UserProfile>, FloodAlertError> {
        self.client.require_session()?;
        let username = username.trim();
        if username.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.client.api().search_friend(username).await?)
    }

    pub async fn invite(&self, recipient: &str) -> Result<Acknowledgement, FloodAlertError> {
        self.client.require_session()?;
        let ack = self.client.api().send_invitation(recipient).await?;
        info!("Invited {}", recipient);
        Ok(ack)
    }

    /// Invitations received by the signed-in user.
    pub async fn invitations(&self) -> Result<Vec<Invitation>, FloodAlertError> {
        self.client.require_session()?;
        Ok(self.client.api().invitations().await?)
    }

    /// Accepts `sender`'s invitation and returns the refreshed invitation list.
    pub async fn accept(&self, sender: &str) -> Result<Vec<Invitation>, FloodAlertError> {
        self.client.require_session()?;
        self.client.api().accept_invitation(sender).await?;
        info!("Accepted invitation from {}", sender);
        self.invitations().await
    }

    /// Declines `sender`'s invitation to the signed-in user and returns the refreshed
    /// invitation list.
    pub async fn decline(&self, sender: &str) -> Result<Vec<Invitation>, FloodAlertError> {
        self.client.require_session()?;
        let me = self.client.api().me().await?;
        self.client
            .api()
            .delete_invitation(sender, &me.username)
            .await?;
        info!("Declined invitation from {}", sender);
        self.invitations().await
    }
}
