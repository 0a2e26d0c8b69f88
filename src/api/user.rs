//! Account, location-sharing and friend-graph endpoints under `user/`.

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::markers::SEND_LOCATION_PATH;
use crate::types::coordinates::LatLon;
use crate::types::friend::{Friend, Invitation};
use crate::types::user::{
    AcceptInvitation, Acknowledgement, Credentials, DeleteInvitation, InvitationRequest,
    LocationReport, LocationSharing, LoginResponse, OneOrMany, Registration, UserProfile,
};
use log::{info, warn};
use reqwest::Method;

const LOGIN_PATH: &str = "user/login";
const REGISTER_PATH: &str = "user/register";
pub(crate) const ME_PATH: &str = "user/me";
const SWITCH_LOCATION_PATH: &str = "user/switchLocation";
const LIST_FRIEND_PATH: &str = "user/listFriend";
const SEARCH_FRIEND_PATH: &str = "user/searchFriend";
const SEND_INVITATION_PATH: &str = "user/sendInvitation";
const LIST_INVITATION_PATH: &str = "user/listInvitation";
const CREATE_FRIEND_PATH: &str = "user/createFriend";
const DELETE_INVITATION_PATH: &str = "user/deleteInvitation";

impl ApiClient {
    /// Exchanges credentials for a token. Does not attach the token; see [`crate::Session`].
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let response: LoginResponse = self
            .post_json(LOGIN_PATH, &Credentials { username, password })
            .await?;
        info!("Logged in as {}", username);
        Ok(response.token)
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        password2: &str,
    ) -> Result<Acknowledgement, ApiError> {
        let ack = self
            .post_ack(
                REGISTER_PATH,
                &Registration {
                    username,
                    password,
                    password2,
                },
            )
            .await?;
        info!("Registered user {}", username);
        Ok(ack)
    }

    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.get_json(ME_PATH).await
    }

    /// Whether the signed-in user currently shares their location with friends.
    pub async fn location_sharing(&self) -> Result<bool, ApiError> {
        let sharing: LocationSharing = self.get_json(SWITCH_LOCATION_PATH).await?;
        Ok(sharing.allow_location)
    }

    /// Sets the location-sharing preference and returns the value the server stored.
    pub async fn set_location_sharing(&self, allow: bool) -> Result<bool, ApiError> {
        let (url, builder) = self.request(Method::POST, SWITCH_LOCATION_PATH);
        let (_, body) = self
            .execute(
                &url,
                builder.json(&LocationSharing {
                    allow_location: allow,
                }),
            )
            .await?;
        // Older revisions answer with an empty body.
        Ok(serde_json::from_slice::<LocationSharing>(&body)
            .map(|s| s.allow_location)
            .unwrap_or(allow))
    }

    /// Reports the user's current position to the backend.
    pub async fn send_location(&self, position: LatLon) -> Result<(), ApiError> {
        if !position.is_valid() {
            return Err(ApiError::MissingField("location"));
        }
        self.post_ack(
            SEND_LOCATION_PATH,
            &LocationReport {
                lat: position.latitude().to_string(),
                long: position.longitude().to_string(),
            },
        )
        .await?;
        Ok(())
    }

    pub async fn friends(&self) -> Result<Vec<Friend>, ApiError> {
        self.get_json(LIST_FRIEND_PATH).await
    }

    /// Searches users by username.
    ///
    /// Uses the shorter search timeout and retries a timed-out attempt up to
    /// `search_retries` times. Other failures are returned immediately.
    pub async fn search_friend(&self, username: &str) -> Result<Vec<UserProfile>, ApiError> {
        let timeout = self.config().search_timeout;
        let retries = self.config().search_retries;
        let mut attempt = 0;
        loop {
            let (url, builder) = self.request(Method::GET, SEARCH_FRIEND_PATH);
            let builder = builder.query(&[("username", username)]).timeout(timeout);
            match self.send_json::<OneOrMany<UserProfile>>(&url, builder).await {
                Ok(found) => return Ok(found.into_vec()),
                Err(e) if e.is_timeout() && attempt < retries => {
                    attempt += 1;
                    warn!(
                        "Friend search for '{}' timed out, retrying ({}/{})",
                        username, attempt, retries
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn send_invitation(&self, recipient: &str) -> Result<Acknowledgement, ApiError> {
        self.post_ack(SEND_INVITATION_PATH, &InvitationRequest { recipient })
            .await
    }

    pub async fn invitations(&self) -> Result<Vec<Invitation>, ApiError> {
        self.get_json(LIST_INVITATION_PATH).await
    }

    /// Accepts the invitation sent by `sender`.
    pub async fn accept_invitation(&self, sender: &str) -> Result<Acknowledgement, ApiError> {
        self.post_ack(CREATE_FRIEND_PATH, &AcceptInvitation { sender })
            .await
    }

    /// Deletes the invitation `sender` sent to `recipient` (normally the signed-in user).
    pub async fn delete_invitation(
        &self,
        sender: &str,
        recipient: &str,
    ) -> Result<Acknowledgement, ApiError> {
        let (url, builder) = self.request(Method::DELETE, DELETE_INVITATION_PATH);
        self.send_ack(
            &url,
            builder.json(&DeleteInvitation {
                sender_username: sender,
                recipient_username: recipient,
            }),
        )
        .await
    }
}
