//! Friend-graph records: shared locations, friends, and pending invitations.

use crate::types::coordinates::{parse_wire_coordinates, LatLon, NumberOrText};
use log::debug;
use serde::{Deserialize, Serialize};

/// A connected user's last shared position. Only friends who allow location sharing
/// are returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendLocation {
    /// The friend's username.
    pub id: String,
    pub last_login: Option<String>,
    pub coordinates: LatLon,
    /// Avatar of the friend.
    pub image_url: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawFriendLocation {
    username: String,
    #[serde(default)]
    last_login: Option<String>,
    #[serde(default)]
    lat: Option<NumberOrText>,
    #[serde(default)]
    long: Option<NumberOrText>,
    #[serde(default)]
    profile_picture: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl RawFriendLocation {
    pub(crate) fn into_friend_location(self) -> Option<FriendLocation> {
        let Some(coordinates) = parse_wire_coordinates(&self.lat, &self.long) else {
            debug!("Skipping location of {} (not shared or invalid)", self.username);
            return None;
        };
        Some(FriendLocation {
            id: self.username,
            last_login: self.last_login,
            coordinates,
            image_url: self.profile_picture,
            created_at: self.created_at,
        })
    }
}

pub(crate) fn friend_locations_from_raw(raw: Vec<RawFriendLocation>) -> Vec<FriendLocation> {
    raw.into_iter()
        .filter_map(RawFriendLocation::into_friend_location)
        .collect()
}

/// An entry of `user/listFriend`. The backend has varied the extra fields across
/// revisions, so only the username is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    pub username: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub allow_location: Option<bool>,
    #[serde(default)]
    pub last_login: Option<String>,
}

/// A pending friend invitation as listed by `user/listInvitation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    /// Username of the user who sent the invitation.
    pub sender: String,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
