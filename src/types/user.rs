use serde::{Deserialize, Serialize};

/// The signed-in user's profile as returned by `user/me`, or a user found through
/// `user/searchFriend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub allow_location: Option<bool>,
}

/// An entry of the `notification/history` feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "message")]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Registration<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub password2: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LocationSharing {
    pub allow_location: bool,
}

/// Body of `user/sendLocation`. The backend expects the coordinates as strings.
#[derive(Debug, Serialize)]
pub(crate) struct LocationReport {
    pub lat: String,
    pub long: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct InvitationRequest<'a> {
    pub recipient: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AcceptInvitation<'a> {
    pub sender: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteInvitation<'a> {
    pub sender_username: &'a str,
    pub recipient_username: &'a str,
}

/// Server acknowledgement of an action, e.g. `{"detail": "Warning verified successfully."}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Acknowledgement {
    #[serde(default, alias = "message")]
    pub detail: Option<String>,
}

/// `searchFriend` has returned a single user in some revisions and a list in others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}
