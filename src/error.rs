use crate::api::error::ApiError;
use crate::auth::error::TokenStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FloodAlertError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),

    #[error("Not signed in")]
    NotSignedIn,
}

impl FloodAlertError {
    /// The message to show the user. API errors use their composed message;
    /// storage problems are reported generically.
    pub fn user_message(&self) -> String {
        match self {
            FloodAlertError::Api(e) => e.user_message(),
            FloodAlertError::TokenStore(_) => {
                "Could not access secure storage. Please try again.".to_string()
            }
            FloodAlertError::NotSignedIn => "Please sign in to continue.".to_string(),
        }
    }
}
