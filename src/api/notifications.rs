use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::types::user::NotificationRecord;

const NOTIFICATION_HISTORY_PATH: &str = "notification/history";

impl ApiClient {
    /// Past flood notifications recorded for the signed-in user, newest first.
    pub async fn notification_history(&self) -> Result<Vec<NotificationRecord>, ApiError> {
        self.get_json(NOTIFICATION_HISTORY_PATH).await
    }
}
