//! Special-warning submission and verify/deny voting.

use crate::api::client::{decode_ack, ApiClient};
use crate::api::error::ApiError;
use crate::api::markers::WARNINGS_PATH;
use crate::types::special_warning::NewSpecialWarning;
use crate::types::user::Acknowledgement;
use log::info;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};

/// A verify/deny vote on a special warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Verify,
    Deny,
}

impl Vote {
    fn path_segment(&self) -> &'static str {
        match self {
            Vote::Verify => "verify",
            Vote::Deny => "deny",
        }
    }
}

pub(crate) fn vote_path(id: &str, vote: Vote) -> String {
    format!("{WARNINGS_PATH}/{id}/{}", vote.path_segment())
}

impl ApiClient {
    /// Submits a new special warning as a multipart upload (`name`, `image`, `lat`, `long`).
    ///
    /// The backend answers `201 Created`; any other success status is reported as
    /// [`ApiError::UnexpectedStatus`].
    pub async fn create_special_warning(
        &self,
        warning: &NewSpecialWarning,
    ) -> Result<Acknowledgement, ApiError> {
        if let Some(field) = warning.missing_field() {
            return Err(ApiError::MissingField(field));
        }
        let (url, builder) = self.request(Method::POST, WARNINGS_PATH);
        let image = Part::bytes(warning.image.clone())
            .file_name(warning.image_file_name.clone())
            .mime_str("image/jpeg")
            .map_err(|e| ApiError::RequestBuild(url.clone(), e))?;
        let form = Form::new()
            .text("name", warning.description.clone())
            .text("lat", warning.location.latitude().to_string())
            .text("long", warning.location.longitude().to_string())
            .part("image", image);

        let (status, body) = self.execute(&url, builder.multipart(form)).await?;
        if status != StatusCode::CREATED {
            return Err(ApiError::UnexpectedStatus { url, status });
        }
        info!(
            "Submitted special warning at {} ({} byte image)",
            warning.location,
            warning.image.len()
        );
        Ok(decode_ack(&body))
    }

    /// Casts a verify or deny vote on the warning with `id`.
    pub async fn vote_special_warning(
        &self,
        id: &str,
        vote: Vote,
    ) -> Result<Acknowledgement, ApiError> {
        let ack = self.get_ack(&vote_path(id, vote)).await?;
        info!("Cast {:?} on special warning {}", vote, id);
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::canned_server::CannedServer;
    use crate::config::ClientConfig;
    use crate::types::coordinates::LatLon;

    fn client_for(server: &CannedServer) -> ApiClient {
        ApiClient::new(ClientConfig::builder().base_url(server.base_url()).build()).unwrap()
    }

    #[test]
    fn test_vote_paths() {
        assert_eq!(vote_path("42", Vote::Verify), "specialwarning/warnings/42/verify");
        assert_eq!(vote_path("ab", Vote::Deny), "specialwarning/warnings/ab/deny");
    }

    #[tokio::test]
    async fn test_incomplete_warning_is_rejected_before_sending() {
        // Port 9 (discard) on localhost: never reached because validation fails first.
        let client = ApiClient::new(
            ClientConfig::builder()
                .base_url("http://127.0.0.1:9/api")
                .build(),
        )
        .unwrap();
        let warning = NewSpecialWarning::new("", LatLon(-27.5, 153.0), vec![1, 2, 3]);
        let err = client.create_special_warning(&warning).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingField("description")));
    }

    #[tokio::test]
    async fn test_create_special_warning_requires_created() {
        let server = CannedServer::start(|_| (200, r#"{"message": "ok"}"#.to_string())).await;
        let warning = NewSpecialWarning::new("Road cut", LatLon(-27.5, 153.0), vec![1, 2, 3]);

        let err = client_for(&server)
            .create_special_warning(&warning)
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApiError::UnexpectedStatus { status, .. } if status == StatusCode::OK),
            "unexpected error {err:?}"
        );
    }

    #[tokio::test]
    async fn test_create_special_warning_uploads_multipart() {
        let server =
            CannedServer::start(|_| (201, r#"{"message": "created"}"#.to_string())).await;
        let warning = NewSpecialWarning::new("Road cut", LatLon(-27.5, 153.0), vec![1, 2, 3]);

        client_for(&server)
            .create_special_warning(&warning)
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].line(), "POST /api/specialwarning/warnings");
        assert!(requests[0]
            .header("content-type")
            .is_some_and(|v| v.starts_with("multipart/form-data")));
        let body = String::from_utf8_lossy(&requests[0].body);
        for field in ["name=\"name\"", "name=\"lat\"", "name=\"long\"", "name=\"image\""] {
            assert!(body.contains(field), "missing {field} in {body}");
        }
        assert!(body.contains("Road cut"));
    }
}
