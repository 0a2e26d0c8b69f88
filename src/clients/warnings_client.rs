//! Provides the `WarningsClient` for listing, submitting and voting on special warnings.
//!
//! Obtained via [`FloodAlert::warnings()`].

use crate::api::warnings::Vote;
use crate::proximity::locate_hazard::{verification_candidates, Nearby};
use crate::types::user::Acknowledgement;
use crate::{FloodAlert, FloodAlertError, LatLon, NewSpecialWarning, SpecialWarning};
use bon::bon;
use log::info;

pub struct WarningsClient<'a> {
    client: &'a FloodAlert,
}

#[bon]
impl<'a> WarningsClient<'a> {
    pub(crate) fn new(client: &'a FloodAlert) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<SpecialWarning>, FloodAlertError> {
        Ok(self.client.api().special_warnings().await?)
    }

    /// Submits a new warning with a photo.
    ///
    /// ```no_run
    /// # async fn run(app: &flood_alert::FloodAlert, jpeg: Vec<u8>) -> Result<(), flood_alert::FloodAlertError> {
    /// use flood_alert::LatLon;
    ///
    /// app.warnings()
    ///     .submit("Water over the road at the creek crossing")
    ///     .location(LatLon(-27.5263, 153.0954))
    ///     .image(jpeg)
    ///     .call()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = submit)]
    #[doc(hidden)]
    pub async fn build_submit(
        &self,
        #[builder(start_fn, into)] description: String,
        location: LatLon,
        image: Vec<u8>,
        #[builder(into)] image_file_name: Option<String>,
    ) -> Result<Acknowledgement, FloodAlertError> {
        self.client.require_session()?;
        let mut warning = NewSpecialWarning::new(description, location, image);
        if let Some(name) = image_file_name {
            warning.image_file_name = name;
        }
        Ok(self.client.api().create_special_warning(&warning).await?)
    }

    /// Verifies the warning and returns the refreshed list.
    pub async fn verify(&self, id: &str) -> Result<Vec<SpecialWarning>, FloodAlertError> {
        self.vote(id, Vote::Verify).await
    }

    /// Denies the warning and returns the refreshed list.
    pub async fn deny(&self, id: &str) -> Result<Vec<SpecialWarning>, FloodAlertError> {
        self.vote(id, Vote::Deny).await
    }

    // Counts are server-side, so the list is always refetched after a vote.
    async fn vote(&self, id: &str, vote: Vote) -> Result<Vec<SpecialWarning>, FloodAlertError> {
        self.client.require_session()?;
        self.client.api().vote_special_warning(id, vote).await?;
        self.list().await
    }

    /// Warnings close enough to `location` that the user is asked to verify or deny
    /// them, excluding their own and those they already voted on.
    pub async fn pending_verification(
        &self,
        location: LatLon,
    ) -> Result<Vec<Nearby<SpecialWarning>>, FloodAlertError> {
        let warnings = self.list().await?;
        let candidates = verification_candidates(
            location,
            &warnings,
            self.client.config().verify_radius_m,
        );
        info!(
            "{} of {} special warnings await verification near {}",
            candidates.len(),
            warnings.len(),
            location
        );
        Ok(candidates)
    }
}
