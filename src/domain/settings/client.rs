//! Settings sub-client.

use super::Settings;
use crate::client::BeaconClient;
use crate::error::SdkError;

/// Sub-client for user settings.
pub struct SettingsClient<'a> {
    pub(crate) client: &'a BeaconClient,
}

impl<'a> SettingsClient<'a> {
    pub async fn get(&self, token: &str) -> Result<Settings, SdkError> {
        Ok(self.client.http.get_settings(token).await?.settings)
    }
}
