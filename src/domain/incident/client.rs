//! Incidents sub-client — list, acknowledge, resolve.

use super::Incident;
use crate::client::BeaconClient;
use crate::error::SdkError;

/// Sub-client for alert incidents.
pub struct Incidents<'a> {
    pub(crate) client: &'a BeaconClient,
}

impl<'a> Incidents<'a> {
    /// Every incident the server knows about, resolved ones included.
    pub async fn list(&self, token: &str) -> Result<Vec<Incident>, SdkError> {
        Ok(self.client.http.get_incidents(token).await?)
    }

    pub async fn acknowledge(&self, token: &str, id: &str) -> Result<(), SdkError> {
        Ok(self.client.http.acknowledge_incident(token, id).await?)
    }

    pub async fn resolve(&self, token: &str, id: &str) -> Result<(), SdkError> {
        Ok(self.client.http.resolve_incident(token, id).await?)
    }

    /// A poll synchronizer over the open/acked working set.
    #[cfg(feature = "native")]
    pub fn synchronizer(&self) -> crate::sync::IncidentSync {
        crate::sync::IncidentSync::new(self.client.http.clone(), &self.client.sync_config)
    }
}
