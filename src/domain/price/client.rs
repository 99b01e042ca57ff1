//! Prices sub-client — stream endpoint and stream synchronizer factory.

use crate::client::BeaconClient;

/// Sub-client for price operations.
pub struct Prices<'a> {
    pub(crate) client: &'a BeaconClient,
}

impl<'a> Prices<'a> {
    /// Full URL of the price event stream for `token`, optionally filtered to one sku.
    pub fn stream_url(&self, token: &str, sku: Option<&str>) -> String {
        self.client.http.price_stream_url(token, sku)
    }

    /// A stream synchronizer bound to this client's HTTP transport.
    #[cfg(feature = "native")]
    pub fn synchronizer(&self) -> crate::sync::PriceStreamSync {
        crate::sync::PriceStreamSync::new(
            std::sync::Arc::new(crate::sse::HttpEventSource::new(self.client.http.clone())),
            self.client.sync_config.clone(),
        )
    }
}
