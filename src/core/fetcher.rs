use crate::domain::model::ServiceTicket;
use crate::domain::ports::ValueSetFetcher;
use crate::utils::error::{Result, VsacError};
use async_trait::async_trait;
use reqwest::Client;

#[derive(Debug, Clone)]
pub struct SvsValueSetFetcher {
    client: Client,
    retrieve_url: String,
}

impl SvsValueSetFetcher {
    pub fn new(client: Client, retrieve_url: impl Into<String>) -> Self {
        Self {
            client,
            retrieve_url: retrieve_url.into(),
        }
    }
}

#[async_trait]
impl ValueSetFetcher for SvsValueSetFetcher {
    async fn fetch(&self, service_ticket: ServiceTicket, oid: &str) -> Result<String> {
        tracing::debug!(oid, "Getting ValueSet");
        let fetch_error = |e: reqwest::Error| VsacError::FetchError {
            oid: oid.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(&self.retrieve_url)
            .query(&[("id", oid), ("ticket", service_ticket.as_str())])
            .send()
            .await
            .map_err(fetch_error)?;

        tracing::debug!(oid, status = %response.status(), "ValueSet response");

        let response = response.error_for_status().map_err(fetch_error)?;
        response.text().await.map_err(fetch_error)
    }
}
