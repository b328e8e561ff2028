use crate::domain::model::{Credentials, GrantingTicket, ServiceTicket};
use crate::domain::ports::TicketingClient;
use crate::utils::error::{Result, VsacError};
use async_trait::async_trait;
use reqwest::Client;

/// CAS style ticket client for the VSAC `/ws/Ticket` endpoint.
#[derive(Debug, Clone)]
pub struct VsacTicketClient {
    client: Client,
    ticket_url: String,
}

impl VsacTicketClient {
    pub fn new(client: Client, ticket_url: impl Into<String>) -> Self {
        Self {
            client,
            ticket_url: ticket_url.into(),
        }
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> reqwest::Result<String> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        Ok(body.trim().to_string())
    }
}

#[async_trait]
impl TicketingClient for VsacTicketClient {
    async fn granting_ticket(&self, credentials: &Credentials) -> Result<GrantingTicket> {
        tracing::debug!("Getting TGT");
        let ticket = self
            .post_form(
                &self.ticket_url,
                &[
                    ("username", credentials.username.as_str()),
                    ("password", credentials.password.as_str()),
                ],
            )
            .await
            .map_err(|e| VsacError::AuthenticationError {
                message: e.to_string(),
            })?;

        if ticket.is_empty() {
            return Err(VsacError::AuthenticationError {
                message: "ticket endpoint returned an empty granting ticket".to_string(),
            });
        }
        Ok(GrantingTicket::new(ticket))
    }

    async fn service_ticket(
        &self,
        granting_ticket: &GrantingTicket,
        target_service: &str,
        oid: &str,
    ) -> Result<ServiceTicket> {
        tracing::debug!(oid, "Getting ST");
        let url = format!(
            "{}/{}",
            self.ticket_url.trim_end_matches('/'),
            granting_ticket.as_str()
        );
        let ticket = self
            .post_form(&url, &[("service", target_service)])
            .await
            .map_err(|e| VsacError::TicketExchangeError {
                oid: oid.to_string(),
                message: e.to_string(),
            })?;

        if ticket.is_empty() {
            return Err(VsacError::TicketExchangeError {
                oid: oid.to_string(),
                message: "ticket endpoint returned an empty service ticket".to_string(),
            });
        }
        Ok(ServiceTicket::new(ticket))
    }
}
