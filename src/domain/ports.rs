use crate::domain::model::{Credentials, GrantingTicket, ServiceTicket, ValueSetIndex};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait TicketingClient: Send + Sync {
    /// Fails with `AuthenticationError`.
    async fn granting_ticket(&self, credentials: &Credentials) -> Result<GrantingTicket>;

    /// Fails with `TicketExchangeError` tagged with `oid`.
    async fn service_ticket(
        &self,
        granting_ticket: &GrantingTicket,
        target_service: &str,
        oid: &str,
    ) -> Result<ServiceTicket>;
}

#[async_trait]
pub trait ValueSetFetcher: Send + Sync {
    /// Fails with `FetchError` tagged with `oid`.
    async fn fetch(&self, service_ticket: ServiceTicket, oid: &str) -> Result<String>;
}

pub trait CacheWriter: Send + Sync {
    /// Creates `dir` if it is missing. Does nothing when `caching` is off.
    fn prepare(
        &self,
        dir: &Path,
        caching: bool,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Returns the written path, or `None` without touching storage when
    /// `caching` is off.
    fn write(
        &self,
        path: &Path,
        data: &[u8],
        caching: bool,
    ) -> impl std::future::Future<Output = Result<Option<PathBuf>>> + Send;
}

/// Turns a retrieved payload into index entries.
pub trait ValueSetParser: Send + Sync {
    fn parse_into(&self, oid: &str, payload: &str, index: &mut ValueSetIndex) -> Result<()>;
}
