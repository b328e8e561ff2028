use crate::config::input::load_mapping_file;
use crate::config::toml_config::VsacConfig;
use crate::core::cache::FsCacheWriter;
use crate::core::fetcher::SvsValueSetFetcher;
use crate::core::identifiers::extract_oid_and_version;
use crate::core::parser::SvsParser;
use crate::core::ticketing::VsacTicketClient;
use crate::domain::model::{
    BatchOutcome, Credentials, GrantingTicket, ValueSetDescriptor, ValueSetIndex, INDEX_FILE_NAME,
};
use crate::domain::ports::{CacheWriter, TicketingClient, ValueSetFetcher, ValueSetParser};
use crate::utils::error::{Result, VsacError};
use futures::future::join_all;
use reqwest::Client;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub credentials: Credentials,
    pub output_dir: PathBuf,
    pub caching: bool,
    /// Service URI every service ticket is scoped to.
    pub service: String,
}

/// Downloads a batch of value sets with one granting ticket, fetching every
/// value set concurrently and reporting every failure once all fetches have
/// settled.
pub struct DownloadOrchestrator<T, F, W, P> {
    ticketing: T,
    fetcher: F,
    cache: W,
    parser: P,
    settings: DownloadSettings,
}

pub type VsacDownloader =
    DownloadOrchestrator<VsacTicketClient, SvsValueSetFetcher, FsCacheWriter, SvsParser>;

impl VsacDownloader {
    pub fn from_config(config: &VsacConfig) -> Result<Self> {
        let client = Client::new();
        Ok(Self::new(
            VsacTicketClient::new(client.clone(), config.endpoints.ticket_url.clone()),
            SvsValueSetFetcher::new(client, config.endpoints.retrieve_url.clone()),
            FsCacheWriter,
            SvsParser,
            DownloadSettings {
                credentials: config.credentials()?,
                output_dir: PathBuf::from(&config.output.path),
                caching: config.output.caching,
                service: config.endpoints.service.clone(),
            },
        ))
    }
}

impl<T, F, W, P> DownloadOrchestrator<T, F, W, P>
where
    T: TicketingClient,
    F: ValueSetFetcher,
    W: CacheWriter,
    P: ValueSetParser,
{
    pub fn new(ticketing: T, fetcher: F, cache: W, parser: P, settings: DownloadSettings) -> Self {
        Self {
            ticketing,
            fetcher,
            cache,
            parser,
            settings,
        }
    }

    pub fn settings(&self) -> &DownloadSettings {
        &self.settings
    }

    pub fn index_path(&self) -> PathBuf {
        self.settings.output_dir.join(INDEX_FILE_NAME)
    }

    /// Downloads every OID in a `{name: oid}` mapping, whether or not it is
    /// already in `index`.
    pub async fn download_mapping(
        &self,
        mapping: &BTreeMap<String, String>,
        index: &mut ValueSetIndex,
    ) -> Result<BatchOutcome> {
        let oids = mapping.values().cloned().collect();
        self.run_batch(oids, index).await
    }

    /// Loads a JSON `{name: oid}` file and downloads it like
    /// [`download_mapping`](Self::download_mapping).
    pub async fn download_mapping_file<Q: AsRef<Path>>(
        &self,
        path: Q,
        index: &mut ValueSetIndex,
    ) -> Result<BatchOutcome> {
        let mapping = load_mapping_file(path)?;
        self.download_mapping(&mapping, index).await
    }

    /// Downloads the value sets referenced by `descriptors` that `index`
    /// does not already hold.
    pub async fn download_descriptors(
        &self,
        descriptors: &[ValueSetDescriptor],
        index: &mut ValueSetIndex,
    ) -> Result<BatchOutcome> {
        let mapping = resolve_descriptors(descriptors, index);
        let oids = mapping.into_values().collect();
        self.run_batch(oids, index).await
    }

    async fn run_batch(
        &self,
        oids: BTreeSet<String>,
        index: &mut ValueSetIndex,
    ) -> Result<BatchOutcome> {
        if oids.is_empty() {
            tracing::info!("No value sets to download");
            return Ok(BatchOutcome::NothingToFetch);
        }

        let caching = self.settings.caching;
        self.cache.prepare(&self.settings.output_dir, caching).await?;

        tracing::info!(count = oids.len(), "Downloading value sets");
        let granting_ticket = self
            .ticketing
            .granting_ticket(&self.settings.credentials)
            .await?;

        let shared_index = Mutex::new(index);
        let pipelines = oids.iter().map(|oid| {
            let granting_ticket = &granting_ticket;
            let shared_index = &shared_index;
            async move {
                let result = self
                    .download_value_set(granting_ticket, oid, shared_index)
                    .await;
                (oid, result)
            }
        });
        let results = join_all(pipelines).await;

        let mut downloaded = Vec::new();
        let mut errors = Vec::new();
        for (oid, result) in results {
            match result {
                Ok(_) => downloaded.push(oid.clone()),
                Err(e) => {
                    tracing::warn!(oid = %oid, error = %e, "Error downloading valueset");
                    errors.push(e);
                }
            }
        }

        let index = shared_index
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let mut index_path = None;
        if !downloaded.is_empty() {
            match self.write_index(index, caching).await {
                Ok(path) => index_path = path,
                Err(e) => errors.push(e),
            }
        }

        tracing::info!(
            downloaded = downloaded.len(),
            failed = errors.len(),
            "Value set batch finished"
        );

        if errors.is_empty() {
            Ok(BatchOutcome::Completed {
                index_path,
                downloaded,
            })
        } else {
            Err(VsacError::BatchFailed { errors })
        }
    }

    async fn download_value_set(
        &self,
        granting_ticket: &GrantingTicket,
        oid: &str,
        index: &Mutex<&mut ValueSetIndex>,
    ) -> Result<Option<PathBuf>> {
        let path = payload_path(&self.settings.output_dir, oid)?;
        let service_ticket = self
            .ticketing
            .service_ticket(granting_ticket, &self.settings.service, oid)
            .await?;
        let payload = self.fetcher.fetch(service_ticket, oid).await?;

        {
            let mut index = index.lock().unwrap_or_else(PoisonError::into_inner);
            self.parser.parse_into(oid, &payload, &mut **index)?;
        }

        self.cache
            .write(&path, payload.as_bytes(), self.settings.caching)
            .await
    }

    async fn write_index(&self, index: &ValueSetIndex, caching: bool) -> Result<Option<PathBuf>> {
        let json = index.to_json_pretty()?;
        self.cache
            .write(&self.index_path(), json.as_bytes(), caching)
            .await
    }
}

/// `<output_dir>/<oid>.xml`, refusing ids that would name a file outside
/// `output_dir`.
fn payload_path(output_dir: &Path, oid: &str) -> Result<PathBuf> {
    if oid.is_empty() || oid.contains(['/', '\\', '\0']) {
        return Err(VsacError::InvalidOidError {
            oid: oid.to_string(),
        });
    }
    Ok(output_dir.join(format!("{}.xml", oid)))
}

/// Maps descriptor names to the OIDs that still need downloading.
///
/// Descriptors whose OID is already in `index` are skipped, as are ids that
/// carry no OID at all.
pub fn resolve_descriptors(
    descriptors: &[ValueSetDescriptor],
    index: &ValueSetIndex,
) -> BTreeMap<String, String> {
    let mut mapping = BTreeMap::new();
    for descriptor in descriptors {
        let Some(id) = extract_oid_and_version(&descriptor.id) else {
            tracing::warn!(name = %descriptor.name, id = %descriptor.id, "Skipping value set without an OID");
            continue;
        };
        if index.contains(&id.oid) {
            tracing::debug!(oid = %id.oid, "Value set already in index");
            continue;
        }
        mapping.insert(descriptor.name.clone(), id.oid);
    }
    mapping
}
