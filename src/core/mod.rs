pub mod cache;
pub mod fetcher;
pub mod identifiers;
pub mod orchestrator;
pub mod parser;
pub mod ticketing;

pub use crate::domain::model::{BatchOutcome, ValueSetDescriptor, ValueSetIndex};
pub use crate::domain::ports::{CacheWriter, TicketingClient, ValueSetFetcher, ValueSetParser};
pub use crate::utils::error::Result;
