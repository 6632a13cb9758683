//! Bunny.net DNS provider: zone resolution, record translation, and
//! get/append/set/delete semantics over the Bunny.net DNS API.

pub mod bunny;
pub mod codec;
pub mod config;
pub mod error;
pub mod provider;
pub mod reconcile;
pub mod record;
pub mod repository;
pub mod validation;
pub mod zone;

pub use config::ProviderConfig;
pub use error::{BatchError, DnsError};
pub use provider::BunnyProvider;
pub use record::{DnsProvider, DnsZone, Record, RecordData};
