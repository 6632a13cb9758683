//! [`DnsProvider`] implementation backed by Bunny.net.
use async_trait::async_trait;
use tracing::debug;

use crate::bunny::client::BunnyClient;
use crate::config::ProviderConfig;
use crate::error::{BatchError, DnsError};
use crate::reconcile;
use crate::record::{DnsProvider, DnsZone, Record};
use crate::repository;
use crate::validation::normalize_domain;
use crate::zone::{Zone, ZoneResolver};

/// Manages records in Bunny.net zones.
///
/// Owns a cache of resolved zones keyed by the exact domain string callers
/// pass in. Cached zones are never refreshed, so a provider that outlives a
/// zone being re-created upstream must be rebuilt.
pub struct BunnyProvider {
    client: BunnyClient,
    zones: ZoneResolver,
}

impl BunnyProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, DnsError> {
        Ok(Self {
            client: BunnyClient::new(config)?,
            zones: ZoneResolver::new(),
        })
    }

    /// Resolve the zone owning `domain`; a trailing dot is ignored.
    pub async fn zone_for(&self, domain: &str) -> Result<Zone, DnsError> {
        self.zones.resolve(&self.client, normalize_domain(domain)?).await
    }
}

#[async_trait]
impl DnsProvider for BunnyProvider {
    async fn get_records(&self, domain: &str) -> Result<Vec<Record>, DnsError> {
        let zone = self.zone_for(domain).await?;
        repository::list(&self.client, &zone).await
    }

    async fn append_records(
        &self,
        domain: &str,
        records: &[Record],
    ) -> Result<Vec<Record>, BatchError> {
        let zone = self.zone_for(domain).await?;
        debug!("appending {} record(s) to {}: {:?}", records.len(), domain, records);

        let mut appended = Vec::with_capacity(records.len());
        for record in records {
            match repository::create(&self.client, &zone, record).await {
                Ok(created) => appended.push(created),
                Err(err) => return Err(BatchError::new(appended, err)),
            }
        }
        Ok(appended)
    }

    async fn set_records(
        &self,
        domain: &str,
        records: &[Record],
    ) -> Result<Vec<Record>, BatchError> {
        let zone = self.zone_for(domain).await?;
        debug!("setting {} record(s) in {}: {:?}", records.len(), domain, records);

        let mut set = Vec::with_capacity(records.len());
        for record in records {
            match reconcile::create_or_update(&self.client, &zone, record).await {
                Ok(stored) => set.push(stored),
                Err(err) => return Err(BatchError::new(set, err)),
            }
        }
        Ok(set)
    }

    async fn delete_records(
        &self,
        domain: &str,
        records: &[Record],
    ) -> Result<Vec<Record>, BatchError> {
        let zone = self.zone_for(domain).await?;
        debug!("deleting {} record(s) from {}: {:?}", records.len(), domain, records);

        let mut deleted = Vec::with_capacity(records.len());
        for record in records {
            if let Err(err) = reconcile::delete_matching(&self.client, &zone, record).await {
                return Err(BatchError::new(deleted, err));
            }
            deleted.push(record.clone());
        }
        Ok(deleted)
    }

    async fn list_zones(&self) -> Result<Vec<DnsZone>, DnsError> {
        let zones = self.client.list_zones().await?;
        Ok(zones
            .into_iter()
            .map(|z| DnsZone { name: z.domain })
            .collect())
    }
}
