//! Record CRUD against a resolved zone.
use tracing::debug;

use crate::bunny::client::BunnyClient;
use crate::bunny::types::BunnyRecord;
use crate::codec::{to_generic, to_vendor, within_name_base};
use crate::error::DnsError;
use crate::record::Record;
use crate::zone::Zone;

/// Every record stored in the zone, as Bunny returns them.
pub async fn list_raw(client: &BunnyClient, zone: &Zone) -> Result<Vec<BunnyRecord>, DnsError> {
    client.get_records(zone.id).await
}

/// Records at or below the requested domain. One undecodable record fails
/// the whole listing.
pub async fn list(client: &BunnyClient, zone: &Zone) -> Result<Vec<Record>, DnsError> {
    let records = list_raw(client, zone)
        .await?
        .iter()
        .filter(|r| within_name_base(&r.name, &zone.name_base))
        .map(|r| to_generic(zone, r))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("listed {} record(s) in zone {}: {:?}", records.len(), zone.apex, records);
    Ok(records)
}

/// Create `record` and return it as stored, decoded back to generic form.
pub async fn create(client: &BunnyClient, zone: &Zone, record: &Record) -> Result<Record, DnsError> {
    let vendor = to_vendor(zone, record)?;
    let created = client.add_record(zone.id, &vendor).await?;
    debug!("created record {:?} in zone {}", created.id, zone.apex);
    to_generic(zone, &created)
}

/// Overwrite the record with id `record_id`. Bunny does not echo the result,
/// so the input record is returned unchanged.
pub async fn update(
    client: &BunnyClient,
    zone: &Zone,
    record: &Record,
    record_id: i64,
) -> Result<Record, DnsError> {
    let vendor = to_vendor(zone, record)?;
    client.update_record(zone.id, record_id, &vendor).await?;
    debug!("updated record {} in zone {}", record_id, zone.apex);
    Ok(record.clone())
}

pub async fn delete(client: &BunnyClient, zone: &Zone, record_id: i64) -> Result<(), DnsError> {
    client.delete_record(zone.id, record_id).await?;
    debug!("deleted record {} in zone {}", record_id, zone.apex);
    Ok(())
}
