//! Set and delete semantics keyed on record name and type.
//!
//! Bunny has no upsert and the generic model carries no vendor ID, so an
//! existing record is found by comparing the encoded name and type code.
use tracing::debug;

use crate::bunny::client::BunnyClient;
use crate::bunny::types::BunnyRecord;
use crate::codec::to_vendor;
use crate::error::DnsError;
use crate::record::Record;
use crate::repository;
use crate::zone::Zone;

fn matching<'a>(existing: &'a [BunnyRecord], wanted: &BunnyRecord) -> Vec<&'a BunnyRecord> {
    existing
        .iter()
        .filter(|r| r.rtype == wanted.rtype && r.name == wanted.name)
        .collect()
}

/// Create `record`, or update it in place if exactly one record with the
/// same name and type exists. More than one is refused.
pub async fn create_or_update(
    client: &BunnyClient,
    zone: &Zone,
    record: &Record,
) -> Result<Record, DnsError> {
    let existing = repository::list_raw(client, zone).await?;
    let wanted = to_vendor(zone, record)?;

    match matching(&existing, &wanted).as_slice() {
        [] => repository::create(client, zone, record).await,
        [current] => {
            let id = current
                .id
                .ok_or_else(|| DnsError::not_found(format!("record '{}' has no id", current.name)))?;
            repository::update(client, zone, record, id).await
        }
        many => Err(DnsError::AmbiguousMatch {
            name: wanted.name.clone(),
            rtype: record.rtype().to_string(),
            count: many.len(),
        }),
    }
}

/// Delete the record with the same name and type as `record`. Returns
/// whether anything was deleted; a missing record is not an error. With
/// duplicates only the first one carrying an id is removed.
pub async fn delete_matching(
    client: &BunnyClient,
    zone: &Zone,
    record: &Record,
) -> Result<bool, DnsError> {
    let existing = repository::list_raw(client, zone).await?;
    let wanted = to_vendor(zone, record)?;

    let Some(id) = matching(&existing, &wanted).iter().find_map(|r| r.id) else {
        debug!("nothing to delete for '{}' {}", wanted.name, record.rtype());
        return Ok(false);
    };
    repository::delete(client, zone, id).await?;
    Ok(true)
}
