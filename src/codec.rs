//! Translation between generic [`Record`]s and Bunny.net wire records.
//!
//! Bunny stores record names relative to the zone apex. When a caller works
//! on a subdomain of a zone, the zone's name-base is appended on the way out
//! and stripped on the way back in.

use std::collections::HashMap;
use std::time::Duration;

use crate::bunny::types::BunnyRecord;
use crate::error::DnsError;
use crate::record::{APEX, Record, RecordData};
use crate::validation::parse_srv_name;
use crate::zone::Zone;

/// Bunny.net record type codes.
const RECORD_TYPES: [(&str, i32); 13] = [
    ("A", 0),
    ("AAAA", 1),
    ("CNAME", 2),
    ("TXT", 3),
    ("MX", 4),
    ("Redirect", 5),
    ("Flatten", 6),
    ("PullZone", 7),
    ("SRV", 8),
    ("CAA", 9),
    ("PTR", 10),
    ("Script", 11),
    ("NS", 12),
];

lazy_static::lazy_static! {
    static ref TYPE_CODES: HashMap<&'static str, i32> = RECORD_TYPES.iter().copied().collect();
    static ref TYPE_NAMES: HashMap<i32, &'static str> =
        RECORD_TYPES.iter().map(|&(name, code)| (code, name)).collect();
}

pub fn type_code(rtype: &str) -> Result<i32, DnsError> {
    TYPE_CODES
        .get(rtype)
        .copied()
        .ok_or_else(|| DnsError::unsupported_type(rtype))
}

pub fn type_name(code: i32) -> Result<&'static str, DnsError> {
    TYPE_NAMES
        .get(&code)
        .copied()
        .ok_or_else(|| DnsError::unsupported_type(code))
}

/// Table spelling of `rtype`, matched case-insensitively ("redirect" ->
/// "Redirect", "txt" -> "TXT").
pub fn canonical_type(rtype: &str) -> Option<&'static str> {
    RECORD_TYPES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(rtype))
        .map(|&(name, _)| name)
}

/// Encode `record` for storage in `zone`.
pub fn to_vendor(zone: &Zone, record: &Record) -> Result<BunnyRecord, DnsError> {
    let rtype = type_code(record.rtype())?;
    let ttl = u32::try_from(record.ttl.as_secs()).map_err(|_| {
        DnsError::invalid_argument(format!("TTL of {}s is out of range", record.ttl.as_secs()))
    })?;

    let mut name = record.owner_name();
    if name == APEX {
        name.clear();
    }
    if !zone.name_base.is_empty() {
        name = if name.is_empty() {
            zone.name_base.clone()
        } else {
            format!("{}.{}", name, zone.name_base)
        };
    }

    let mut out = BunnyRecord {
        id: None,
        rtype,
        name,
        value: record.value(),
        ttl,
        ..Default::default()
    };

    match &record.data {
        RecordData::Caa { flags, tag, value } => {
            out.flags = Some(*flags);
            out.tag = Some(tag.clone());
            out.value = value.clone();
        }
        RecordData::Mx { preference, target } => {
            out.priority = Some(*preference);
            out.value = target.clone();
        }
        RecordData::Srv {
            priority,
            weight,
            port,
            target,
            ..
        } => {
            out.priority = Some(*priority);
            out.weight = Some(*weight);
            out.port = Some(*port);
            out.value = target.clone();
        }
        _ => {}
    }

    Ok(out)
}

/// Decode a record fetched from `zone` into the caller's naming.
pub fn to_generic(zone: &Zone, record: &BunnyRecord) -> Result<Record, DnsError> {
    let rtype = type_name(record.rtype)?;
    let name = match strip_name_base(&record.name, &zone.name_base) {
        "" => APEX,
        name => name,
    };
    let ttl = Duration::from_secs(u64::from(record.ttl));

    let decoded = match rtype {
        "CAA" => Record::new(
            name,
            ttl,
            RecordData::Caa {
                flags: record.flags.unwrap_or_default(),
                tag: record.tag.clone().unwrap_or_default(),
                value: record.value.clone(),
            },
        ),
        "MX" => Record::new(
            name,
            ttl,
            RecordData::Mx {
                preference: record.priority.unwrap_or_default(),
                target: record.value.clone(),
            },
        ),
        "SRV" => {
            let owner = parse_srv_name(name)?;
            Record::new(
                owner.name,
                ttl,
                RecordData::Srv {
                    service: owner.service,
                    transport: owner.transport,
                    priority: record.priority.unwrap_or_default(),
                    weight: record.weight.unwrap_or_default(),
                    port: record.port.unwrap_or_default(),
                    target: record.value.clone(),
                },
            )
        }
        _ => Record::parse(name, rtype, ttl, &record.value)?,
    };

    Ok(decoded)
}

/// Whether a vendor-side name lies at or below the zone's name-base.
pub fn within_name_base(vendor_name: &str, name_base: &str) -> bool {
    name_base.is_empty()
        || vendor_name == name_base
        || vendor_name
            .strip_suffix(name_base)
            .is_some_and(|head| head.ends_with('.'))
}

fn strip_name_base<'a>(name: &'a str, name_base: &str) -> &'a str {
    if name_base.is_empty() {
        return name;
    }
    if name == name_base {
        return "";
    }
    match name.strip_suffix(name_base) {
        Some(head) if head.ends_with('.') => &head[..head.len() - 1],
        _ => name,
    }
}
