//! Provider-agnostic DNS record and zone model.
//!
//! Record names are relative to the domain a caller operates on, with `@`
//! denoting that domain's apex. Identity for set/delete semantics is the pair
//! of [`Record::name`] and [`RecordData::rtype`], never a vendor ID.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{BatchError, DnsError};
use crate::validation::parse_srv_name;

/// Marker for the apex of the zone a record is addressed relative to.
pub const APEX: &str = "@";

/// Type-specific record content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    /// A or AAAA, depending on the address family.
    Address(IpAddr),
    Cname(String),
    Ns(String),
    Txt(String),
    Mx {
        preference: u16,
        target: String,
    },
    Srv {
        service: String,
        transport: String,
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    Caa {
        flags: u8,
        tag: String,
        value: String,
    },
    /// Any other type, kept as its raw presentation value.
    Other {
        rtype: String,
        value: String,
    },
}

impl RecordData {
    pub fn rtype(&self) -> &str {
        match self {
            RecordData::Address(IpAddr::V4(_)) => "A",
            RecordData::Address(IpAddr::V6(_)) => "AAAA",
            RecordData::Cname(_) => "CNAME",
            RecordData::Ns(_) => "NS",
            RecordData::Txt(_) => "TXT",
            RecordData::Mx { .. } => "MX",
            RecordData::Srv { .. } => "SRV",
            RecordData::Caa { .. } => "CAA",
            RecordData::Other { rtype, .. } => rtype.as_str(),
        }
    }

    /// Presentation-format value, as accepted by [`Record::parse`].
    pub fn value(&self) -> String {
        match self {
            RecordData::Address(addr) => addr.to_string(),
            RecordData::Cname(target) | RecordData::Ns(target) => target.clone(),
            RecordData::Txt(text) => text.clone(),
            RecordData::Mx { preference, target } => format!("{} {}", preference, target),
            RecordData::Srv {
                priority,
                weight,
                port,
                target,
                ..
            } => format!("{} {} {} {}", priority, weight, port, target),
            RecordData::Caa { flags, tag, value } => format!("{} {} \"{}\"", flags, tag, value),
            RecordData::Other { value, .. } => value.clone(),
        }
    }
}

/// A DNS record relative to the domain it was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Relative name, `@` for the apex. For SRV records this excludes the
    /// `_service._transport` labels, which live in [`RecordData::Srv`].
    pub name: String,
    pub ttl: Duration,
    pub data: RecordData,
}

impl Record {
    pub fn new(name: impl Into<String>, ttl: Duration, data: RecordData) -> Self {
        Self {
            name: name.into(),
            ttl,
            data,
        }
    }

    /// Builds a record from its owner name, type and presentation value.
    ///
    /// A and AAAA values that are not addresses of the right family fall back
    /// to [`RecordData::Other`] rather than failing. For SRV, `name` is the full
    /// owner name (`_service._transport[.name]`).
    pub fn parse(name: &str, rtype: &str, ttl: Duration, value: &str) -> Result<Self, DnsError> {
        let data = match rtype {
            "A" | "AAAA" => match value.trim().parse::<IpAddr>() {
                Ok(addr @ IpAddr::V4(_)) if rtype == "A" => RecordData::Address(addr),
                Ok(addr @ IpAddr::V6(_)) if rtype == "AAAA" => RecordData::Address(addr),
                _ => RecordData::Other {
                    rtype: rtype.to_string(),
                    value: value.to_string(),
                },
            },
            "CNAME" => RecordData::Cname(value.to_string()),
            "NS" => RecordData::Ns(value.to_string()),
            "TXT" => RecordData::Txt(value.to_string()),
            "MX" => {
                let (preference, target) = value
                    .trim()
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| DnsError::invalid_argument(format!("invalid MX value '{value}'")))?;
                RecordData::Mx {
                    preference: parse_field(preference, "MX preference")?,
                    target: target.trim().to_string(),
                }
            }
            "CAA" => {
                let mut fields = value.trim().splitn(3, char::is_whitespace);
                let (Some(flags), Some(tag), Some(caa_value)) =
                    (fields.next(), fields.next(), fields.next())
                else {
                    return Err(DnsError::invalid_argument(format!("invalid CAA value '{value}'")));
                };
                RecordData::Caa {
                    flags: parse_field(flags, "CAA flags")?,
                    tag: tag.to_string(),
                    value: caa_value.trim().trim_matches('"').to_string(),
                }
            }
            "SRV" => {
                let fields: Vec<&str> = value.split_whitespace().collect();
                let &[priority, weight, port, target] = fields.as_slice() else {
                    return Err(DnsError::invalid_argument(format!("invalid SRV value '{value}'")));
                };
                let owner = parse_srv_name(name)?;
                return Ok(Self::new(
                    owner.name,
                    ttl,
                    RecordData::Srv {
                        service: owner.service,
                        transport: owner.transport,
                        priority: parse_field(priority, "SRV priority")?,
                        weight: parse_field(weight, "SRV weight")?,
                        port: parse_field(port, "SRV port")?,
                        target: target.to_string(),
                    },
                ));
            }
            _ => RecordData::Other {
                rtype: rtype.to_string(),
                value: value.to_string(),
            },
        };

        Ok(Self::new(name, ttl, data))
    }

    pub fn rtype(&self) -> &str {
        self.data.rtype()
    }

    pub fn value(&self) -> String {
        self.data.value()
    }

    /// Full relative owner name; SRV records get their `_service._transport`
    /// prefix back.
    pub fn owner_name(&self) -> String {
        match &self.data {
            RecordData::Srv {
                service, transport, ..
            } => {
                if self.name.is_empty() || self.name == APEX {
                    format!("_{}._{}", service, transport)
                } else {
                    format!("_{}._{}.{}", service, transport, self.name)
                }
            }
            _ => self.name.clone(),
        }
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, DnsError> {
    raw.trim()
        .parse()
        .map_err(|_| DnsError::invalid_argument(format!("invalid {what} '{raw}'")))
}

/// A zone as seen by callers: only its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsZone {
    pub name: String,
}

/// Provider-agnostic record management.
///
/// Domains may be given with or without a trailing dot. Multi-record
/// operations process records one at a time in order and stop at the first
/// failure; [`BatchError::applied`] lists what was already done.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List all records under `domain`.
    async fn get_records(&self, domain: &str) -> Result<Vec<Record>, DnsError>;

    /// Create every record, returning them as stored by the provider.
    async fn append_records(
        &self,
        domain: &str,
        records: &[Record],
    ) -> Result<Vec<Record>, BatchError>;

    /// Create or update each record, matched by name and type.
    async fn set_records(&self, domain: &str, records: &[Record])
    -> Result<Vec<Record>, BatchError>;

    /// Delete each record matched by name and type. Missing records are not an error.
    async fn delete_records(
        &self,
        domain: &str,
        records: &[Record],
    ) -> Result<Vec<Record>, BatchError>;

    /// List the zones the credentials can manage.
    async fn list_zones(&self) -> Result<Vec<DnsZone>, DnsError>;
}
