use regex::Regex;

use crate::error::DnsError;
use crate::record::APEX;

lazy_static::lazy_static! {
    /// `_service._transport` followed by an optional relative name.
    static ref SRV_NAME_RE: Regex = Regex::new(r"^_*([^.]*)\._*([^.]*)(?:\.(.*))?$").unwrap();
}

/// Strip a single trailing dot; Bunny.net does not use FQDNs.
pub fn normalize_domain(domain: &str) -> Result<&str, DnsError> {
    let d = domain.strip_suffix('.').unwrap_or(domain);
    if d.is_empty() {
        return Err(DnsError::invalid_argument("domain is empty"));
    }
    Ok(d)
}

/// Components of an SRV owner name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvOwner {
    pub service: String,
    pub transport: String,
    pub name: String,
}

/// Split `_service._transport[.name]`. The name defaults to `@` when absent.
pub fn parse_srv_name(owner: &str) -> Result<SrvOwner, DnsError> {
    let caps = SRV_NAME_RE
        .captures(owner)
        .ok_or_else(|| DnsError::malformed_name(owner))?;

    let name = match caps.get(3).map(|m| m.as_str()) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => APEX.to_string(),
    };

    Ok(SrvOwner {
        service: caps[1].to_string(),
        transport: caps[2].to_string(),
        name,
    })
}
