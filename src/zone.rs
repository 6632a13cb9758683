//! Mapping requested domains onto the Bunny.net zone that owns them.
//!
//! Bunny has no exact zone lookup, only a substring search, and no child
//! zones: a subdomain either has a zone of its own or lives as prefixed
//! record names inside its parent. Resolution therefore tries the requested
//! domain first and walks towards the apex, preferring the most specific
//! registered zone.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;

use crate::bunny::client::BunnyClient;
use crate::bunny::types::BunnyZone;
use crate::error::DnsError;

/// A Bunny.net zone resolved for one requested domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: i64,
    /// Zone apex as registered with Bunny.
    pub apex: String,
    pub dnssec_enabled: bool,
    /// Lower-cased labels between the requested domain and the apex, empty
    /// when the domain is the apex itself.
    pub name_base: String,
}

impl Zone {
    pub fn new(zone: &BunnyZone, name_base: impl Into<String>) -> Self {
        Self {
            id: zone.id,
            apex: zone.domain.clone(),
            dnssec_enabled: zone.dns_sec_enabled,
            name_base: name_base.into(),
        }
    }
}

/// Possible zone apexes for `domain`, most specific first. The bare last
/// label is never a candidate unless it is all there is.
pub fn candidate_guesses(domain: &str) -> Vec<String> {
    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return vec![domain.to_string()];
    }
    (0..parts.len() - 1).map(|i| parts[i..].join(".")).collect()
}

/// Zone search term: the registrable domain (public suffix plus one label),
/// or the least specific guess when the name has no known suffix.
pub fn search_term(domain: &str) -> String {
    let lower = domain.to_ascii_lowercase();
    match psl::domain_str(&lower) {
        Some(registrable) => registrable.to_string(),
        None => candidate_guesses(domain)
            .pop()
            .unwrap_or_else(|| domain.to_string()),
    }
}

/// Pick the zone for the first guess present in `zones`.
pub fn select_zone(domain: &str, guesses: &[String], zones: &[BunnyZone]) -> Option<Zone> {
    guesses.iter().find_map(|guess| {
        let zone = zones.iter().find(|z| z.domain.eq_ignore_ascii_case(guess))?;
        let name_base = if guess.len() < domain.len() {
            domain[..domain.len() - guess.len() - 1].to_lowercase()
        } else {
            String::new()
        };
        Some(Zone::new(zone, name_base))
    })
}

/// Resolves and caches zones per exact requested domain string.
///
/// Entries live as long as the resolver. The lock is held across the zone
/// search, so concurrent callers never search for the same domain twice.
#[derive(Default)]
pub struct ZoneResolver {
    cache: Mutex<HashMap<String, Zone>>,
}

impl ZoneResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn resolve(&self, client: &BunnyClient, domain: &str) -> Result<Zone, DnsError> {
        if domain.is_empty() {
            return Err(DnsError::invalid_argument("domain is empty"));
        }

        let mut cache = self.cache.lock().await;
        if let Some(zone) = cache.get(domain) {
            debug!("zone cache hit for {}: {} (id {})", domain, zone.apex, zone.id);
            return Ok(zone.clone());
        }

        let guesses = candidate_guesses(domain);
        let zones = client.search_zones(&search_term(domain)).await?;

        let zone = select_zone(domain, &guesses, &zones)
            .ok_or_else(|| DnsError::not_found(format!("no zone found for {domain}")))?;
        debug!(
            "resolved {} to zone {} (id {}), name base '{}'",
            domain, zone.apex, zone.id, zone.name_base
        );

        cache.insert(domain.to_string(), zone.clone());
        Ok(zone)
    }

    pub async fn cached(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bunny_zone(id: i64, domain: &str) -> BunnyZone {
        BunnyZone {
            id,
            domain: domain.into(),
            dns_sec_enabled: false,
        }
    }

    #[test]
    fn guesses_run_from_specific_to_general() {
        assert_eq!(
            candidate_guesses("a.b.example.com"),
            vec!["a.b.example.com", "b.example.com", "example.com"]
        );
        assert_eq!(candidate_guesses("sub.example.com"), vec!["sub.example.com", "example.com"]);
        assert_eq!(candidate_guesses("example.com"), vec!["example.com"]);
        assert_eq!(candidate_guesses("localhost"), vec!["localhost"]);
    }

    #[test]
    fn search_term_is_the_registrable_domain() {
        assert_eq!(search_term("a.b.example.com"), "example.com");
        assert_eq!(search_term("www.example.co.uk"), "example.co.uk");
        assert_eq!(search_term("Sub.Example.COM"), "example.com");
        assert_eq!(search_term("example.com"), "example.com");
        // a bare suffix has no registrable domain
        assert_eq!(search_term("co.uk"), "co.uk");
        assert_eq!(search_term("localhost"), "localhost");
    }

    #[test]
    fn most_specific_zone_wins() {
        let domain = "a.b.example.com";
        let zones = vec![bunny_zone(1, "example.com"), bunny_zone(2, "b.example.com")];
        let zone = select_zone(domain, &candidate_guesses(domain), &zones).unwrap();
        assert_eq!(zone.id, 2);
        assert_eq!(zone.apex, "b.example.com");
        assert_eq!(zone.name_base, "a");
    }

    #[test]
    fn name_base_is_lower_cased_and_apex_match_is_case_insensitive() {
        let domain = "Deep.Sub.Example.com";
        let zones = vec![bunny_zone(1, "example.com"), bunny_zone(9, "other.com")];
        let zone = select_zone(domain, &candidate_guesses(domain), &zones).unwrap();
        assert_eq!(zone.id, 1);
        assert_eq!(zone.name_base, "deep.sub");
    }

    #[test]
    fn exact_apex_has_empty_name_base() {
        let zones = vec![bunny_zone(1, "example.com")];
        let zone = select_zone("example.com", &candidate_guesses("example.com"), &zones).unwrap();
        assert_eq!(zone.name_base, "");
    }

    #[test]
    fn tld_alone_never_matches() {
        let zones = vec![bunny_zone(1, "com")];
        assert!(select_zone("example.com", &candidate_guesses("example.com"), &zones).is_none());
    }

    async fn mount_search(server: &MockServer, term: &str, zones: serde_json::Value, calls: u64) {
        Mock::given(method("GET"))
            .and(path("/dnszone"))
            .and(query_param("search", term))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Items": zones
            })))
            .expect(calls)
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> BunnyClient {
        BunnyClient::new(&ProviderConfig::new("key").with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn second_resolution_is_served_from_cache() {
        let server = MockServer::start().await;
        mount_search(
            &server,
            "example.com",
            serde_json::json!([{"Id": 3, "Domain": "example.com", "DnsSecEnabled": false}]),
            1,
        )
        .await;

        let client = client_for(&server);
        let resolver = ZoneResolver::new();
        let first = resolver.resolve(&client, "sub.example.com").await.unwrap();
        let second = resolver.resolve(&client, "sub.example.com").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.name_base, "sub");
        assert_eq!(resolver.cached().await, 1);
    }

    #[tokio::test]
    async fn multi_label_suffix_searches_registrable_domain() {
        let server = MockServer::start().await;
        mount_search(
            &server,
            "example.co.uk",
            serde_json::json!([
                {"Id": 4, "Domain": "other.co.uk"},
                {"Id": 5, "Domain": "example.co.uk"}
            ]),
            1,
        )
        .await;

        let zone = ZoneResolver::new()
            .resolve(&client_for(&server), "www.example.co.uk")
            .await
            .unwrap();
        assert_eq!(zone.id, 5);
        assert_eq!(zone.name_base, "www");
    }

    #[tokio::test]
    async fn concurrent_resolutions_search_once() {
        let server = MockServer::start().await;
        mount_search(
            &server,
            "example.com",
            serde_json::json!([{"Id": 3, "Domain": "example.com"}]),
            1,
        )
        .await;

        let client = Arc::new(client_for(&server));
        let resolver = Arc::new(ZoneResolver::new());
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let (client, resolver) = (client.clone(), resolver.clone());
                tokio::spawn(async move { resolver.resolve(&client, "example.com").await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap().id, 3);
        }
        assert_eq!(resolver.cached().await, 1);
    }

    #[tokio::test]
    async fn unknown_domain_is_not_found_and_not_cached() {
        let server = MockServer::start().await;
        mount_search(&server, "example.org", serde_json::json!([]), 2).await;

        let client = client_for(&server);
        let resolver = ZoneResolver::new();
        for _ in 0..2 {
            let err = resolver.resolve(&client, "www.example.org").await.unwrap_err();
            assert!(matches!(err, DnsError::NotFound(_)));
        }
        assert_eq!(resolver.cached().await, 0);
    }

    #[tokio::test]
    async fn empty_domain_is_rejected_without_a_request() {
        let server = MockServer::start().await;
        let err = ZoneResolver::new()
            .resolve(&client_for(&server), "")
            .await
            .unwrap_err();
        assert!(matches!(err, DnsError::InvalidArgument(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
