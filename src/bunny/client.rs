use crate::bunny::types::*;
use crate::config::ProviderConfig;
use crate::error::DnsError;
use reqwest::{Client, Response, header};
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Clone)]
pub struct BunnyClient {
    http: Client,
    base_url: String, // e.g. "https://api.bunny.net"
    access_key: String,
}

impl BunnyClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, DnsError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url_root().to_string(),
            access_key: config.access_key.clone(),
        })
    }

    fn auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("AccessKey", &self.access_key)
            .header(header::ACCEPT, "application/json")
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn check(res: Response) -> Result<Response, DnsError> {
        let status = res.status();
        if !status.is_success() {
            return Err(DnsError::Status(status));
        }
        Ok(res)
    }

    async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, DnsError> {
        let body = Self::check(res)?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Zones whose domain contains `term`.
    pub async fn search_zones(&self, term: &str) -> Result<Vec<BunnyZone>, DnsError> {
        debug!("Bunny API request: GET /dnszone?search={}", term);
        let req = self.http.get(self.url("dnszone")).query(&[("search", term)]);
        let res = self.auth_header(req).send().await?;
        Ok(Self::read_json::<ZoneList>(res).await?.items)
    }

    pub async fn list_zones(&self) -> Result<Vec<BunnyZone>, DnsError> {
        debug!("Bunny API request: GET /dnszone");
        let res = self.auth_header(self.http.get(self.url("dnszone"))).send().await?;
        Ok(Self::read_json::<ZoneList>(res).await?.items)
    }

    pub async fn get_records(&self, zone_id: i64) -> Result<Vec<BunnyRecord>, DnsError> {
        let path = format!("dnszone/{}", zone_id);
        debug!("Bunny API request: GET /{}", path);
        let res = self.auth_header(self.http.get(self.url(&path))).send().await?;
        Ok(Self::read_json::<ZoneRecords>(res).await?.records)
    }

    pub async fn add_record(
        &self,
        zone_id: i64,
        record: &BunnyRecord,
    ) -> Result<BunnyRecord, DnsError> {
        let path = format!("dnszone/{}/records", zone_id);
        debug!("Bunny API request: PUT /{}", path);
        let res = self
            .auth_header(self.http.put(self.url(&path)))
            .json(record)
            .send()
            .await?;
        Self::read_json(res).await
    }

    /// Bunny answers updates without the updated record.
    pub async fn update_record(
        &self,
        zone_id: i64,
        record_id: i64,
        record: &BunnyRecord,
    ) -> Result<(), DnsError> {
        let path = format!("dnszone/{}/records/{}", zone_id, record_id);
        debug!("Bunny API request: POST /{}", path);
        let res = self
            .auth_header(self.http.post(self.url(&path)))
            .json(record)
            .send()
            .await?;
        Self::check(res)?;
        Ok(())
    }

    pub async fn delete_record(&self, zone_id: i64, record_id: i64) -> Result<(), DnsError> {
        let path = format!("dnszone/{}/records/{}", zone_id, record_id);
        debug!("Bunny API request: DELETE /{}", path);
        let res = self
            .auth_header(self.http.delete(self.url(&path)))
            .send()
            .await?;
        Self::check(res)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BunnyClient {
        BunnyClient::new(&ProviderConfig::new("test-key").with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn search_sends_key_accept_and_term() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dnszone"))
            .and(query_param("search", "example.com"))
            .and(header("AccessKey", "test-key"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Items": [{"Id": 1, "Domain": "example.com", "DnsSecEnabled": true}],
                "CurrentPage": 1,
                "TotalItems": 1,
                "HasMoreItems": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let zones = client_for(&server).search_zones("example.com").await.unwrap();
        assert_eq!(
            zones,
            vec![BunnyZone {
                id: 1,
                domain: "example.com".into(),
                dns_sec_enabled: true,
            }]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dnszone/5"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).get_records(5).await.unwrap_err();
        assert!(matches!(err, DnsError::Status(s) if s.as_u16() == 401));
        assert_eq!(err.to_string(), "Unauthorized (401)");
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dnszone/5"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_records(5).await.unwrap_err();
        assert!(matches!(err, DnsError::Decode(_)));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn slow_response_times_out_as_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dnszone/5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"Records": []}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = ProviderConfig::new("test-key")
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(200));
        let err = BunnyClient::new(&config).unwrap().get_records(5).await.unwrap_err();
        assert!(matches!(&err, DnsError::Transport(e) if e.is_timeout()));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn add_update_delete_hit_record_paths() {
        let server = MockServer::start().await;
        let record = BunnyRecord {
            rtype: 3,
            name: "txt".into(),
            value: "v".into(),
            ttl: 120,
            ..Default::default()
        };

        Mock::given(method("PUT"))
            .and(path("/dnszone/5/records"))
            .and(body_json(serde_json::json!({"Type": 3, "Name": "txt", "Value": "v", "Ttl": 120})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "Id": 77, "Type": 3, "Name": "txt", "Value": "v", "Ttl": 120
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/dnszone/5/records/77"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/dnszone/5/records/77"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let created = client.add_record(5, &record).await.unwrap();
        assert_eq!(created.id, Some(77));
        client.update_record(5, 77, &record).await.unwrap();
        client.delete_record(5, 77).await.unwrap();
    }
}
