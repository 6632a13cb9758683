use serde::{Deserialize, Deserializer, Serialize};

/// Missing and `null` both become the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BunnyZone {
    pub id: i64,
    pub domain: String, // "example.com", no trailing dot
    #[serde(default)]
    pub dns_sec_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct ZoneList {
    #[serde(rename = "Items", default)]
    pub items: Vec<BunnyZone>,
}

#[derive(Debug, Deserialize)]
pub struct ZoneRecords {
    #[serde(rename = "Records", default)]
    pub records: Vec<BunnyRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BunnyRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>, // assigned by Bunny, never sent
    #[serde(rename = "Type")]
    pub rtype: i32, // see codec::type_code
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String, // relative to the zone apex, "" for the apex
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>, // SRV
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>, // MX, SRV
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u8>, // CAA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>, // CAA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>, // SRV
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_without_id() {
        let record = BunnyRecord {
            rtype: 3,
            name: "_acme-challenge".into(),
            value: "token".into(),
            ttl: 60,
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Type": 3, "Name": "_acme-challenge", "Value": "token", "Ttl": 60})
        );
    }

    #[test]
    fn zone_records_tolerate_nulls_and_extra_fields() {
        let body = serde_json::json!({
            "Id": 7,
            "Domain": "example.com",
            "Records": [
                {"Id": 1, "Type": 9, "Ttl": 300, "Value": "letsencrypt.org", "Name": "",
                 "Weight": 0, "Priority": 0, "Flags": 0, "Tag": "issue", "Port": 0,
                 "Accelerated": false},
                {"Id": 2, "Type": 0, "Ttl": 300, "Value": "192.0.2.1", "Name": "www",
                 "Tag": null}
            ]
        });
        let zone: ZoneRecords = serde_json::from_value(body).unwrap();
        assert_eq!(zone.records.len(), 2);
        assert_eq!(zone.records[0].tag.as_deref(), Some("issue"));
        assert_eq!(zone.records[1].tag, None);
        assert_eq!(zone.records[1].id, Some(2));
    }

    #[test]
    fn null_name_value_and_ttl_decode_as_empty() {
        let body = serde_json::json!({
            "Records": [
                {"Id": 3, "Type": 5, "Name": null, "Value": null, "Ttl": null},
                {"Id": 4, "Type": 11}
            ]
        });
        let zone: ZoneRecords = serde_json::from_value(body).unwrap();
        for record in &zone.records {
            assert_eq!((record.name.as_str(), record.value.as_str(), record.ttl), ("", "", 0));
        }
        assert_eq!(zone.records[0].rtype, 5);
    }
}
