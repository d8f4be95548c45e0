//! Pricing API client and record import.
//!
//! The pricing API returns opaque records (TDSP entries, plans, rates). A
//! response is either a bare JSON array or an object wrapping one.

use std::time::Duration;

use cms_config::PricingConfig;
use cms_config::constants::DEFAULT_MAX_REDIRECTS;
use cms_schema::{FieldMap, FieldValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::endpoints::send_request_with_retry;
use crate::error::{ClientError, Result, UnitFailure};
use crate::store::DocumentStore;

/// Wrapper keys checked, in order, before falling back to the first array field.
const WRAPPER_KEYS: &[&str] = &["data", "results", "items"];

/// HTTP client for the pricing API.
#[derive(Debug)]
pub struct PricingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    max_retries: usize,
}

impl PricingClient {
    pub fn new(config: &PricingConfig, timeout: Duration, max_retries: usize) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base_url}/{endpoint}` and extract the record list.
    pub async fn fetch_records(&self, endpoint: &str) -> Result<PricingRecords> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        debug!(%url, "Fetching pricing records");

        let mut builder = self.http.get(&url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = send_request_with_retry(builder, self.max_retries).await?;
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("Pricing response is not JSON: {e}")))?;

        let records = extract_records(body)?;
        info!(
            endpoint,
            count = records.records.len(),
            rejected = records.rejected.len(),
            "Fetched pricing records"
        );
        Ok(records)
    }
}

/// One object entry of a pricing response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingRecord {
    /// Position in the response array.
    #[serde(skip)]
    pub index: usize,
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl PricingRecord {
    /// The record's `id`, else `#index`.
    pub fn key(&self) -> String {
        record_key(&self.fields, self.index)
    }
}

/// Entries of a pricing response, split into usable records and rejects.
#[derive(Debug, Clone, Default)]
pub struct PricingRecords {
    pub records: Vec<PricingRecord>,
    /// Entries that are not JSON objects, keyed `#index`.
    pub rejected: Vec<UnitFailure>,
}

impl PricingRecords {
    /// Number of entries in the response, rejects included.
    pub fn total(&self) -> usize {
        self.records.len() + self.rejected.len()
    }
}

/// Pull the record array out of a pricing response.
///
/// Accepts a bare array, or an object whose `data`, `results` or `items`
/// field is an array, or failing those the first array-valued field.
/// Non-object entries are returned as rejects.
pub fn extract_records(body: serde_json::Value) -> Result<PricingRecords> {
    let items = match body {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => {
            let key = WRAPPER_KEYS
                .iter()
                .map(|k| k.to_string())
                .find(|k| map.get(k).is_some_and(serde_json::Value::is_array))
                .or_else(|| {
                    map.iter()
                        .find(|(_, v)| v.is_array())
                        .map(|(k, _)| k.clone())
                });
            match key.and_then(|k| map.remove(&k)) {
                Some(serde_json::Value::Array(items)) => items,
                _ => {
                    return Err(ClientError::InvalidResponse(
                        "Pricing response object has no array field".to_string(),
                    ));
                }
            }
        }
        other => {
            return Err(ClientError::InvalidResponse(format!(
                "Expected a JSON array or object, got {}",
                json_kind(&other)
            )));
        }
    };

    let mut extracted = PricingRecords::default();
    for (index, item) in items.into_iter().enumerate() {
        match FieldValue::from(item) {
            FieldValue::Map(fields) => extracted.records.push(PricingRecord { index, fields }),
            other => {
                warn!(index, kind = ?other.primitive_type(), "Rejecting non-object pricing record");
                extracted
                    .rejected
                    .push(UnitFailure::new(format!("#{index}"), "not a JSON object"));
            }
        }
    }
    Ok(extracted)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Identify a record in reports: its `id`, else its position.
pub fn record_key(record: &FieldMap, index: usize) -> String {
    match record.get("id") {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => format!("#{index}"),
    }
}

/// Outcome of importing pricing records into a collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub collection: String,
    pub total: usize,
    /// Ids of created documents.
    pub created: Vec<String>,
    /// Record keys that would be created (dry run).
    pub planned: Vec<String>,
    pub failures: Vec<UnitFailure>,
}

impl ImportReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Create one document per record in `collection`.
///
/// Rejected entries are reported as failures up front. A failing record is
/// recorded with its key and the run continues.
pub async fn import_records<S>(
    store: &mut S,
    collection: &str,
    records: &PricingRecords,
    dry_run: bool,
) -> ImportReport
where
    S: DocumentStore + ?Sized,
{
    let mut report = ImportReport {
        collection: collection.to_string(),
        total: records.total(),
        failures: records.rejected.clone(),
        ..ImportReport::default()
    };

    for record in &records.records {
        let key = record.key();
        if dry_run {
            report.planned.push(key);
            continue;
        }

        match store.create(collection, &record.fields, None).await {
            Ok(doc) => {
                debug!(collection, key = %key, id = %doc.display_id(), "Imported record");
                report.created.push(doc.display_id());
            }
            Err(e) => {
                warn!(collection, key = %key, error = %e, "Failed to import record");
                report.failures.push(UnitFailure::new(key, e));
            }
        }
    }

    info!(
        collection,
        created = report.created.len(),
        failed = report.failures.len(),
        dry_run,
        "Pricing import finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_bare_array() {
        let extracted = extract_records(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(extracted.records.len(), 2);
        assert!(extracted.rejected.is_empty());
    }

    #[test]
    fn test_extract_wrapped_array_prefers_known_keys() {
        let records = extract_records(json!({
            "aaa": [{"id": "wrong"}],
            "results": [{"id": "right"}],
        }))
        .unwrap();
        assert_eq!(records.total(), 1);
        assert_eq!(records.records[0].key(), "right");
    }

    #[test]
    fn test_extract_first_array_field() {
        let records = extract_records(json!({
            "count": 2,
            "tdsps": [{"name": "Oncor"}, {"name": "CenterPoint"}],
        }))
        .unwrap();
        assert_eq!(records.total(), 2);
        assert_eq!(records.records[1].key(), "#1");
    }

    #[test]
    fn test_extract_rejects_scalars_and_arrayless_objects() {
        assert!(matches!(
            extract_records(json!("nope")),
            Err(ClientError::InvalidResponse(_))
        ));
        assert!(matches!(
            extract_records(json!({"count": 0})),
            Err(ClientError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_extract_rejects_non_objects_by_position() {
        let extracted = extract_records(json!([7, {"name": "Oncor"}, "x"])).unwrap();

        assert_eq!(extracted.total(), 3);
        assert_eq!(extracted.records.len(), 1);
        // Keys keep the position in the response, not among the kept records.
        assert_eq!(extracted.records[0].key(), "#1");
        let keys: Vec<&str> = extracted.rejected.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["#0", "#2"]);
        assert_eq!(extracted.rejected[0].error, "not a JSON object");
    }

    #[test]
    fn test_record_serializes_as_its_fields() {
        let extracted = extract_records(json!([{"id": "oncor", "rate": 4.5}])).unwrap();
        let value = serde_json::to_value(&extracted.records[0]).unwrap();
        assert_eq!(value, json!({"id": "oncor", "rate": 4.5}));
    }
}
