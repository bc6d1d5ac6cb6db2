//! Dataset statistics and export endpoints.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, MAX_JSON_RESPONSE_BYTES};
use crate::dataset::{ClassDistribution, PartitionRatio};
use crate::http_client;

const CLASS_STATS_ROUTE: &str = "/admin/dataset/class-stats";
const EXPORT_ROUTE: &str = "/admin/create-dataset-download";

const MAX_ARCHIVE_BYTES: usize = 1024 * 1024 * 1024;

/// Body of the export request, derived from the ratio at confirmation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DatasetExportRequest {
    pub train_percent: u8,
    pub val_percent: u8,
    pub test_percent: u8,
}

impl From<PartitionRatio> for DatasetExportRequest {
    fn from(ratio: PartitionRatio) -> Self {
        Self {
            train_percent: ratio.train_percent(),
            val_percent: ratio.val_percent(),
            test_percent: ratio.test_percent(),
        }
    }
}

/// Fetch per-class image counts for the training corpus.
pub fn fetch_class_stats(client: &ApiClient) -> Result<ClassDistribution, ApiError> {
    let body = super::call_text(client.get(CLASS_STATS_ROUTE), MAX_JSON_RESPONSE_BYTES)?;
    parse_class_stats(&body)
}

/// Request a partitioned dataset archive and stream the zip payload into
/// `out`. Returns the number of bytes written.
pub fn export_dataset(
    client: &ApiClient,
    request: &DatasetExportRequest,
    out: &mut impl Write,
) -> Result<u64, ApiError> {
    let response = match client.post(EXPORT_ROUTE).send_json(request) {
        Ok(response) => response,
        Err(err) => return Err(super::map_request_error(err)),
    };
    let content_type = response.content_type().to_ascii_lowercase();
    if !content_type.contains("zip") {
        return Err(ApiError::InvalidResponse(format!(
            "Expected a zip payload, got content type '{content_type}'"
        )));
    }
    http_client::copy_response_to_writer(response, out, MAX_ARCHIVE_BYTES)
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))
}

#[derive(Debug, Deserialize)]
struct ClassStatsWire {
    #[serde(default)]
    total_images: u64,
    #[serde(default)]
    class_stats: BTreeMap<String, u64>,
}

fn parse_class_stats(body: &str) -> Result<ClassDistribution, ApiError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidResponse("Empty response body".into()));
    }
    let wire: ClassStatsWire = serde_json::from_str(trimmed)
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    Ok(ClassDistribution::new(wire.total_images, wire.class_stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ratio_produces_the_seventy_twenty_ten_body() {
        let request = DatasetExportRequest::from(PartitionRatio::default());
        assert_eq!(request.train_percent, 70);
        assert_eq!(request.val_percent, 20);
        assert_eq!(request.test_percent, 10);
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "train_percent": 70, "val_percent": 20, "test_percent": 10 })
        );
    }

    #[test]
    fn parses_class_stats_payload() {
        let body = r#"{
            "total_images": 1203,
            "class_stats": { "BI-RADS 0": 120, "BI-RADS 2": 640, "BI-RADS 5": 3 }
        }"#;
        let stats = parse_class_stats(body).unwrap();
        assert_eq!(stats.total_images(), 1203);
        assert_eq!(stats.count_for("BI-RADS 2"), 640);
        assert_eq!(stats.count_for("BI-RADS 1"), 0);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let stats = parse_class_stats("{}").unwrap();
        assert_eq!(stats.total_images(), 0);
        assert_eq!(stats.chart_rows().len(), 6);
    }

    #[test]
    fn empty_body_is_invalid() {
        let err = parse_class_stats("   ").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn malformed_json_is_invalid() {
        let err = parse_class_stats("{ not json").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
