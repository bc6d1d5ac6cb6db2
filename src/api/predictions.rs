//! Prediction history, admin record management, and prediction statistics.

use serde::Deserialize;
use time::Date;
use time::macros::format_description;

use super::{ApiClient, ApiError, MAX_JSON_RESPONSE_BYTES};

const PREDICTIONS_ROUTE: &str = "/prediction/get-all";
const DAILY_STATS_ROUTE: &str = "/prediction/statistics/daily";
const AVERAGE_CONFIDENCE_ROUTE: &str = "/prediction/statistics/admin-average-confidence";

/// One stored prediction as the backend returns it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PredictionRecord {
    pub id: String,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_original_name: String,
    #[serde(default)]
    pub image_key: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub prediction_result: String,
    /// Confidence as a percentage, already scaled by the backend.
    #[serde(default)]
    pub probability: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PredictionPage {
    pub items: Vec<PredictionRecord>,
    pub total: u64,
}

/// Filters for the admin record listing. Blank filters are omitted from
/// the query string.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub model_filter: Option<String>,
    pub result_filter: Option<String>,
}

impl Default for PredictionQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 8,
            search: String::new(),
            model_filter: None,
            result_filter: None,
        }
    }
}

/// Predictions made per calendar day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyCount {
    pub date: Date,
    pub count: u64,
}

/// Fetch one page of the signed-in doctor's own history.
pub fn fetch_doctor_predictions(
    client: &ApiClient,
    doctor_id: &str,
    page: u32,
    limit: u32,
) -> Result<PredictionPage, ApiError> {
    let request = client
        .get(&format!("{PREDICTIONS_ROUTE}/{doctor_id}"))
        .query("page", &page.to_string())
        .query("limit", &limit.to_string());
    let body = super::call_text(request, MAX_JSON_RESPONSE_BYTES)?;
    parse_prediction_page(&body)
}

/// Fetch one page of all stored predictions, filtered (admin only).
pub fn fetch_predictions(
    client: &ApiClient,
    query: &PredictionQuery,
) -> Result<PredictionPage, ApiError> {
    let mut request = client
        .get(PREDICTIONS_ROUTE)
        .query("page", &query.page.to_string())
        .query("limit", &query.limit.to_string());
    let search = query.search.trim();
    if !search.is_empty() {
        request = request.query("search", search);
    }
    if let Some(model) = &query.model_filter {
        request = request.query("model_filter", model);
    }
    if let Some(result) = &query.result_filter {
        request = request.query("result_filter", result);
    }
    let body = super::call_text(request, MAX_JSON_RESPONSE_BYTES)?;
    parse_prediction_page(&body)
}

/// Delete a stored prediction and its uploaded image (admin only).
pub fn delete_prediction(client: &ApiClient, id: &str, image_key: &str) -> Result<(), ApiError> {
    let request = client
        .delete(&format!("/prediction/{id}"))
        .query("file_key", image_key);
    super::call_text(request, MAX_JSON_RESPONSE_BYTES)?;
    Ok(())
}

/// Fetch prediction counts per day for the trailing `days` window.
pub fn fetch_daily_series(client: &ApiClient, days: u16) -> Result<Vec<DailyCount>, ApiError> {
    let request = client.get(DAILY_STATS_ROUTE).query("days", &days.to_string());
    let body = super::call_text(request, MAX_JSON_RESPONSE_BYTES)?;
    parse_daily_series(&body)
}

/// Fetch the average confidence over all stored predictions, in percent.
pub fn fetch_average_confidence(client: &ApiClient) -> Result<f64, ApiError> {
    let body = super::call_text(client.get(AVERAGE_CONFIDENCE_ROUTE), MAX_JSON_RESPONSE_BYTES)?;
    parse_average_confidence(&body)
}

#[derive(Debug, Deserialize)]
struct PageWire {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Vec<PredictionRecord>,
    #[serde(default)]
    total: u64,
}

fn parse_prediction_page(body: &str) -> Result<PredictionPage, ApiError> {
    let wire: PageWire = serde_json::from_str(body.trim())
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    check_success(wire.success)?;
    Ok(PredictionPage {
        items: wire.data,
        total: wire.total,
    })
}

#[derive(Debug, Deserialize)]
struct DailyWire {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Vec<DailyItemWire>,
}

#[derive(Debug, Deserialize)]
struct DailyItemWire {
    date: String,
    #[serde(default)]
    count: u64,
}

fn parse_daily_series(body: &str) -> Result<Vec<DailyCount>, ApiError> {
    let wire: DailyWire = serde_json::from_str(body.trim())
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    check_success(wire.success)?;
    wire.data
        .into_iter()
        .map(|item| {
            let date = parse_wire_date(&item.date).ok_or_else(|| {
                ApiError::InvalidResponse(format!("Unparseable date '{}'", item.date))
            })?;
            Ok(DailyCount {
                date,
                count: item.count,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ConfidenceWire {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: ConfidenceDataWire,
}

#[derive(Debug, Default, Deserialize)]
struct ConfidenceDataWire {
    #[serde(default)]
    average_confidence: f64,
}

fn parse_average_confidence(body: &str) -> Result<f64, ApiError> {
    let wire: ConfidenceWire = serde_json::from_str(body.trim())
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    check_success(wire.success)?;
    Ok(wire.data.average_confidence)
}

fn check_success(success: Option<bool>) -> Result<(), ApiError> {
    if success == Some(false) {
        return Err(ApiError::InvalidResponse(
            "Backend reported the request as unsuccessful".into(),
        ));
    }
    Ok(())
}

/// Dates arrive as `YYYY-MM-DD`, sometimes with a time suffix.
fn parse_wire_date(raw: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    let day_part = raw.trim().split('T').next()?;
    Date::parse(day_part, &format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_a_prediction_page() {
        let body = r#"{
            "success": true,
            "data": [{
                "id": "p-1",
                "doctor_id": "u-9",
                "image_url": "https://cdn.example.org/mammo/p-1.png",
                "image_original_name": "scan_left_cc.png",
                "image_key": "mammo/p-1.png",
                "created_at": "2024-03-01T08:15:00",
                "model_name": "densenet-121",
                "prediction_result": "BI-RADS 2",
                "probability": 93.4
            }],
            "total": 41
        }"#;
        let page = parse_prediction_page(body).unwrap();
        assert_eq!(page.total, 41);
        assert_eq!(page.items.len(), 1);
        let record = &page.items[0];
        assert_eq!(record.prediction_result, "BI-RADS 2");
        assert_eq!(record.image_key, "mammo/p-1.png");
        assert!((record.probability - 93.4).abs() < 1e-9);
    }

    #[test]
    fn reported_failure_is_an_error() {
        let err = parse_prediction_page(r#"{ "success": false, "data": [], "total": 0 }"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn parses_daily_series_with_datetime_suffixes() {
        let body = r#"{
            "success": true,
            "data": [
                { "date": "2024-02-28", "count": 4 },
                { "date": "2024-02-29T00:00:00", "count": 7 }
            ]
        }"#;
        let series = parse_daily_series(body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, date!(2024 - 02 - 28));
        assert_eq!(series[1].date, date!(2024 - 02 - 29));
        assert_eq!(series[1].count, 7);
    }

    #[test]
    fn unparseable_date_fails_the_series() {
        let body = r#"{ "data": [ { "date": "yesterday", "count": 1 } ] }"#;
        let err = parse_daily_series(body).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn parses_average_confidence() {
        let body = r#"{ "success": true, "data": { "average_confidence": 87.25 } }"#;
        assert!((parse_average_confidence(body).unwrap() - 87.25).abs() < 1e-9);
    }

    #[test]
    fn average_confidence_defaults_to_zero() {
        assert_eq!(parse_average_confidence("{}").unwrap(), 0.0);
    }
}
