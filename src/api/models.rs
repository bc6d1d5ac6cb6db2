//! Model registry endpoints and the prediction call itself.
//!
//! The registry listing and the predict response are bare JSON arrays,
//! unlike the enveloped prediction and user listings.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, MAX_JSON_RESPONSE_BYTES};

const MODELS_ROUTE: &str = "/model/get-all-models";
const PREDICT_ROUTE: &str = "/model/predict";
const ACTIVE_MODEL_INFO_ROUTE: &str = "/model/infor-model";
// Route spelling is the backend's.
const MODEL_AVAILABILITY_ROUTE: &str = "/model/model-is-availabe";

/// One registered classifier version.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ModelRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub model_url: String,
    #[serde(default)]
    pub model_key: String,
    #[serde(default)]
    pub model_original_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
}

/// Body for registering a freshly uploaded model artifact.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewModel {
    pub name: String,
    pub version: String,
    pub accuracy: Option<f64>,
    pub model_url: String,
    pub model_key: String,
    pub model_original_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_key: Option<String>,
    pub is_active: bool,
}

/// Editable subset of a registered model. Activation has its own call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelUpdate {
    pub name: String,
    pub version: String,
    pub accuracy: Option<f64>,
}

/// Name and version of the model currently serving predictions.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ActiveModelInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Body of the predict call. The image must already be uploaded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PredictRequest {
    pub doctor_id: String,
    pub image_url: String,
    pub image_original_name: String,
    pub image_key: String,
    pub model_name: String,
}

pub fn fetch_models(client: &ApiClient) -> Result<Vec<ModelRecord>, ApiError> {
    let body = super::call_text(client.get(MODELS_ROUTE), MAX_JSON_RESPONSE_BYTES)?;
    parse_models(&body)
}

pub fn fetch_model(client: &ApiClient, id: &str) -> Result<ModelRecord, ApiError> {
    let body = super::call_text(client.get(&format!("/model/{id}")), MAX_JSON_RESPONSE_BYTES)?;
    serde_json::from_str(body.trim()).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}

pub fn create_model(client: &ApiClient, model: &NewModel) -> Result<(), ApiError> {
    super::send_json_text(client.post("/model/"), model, MAX_JSON_RESPONSE_BYTES)?;
    Ok(())
}

pub fn update_model(client: &ApiClient, id: &str, update: &ModelUpdate) -> Result<(), ApiError> {
    super::send_json_text(
        client.put(&format!("/model/{id}")),
        update,
        MAX_JSON_RESPONSE_BYTES,
    )?;
    Ok(())
}

pub fn delete_model(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    super::call_text(client.delete(&format!("/model/{id}")), MAX_JSON_RESPONSE_BYTES)?;
    Ok(())
}

/// Make one model the active classifier. The backend deactivates the rest.
pub fn activate_model(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    super::call_text(
        client.patch(&format!("/model/{id}/activate")),
        MAX_JSON_RESPONSE_BYTES,
    )?;
    Ok(())
}

pub fn fetch_active_model_info(client: &ApiClient) -> Result<ActiveModelInfo, ApiError> {
    let body = super::call_text(client.get(ACTIVE_MODEL_INFO_ROUTE), MAX_JSON_RESPONSE_BYTES)?;
    serde_json::from_str(body.trim()).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}

pub fn fetch_model_availability(client: &ApiClient) -> Result<bool, ApiError> {
    let body = super::call_text(client.get(MODEL_AVAILABILITY_ROUTE), MAX_JSON_RESPONSE_BYTES)?;
    parse_availability(&body)
}

/// Run the active model on an uploaded image. Returns one probability
/// per assessment category.
pub fn predict(client: &ApiClient, request: &PredictRequest) -> Result<Vec<f64>, ApiError> {
    let body = super::send_json_text(client.post(PREDICT_ROUTE), request, MAX_JSON_RESPONSE_BYTES)?;
    parse_probabilities(&body)
}

fn parse_models(body: &str) -> Result<Vec<ModelRecord>, ApiError> {
    serde_json::from_str(body.trim()).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}

#[derive(Debug, Deserialize)]
struct AvailabilityWire {
    #[serde(default)]
    available: bool,
}

fn parse_availability(body: &str) -> Result<bool, ApiError> {
    let wire: AvailabilityWire = serde_json::from_str(body.trim())
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    Ok(wire.available)
}

fn parse_probabilities(body: &str) -> Result<Vec<f64>, ApiError> {
    let probabilities: Vec<f64> = serde_json::from_str(body.trim())
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    if probabilities.is_empty() {
        return Err(ApiError::InvalidResponse(
            "Predict response carried no probabilities".into(),
        ));
    }
    Ok(probabilities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_bare_model_array() {
        let body = r#"[
            {
                "id": "m-1",
                "name": "densenet-121",
                "version": "2.1.0",
                "accuracy": 91.5,
                "model_url": "https://cdn.example.org/models/m-1.pt",
                "model_key": "models/m-1.pt",
                "model_original_name": "densenet_v21.pt",
                "is_active": true,
                "created_at": "2024-01-12T09:00:00"
            },
            { "id": "m-2", "name": "resnet-50", "version": "1.0.0", "is_active": false }
        ]"#;
        let models = parse_models(body).unwrap();
        assert_eq!(models.len(), 2);
        assert!(models[0].is_active);
        assert_eq!(models[1].accuracy, None);
    }

    #[test]
    fn parses_availability_flag() {
        assert!(parse_availability(r#"{ "available": true }"#).unwrap());
        assert!(!parse_availability("{}").unwrap());
    }

    #[test]
    fn parses_probability_array() {
        let probs = parse_probabilities("[0.01, 0.02, 0.9, 0.04, 0.02, 0.01]").unwrap();
        assert_eq!(probs.len(), 6);
        assert!((probs[2] - 0.9).abs() < 1e-9);
    }

    #[test]
    fn empty_probability_array_is_invalid() {
        let err = parse_probabilities("[]").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
