//! Pure mappings from wire records to the rows the renderer draws.

use time::PrimitiveDateTime;
use time::macros::format_description;

use crate::api::models::ModelRecord;
use crate::api::predictions::PredictionRecord;
use crate::api::users::UserRecord;
use crate::birads::BiRadsCategory;
use crate::egui_app::state::{ModelRowView, PredictionRowView, UserRowView};

/// Render backend timestamps (`2026-03-01T08:15:42.123456` and friends) as
/// `2026-03-01 08:15`. Unparsable input is shown as sent.
pub fn format_timestamp(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('Z');
    let seconds = trimmed.split('.').next().unwrap_or(trimmed);
    let wire = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    match PrimitiveDateTime::parse(seconds, wire) {
        Ok(parsed) => {
            let display = format_description!("[year]-[month]-[day] [hour]:[minute]");
            parsed.format(display).unwrap_or_else(|_| raw.to_string())
        }
        Err(_) => raw.trim().to_string(),
    }
}

/// Build one table row for a stored prediction.
pub fn prediction_row(record: &PredictionRecord) -> PredictionRowView {
    let image_name = if record.image_original_name.trim().is_empty() {
        record
            .image_key
            .rsplit('/')
            .next()
            .filter(|part| !part.is_empty())
            .unwrap_or("unnamed image")
            .to_string()
    } else {
        record.image_original_name.clone()
    };
    PredictionRowView {
        id: record.id.clone(),
        doctor_id: record.doctor_id.clone(),
        image_url: record.image_url.clone(),
        image_name,
        image_key: record.image_key.clone(),
        created_label: format_timestamp(&record.created_at),
        model_name: record.model_name.clone(),
        result_label: record.prediction_result.clone(),
        category: BiRadsCategory::from_label(&record.prediction_result),
        probability_label: format!("{:.1}%", record.probability),
    }
}

/// Build rows for a fetched prediction page.
pub fn prediction_rows(records: &[PredictionRecord]) -> Vec<PredictionRowView> {
    records.iter().map(prediction_row).collect()
}

/// Build one table row for a registered model.
pub fn model_row(record: &ModelRecord) -> ModelRowView {
    ModelRowView {
        id: record.id.clone(),
        name: record.name.clone(),
        version: record.version.clone(),
        accuracy_label: match record.accuracy {
            Some(value) => format!("{value:.1}%"),
            None => "n/a".to_string(),
        },
        artifact_name: if record.model_original_name.trim().is_empty() {
            record.model_key.clone()
        } else {
            record.model_original_name.clone()
        },
        created_label: format_timestamp(&record.created_at),
        is_active: record.is_active,
    }
}

/// Build rows for the model table.
pub fn model_rows(records: &[ModelRecord]) -> Vec<ModelRowView> {
    records.iter().map(model_row).collect()
}

/// Build one table row for a managed account.
pub fn user_row(record: &UserRecord) -> UserRowView {
    UserRowView {
        id: record.id.clone(),
        name: record.name.clone(),
        email: record.email.clone(),
        role: record.role,
        auth_provider: if record.auth_provider.trim().is_empty() {
            "local".to_string()
        } else {
            record.auth_provider.clone()
        },
        is_revoked: record.is_revoked,
        confirmed: record.confirmed,
        created_label: format_timestamp(&record.created_at),
    }
}

/// Build rows for a fetched user page.
pub fn user_rows(records: &[UserRecord]) -> Vec<UserRowView> {
    records.iter().map(user_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserRole;

    #[test]
    fn timestamps_drop_fractional_seconds_and_suffixes() {
        assert_eq!(
            format_timestamp("2026-03-01T08:15:42.123456"),
            "2026-03-01 08:15"
        );
        assert_eq!(format_timestamp("2026-03-01T08:15:42Z"), "2026-03-01 08:15");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp(""), "");
    }

    #[test]
    fn prediction_rows_parse_the_result_label() {
        let record = PredictionRecord {
            id: "p-1".into(),
            doctor_id: Some("u-9".into()),
            image_url: "https://cdn.example.org/mammo/scan.png".into(),
            image_original_name: "scan.png".into(),
            image_key: "mammo/scan.png".into(),
            created_at: "2026-02-11T10:00:00".into(),
            model_name: "resnet50".into(),
            prediction_result: "BI-RADS 4".into(),
            probability: 87.25,
        };
        let row = prediction_row(&record);
        assert_eq!(row.category, BiRadsCategory::from_label("BI-RADS 4"));
        assert_eq!(row.probability_label, "87.2%");
        assert_eq!(row.created_label, "2026-02-11 10:00");
    }

    #[test]
    fn prediction_rows_fall_back_to_the_key_for_the_name() {
        let record = PredictionRecord {
            id: "p-2".into(),
            doctor_id: None,
            image_url: String::new(),
            image_original_name: "  ".into(),
            image_key: "mammo/u-9/left_cc.png".into(),
            created_at: String::new(),
            model_name: String::new(),
            prediction_result: "inconclusive".into(),
            probability: 0.0,
        };
        let row = prediction_row(&record);
        assert_eq!(row.image_name, "left_cc.png");
        assert!(row.category.is_none());
    }

    #[test]
    fn model_rows_format_missing_accuracy() {
        let record = ModelRecord {
            id: "m-1".into(),
            name: "resnet50".into(),
            version: "2.1".into(),
            accuracy: None,
            model_url: String::new(),
            model_key: "models/resnet50.pt".into(),
            model_original_name: String::new(),
            is_active: true,
            created_at: "2026-01-05T16:40:00".into(),
        };
        let row = model_row(&record);
        assert_eq!(row.accuracy_label, "n/a");
        assert_eq!(row.artifact_name, "models/resnet50.pt");
        assert!(row.is_active);
    }

    #[test]
    fn user_rows_default_the_provider() {
        let record = UserRecord {
            id: "u-1".into(),
            name: "Ada".into(),
            email: "ada@clinic.test".into(),
            role: UserRole::Doctor,
            auth_provider: String::new(),
            created_at: String::new(),
            is_revoked: false,
            confirmed: true,
            img_url: None,
        };
        let row = user_row(&record);
        assert_eq!(row.auth_provider, "local");
        assert_eq!(row.role, UserRole::Doctor);
    }
}
