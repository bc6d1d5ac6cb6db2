//! Account administration endpoints.
//!
//! This family wraps every payload in `{ status_code, data, detail }` and
//! mixes camelCase and snake_case field names. Both quirks are the
//! backend's contract and are mirrored as-is.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, MAX_JSON_RESPONSE_BYTES};
use crate::session::UserRole;

const USERS_ROUTE: &str = "/admin/users";

/// One managed account.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub auth_provider: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, rename = "isRevoked")]
    pub is_revoked: bool,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default, rename = "imgUrl")]
    pub img_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    pub total_users: u64,
}

/// Filters for the account listing. `None` means unfiltered.
#[derive(Clone, Debug, PartialEq)]
pub struct UserQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub role: Option<UserRole>,
    pub auth_provider: Option<String>,
    pub is_revoked: Option<bool>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 8,
            search: String::new(),
            role: None,
            auth_provider: None,
            is_revoked: None,
        }
    }
}

/// Editable subset of an account.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserUpdate {
    pub name: String,
    pub role: UserRole,
    #[serde(rename = "isRevoked")]
    pub is_revoked: bool,
    pub confirmed: bool,
}

pub fn fetch_users(client: &ApiClient, query: &UserQuery) -> Result<UserPage, ApiError> {
    let mut request = client
        .get(USERS_ROUTE)
        .query("page", &query.page.to_string())
        .query("page_size", &query.page_size.to_string());
    let search = query.search.trim();
    if !search.is_empty() {
        request = request.query("search", search);
    }
    if let Some(role) = query.role {
        request = request.query("role", role.wire_name());
    }
    if let Some(provider) = &query.auth_provider {
        request = request.query("auth_provider", provider);
    }
    if let Some(revoked) = query.is_revoked {
        request = request.query("is_revoked", if revoked { "true" } else { "false" });
    }
    let body = super::call_text(request, MAX_JSON_RESPONSE_BYTES)?;
    parse_user_page(&body)
}

pub fn fetch_user(client: &ApiClient, id: &str) -> Result<UserRecord, ApiError> {
    let body = super::call_text(
        client.get(&format!("{USERS_ROUTE}/{id}")),
        MAX_JSON_RESPONSE_BYTES,
    )?;
    parse_user_detail(&body)
}

pub fn update_user(client: &ApiClient, id: &str, update: &UserUpdate) -> Result<(), ApiError> {
    let body = super::send_json_text(
        client.put(&format!("{USERS_ROUTE}/{id}")),
        update,
        MAX_JSON_RESPONSE_BYTES,
    )?;
    parse_ack(&body)
}

pub fn delete_user(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    let body = super::call_text(
        client.delete(&format!("{USERS_ROUTE}/{id}")),
        MAX_JSON_RESPONSE_BYTES,
    )?;
    parse_ack(&body)
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
struct EnvelopeWire<T> {
    status_code: u16,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ListDataWire {
    #[serde(default)]
    users: Vec<UserRecord>,
    #[serde(default)]
    pagination: PaginationWire,
}

#[derive(Debug, Default, Deserialize)]
struct PaginationWire {
    #[serde(default)]
    total_users: u64,
}

fn parse_envelope<T: serde::de::DeserializeOwned>(body: &str) -> Result<Option<T>, ApiError> {
    let wire: EnvelopeWire<T> = serde_json::from_str(body.trim())
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    check_inner_status(wire.status_code, wire.detail)?;
    Ok(wire.data)
}

fn parse_user_page(body: &str) -> Result<UserPage, ApiError> {
    let data: ListDataWire = parse_envelope(body)?
        .ok_or_else(|| ApiError::InvalidResponse("User listing carried no data".into()))?;
    Ok(UserPage {
        users: data.users,
        total_users: data.pagination.total_users,
    })
}

fn parse_user_detail(body: &str) -> Result<UserRecord, ApiError> {
    parse_envelope(body)?
        .ok_or_else(|| ApiError::InvalidResponse("User detail carried no data".into()))
}

fn parse_ack(body: &str) -> Result<(), ApiError> {
    parse_envelope::<serde_json::Value>(body)?;
    Ok(())
}

/// The envelope repeats an HTTP-style status even on 200 OK responses.
fn check_inner_status(status_code: u16, detail: Option<String>) -> Result<(), ApiError> {
    if status_code == 200 {
        return Ok(());
    }
    let detail = detail.unwrap_or_else(|| format!("status_code {status_code}"));
    Err(match status_code {
        400 | 422 => ApiError::BadRequest(detail),
        401 | 403 => ApiError::Unauthorized,
        404 => ApiError::NotFound(detail),
        500..=599 => ApiError::ServerError(detail),
        _ => ApiError::InvalidResponse(detail),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_user_page_with_mixed_field_casing() {
        let body = r#"{
            "status_code": 200,
            "data": {
                "users": [{
                    "id": "u-1",
                    "name": "Dr. Vu",
                    "email": "vu@example.org",
                    "role": "user",
                    "auth_provider": "google",
                    "created_at": "2024-01-03T10:00:00",
                    "isRevoked": true,
                    "confirmed": false,
                    "imgUrl": "https://cdn.example.org/avatars/u-1.png"
                }],
                "pagination": { "total_users": 57, "page": 1, "page_size": 8 }
            }
        }"#;
        let page = parse_user_page(body).unwrap();
        assert_eq!(page.total_users, 57);
        let user = &page.users[0];
        assert_eq!(user.role, UserRole::Doctor);
        assert!(user.is_revoked);
        assert!(!user.confirmed);
        assert_eq!(user.img_url.as_deref(), Some("https://cdn.example.org/avatars/u-1.png"));
    }

    #[test]
    fn inner_status_maps_to_the_error_taxonomy() {
        let body = r#"{ "status_code": 404, "detail": "User not found" }"#;
        let err = parse_user_detail(body).unwrap_err();
        match err {
            ApiError::NotFound(detail) => assert_eq!(detail, "User not found"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn ack_accepts_a_bare_ok_envelope() {
        parse_ack(r#"{ "status_code": 200, "detail": "User deleted" }"#).unwrap();
    }

    #[test]
    fn update_body_uses_the_backend_casing() {
        let update = UserUpdate {
            name: "Ada".into(),
            role: UserRole::Admin,
            is_revoked: false,
            confirmed: true,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Ada",
                "role": "admin",
                "isRevoked": false,
                "confirmed": true
            })
        );
    }
}
