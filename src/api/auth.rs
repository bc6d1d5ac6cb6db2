//! Sign-in endpoint. Sign-out is client-side only.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, MAX_JSON_RESPONSE_BYTES};
use crate::session::{Profile, Session, UserRole};

const LOGIN_ROUTE: &str = "/auth/login";

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Exchange credentials for a bearer token and the signed-in profile.
pub fn login(client: &ApiClient, request: &LoginRequest) -> Result<Session, ApiError> {
    let body = super::send_json_text(client.post(LOGIN_ROUTE), request, MAX_JSON_RESPONSE_BYTES)?;
    parse_login_response(&body)
}

#[derive(Debug, Deserialize)]
struct LoginWire {
    access_token: String,
    user: LoginUserWire,
}

#[derive(Debug, Deserialize)]
struct LoginUserWire {
    id: String,
    #[serde(default)]
    name: String,
    email: String,
    role: UserRole,
}

fn parse_login_response(body: &str) -> Result<Session, ApiError> {
    let wire: LoginWire = serde_json::from_str(body.trim())
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    let token = wire.access_token.trim().to_string();
    if token.is_empty() {
        return Err(ApiError::InvalidResponse(
            "Login response carried an empty access token".into(),
        ));
    }
    Ok(Session {
        token,
        profile: Profile {
            user_id: wire.user.id,
            name: wire.user.name,
            email: wire.user.email,
            role: wire.user.role,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_login_response() {
        let body = r#"{
            "access_token": "tok-123",
            "token_type": "bearer",
            "user": {
                "id": "u-9",
                "name": "Dr. Chen",
                "email": "chen@example.org",
                "role": "admin"
            }
        }"#;
        let session = parse_login_response(body).unwrap();
        assert_eq!(session.token, "tok-123");
        assert_eq!(session.profile.name, "Dr. Chen");
        assert_eq!(session.profile.role, UserRole::Admin);
        assert!(session.profile.role.is_admin());
    }

    #[test]
    fn doctor_role_parses() {
        let body = r#"{
            "access_token": "tok",
            "user": { "id": "u-1", "email": "d@example.org", "role": "user" }
        }"#;
        let session = parse_login_response(body).unwrap();
        assert_eq!(session.profile.role, UserRole::Doctor);
        assert!(session.profile.name.is_empty());
    }

    #[test]
    fn blank_token_is_rejected() {
        let body = r#"{
            "access_token": "   ",
            "user": { "id": "u-1", "email": "d@example.org", "role": "user" }
        }"#;
        let err = parse_login_response(body).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
