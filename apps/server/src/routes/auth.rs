//! Operator login.

use acai_core::Operator;
use acai_db::password::verify_password;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub operator: Operator,
}

const BAD_CREDENTIALS: &str = "Invalid email or password";

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = req.email.trim();

    let Some(operator) = state.db.operators().find_by_email(email).await? else {
        warn!(email, "Login for unknown operator");
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    };

    let valid = verify_password(&req.password, &operator.password_hash).map_err(ApiError::internal)?;
    if !valid {
        warn!(operator_id = operator.id, "Login with wrong password");
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    let token = state.jwt.generate_token(&operator)?;
    info!(operator_id = operator.id, role = operator.role.as_str(), "Operator logged in");

    Ok(Json(LoginResponse { token, operator }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{TestApp, PASSWORD};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_login_success_hides_hash() {
        let app = TestApp::new().await;
        let (status, body) = app
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({"email": "admin@megaacai", "password": PASSWORD})),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().is_some());
        assert_eq!(body["operator"]["role"], "admin");
        assert!(body["operator"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let app = TestApp::new().await;

        let (wrong_pw, body_a) = app
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({"email": "admin@megaacai", "password": "errada"})),
            )
            .await;
        let (unknown, body_b) = app
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({"email": "ninguem@megaacai", "password": PASSWORD})),
            )
            .await;

        assert_eq!(wrong_pw, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown, StatusCode::UNAUTHORIZED);
        assert_eq!(body_a, body_b);
    }

    #[tokio::test]
    async fn test_login_malformed_body() {
        let app = TestApp::new().await;
        let (status, body) = app
            .send(Method::POST, "/auth/login", None, Some(json!({"email": "x"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}
