//! Admin auth — bearer-token extractor guarding `/api/admin/*`.

use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ErrorCode;
use crate::state::AppState;

/// Marker for a request carrying the configured admin token. Use as a
/// handler parameter or through `middleware::from_extractor_with_state`.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdminRejection {
    #[error("admin API is disabled")]
    Disabled,
    #[error("missing or invalid admin token")]
    Unauthorized,
}

impl AdminRejection {
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::Disabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl ErrorCode for AdminRejection {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Disabled => "E_ADMIN_DISABLED",
            Self::Unauthorized => "E_UNAUTHORIZED",
        }
    }
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string(), "code": self.error_code() });
        (self.status(), Json(body)).into_response()
    }
}

/// Token from an `Authorization: Bearer <token>` header. The scheme is
/// matched case-insensitively.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        if app_state.admin_token.is_none() {
            return Err(AdminRejection::Disabled);
        }
        match bearer_token(&parts.headers) {
            Some(token) if app_state.admin_token_matches(token) => Ok(Self),
            _ => {
                warn!(path = %parts.uri.path(), "admin request rejected");
                Err(AdminRejection::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
