use crate::problem::{problem_http_error, ProblemDetails};
use dioxus_fullstack::HttpError;

/// Authenticated user identity for request handlers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthedUser {
    pub user_id: String,
    pub email: String,
}

/// Extract the bearer token from an `Authorization` header, if any.
pub fn bearer_token(headers: &dioxus_fullstack::http::HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

/// Require a valid bearer token; returns the authenticated user.
#[cfg(feature = "server")]
pub fn require_bearer_user(
    headers: &dioxus_fullstack::http::HeaderMap,
) -> Result<AuthedUser, HttpError> {
    let token = bearer_token(headers)
        .ok_or_else(|| problem_http_error(&ProblemDetails::unauthorized("Missing bearer token")))?;

    let claims = super::jwt::validate_access_token(&token)
        .map_err(|_| problem_http_error(&ProblemDetails::unauthorized("Invalid or expired token")))?;

    Ok(AuthedUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// Require that the bearer user holds the admin role.
#[cfg(feature = "server")]
pub async fn require_admin(
    headers: &dioxus_fullstack::http::HeaderMap,
) -> Result<AuthedUser, HttpError> {
    let user = require_bearer_user(headers)?;

    let db = &*crate::DB;
    let uid = user.user_id.clone();
    let is_admin = db
        .query("user_roles")
        .filter(move |f| f.eq("user_id", uid.clone()) & f.eq("role", "admin".to_string()))
        .collect()
        .await
        .map(|docs| !docs.is_empty())
        .map_err(|e| {
            problem_http_error(&ProblemDetails::internal_error(format!("Database error: {e}")))
        })?;

    if !is_admin {
        return Err(problem_http_error(&ProblemDetails::forbidden(
            "Admin access required",
        )));
    }

    Ok(user)
}

#[cfg(not(feature = "server"))]
#[allow(dead_code)]
pub fn require_bearer_user(
    _headers: &dioxus_fullstack::http::HeaderMap,
) -> Result<AuthedUser, HttpError> {
    Err(HttpError::new(
        dioxus_fullstack::StatusCode::INTERNAL_SERVER_ERROR,
        "Server feature not enabled",
    ))
}
