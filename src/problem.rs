use dioxus_fullstack::{HttpError, StatusCode};
use serde::{Deserialize, Serialize};

/// RFC7807 Problem Details (application/problem+json)
///
/// We use this as our canonical error envelope for `/api/*` endpoints so clients
/// can surface meaningful auth and validation errors instead of failing to decode
/// a success response type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// HTTP status code.
    pub status: u16,
    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// A URI reference that identifies the specific occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            type_url: "https://placementcell.app/problems/bad-request".to_string(),
            title: "Bad Request".to_string(),
            status: StatusCode::BAD_REQUEST.as_u16(),
            detail: Some(detail.into()),
            instance: None,
        }
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self {
            type_url: "https://placementcell.app/problems/unauthorized".to_string(),
            title: "Unauthorized".to_string(),
            status: StatusCode::UNAUTHORIZED.as_u16(),
            detail: Some(detail.into()),
            instance: None,
        }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self {
            type_url: "https://placementcell.app/problems/forbidden".to_string(),
            title: "Forbidden".to_string(),
            status: StatusCode::FORBIDDEN.as_u16(),
            detail: Some(detail.into()),
            instance: None,
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            type_url: "https://placementcell.app/problems/not-found".to_string(),
            title: "Not Found".to_string(),
            status: StatusCode::NOT_FOUND.as_u16(),
            detail: Some(detail.into()),
            instance: None,
        }
    }

    /// Duplicate e-mail at signup. Clients match on the type URL to show the
    /// "already registered" path instead of a generic failure.
    pub fn email_taken() -> Self {
        Self {
            type_url: EMAIL_TAKEN_TYPE.to_string(),
            title: "Conflict".to_string(),
            status: StatusCode::CONFLICT.as_u16(),
            detail: Some("An account with this email already exists".to_string()),
            instance: None,
        }
    }

    /// Duplicate (user, drive) registration pair.
    pub fn already_registered() -> Self {
        Self {
            type_url: ALREADY_REGISTERED_TYPE.to_string(),
            title: "Conflict".to_string(),
            status: StatusCode::CONFLICT.as_u16(),
            detail: Some("You are already registered for this drive".to_string()),
            instance: None,
        }
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self {
            type_url: "https://placementcell.app/problems/internal-error".to_string(),
            title: "Internal Server Error".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: Some(detail.into()),
            instance: None,
        }
    }
}

pub const EMAIL_TAKEN_TYPE: &str = "https://placementcell.app/problems/email-taken";
pub const ALREADY_REGISTERED_TYPE: &str =
    "https://placementcell.app/problems/already-registered";

/// Convert an RFC7807 problem into a Dioxus HttpError.
///
/// NOTE: Dioxus Fullstack server-fn transport doesn't currently expose full
/// control over response content-type, but we still embed the problem JSON into
/// the error message so clients can parse/display it.
pub fn problem_http_error(problem: &ProblemDetails) -> HttpError {
    let status =
        StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let msg = serde_json::to_string(problem).unwrap_or_else(|_| problem.title.clone());
    HttpError::new(status, msg)
}

/// Attempt to parse an RFC7807 (or RFC7807-ish) JSON body into a user-facing message.
/// Prefers `detail`, falls back to `title`.
pub fn try_problem_detail(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ProblemDetails>(body).ok()?;
    if let Some(detail) = parsed.detail {
        if !detail.trim().is_empty() {
            return Some(detail);
        }
    }
    if !parsed.title.trim().is_empty() {
        return Some(parsed.title);
    }
    None
}

/// Check whether an error body is a specific problem type.
pub fn is_problem_type(body: &str, type_url: &str) -> bool {
    serde_json::from_str::<ProblemDetails>(body)
        .map(|p| p.type_url == type_url)
        .unwrap_or(false)
}
