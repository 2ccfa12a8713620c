use dioxus::logger::tracing;
use dioxus_fullstack::{get, post, HeaderMap, HttpError, Json};
use serde::{Deserialize, Serialize};

use crate::models::{GoogleLoginUrl, Identity, LoginRequest, SessionTokens, SignupRequest};
use crate::problem::{problem_http_error, ProblemDetails};

#[cfg(feature = "server")]
use crate::server::jwt;

#[cfg(feature = "server")]
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

const MIN_PASSWORD_LEN: usize = 8;

/// Marker stored instead of a password hash for federated accounts.
#[cfg(feature = "server")]
const OAUTH_SENTINEL: &str = "oauth:google";

/// Register a new account. Provisions the profile and role rows alongside
/// the credential record, then returns a fresh session.
#[post("/api/auth/signup")]
pub async fn signup(payload: Json<SignupRequest>) -> Result<Json<SessionTokens>, HttpError> {
    let payload = payload.0;
    tracing::info!("Signing up user: {}", payload.email);

    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(problem_http_error(&ProblemDetails::bad_request(
            "A valid email address is required",
        )));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(problem_http_error(&ProblemDetails::bad_request(
            "Password must be at least 8 characters",
        )));
    }
    if payload.name.trim().is_empty() {
        return Err(problem_http_error(&ProblemDetails::bad_request(
            "Name is required",
        )));
    }

    #[cfg(feature = "server")]
    {
        let db = &*crate::DB;

        let existing_email = email.clone();
        let exists = db
            .query("users")
            .filter(move |f| f.eq("email", existing_email.clone()))
            .collect()
            .await
            .map(|docs| !docs.is_empty())
            .map_err(|e| {
                problem_http_error(&ProblemDetails::internal_error(format!(
                    "Database error: {e}"
                )))
            })?;
        if exists {
            return Err(problem_http_error(&ProblemDetails::email_taken()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(payload.password.as_bytes(), &salt)
            .map_err(|e| {
                problem_http_error(&ProblemDetails::internal_error(format!("Hashing error: {e}")))
            })?
            .to_string();

        db.insert_into(
            "users",
            vec![
                ("id", id.clone().into()),
                ("email", email.clone().into()),
                ("password_hash", password_hash.into()),
                ("updated_at", now.clone().into()),
                ("created_at", now.clone().into()),
            ],
        )
        .await
        .map_err(|e| {
            tracing::error!("Database error during signup: {:?}", e);
            problem_http_error(&ProblemDetails::internal_error(format!("Database error: {e}")))
        })?;

        // Profile and role are provisioned at signup and never deleted here.
        db.insert_into(
            "profiles",
            vec![
                ("id", id.clone().into()),
                ("email", email.clone().into()),
                ("name", payload.name.trim().to_string().into()),
                ("department", payload.department.unwrap_or_default().into()),
                ("batch", payload.batch.unwrap_or_default().into()),
                ("avatar_url", String::new().into()),
                ("updated_at", now.clone().into()),
            ],
        )
        .await
        .map_err(|e| {
            problem_http_error(&ProblemDetails::internal_error(format!("Database error: {e}")))
        })?;

        db.insert_into(
            "user_roles",
            vec![
                ("user_id", id.clone().into()),
                ("role", payload.role.as_str().to_string().into()),
                ("created_at", now.into()),
            ],
        )
        .await
        .map_err(|e| {
            problem_http_error(&ProblemDetails::internal_error(format!("Database error: {e}")))
        })?;

        // Signup auto-logs-in by returning a fresh bearer session.
        let (token, expires_at) = jwt::issue_access_token(&id, &email).map_err(|e| {
            problem_http_error(&ProblemDetails::internal_error(format!(
                "Failed to issue token: {e}"
            )))
        })?;

        Ok(Json(SessionTokens {
            access_token: token,
            expires_at,
            user: Identity { id, email },
        }))
    }
    #[cfg(not(feature = "server"))]
    {
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Verify credentials and return a fresh session.
#[post("/api/auth/login")]
pub async fn login(payload: Json<LoginRequest>) -> Result<Json<SessionTokens>, HttpError> {
    let payload = payload.0;
    tracing::info!("Logging in user: {}", payload.email);

    #[cfg(feature = "server")]
    {
        let db = &*crate::DB;
        let email = payload.email.trim().to_lowercase();

        let query_email = email.clone();
        let user = db
            .query("users")
            .filter(move |f| f.eq("email", query_email.clone()))
            .collect()
            .await
            .map_err(|e| {
                problem_http_error(&ProblemDetails::internal_error(format!(
                    "Database error: {e}"
                )))
            })?
            .into_iter()
            .next()
            // Same message as a bad password so the response doesn't leak
            // which emails exist.
            .ok_or_else(|| {
                problem_http_error(&ProblemDetails::unauthorized("Invalid email or password"))
            })?;

        let user_id = user
            .data
            .get("id")
            .and_then(|v: &aurora_db::Value| v.as_str())
            .unwrap_or("")
            .to_string();
        let password_hash = user
            .data
            .get("password_hash")
            .and_then(|v: &aurora_db::Value| v.as_str())
            .unwrap_or("")
            .to_string();

        if password_hash == OAUTH_SENTINEL {
            return Err(problem_http_error(&ProblemDetails::unauthorized(
                "This account uses Google sign-in",
            )));
        }

        let argon2 = Argon2::default();
        let parsed_hash = PasswordHash::new(&password_hash).map_err(|e| {
            problem_http_error(&ProblemDetails::internal_error(format!("Invalid hash: {e}")))
        })?;

        argon2
            .verify_password(payload.password.as_bytes(), &parsed_hash)
            .map_err(|_| {
                problem_http_error(&ProblemDetails::unauthorized("Invalid email or password"))
            })?;

        let (token, expires_at) = jwt::issue_access_token(&user_id, &email).map_err(|e| {
            problem_http_error(&ProblemDetails::internal_error(format!(
                "Failed to issue token: {e}"
            )))
        })?;

        Ok(Json(SessionTokens {
            access_token: token,
            expires_at,
            user: Identity { id: user_id, email },
        }))
    }
    #[cfg(not(feature = "server"))]
    Err(problem_http_error(&ProblemDetails::internal_error(
        "Server feature not enabled",
    )))
}

/// Where to send the browser for Google sign-in. The redirect returns to
/// `/auth?code=...`, which the auth page exchanges via `google_exchange`.
#[get("/api/auth/google/url")]
pub async fn google_login_url() -> Result<Json<GoogleLoginUrl>, HttpError> {
    #[cfg(feature = "server")]
    {
        let Some((client_id, _)) = crate::server::config::google_oauth() else {
            return Err(problem_http_error(&ProblemDetails::bad_request(
                "Google sign-in is not configured on this deployment",
            )));
        };

        let redirect_uri = format!("{}/auth", crate::server::config::public_url());
        let state = uuid::Uuid::new_v4().to_string();
        let url = format!(
            "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            urlencoding::encode(&client_id),
            urlencoding::encode(&redirect_uri),
            urlencoding::encode("openid email profile"),
            state,
        );

        Ok(Json(GoogleLoginUrl { url }))
    }
    #[cfg(not(feature = "server"))]
    Err(problem_http_error(&ProblemDetails::internal_error(
        "Server feature not enabled",
    )))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleExchangeRequest {
    pub code: String,
}

#[cfg(feature = "server")]
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    id_token: String,
}

#[cfg(feature = "server")]
#[derive(Debug, Deserialize)]
struct GoogleIdClaims {
    email: String,
    #[serde(default)]
    name: Option<String>,
}

/// Complete the federated login: exchange the authorization code with
/// Google, upsert the account, and return a portal session.
#[post("/api/auth/google/exchange")]
pub async fn google_exchange(
    payload: Json<GoogleExchangeRequest>,
) -> Result<Json<SessionTokens>, HttpError> {
    let payload = payload.0;

    #[cfg(feature = "server")]
    {
        let Some((client_id, client_secret)) = crate::server::config::google_oauth() else {
            return Err(problem_http_error(&ProblemDetails::bad_request(
                "Google sign-in is not configured on this deployment",
            )));
        };

        let redirect_uri = format!("{}/auth", crate::server::config::public_url());
        let client = reqwest::Client::new();
        let token_resp = client
            .post("https://oauth2.googleapis.com/token")
            .form(&[
                ("code", payload.code.as_str()),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| {
                problem_http_error(&ProblemDetails::internal_error(format!(
                    "Google token exchange failed: {e}"
                )))
            })?;

        if !token_resp.status().is_success() {
            return Err(problem_http_error(&ProblemDetails::unauthorized(
                "Google rejected the sign-in code",
            )));
        }

        let token_body: GoogleTokenResponse = token_resp.json().await.map_err(|e| {
            problem_http_error(&ProblemDetails::internal_error(format!(
                "Google token exchange failed: {e}"
            )))
        })?;

        // The id_token came straight from Google over TLS in the exchange
        // above, so the payload segment is decoded without JWKS validation.
        let claims = decode_id_token_claims(&token_body.id_token).ok_or_else(|| {
            problem_http_error(&ProblemDetails::internal_error("Malformed Google id_token"))
        })?;

        let email = claims.email.trim().to_lowercase();
        let name = claims.name.unwrap_or_else(|| email.clone());
        let user_id = upsert_google_user(&email, &name).await?;

        let (token, expires_at) = jwt::issue_access_token(&user_id, &email).map_err(|e| {
            problem_http_error(&ProblemDetails::internal_error(format!(
                "Failed to issue token: {e}"
            )))
        })?;

        Ok(Json(SessionTokens {
            access_token: token,
            expires_at,
            user: Identity { id: user_id, email },
        }))
    }
    #[cfg(not(feature = "server"))]
    Err(problem_http_error(&ProblemDetails::internal_error(
        "Server feature not enabled",
    )))
}

#[cfg(feature = "server")]
fn decode_id_token_claims(id_token: &str) -> Option<GoogleIdClaims> {
    use base64::Engine as _;

    let payload = id_token.split('.').nth(1)?;
    let raw = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .ok()?;
    serde_json::from_slice(&raw).ok()
}

/// Find or create the account for a federated login. New accounts get the
/// student role; federation never grants admin.
#[cfg(feature = "server")]
async fn upsert_google_user(email: &str, name: &str) -> Result<String, HttpError> {
    let db = &*crate::DB;

    let query_email = email.to_string();
    let existing = db
        .query("users")
        .filter(move |f| f.eq("email", query_email.clone()))
        .collect()
        .await
        .map_err(|e| {
            problem_http_error(&ProblemDetails::internal_error(format!("Database error: {e}")))
        })?
        .into_iter()
        .next();

    if let Some(doc) = existing {
        let id = doc
            .data
            .get("id")
            .and_then(|v: &aurora_db::Value| v.as_str())
            .unwrap_or("")
            .to_string();
        return Ok(id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    db.insert_into(
        "users",
        vec![
            ("id", id.clone().into()),
            ("email", email.to_string().into()),
            ("password_hash", OAUTH_SENTINEL.to_string().into()),
            ("updated_at", now.clone().into()),
            ("created_at", now.clone().into()),
        ],
    )
    .await
    .map_err(|e| {
        problem_http_error(&ProblemDetails::internal_error(format!("Database error: {e}")))
    })?;

    db.insert_into(
        "profiles",
        vec![
            ("id", id.clone().into()),
            ("email", email.to_string().into()),
            ("name", name.to_string().into()),
            ("department", String::new().into()),
            ("batch", String::new().into()),
            ("avatar_url", String::new().into()),
            ("updated_at", now.clone().into()),
        ],
    )
    .await
    .map_err(|e| {
        problem_http_error(&ProblemDetails::internal_error(format!("Database error: {e}")))
    })?;

    db.insert_into(
        "user_roles",
        vec![
            ("user_id", id.clone().into()),
            ("role", "student".to_string().into()),
            ("created_at", now.into()),
        ],
    )
    .await
    .map_err(|e| {
        problem_http_error(&ProblemDetails::internal_error(format!("Database error: {e}")))
    })?;

    Ok(id)
}

/// Identity behind the presented bearer token.
#[get("/api/auth/me", headers: HeaderMap)]
pub async fn me() -> Result<Json<Identity>, HttpError> {
    #[cfg(feature = "server")]
    {
        let authed = crate::server::auth::require_bearer_user(&headers)?;
        Ok(Json(Identity {
            id: authed.user_id,
            email: authed.email,
        }))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = headers;
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Session invalidation hook. Tokens are stateless, so this only logs the
/// sign-out; the client discards its copy.
#[post("/api/auth/logout", headers: HeaderMap)]
pub async fn logout() -> Result<Json<()>, HttpError> {
    #[cfg(feature = "server")]
    {
        if let Ok(authed) = crate::server::auth::require_bearer_user(&headers) {
            tracing::info!("User signed out: {}", authed.user_id);
        }
        Ok(Json(()))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = headers;
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}
