use crate::models::{Profile, Role, UpdateProfileRequest};
use crate::problem::{problem_http_error, ProblemDetails};
use dioxus::prelude::*;
use dioxus_fullstack::{get, put, HeaderMap, HttpError, Json};

#[cfg(feature = "server")]
use crate::server::middleware::cors::api_cors_layer;

#[cfg(feature = "server")]
fn opt_field(doc: &aurora_db::Document, field: &str) -> Option<String> {
    doc.data
        .get(field)
        .and_then(|v: &aurora_db::Value| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(feature = "server")]
fn profile_from_doc(doc: &aurora_db::Document) -> Profile {
    let updated_at = doc
        .data
        .get("updated_at")
        .and_then(|v: &aurora_db::Value| v.as_str())
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap_or_else(chrono::Utc::now);

    Profile {
        id: doc
            .data
            .get("id")
            .and_then(|v: &aurora_db::Value| v.as_str())
            .unwrap_or("")
            .to_string(),
        email: doc
            .data
            .get("email")
            .and_then(|v: &aurora_db::Value| v.as_str())
            .unwrap_or("")
            .to_string(),
        name: doc
            .data
            .get("name")
            .and_then(|v: &aurora_db::Value| v.as_str())
            .unwrap_or("")
            .to_string(),
        department: opt_field(doc, "department"),
        batch: opt_field(doc, "batch"),
        avatar_url: opt_field(doc, "avatar_url"),
        updated_at,
    }
}

/// Fetch a user's profile. Returns `null` instead of erroring when no row
/// exists yet, so callers can treat "no profile" as ordinary data.
#[get("/api/users/:user_id/profile", headers: HeaderMap)]
#[middleware(api_cors_layer())]
pub async fn get_profile(user_id: String) -> Result<Json<Option<Profile>>, HttpError> {
    #[cfg(feature = "server")]
    {
        crate::server::auth::require_bearer_user(&headers)?;

        let db = &*crate::DB;
        let uid = user_id.clone();
        let doc = db
            .query("profiles")
            .filter(move |f| f.eq("id", uid.clone()))
            .collect()
            .await
            .map_err(|e| {
                problem_http_error(&ProblemDetails::internal_error(format!(
                    "Database error: {e}"
                )))
            })?
            .into_iter()
            .next();

        Ok(Json(doc.as_ref().map(profile_from_doc)))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (user_id, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Fetch a user's role assignment, `null` when none was provisioned.
#[get("/api/users/:user_id/role", headers: HeaderMap)]
#[middleware(api_cors_layer())]
pub async fn get_role(user_id: String) -> Result<Json<Option<Role>>, HttpError> {
    #[cfg(feature = "server")]
    {
        crate::server::auth::require_bearer_user(&headers)?;

        let db = &*crate::DB;
        let uid = user_id.clone();
        let role = db
            .query("user_roles")
            .filter(move |f| f.eq("user_id", uid.clone()))
            .collect()
            .await
            .map_err(|e| {
                problem_http_error(&ProblemDetails::internal_error(format!(
                    "Database error: {e}"
                )))
            })?
            .into_iter()
            .next()
            .and_then(|doc| {
                doc.data
                    .get("role")
                    .and_then(|v: &aurora_db::Value| v.as_str())
                    .and_then(Role::parse)
            });

        Ok(Json(role))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (user_id, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Update the caller's own profile.
#[put("/api/me/profile", headers: HeaderMap)]
pub async fn update_my_profile(
    payload: Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, HttpError> {
    let payload = payload.0;

    #[cfg(feature = "server")]
    {
        let authed = crate::server::auth::require_bearer_user(&headers)?;

        let db = &*crate::DB;
        let uid = authed.user_id.clone();
        let doc = db
            .query("profiles")
            .filter(move |f| f.eq("id", uid.clone()))
            .collect()
            .await
            .map_err(|e| {
                problem_http_error(&ProblemDetails::internal_error(format!(
                    "Database error: {e}"
                )))
            })?
            .into_iter()
            .next()
            .ok_or_else(|| problem_http_error(&ProblemDetails::not_found("Profile not found")))?;

        let now = chrono::Utc::now().to_rfc3339();
        let mut data = Vec::<(&str, aurora_db::Value)>::new();
        if let Some(name) = payload.name {
            data.push(("name", name.into()));
        }
        if let Some(department) = payload.department {
            data.push(("department", department.into()));
        }
        if let Some(batch) = payload.batch {
            data.push(("batch", batch.into()));
        }
        if let Some(avatar_url) = payload.avatar_url {
            data.push(("avatar_url", avatar_url.into()));
        }
        data.push(("updated_at", now.into()));

        db.update_document("profiles", &doc.id, data)
            .await
            .map_err(|e| {
                problem_http_error(&ProblemDetails::internal_error(format!(
                    "Database error: {e}"
                )))
            })?;

        let uid = authed.user_id.clone();
        let updated = db
            .query("profiles")
            .filter(move |f| f.eq("id", uid.clone()))
            .collect()
            .await
            .map_err(|e| {
                problem_http_error(&ProblemDetails::internal_error(format!(
                    "Database error: {e}"
                )))
            })?
            .into_iter()
            .next()
            .ok_or_else(|| problem_http_error(&ProblemDetails::not_found("Profile not found")))?;

        Ok(Json(profile_from_doc(&updated)))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (payload, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// All student profiles, for the admin console.
#[get("/api/students", headers: HeaderMap)]
pub async fn list_students() -> Result<Json<Vec<Profile>>, HttpError> {
    #[cfg(feature = "server")]
    {
        crate::server::auth::require_admin(&headers).await?;

        let db = &*crate::DB;
        let student_ids: std::collections::HashSet<String> = db
            .query("user_roles")
            .filter(|f| f.eq("role", "student".to_string()))
            .collect()
            .await
            .map_err(|e| {
                problem_http_error(&ProblemDetails::internal_error(format!(
                    "Database error: {e}"
                )))
            })?
            .into_iter()
            .filter_map(|doc| {
                doc.data
                    .get("user_id")
                    .and_then(|v: &aurora_db::Value| v.as_str())
                    .map(|s| s.to_string())
            })
            .collect();

        let mut students: Vec<Profile> = db
            .query("profiles")
            .collect()
            .await
            .map_err(|e| {
                problem_http_error(&ProblemDetails::internal_error(format!(
                    "Database error: {e}"
                )))
            })?
            .iter()
            .map(profile_from_doc)
            .filter(|p| student_ids.contains(&p.id))
            .collect();

        students.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Json(students))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = headers;
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}
