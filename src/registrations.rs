use dioxus::logger::tracing;
use dioxus_fullstack::{delete, get, post, put, HeaderMap, HttpError, Json};

use crate::models::{
    ApplicationStatus, ChangeOp, Registration, RegistrationDetail, UpdateRegistrationStatusRequest,
    WatchedTable,
};
use crate::problem::{problem_http_error, ProblemDetails};

#[cfg(feature = "server")]
fn db_error(e: impl std::fmt::Display) -> HttpError {
    problem_http_error(&ProblemDetails::internal_error(format!("Database error: {e}")))
}

#[cfg(feature = "server")]
fn registration_from_doc(doc: &aurora_db::Document) -> Registration {
    let field = |name: &str| {
        doc.data
            .get(name)
            .and_then(|v: &aurora_db::Value| v.as_str())
            .unwrap_or("")
            .to_string()
    };
    let ts = |name: &str| {
        doc.data
            .get(name)
            .and_then(|v: &aurora_db::Value| v.as_str())
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .unwrap_or_else(chrono::Utc::now)
    };

    Registration {
        id: field("id"),
        user_id: field("user_id"),
        company_id: field("company_id"),
        status: ApplicationStatus::parse(&field("status"))
            .unwrap_or(ApplicationStatus::Registered),
        created_at: ts("created_at"),
        updated_at: ts("updated_at"),
    }
}

/// Register the caller for a drive. The (user, drive) pair is unique; a
/// second attempt gets the dedicated conflict problem, not a generic error.
#[post("/api/companies/:company_id/registrations", headers: HeaderMap)]
pub async fn register_for_drive(company_id: String) -> Result<Json<Registration>, HttpError> {
    #[cfg(feature = "server")]
    {
        let authed = crate::server::auth::require_bearer_user(&headers)?;

        let db = &*crate::DB;

        let cid = company_id.clone();
        let company_exists = db
            .query("companies")
            .filter(move |f| f.eq("id", cid.clone()))
            .collect()
            .await
            .map(|docs| !docs.is_empty())
            .map_err(db_error)?;
        if !company_exists {
            return Err(problem_http_error(&ProblemDetails::not_found(
                "Drive not found",
            )));
        }

        // Uniqueness check before insert; the pair is the key.
        let cid = company_id.clone();
        let uid = authed.user_id.clone();
        let already = db
            .query("registrations")
            .filter(move |f| f.eq("company_id", cid.clone()) & f.eq("user_id", uid.clone()))
            .collect()
            .await
            .map(|docs| !docs.is_empty())
            .map_err(db_error)?;
        if already {
            return Err(problem_http_error(&ProblemDetails::already_registered()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        db.insert_into(
            "registrations",
            vec![
                ("id", id.clone().into()),
                ("user_id", authed.user_id.clone().into()),
                ("company_id", company_id.clone().into()),
                (
                    "status",
                    ApplicationStatus::Registered.as_str().to_string().into(),
                ),
                ("updated_at", now.clone().into()),
                ("created_at", now.into()),
            ],
        )
        .await
        .map_err(db_error)?;

        tracing::info!(
            "User {} registered for drive {}",
            authed.user_id,
            company_id
        );
        crate::server::ws::publish_change(
            WatchedTable::Registrations,
            ChangeOp::Insert,
            Some(company_id.clone()),
        );

        let rid = id.clone();
        let doc = db
            .query("registrations")
            .filter(move |f| f.eq("id", rid.clone()))
            .collect()
            .await
            .map_err(db_error)?
            .into_iter()
            .next()
            .ok_or_else(|| problem_http_error(&ProblemDetails::internal_error("Insert lost")))?;

        Ok(Json(registration_from_doc(&doc)))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (company_id, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Withdraw the caller's registration for a drive.
#[delete("/api/companies/:company_id/registrations", headers: HeaderMap)]
pub async fn unregister_from_drive(company_id: String) -> Result<Json<()>, HttpError> {
    #[cfg(feature = "server")]
    {
        let authed = crate::server::auth::require_bearer_user(&headers)?;

        let db = &*crate::DB;
        let cid = company_id.clone();
        let uid = authed.user_id.clone();
        let docs = db
            .query("registrations")
            .filter(move |f| f.eq("company_id", cid.clone()) & f.eq("user_id", uid.clone()))
            .collect()
            .await
            .map_err(db_error)?;

        for doc in docs {
            db.delete(&format!("registrations:{}", doc.id))
                .await
                .map_err(db_error)?;
        }

        crate::server::ws::publish_change(
            WatchedTable::Registrations,
            ChangeOp::Delete,
            Some(company_id),
        );

        Ok(Json(()))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (company_id, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// The caller's registrations across all drives.
#[get("/api/me/registrations", headers: HeaderMap)]
pub async fn my_registrations() -> Result<Json<Vec<Registration>>, HttpError> {
    #[cfg(feature = "server")]
    {
        let authed = crate::server::auth::require_bearer_user(&headers)?;

        let db = &*crate::DB;
        let uid = authed.user_id.clone();
        let mut registrations: Vec<Registration> = db
            .query("registrations")
            .filter(move |f| f.eq("user_id", uid.clone()))
            .collect()
            .await
            .map_err(db_error)?
            .iter()
            .map(registration_from_doc)
            .collect();

        registrations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Json(registrations))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = headers;
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Every registration joined with student and drive details (admin only).
#[get("/api/registrations", headers: HeaderMap)]
pub async fn all_registrations() -> Result<Json<Vec<RegistrationDetail>>, HttpError> {
    #[cfg(feature = "server")]
    {
        crate::server::auth::require_admin(&headers).await?;

        let db = &*crate::DB;
        let regs = db.query("registrations").collect().await.map_err(db_error)?;

        let mut details = Vec::with_capacity(regs.len());
        for doc in &regs {
            let registration = registration_from_doc(doc);

            let uid = registration.user_id.clone();
            let profile = db
                .query("profiles")
                .filter(move |f| f.eq("id", uid.clone()))
                .collect()
                .await
                .map_err(db_error)?
                .into_iter()
                .next();

            let cid = registration.company_id.clone();
            let company = db
                .query("companies")
                .filter(move |f| f.eq("id", cid.clone()))
                .collect()
                .await
                .map_err(db_error)?
                .into_iter()
                .next();

            let text = |doc: &Option<aurora_db::Document>, name: &str| {
                doc.as_ref()
                    .and_then(|d| {
                        d.data
                            .get(name)
                            .and_then(|v: &aurora_db::Value| v.as_str())
                            .map(|s| s.to_string())
                    })
                    .unwrap_or_default()
            };

            details.push(RegistrationDetail {
                registration,
                student_name: text(&profile, "name"),
                student_email: text(&profile, "email"),
                department: Some(text(&profile, "department")).filter(|s| !s.is_empty()),
                batch: Some(text(&profile, "batch")).filter(|s| !s.is_empty()),
                company_name: text(&company, "name"),
                company_role: text(&company, "role_title"),
            });
        }

        details.sort_by(|a, b| b.registration.created_at.cmp(&a.registration.created_at));
        Ok(Json(details))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = headers;
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Move a registration through the selection pipeline (admin only).
#[put("/api/registrations/:registration_id/status", headers: HeaderMap)]
pub async fn update_registration_status(
    registration_id: String,
    payload: Json<UpdateRegistrationStatusRequest>,
) -> Result<Json<Registration>, HttpError> {
    let payload = payload.0;

    #[cfg(feature = "server")]
    {
        crate::server::auth::require_admin(&headers).await?;

        let db = &*crate::DB;
        let rid = registration_id.clone();
        let doc = db
            .query("registrations")
            .filter(move |f| f.eq("id", rid.clone()))
            .collect()
            .await
            .map_err(db_error)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                problem_http_error(&ProblemDetails::not_found("Registration not found"))
            })?;

        db.update_document(
            "registrations",
            &doc.id,
            vec![
                ("status", payload.status.as_str().to_string().into()),
                ("updated_at", chrono::Utc::now().to_rfc3339().into()),
            ],
        )
        .await
        .map_err(db_error)?;

        let registration = {
            let rid = registration_id.clone();
            db.query("registrations")
                .filter(move |f| f.eq("id", rid.clone()))
                .collect()
                .await
                .map_err(db_error)?
                .into_iter()
                .next()
                .map(|d| registration_from_doc(&d))
                .ok_or_else(|| {
                    problem_http_error(&ProblemDetails::not_found("Registration not found"))
                })?
        };

        crate::server::ws::publish_change(
            WatchedTable::Registrations,
            ChangeOp::Update,
            Some(registration.company_id.clone()),
        );

        Ok(Json(registration))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (registration_id, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}
