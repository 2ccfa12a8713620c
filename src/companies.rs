use dioxus::logger::tracing;
use dioxus_fullstack::{delete, get, post, put, HeaderMap, HttpError, Json};

use crate::models::{
    ChangeOp, Company, CreateDriveRequest, DriveStatus, Eligibility, SelectionStep,
    UpdateDriveRequest, WatchedTable,
};
use crate::problem::{problem_http_error, ProblemDetails};

#[cfg(feature = "server")]
fn db_error(e: impl std::fmt::Display) -> HttpError {
    problem_http_error(&ProblemDetails::internal_error(format!("Database error: {e}")))
}

#[cfg(feature = "server")]
fn parse_datetime(s: Option<&str>) -> chrono::DateTime<chrono::Utc> {
    s.and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap_or_else(chrono::Utc::now)
}

#[cfg(feature = "server")]
fn company_from_doc(doc: &aurora_db::Document, registration_count: u64) -> Company {
    let field = |name: &str| {
        doc.data
            .get(name)
            .and_then(|v: &aurora_db::Value| v.as_str())
            .unwrap_or("")
            .to_string()
    };

    let eligibility: Option<Eligibility> = doc
        .data
        .get("eligibility")
        .and_then(|v: &aurora_db::Value| v.as_str())
        .filter(|s| !s.is_empty())
        .and_then(|s| serde_json::from_str(s).ok());

    let selection_process: Vec<SelectionStep> = doc
        .data
        .get("selection_process")
        .and_then(|v: &aurora_db::Value| v.as_str())
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default();

    Company {
        id: field("id"),
        name: field("name"),
        location: field("location"),
        role_title: field("role_title"),
        ctc: field("ctc"),
        drive_date: field("drive_date"),
        status: DriveStatus::parse(&field("status")).unwrap_or(DriveStatus::Upcoming),
        description: Some(field("description")).filter(|s| !s.is_empty()),
        eligibility,
        selection_process,
        created_by: Some(field("created_by")).filter(|s| !s.is_empty()),
        created_at: parse_datetime(
            doc.data
                .get("created_at")
                .and_then(|v: &aurora_db::Value| v.as_str()),
        ),
        updated_at: parse_datetime(
            doc.data
                .get("updated_at")
                .and_then(|v: &aurora_db::Value| v.as_str()),
        ),
        registration_count,
    }
}

#[cfg(feature = "server")]
async fn registration_count_for(company_id: &str) -> Result<u64, HttpError> {
    let db = &*crate::DB;
    let cid = company_id.to_string();
    let count = db
        .query("registrations")
        .filter(move |f| f.eq("company_id", cid.clone()))
        .collect()
        .await
        .map(|docs| docs.len() as u64)
        .map_err(db_error)?;
    Ok(count)
}

/// List all drives, ordered by drive date, each with its registration count.
#[get("/api/companies", headers: HeaderMap)]
pub async fn list_companies() -> Result<Json<Vec<Company>>, HttpError> {
    #[cfg(feature = "server")]
    {
        crate::server::auth::require_bearer_user(&headers)?;

        let db = &*crate::DB;
        let docs = db.query("companies").collect().await.map_err(db_error)?;

        let mut companies = Vec::with_capacity(docs.len());
        for doc in &docs {
            let id = doc
                .data
                .get("id")
                .and_then(|v: &aurora_db::Value| v.as_str())
                .unwrap_or("");
            let count = registration_count_for(id).await?;
            companies.push(company_from_doc(doc, count));
        }

        companies.sort_by(|a, b| a.drive_date.cmp(&b.drive_date));
        Ok(Json(companies))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = headers;
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Fetch a single drive; `null` when it does not exist.
#[get("/api/companies/:company_id", headers: HeaderMap)]
pub async fn get_company(company_id: String) -> Result<Json<Option<Company>>, HttpError> {
    #[cfg(feature = "server")]
    {
        crate::server::auth::require_bearer_user(&headers)?;

        let db = &*crate::DB;
        let cid = company_id.clone();
        let doc = db
            .query("companies")
            .filter(move |f| f.eq("id", cid.clone()))
            .collect()
            .await
            .map_err(db_error)?
            .into_iter()
            .next();

        match doc {
            Some(doc) => {
                let count = registration_count_for(&company_id).await?;
                Ok(Json(Some(company_from_doc(&doc, count))))
            }
            None => Ok(Json(None)),
        }
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (company_id, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Create a drive (admin only).
#[post("/api/companies", headers: HeaderMap)]
pub async fn create_company(
    payload: Json<CreateDriveRequest>,
) -> Result<Json<Company>, HttpError> {
    let payload = payload.0;

    if payload.name.trim().is_empty() {
        return Err(problem_http_error(&ProblemDetails::bad_request(
            "Company name is required",
        )));
    }

    #[cfg(feature = "server")]
    {
        let authed = crate::server::auth::require_admin(&headers).await?;
        tracing::info!("Creating drive: {}", payload.name);

        let db = &*crate::DB;
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let eligibility = payload
            .eligibility
            .as_ref()
            .and_then(|e| serde_json::to_string(e).ok())
            .unwrap_or_default();
        let selection_process =
            serde_json::to_string(&payload.selection_process).unwrap_or_else(|_| "[]".to_string());

        db.insert_into(
            "companies",
            vec![
                ("id", id.clone().into()),
                ("name", payload.name.trim().to_string().into()),
                ("location", payload.location.into()),
                ("role_title", payload.role_title.into()),
                ("ctc", payload.ctc.into()),
                ("drive_date", payload.drive_date.into()),
                ("status", payload.status.as_str().to_string().into()),
                ("description", payload.description.unwrap_or_default().into()),
                ("eligibility", eligibility.into()),
                ("selection_process", selection_process.into()),
                ("created_by", authed.user_id.clone().into()),
                ("updated_at", now.clone().into()),
                ("created_at", now.into()),
            ],
        )
        .await
        .map_err(db_error)?;

        crate::server::ws::publish_change(WatchedTable::Companies, ChangeOp::Insert, Some(id.clone()));

        let cid = id.clone();
        let doc = db
            .query("companies")
            .filter(move |f| f.eq("id", cid.clone()))
            .collect()
            .await
            .map_err(db_error)?
            .into_iter()
            .next()
            .ok_or_else(|| problem_http_error(&ProblemDetails::internal_error("Insert lost")))?;

        Ok(Json(company_from_doc(&doc, 0)))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = headers;
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Update a drive (admin only). Absent fields keep their current value.
#[put("/api/companies/:company_id", headers: HeaderMap)]
pub async fn update_company(
    company_id: String,
    payload: Json<UpdateDriveRequest>,
) -> Result<Json<Company>, HttpError> {
    let payload = payload.0;

    #[cfg(feature = "server")]
    {
        crate::server::auth::require_admin(&headers).await?;

        let db = &*crate::DB;
        let cid = company_id.clone();
        let doc = db
            .query("companies")
            .filter(move |f| f.eq("id", cid.clone()))
            .collect()
            .await
            .map_err(db_error)?
            .into_iter()
            .next()
            .ok_or_else(|| problem_http_error(&ProblemDetails::not_found("Drive not found")))?;

        let mut data = Vec::<(&str, aurora_db::Value)>::new();
        if let Some(name) = payload.name {
            data.push(("name", name.into()));
        }
        if let Some(location) = payload.location {
            data.push(("location", location.into()));
        }
        if let Some(role_title) = payload.role_title {
            data.push(("role_title", role_title.into()));
        }
        if let Some(ctc) = payload.ctc {
            data.push(("ctc", ctc.into()));
        }
        if let Some(drive_date) = payload.drive_date {
            data.push(("drive_date", drive_date.into()));
        }
        if let Some(status) = payload.status {
            data.push(("status", status.as_str().to_string().into()));
        }
        if let Some(description) = payload.description {
            data.push(("description", description.into()));
        }
        if let Some(eligibility) = payload.eligibility {
            let json = serde_json::to_string(&eligibility).unwrap_or_default();
            data.push(("eligibility", json.into()));
        }
        if let Some(selection_process) = payload.selection_process {
            let json = serde_json::to_string(&selection_process).unwrap_or_else(|_| "[]".to_string());
            data.push(("selection_process", json.into()));
        }
        data.push(("updated_at", chrono::Utc::now().to_rfc3339().into()));

        db.update_document("companies", &doc.id, data)
            .await
            .map_err(db_error)?;

        crate::server::ws::publish_change(
            WatchedTable::Companies,
            ChangeOp::Update,
            Some(company_id.clone()),
        );

        let cid = company_id.clone();
        let updated = db
            .query("companies")
            .filter(move |f| f.eq("id", cid.clone()))
            .collect()
            .await
            .map_err(db_error)?
            .into_iter()
            .next()
            .ok_or_else(|| problem_http_error(&ProblemDetails::not_found("Drive not found")))?;

        let count = registration_count_for(&company_id).await?;
        Ok(Json(company_from_doc(&updated, count)))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (company_id, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Delete a drive and its dependent rows (admin only).
#[delete("/api/companies/:company_id", headers: HeaderMap)]
pub async fn delete_company(company_id: String) -> Result<Json<()>, HttpError> {
    #[cfg(feature = "server")]
    {
        crate::server::auth::require_admin(&headers).await?;
        tracing::info!("Deleting drive: {}", company_id);

        let db = &*crate::DB;
        let cid = company_id.clone();
        let doc = db
            .query("companies")
            .filter(move |f| f.eq("id", cid.clone()))
            .collect()
            .await
            .map_err(db_error)?
            .into_iter()
            .next()
            .ok_or_else(|| problem_http_error(&ProblemDetails::not_found("Drive not found")))?;

        // No foreign keys here; cascade by hand.
        let cid = company_id.clone();
        for reg in db
            .query("registrations")
            .filter(move |f| f.eq("company_id", cid.clone()))
            .collect()
            .await
            .map_err(db_error)?
        {
            db.delete(&format!("registrations:{}", reg.id))
                .await
                .map_err(db_error)?;
        }
        let cid = company_id.clone();
        for msg in db
            .query("messages")
            .filter(move |f| f.eq("company_id", cid.clone()))
            .collect()
            .await
            .map_err(db_error)?
        {
            db.delete(&format!("messages:{}", msg.id))
                .await
                .map_err(db_error)?;
        }

        db.delete(&format!("companies:{}", doc.id))
            .await
            .map_err(db_error)?;

        crate::server::ws::publish_change(
            WatchedTable::Companies,
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
