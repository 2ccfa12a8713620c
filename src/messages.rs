use dioxus::logger::tracing;
use dioxus_fullstack::{delete, get, post, put, HeaderMap, HttpError, Json};

use crate::models::{
    ChangeOp, DriveMessage, PinMessageRequest, Role, SendMessageRequest, WatchedTable,
};
use crate::problem::{problem_http_error, ProblemDetails};

#[cfg(feature = "server")]
fn db_error(e: impl std::fmt::Display) -> HttpError {
    problem_http_error(&ProblemDetails::internal_error(format!("Database error: {e}")))
}

/// Discussion ordering: pinned posts first, then oldest-to-newest, with the
/// id as a stable tiebreak.
pub fn sort_messages(messages: &mut [DriveMessage]) {
    messages.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(feature = "server")]
async fn message_from_doc(doc: &aurora_db::Document) -> DriveMessage {
    let field = |name: &str| {
        doc.data
            .get(name)
            .and_then(|v: &aurora_db::Value| v.as_str())
            .unwrap_or("")
            .to_string()
    };

    let user_id = field("user_id");
    let db = &*crate::DB;

    // Author details fetched per message; the discussion under one drive is
    // small enough that this stays cheap.
    let uid = user_id.clone();
    let author_name = db
        .query("profiles")
        .filter(move |f| f.eq("id", uid.clone()))
        .collect()
        .await
        .ok()
        .and_then(|docs| docs.into_iter().next())
        .and_then(|d| {
            d.data
                .get("name")
                .and_then(|v: &aurora_db::Value| v.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "Unknown User".to_string());

    let uid = user_id.clone();
    let author_role = db
        .query("user_roles")
        .filter(move |f| f.eq("user_id", uid.clone()))
        .collect()
        .await
        .ok()
        .and_then(|docs| docs.into_iter().next())
        .and_then(|d| {
            d.data
                .get("role")
                .and_then(|v: &aurora_db::Value| v.as_str())
                .and_then(Role::parse)
        });

    DriveMessage {
        id: field("id"),
        company_id: field("company_id"),
        user_id,
        content: field("content"),
        pinned: field("pinned") == "true",
        created_at: doc
            .data
            .get("created_at")
            .and_then(|v: &aurora_db::Value| v.as_str())
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .unwrap_or_else(chrono::Utc::now),
        author_name,
        author_role,
    }
}

/// Discussion thread for a drive, pinned-first.
#[get("/api/companies/:company_id/messages", headers: HeaderMap)]
pub async fn list_messages(company_id: String) -> Result<Json<Vec<DriveMessage>>, HttpError> {
    #[cfg(feature = "server")]
    {
        crate::server::auth::require_bearer_user(&headers)?;

        let db = &*crate::DB;
        let cid = company_id.clone();
        let docs = db
            .query("messages")
            .filter(move |f| f.eq("company_id", cid.clone()))
            .collect()
            .await
            .map_err(db_error)?;

        let mut messages = Vec::with_capacity(docs.len());
        for doc in &docs {
            messages.push(message_from_doc(doc).await);
        }
        sort_messages(&mut messages);

        Ok(Json(messages))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (company_id, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Post to a drive's discussion.
#[post("/api/companies/:company_id/messages", headers: HeaderMap)]
pub async fn send_message(
    company_id: String,
    payload: Json<SendMessageRequest>,
) -> Result<Json<DriveMessage>, HttpError> {
    let payload = payload.0;

    if payload.content.trim().is_empty() {
        return Err(problem_http_error(&ProblemDetails::bad_request(
            "Message cannot be empty",
        )));
    }

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

        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        db.insert_into(
            "messages",
            vec![
                ("id", id.clone().into()),
                ("company_id", company_id.clone().into()),
                ("user_id", authed.user_id.clone().into()),
                ("content", payload.content.trim().to_string().into()),
                ("pinned", "false".to_string().into()),
                ("created_at", now.into()),
            ],
        )
        .await
        .map_err(db_error)?;

        crate::server::ws::publish_change(
            WatchedTable::Messages,
            ChangeOp::Insert,
            Some(company_id),
        );

        let mid = id.clone();
        let doc = db
            .query("messages")
            .filter(move |f| f.eq("id", mid.clone()))
            .collect()
            .await
            .map_err(db_error)?
            .into_iter()
            .next()
            .ok_or_else(|| problem_http_error(&ProblemDetails::internal_error("Insert lost")))?;

        Ok(Json(message_from_doc(&doc).await))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (company_id, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Pin or unpin a post (admin moderation).
#[put("/api/messages/:message_id/pin", headers: HeaderMap)]
pub async fn pin_message(
    message_id: String,
    payload: Json<PinMessageRequest>,
) -> Result<Json<()>, HttpError> {
    let payload = payload.0;

    #[cfg(feature = "server")]
    {
        crate::server::auth::require_admin(&headers).await?;

        let db = &*crate::DB;
        let mid = message_id.clone();
        let doc = db
            .query("messages")
            .filter(move |f| f.eq("id", mid.clone()))
            .collect()
            .await
            .map_err(db_error)?
            .into_iter()
            .next()
            .ok_or_else(|| problem_http_error(&ProblemDetails::not_found("Message not found")))?;

        let pinned = if payload.pinned { "true" } else { "false" };
        db.update_document("messages", &doc.id, vec![("pinned", pinned.to_string().into())])
            .await
            .map_err(db_error)?;

        let company_id = doc
            .data
            .get("company_id")
            .and_then(|v: &aurora_db::Value| v.as_str())
            .map(|s| s.to_string());
        crate::server::ws::publish_change(WatchedTable::Messages, ChangeOp::Update, company_id);

        Ok(Json(()))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (message_id, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

/// Delete a post. Admins moderate anything; authors can remove their own.
#[delete("/api/messages/:message_id", headers: HeaderMap)]
pub async fn delete_message(message_id: String) -> Result<Json<()>, HttpError> {
    #[cfg(feature = "server")]
    {
        let authed = crate::server::auth::require_bearer_user(&headers)?;

        let db = &*crate::DB;
        let mid = message_id.clone();
        let doc = db
            .query("messages")
            .filter(move |f| f.eq("id", mid.clone()))
            .collect()
            .await
            .map_err(db_error)?
            .into_iter()
            .next()
            .ok_or_else(|| problem_http_error(&ProblemDetails::not_found("Message not found")))?;

        let author_id = doc
            .data
            .get("user_id")
            .and_then(|v: &aurora_db::Value| v.as_str())
            .unwrap_or("");

        if author_id != authed.user_id {
            crate::server::auth::require_admin(&headers).await?;
        }

        let company_id = doc
            .data
            .get("company_id")
            .and_then(|v: &aurora_db::Value| v.as_str())
            .map(|s| s.to_string());

        db.delete(&format!("messages:{}", doc.id))
            .await
            .map_err(db_error)?;

        tracing::info!("Message {} deleted by {}", message_id, authed.user_id);
        crate::server::ws::publish_change(WatchedTable::Messages, ChangeOp::Delete, company_id);

        Ok(Json(()))
    }
    #[cfg(not(feature = "server"))]
    {
        let _ = (message_id, headers);
        Err(problem_http_error(&ProblemDetails::internal_error(
            "Server feature not enabled",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn msg(id: &str, pinned: bool, minute: u32) -> DriveMessage {
        DriveMessage {
            id: id.to_string(),
            company_id: "drive-1".to_string(),
            user_id: "user-1".to_string(),
            content: "hello".to_string(),
            pinned,
            created_at: Utc.with_ymd_and_hms(2024, 10, 1, 9, minute, 0).unwrap(),
            author_name: "Some Student".to_string(),
            author_role: None,
        }
    }

    #[test]
    fn pinned_posts_sort_before_earlier_unpinned_posts() {
        // The pinned message was created later but must still lead.
        let mut messages = vec![msg("early-unpinned", false, 0), msg("late-pinned", true, 30)];
        sort_messages(&mut messages);

        assert_eq!(messages[0].id, "late-pinned");
        assert_eq!(messages[1].id, "early-unpinned");
    }

    #[test]
    fn unpinned_posts_stay_chronological() {
        let mut messages = vec![msg("b", false, 10), msg("c", false, 20), msg("a", false, 5)];
        sort_messages(&mut messages);

        let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn id_breaks_created_at_ties() {
        let mut messages = vec![msg("z", false, 10), msg("a", false, 10)];
        sort_messages(&mut messages);

        assert_eq!(messages[0].id, "a");
    }
}
