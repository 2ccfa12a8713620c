//! Data hooks: cached queries plus mutation helpers that invalidate the
//! affected queries and surface failures as toasts.

use std::future::Future;

use dioxus::prelude::*;

use crate::api_client::{ApiClient, ApiError};
use crate::auth_session::use_session;
use crate::models::{
    Company, CreateDriveRequest, DriveMessage, PinMessageRequest, Profile, Registration,
    RegistrationDetail, SendMessageRequest, UpdateDriveRequest, UpdateProfileRequest,
    UpdateRegistrationStatusRequest, WatchedTable,
};
use crate::problem::ALREADY_REGISTERED_TYPE;
use crate::queries::{use_query_client, QueryClient, QueryKey};
use crate::toasts::{toast_error, toast_success};

/// `use_resource` with a cache key: bumping the key's version re-runs the
/// fetch.
pub fn use_tracked_query<T, F, Fut>(key: QueryKey, mut fetch: F) -> Resource<Result<T, ApiError>>
where
    T: 'static,
    F: FnMut() -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let client = use_query_client();
    let version = client.version_signal(&key);
    use_resource(move || {
        let _generation = *version.read();
        fetch()
    })
}

// --- Queries ---

pub fn use_drives() -> Resource<Result<Vec<Company>, ApiError>> {
    let session = use_session();
    use_tracked_query(QueryKey::Drives, move || {
        let client = session.client();
        async move { client.get_json("/api/companies").await }
    })
}

pub fn use_drive(company_id: String) -> Resource<Result<Option<Company>, ApiError>> {
    let session = use_session();
    use_tracked_query(QueryKey::Drive(company_id.clone()), move || {
        let client = session.client();
        let id = company_id.clone();
        async move { client.get_json(&format!("/api/companies/{id}")).await }
    })
}

pub fn use_my_registrations() -> Resource<Result<Vec<Registration>, ApiError>> {
    let session = use_session();
    use_tracked_query(QueryKey::MyRegistrations, move || {
        let client = session.client();
        async move { client.get_json("/api/me/registrations").await }
    })
}

pub fn use_all_registrations() -> Resource<Result<Vec<RegistrationDetail>, ApiError>> {
    let session = use_session();
    use_tracked_query(QueryKey::AllRegistrations, move || {
        let client = session.client();
        async move { client.get_json("/api/registrations").await }
    })
}

pub fn use_drive_messages(company_id: String) -> Resource<Result<Vec<DriveMessage>, ApiError>> {
    let session = use_session();
    use_tracked_query(QueryKey::Messages(company_id.clone()), move || {
        let client = session.client();
        let id = company_id.clone();
        async move { client.get_json(&format!("/api/companies/{id}/messages")).await }
    })
}

pub fn use_students() -> Resource<Result<Vec<Profile>, ApiError>> {
    let session = use_session();
    use_tracked_query(QueryKey::Students, move || {
        let client = session.client();
        async move { client.get_json("/api/students").await }
    })
}

// --- Mutations ---

/// The duplicate-registration conflict gets its own message; everything
/// else falls through to the generic handler.
pub fn registration_error_message(err: &ApiError) -> String {
    if err.is_problem(ALREADY_REGISTERED_TYPE) {
        "You are already registered for this drive".to_string()
    } else {
        err.user_message()
    }
}

pub async fn register_for_drive(
    client: ApiClient,
    queries: QueryClient,
    company_id: &str,
) -> Result<Registration, ApiError> {
    let result: Result<Registration, ApiError> = client
        .post_json(&format!("/api/companies/{company_id}/registrations"), &())
        .await;

    match &result {
        Ok(_) => {
            queries.apply_change(WatchedTable::Registrations, Some(company_id));
            toast_success("Successfully registered for the drive!");
        }
        Err(err) => toast_error(registration_error_message(err)),
    }
    result
}

pub async fn unregister_from_drive(
    client: ApiClient,
    queries: QueryClient,
    company_id: &str,
) -> Result<(), ApiError> {
    let result: Result<(), ApiError> = client
        .delete_json(&format!("/api/companies/{company_id}/registrations"))
        .await;

    match &result {
        Ok(()) => {
            queries.apply_change(WatchedTable::Registrations, Some(company_id));
            toast_success("Successfully unregistered from the drive");
        }
        Err(err) => toast_error(err.user_message()),
    }
    result
}

pub async fn create_drive(
    client: ApiClient,
    queries: QueryClient,
    req: &CreateDriveRequest,
) -> Result<Company, ApiError> {
    let result: Result<Company, ApiError> = client.post_json("/api/companies", req).await;

    match &result {
        Ok(company) => {
            queries.apply_change(WatchedTable::Companies, Some(&company.id));
            toast_success("Drive created successfully");
        }
        Err(err) => toast_error(err.user_message()),
    }
    result
}

pub async fn update_drive(
    client: ApiClient,
    queries: QueryClient,
    company_id: &str,
    req: &UpdateDriveRequest,
) -> Result<Company, ApiError> {
    let result: Result<Company, ApiError> = client
        .put_json(&format!("/api/companies/{company_id}"), req)
        .await;

    match &result {
        Ok(_) => {
            queries.apply_change(WatchedTable::Companies, Some(company_id));
            toast_success("Drive updated successfully");
        }
        Err(err) => toast_error(err.user_message()),
    }
    result
}

pub async fn delete_drive(
    client: ApiClient,
    queries: QueryClient,
    company_id: &str,
) -> Result<(), ApiError> {
    let result: Result<(), ApiError> = client
        .delete_json(&format!("/api/companies/{company_id}"))
        .await;

    match &result {
        Ok(()) => {
            queries.apply_change(WatchedTable::Companies, Some(company_id));
            toast_success("Drive deleted successfully");
        }
        Err(err) => toast_error(err.user_message()),
    }
    result
}

pub async fn send_drive_message(
    client: ApiClient,
    queries: QueryClient,
    company_id: &str,
    content: String,
) -> Result<DriveMessage, ApiError> {
    let result: Result<DriveMessage, ApiError> = client
        .post_json(
            &format!("/api/companies/{company_id}/messages"),
            &SendMessageRequest { content },
        )
        .await;

    match &result {
        Ok(_) => queries.apply_change(WatchedTable::Messages, Some(company_id)),
        Err(err) => toast_error(err.user_message()),
    }
    result
}

pub async fn set_message_pinned(
    client: ApiClient,
    queries: QueryClient,
    company_id: &str,
    message_id: &str,
    pinned: bool,
) -> Result<(), ApiError> {
    let result: Result<(), ApiError> = client
        .put_json(
            &format!("/api/messages/{message_id}/pin"),
            &PinMessageRequest { pinned },
        )
        .await;

    match &result {
        Ok(()) => {
            queries.apply_change(WatchedTable::Messages, Some(company_id));
            toast_success(if pinned { "Message pinned" } else { "Message unpinned" });
        }
        Err(err) => toast_error(err.user_message()),
    }
    result
}

pub async fn remove_message(
    client: ApiClient,
    queries: QueryClient,
    company_id: &str,
    message_id: &str,
) -> Result<(), ApiError> {
    let result: Result<(), ApiError> = client
        .delete_json(&format!("/api/messages/{message_id}"))
        .await;

    match &result {
        Ok(()) => {
            queries.apply_change(WatchedTable::Messages, Some(company_id));
            toast_success("Message deleted");
        }
        Err(err) => toast_error(err.user_message()),
    }
    result
}

pub async fn set_registration_status(
    client: ApiClient,
    queries: QueryClient,
    registration_id: &str,
    status: crate::models::ApplicationStatus,
) -> Result<Registration, ApiError> {
    let result: Result<Registration, ApiError> = client
        .put_json(
            &format!("/api/registrations/{registration_id}/status"),
            &UpdateRegistrationStatusRequest { status },
        )
        .await;

    match &result {
        Ok(reg) => {
            queries.apply_change(WatchedTable::Registrations, Some(&reg.company_id));
            toast_success("Application status updated");
        }
        Err(err) => toast_error(err.user_message()),
    }
    result
}

pub async fn save_profile(
    client: ApiClient,
    req: &UpdateProfileRequest,
) -> Result<Profile, ApiError> {
    let result: Result<Profile, ApiError> = client.put_json("/api/me/profile", req).await;

    match &result {
        Ok(_) => toast_success("Profile updated"),
        Err(err) => toast_error(err.user_message()),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ProblemDetails;

    fn http_error(problem: &ProblemDetails) -> ApiError {
        ApiError::Http {
            status: problem.status,
            body: serde_json::to_string(problem).unwrap(),
        }
    }

    #[test]
    fn duplicate_registration_gets_the_dedicated_message() {
        let err = http_error(&ProblemDetails::already_registered());
        assert_eq!(
            registration_error_message(&err),
            "You are already registered for this drive"
        );
    }

    #[test]
    fn other_conflicts_fall_through_to_their_own_detail() {
        let err = http_error(&ProblemDetails::bad_request("Drive is closed"));
        assert_eq!(registration_error_message(&err), "Drive is closed");
    }

    #[test]
    fn network_failures_keep_the_generic_message() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(
            registration_error_message(&err),
            "Network error: connection refused"
        );
    }
}
