//! Auth provider implementation backed by the portal's `/api/auth` surface,
//! with localStorage persistence in the browser.

use std::cell::RefCell;

use async_trait::async_trait;
use dioxus::logger::tracing;

use crate::api_client::{ApiClient, ApiError};
use crate::models::{SessionTokens, SignupRequest};
use crate::problem::EMAIL_TAKEN_TYPE;
use crate::session::{AuthBackend, AuthError, AuthEvent, AuthListener, SignupOutcome};

const STORAGE_KEY: &str = "placementcell_session";

pub struct PortalAuthBackend {
    session: RefCell<Option<SessionTokens>>,
    listeners: RefCell<Vec<AuthListener>>,
}

impl PortalAuthBackend {
    /// Load any persisted session; the expiry check happens lazily in
    /// `current_session`.
    pub fn new() -> Self {
        Self {
            session: RefCell::new(load_persisted()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    fn store_session(&self, tokens: SessionTokens) {
        *self.session.borrow_mut() = Some(tokens.clone());
        persist(Some(&tokens));
        self.dispatch(AuthEvent::SignedIn(tokens));
    }

    fn clear_session(&self) {
        let had_session = self.session.borrow_mut().take().is_some();
        persist(None);
        if had_session {
            self.dispatch(AuthEvent::SignedOut);
        }
    }

    /// Dispatch runs with the listener list borrowed; listeners must defer
    /// any call back into this backend to the next turn.
    fn dispatch(&self, event: AuthEvent) {
        for listener in self.listeners.borrow().iter() {
            listener(&event);
        }
    }

    pub(crate) fn bearer(&self) -> Option<String> {
        self.session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Complete a federated login with the code Google appended to the
    /// redirect back to `/auth`.
    pub async fn exchange_google_code(&self, code: &str) -> Result<(), AuthError> {
        let client = ApiClient::new(None);
        let tokens: SessionTokens = client
            .post_json(
                "/api/auth/google/exchange",
                &crate::auth::GoogleExchangeRequest {
                    code: code.to_string(),
                },
            )
            .await
            .map_err(credential_error)?;

        self.store_session(tokens);
        Ok(())
    }
}

impl Default for PortalAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl AuthBackend for PortalAuthBackend {
    fn on_session_change(&self, listener: AuthListener) {
        self.listeners.borrow_mut().push(listener);
    }

    async fn current_session(&self) -> Option<SessionTokens> {
        let session = self.session.borrow().clone();
        match session {
            Some(s) if s.is_expired(chrono::Utc::now()) => {
                // Expiry counts as a provider-signaled sign-out.
                self.clear_session();
                None
            }
            other => other,
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let client = ApiClient::new(None);
        let tokens: SessionTokens = client
            .post_json(
                "/api/auth/login",
                &crate::models::LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await
            .map_err(credential_error)?;

        self.store_session(tokens);
        Ok(())
    }

    async fn sign_up(&self, req: SignupRequest) -> Result<SignupOutcome, AuthError> {
        let client = ApiClient::new(None);
        let tokens: SessionTokens =
            client
                .post_json("/api/auth/signup", &req)
                .await
                .map_err(|err| {
                    if err.is_problem(EMAIL_TAKEN_TYPE) {
                        AuthError::EmailTaken
                    } else {
                        credential_error(err)
                    }
                })?;

        self.store_session(tokens);
        Ok(SignupOutcome::SessionIssued)
    }

    async fn sign_in_with_google(&self) -> Result<(), AuthError> {
        let client = ApiClient::new(None);
        let target: crate::models::GoogleLoginUrl = client
            .get_json("/api/auth/google/url")
            .await
            .map_err(credential_error)?;

        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(&target.url);
            }
            Ok(())
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = target;
            Err(AuthError::Provider(
                "Google sign-in needs a browser".to_string(),
            ))
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(token) = self.bearer() {
            let client = ApiClient::new(Some(token));
            if let Err(err) = client.post_json::<_, ()>("/api/auth/logout", &()).await {
                tracing::warn!("Server-side sign-out failed: {}", err);
            }
        }
        self.clear_session();
        Ok(())
    }
}

/// Profile/role reads for the resolver, authenticated with whatever
/// session the backend currently holds.
pub struct PortalDirectory {
    auth: std::rc::Rc<PortalAuthBackend>,
}

impl PortalDirectory {
    pub fn new(auth: std::rc::Rc<PortalAuthBackend>) -> Self {
        Self { auth }
    }
}

#[async_trait(?Send)]
impl crate::session::Directory for PortalDirectory {
    async fn fetch_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<crate::models::Profile>, String> {
        let client = ApiClient::new(self.auth.bearer());
        client
            .get_json(&format!("/api/users/{user_id}/profile"))
            .await
            .map_err(|e| e.to_string())
    }

    async fn fetch_role(&self, user_id: &str) -> Result<Option<crate::models::Role>, String> {
        let client = ApiClient::new(self.auth.bearer());
        client
            .get_json(&format!("/api/users/{user_id}/role"))
            .await
            .map_err(|e| e.to_string())
    }
}

fn credential_error(err: ApiError) -> AuthError {
    match err {
        ApiError::Http { .. } => AuthError::Credentials(err.user_message()),
        other => AuthError::Provider(other.to_string()),
    }
}

// `web_sys` is only available in the wasm32/web build.

#[cfg(target_arch = "wasm32")]
fn load_persisted() -> Option<SessionTokens> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    let data = storage.get_item(STORAGE_KEY).ok()??;
    serde_json::from_str(&data).ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn load_persisted() -> Option<SessionTokens> {
    None
}

#[cfg(target_arch = "wasm32")]
fn persist(session: Option<&SessionTokens>) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            match session {
                Some(tokens) => {
                    if let Ok(data) = serde_json::to_string(tokens) {
                        let _ = storage.set_item(STORAGE_KEY, &data);
                    }
                }
                None => {
                    let _ = storage.remove_item(STORAGE_KEY);
                }
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn persist(_session: Option<&SessionTokens>) {}
