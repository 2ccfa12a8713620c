//! Client-side session state machine.
//!
//! The store mirrors the auth provider's session, resolves the user's
//! profile and role as a deferred side effect, and publishes every state
//! change to its subscribers. It is built from injected parts (auth
//! backend, directory, spawner) so independent instances can be driven in
//! tests without a UI runtime.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use dioxus::logger::tracing;
use futures_util::future::LocalBoxFuture;

use crate::models::{Identity, Profile, Role, RoleState, SessionTokens, SignupRequest};

// --- Provider-facing contracts ---

/// A session transition announced by the auth backend.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(SessionTokens),
    SignedOut,
}

pub type AuthListener = Box<dyn Fn(&AuthEvent)>;

/// Error surfaced by auth operations. Always a value, never a panic; the
/// UI renders `message()` inline or as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Rejected credentials or an invalid request.
    Credentials(String),
    /// The signup email already has an account.
    EmailTaken,
    /// Transport or provider failure.
    Provider(String),
}

impl AuthError {
    pub fn message(&self) -> String {
        match self {
            AuthError::Credentials(msg) => msg.clone(),
            AuthError::EmailTaken => "An account with this email already exists".to_string(),
            AuthError::Provider(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    /// The account is live and a session was issued.
    SessionIssued,
    /// The provider wants the email confirmed before the first session.
    ConfirmationRequired,
}

/// The authentication provider as the session store sees it.
///
/// Listener contract: `on_session_change` callbacks may run while the
/// backend's internal state is still borrowed, so a listener must not call
/// back into the backend synchronously. Anything that needs the backend
/// again is posted to the next scheduler turn via [`Spawner`].
#[async_trait(?Send)]
pub trait AuthBackend {
    fn on_session_change(&self, listener: AuthListener);
    async fn current_session(&self) -> Option<SessionTokens>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError>;
    async fn sign_up(&self, req: SignupRequest) -> Result<SignupOutcome, AuthError>;
    async fn sign_in_with_google(&self) -> Result<(), AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Read side of the profile/role tables.
#[async_trait(?Send)]
pub trait Directory {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, String>;
    async fn fetch_role(&self, user_id: &str) -> Result<Option<Role>, String>;
}

/// Posts a task onto the event loop to run on the next turn.
pub trait Spawner {
    fn defer(&self, task: LocalBoxFuture<'static, ()>);
}

// --- Store ---

#[derive(Clone, PartialEq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub session: Option<SessionTokens>,
    pub profile: Option<Profile>,
    pub role: RoleState,
    pub is_loading: bool,
    pub initialized: bool,
}

impl SessionState {
    pub fn empty() -> Self {
        Self {
            identity: None,
            session: None,
            profile: None,
            role: RoleState::Unknown,
            is_loading: false,
            initialized: false,
        }
    }

    /// Derived, so it can never disagree with `identity`.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.access_token.clone())
    }
}

#[derive(Clone)]
pub struct SessionConfig {
    /// Role assumed when the directory has no assignment for the user.
    /// Fail-open on purpose; see DESIGN.md.
    pub fallback_role: Role,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fallback_role: Role::Student,
        }
    }
}

pub struct SessionStore {
    inner: Rc<Inner>,
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct Inner {
    auth: Rc<dyn AuthBackend>,
    directory: Rc<dyn Directory>,
    spawner: Rc<dyn Spawner>,
    config: SessionConfig,
    state: RefCell<SessionState>,
    subscribers: RefCell<Vec<Rc<dyn Fn(&SessionState)>>>,
    listener_installed: Cell<bool>,
    /// Bumped on every session transition; in-flight resolutions carry the
    /// value they started under and drop their result on mismatch.
    generation: Cell<u64>,
}

impl SessionStore {
    pub fn new(
        auth: Rc<dyn AuthBackend>,
        directory: Rc<dyn Directory>,
        spawner: Rc<dyn Spawner>,
        config: SessionConfig,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                auth,
                directory,
                spawner,
                config,
                state: RefCell::new(SessionState::empty()),
                subscribers: RefCell::new(Vec::new()),
                listener_installed: Cell::new(false),
                generation: Cell::new(0),
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes for the life of the store.
    pub fn subscribe(&self, callback: impl Fn(&SessionState) + 'static) {
        self.inner.subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// Wire up the provider and load any existing session.
    ///
    /// The change listener is registered before the snapshot request so a
    /// transition landing in between is never lost; if one does land, the
    /// stale snapshot is discarded instead of clobbering it. Calling this
    /// twice installs a single listener.
    pub async fn initialize(&self) {
        if !self.inner.listener_installed.replace(true) {
            let weak = Rc::downgrade(&self.inner);
            self.inner.auth.on_session_change(Box::new(move |event| {
                if let Some(inner) = weak.upgrade() {
                    Inner::apply_event(&inner, event);
                }
            }));
        }

        let generation_before = self.inner.generation.get();
        let snapshot = self.inner.auth.current_session().await;
        if self.inner.generation.get() == generation_before {
            Inner::apply_session(&self.inner, snapshot);
        }

        self.inner.state.borrow_mut().initialized = true;
        Inner::notify(&self.inner);
    }

    /// Delegate credential verification to the provider. On success the
    /// session-change notification updates state; callers must not expect
    /// `state()` to reflect the new session when this returns.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.set_loading(true);
        let result = self.inner.auth.sign_in(email, password).await;
        self.set_loading(false);
        result
    }

    pub async fn signup(&self, req: SignupRequest) -> Result<SignupOutcome, AuthError> {
        self.set_loading(true);
        let result = self.inner.auth.sign_up(req).await;
        self.set_loading(false);
        result
    }

    /// Kick off the federated redirect. The session, if any, arrives
    /// out-of-band after the redirect returns.
    pub async fn login_with_google(&self) -> Result<(), AuthError> {
        self.inner.auth.sign_in_with_google().await
    }

    /// Re-run profile/role resolution for the current identity, e.g. after
    /// the user edited their profile. No-op when signed out.
    pub fn refresh_directory(&self) {
        let identity = self.inner.state.borrow().identity.clone();
        let Some(identity) = identity else { return };

        let generation = self.inner.generation.get();
        let weak = Rc::downgrade(&self.inner);
        self.inner.spawner.defer(Box::pin(async move {
            let Some(inner) = weak.upgrade() else { return };
            Inner::resolve_profile_and_role(&inner, identity.id, generation).await;
        }));
    }

    /// Invalidate the provider session and reset every local field.
    pub async fn logout(&self) {
        if let Err(err) = self.inner.auth.sign_out().await {
            tracing::warn!("Provider sign-out failed: {}", err.message());
        }
        // The SignedOut notification normally clears state; resetting here
        // as well means a provider failure cannot leave a ghost session.
        Inner::apply_session(&self.inner, None);
    }

    fn set_loading(&self, loading: bool) {
        self.inner.state.borrow_mut().is_loading = loading;
        Inner::notify(&self.inner);
    }
}

impl Inner {
    fn apply_event(inner: &Rc<Inner>, event: &AuthEvent) {
        match event {
            AuthEvent::SignedIn(tokens) => Self::apply_session(inner, Some(tokens.clone())),
            AuthEvent::SignedOut => Self::apply_session(inner, None),
        }
    }

    /// Synchronous part of a session transition: identity and tokens flip
    /// immediately; profile/role resolution is posted to the next turn.
    fn apply_session(inner: &Rc<Inner>, tokens: Option<SessionTokens>) {
        let generation = inner.generation.get().wrapping_add(1);
        inner.generation.set(generation);

        {
            let mut state = inner.state.borrow_mut();
            match &tokens {
                Some(t) => {
                    let same_user = state.identity.as_ref().map(|i| i.id.as_str())
                        == Some(t.user.id.as_str());
                    state.identity = Some(t.user.clone());
                    state.session = Some(t.clone());
                    if !same_user {
                        state.profile = None;
                        state.role = RoleState::Unknown;
                    }
                }
                None => {
                    state.identity = None;
                    state.session = None;
                    state.profile = None;
                    state.role = RoleState::Unknown;
                }
            }
        }
        Self::notify(inner);

        if let Some(t) = tokens {
            // This runs inside the provider's change dispatch; the fetches
            // must not start until that call stack has unwound.
            let weak = Rc::downgrade(inner);
            let user_id = t.user.id.clone();
            inner.spawner.defer(Box::pin(async move {
                let Some(inner) = weak.upgrade() else { return };
                Inner::resolve_profile_and_role(&inner, user_id, generation).await;
            }));
        }
    }

    async fn resolve_profile_and_role(inner: &Rc<Inner>, user_id: String, generation: u64) {
        let profile = match inner.directory.fetch_profile(&user_id).await {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!("Profile fetch failed for {user_id}: {err}");
                None
            }
        };
        let role = match inner.directory.fetch_role(&user_id).await {
            Ok(role) => role,
            Err(err) => {
                tracing::warn!("Role fetch failed for {user_id}: {err}");
                None
            }
        };

        // The session may have changed while the fetches were in flight; a
        // stale result must not repopulate cleared state.
        if inner.generation.get() != generation {
            return;
        }
        {
            let mut state = inner.state.borrow_mut();
            if state.identity.as_ref().map(|i| i.id.as_str()) != Some(user_id.as_str()) {
                return;
            }
            state.profile = profile;
            state.role = RoleState::Resolved(role.unwrap_or(inner.config.fallback_role));
        }
        Self::notify(inner);
    }

    fn notify(inner: &Rc<Inner>) {
        let state = inner.state.borrow().clone();
        // Clone the list so a subscriber adding another subscriber does not
        // re-enter the borrow.
        let subscribers: Vec<_> = inner.subscribers.borrow().clone();
        for callback in subscribers {
            callback(&state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn tokens_for(user_id: &str, email: &str) -> SessionTokens {
        SessionTokens {
            access_token: format!("token-{user_id}"),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
            user: Identity {
                id: user_id.to_string(),
                email: email.to_string(),
            },
        }
    }

    #[derive(Default)]
    struct MockAuth {
        listeners: RefCell<Vec<AuthListener>>,
        snapshot: RefCell<Option<SessionTokens>>,
        /// Emitted while `current_session` is being answered, to simulate a
        /// transition landing between listener setup and the snapshot.
        emit_during_snapshot: RefCell<Option<AuthEvent>>,
        emit_on_sign_in: Cell<bool>,
    }

    impl MockAuth {
        fn emit(&self, event: AuthEvent) {
            for listener in self.listeners.borrow().iter() {
                listener(&event);
            }
        }

        fn listener_count(&self) -> usize {
            self.listeners.borrow().len()
        }
    }

    #[async_trait(?Send)]
    impl AuthBackend for MockAuth {
        fn on_session_change(&self, listener: AuthListener) {
            self.listeners.borrow_mut().push(listener);
        }

        async fn current_session(&self) -> Option<SessionTokens> {
            if let Some(event) = self.emit_during_snapshot.borrow_mut().take() {
                self.emit(event);
            }
            self.snapshot.borrow().clone()
        }

        async fn sign_in(&self, email: &str, _password: &str) -> Result<(), AuthError> {
            if self.emit_on_sign_in.get() {
                self.emit(AuthEvent::SignedIn(tokens_for("user-1", email)));
            }
            Ok(())
        }

        async fn sign_up(&self, _req: SignupRequest) -> Result<SignupOutcome, AuthError> {
            Ok(SignupOutcome::SessionIssued)
        }

        async fn sign_in_with_google(&self) -> Result<(), AuthError> {
            Ok(())
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            self.emit(AuthEvent::SignedOut);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDirectory {
        profile: RefCell<Option<Profile>>,
        role: RefCell<Option<Role>>,
        fail: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl Directory for MockDirectory {
        async fn fetch_profile(&self, _user_id: &str) -> Result<Option<Profile>, String> {
            if self.fail.get() {
                return Err("directory offline".to_string());
            }
            Ok(self.profile.borrow().clone())
        }

        async fn fetch_role(&self, _user_id: &str) -> Result<Option<Role>, String> {
            if self.fail.get() {
                return Err("directory offline".to_string());
            }
            Ok(*self.role.borrow())
        }
    }

    /// Queues deferred tasks; nothing runs until the test drains them.
    #[derive(Default)]
    struct ManualSpawner {
        queue: RefCell<VecDeque<LocalBoxFuture<'static, ()>>>,
    }

    impl ManualSpawner {
        async fn drain(&self) {
            loop {
                let Some(task) = self.queue.borrow_mut().pop_front() else {
                    break;
                };
                task.await;
            }
        }
    }

    impl Spawner for ManualSpawner {
        fn defer(&self, task: LocalBoxFuture<'static, ()>) {
            self.queue.borrow_mut().push_back(task);
        }
    }

    struct Harness {
        auth: Rc<MockAuth>,
        directory: Rc<MockDirectory>,
        spawner: Rc<ManualSpawner>,
        store: SessionStore,
    }

    fn harness_with(config: SessionConfig) -> Harness {
        let auth = Rc::new(MockAuth::default());
        let directory = Rc::new(MockDirectory::default());
        let spawner = Rc::new(ManualSpawner::default());
        let store = SessionStore::new(
            auth.clone(),
            directory.clone(),
            spawner.clone(),
            config,
        );
        Harness {
            auth,
            directory,
            spawner,
            store,
        }
    }

    fn harness() -> Harness {
        harness_with(SessionConfig::default())
    }

    #[tokio::test]
    async fn authenticated_exactly_when_identity_present() {
        let h = harness();
        h.store.initialize().await;

        // Every published snapshot must satisfy the invariant, not just the
        // final one.
        let violations = Rc::new(Cell::new(0u32));
        let seen = violations.clone();
        h.store.subscribe(move |state| {
            if state.is_authenticated() != state.identity.is_some() {
                seen.set(seen.get() + 1);
            }
        });

        h.auth
            .emit(AuthEvent::SignedIn(tokens_for("user-1", "s@example.com")));
        assert!(h.store.state().is_authenticated());
        assert!(h.store.state().identity.is_some());

        h.auth.emit(AuthEvent::SignedOut);
        assert!(!h.store.state().is_authenticated());
        assert!(h.store.state().identity.is_none());

        h.spawner.drain().await;
        assert_eq!(violations.get(), 0);
    }

    #[tokio::test]
    async fn double_initialize_installs_one_listener() {
        let h = harness();
        futures_util::future::join(h.store.initialize(), h.store.initialize()).await;

        assert_eq!(h.auth.listener_count(), 1);
        assert!(h.store.state().initialized);
    }

    #[tokio::test]
    async fn transition_during_snapshot_fetch_is_not_lost() {
        let h = harness();
        *h.auth.emit_during_snapshot.borrow_mut() =
            Some(AuthEvent::SignedIn(tokens_for("user-1", "s@example.com")));
        // The snapshot itself still answers "no session".
        *h.auth.snapshot.borrow_mut() = None;

        h.store.initialize().await;

        // The event observed mid-initialize wins over the stale snapshot.
        assert!(h.store.state().is_authenticated());
        assert!(h.store.state().initialized);
    }

    #[tokio::test]
    async fn login_state_arrives_via_notification_not_return() {
        let h = harness();
        h.store.initialize().await;

        h.auth.emit_on_sign_in.set(false);
        h.store.login("s@example.com", "pw").await.unwrap();
        assert!(
            !h.store.state().is_authenticated(),
            "login() resolving must not imply the session landed"
        );

        h.auth.emit_on_sign_in.set(true);
        h.store.login("s@example.com", "pw").await.unwrap();
        assert!(h.store.state().is_authenticated());
    }

    #[tokio::test]
    async fn role_is_pending_until_deferred_resolution_runs() {
        let h = harness();
        *h.directory.role.borrow_mut() = Some(Role::Admin);
        h.store.initialize().await;

        h.auth
            .emit(AuthEvent::SignedIn(tokens_for("user-1", "a@example.com")));
        assert_eq!(h.store.state().role, RoleState::Unknown);

        h.spawner.drain().await;
        assert_eq!(h.store.state().role, RoleState::Resolved(Role::Admin));
    }

    #[tokio::test]
    async fn missing_role_defaults_to_configured_fallback() {
        let h = harness_with(SessionConfig {
            fallback_role: Role::Student,
        });
        h.store.initialize().await;

        h.auth
            .emit(AuthEvent::SignedIn(tokens_for("user-1", "s@example.com")));
        h.spawner.drain().await;

        assert_eq!(h.store.state().role, RoleState::Resolved(Role::Student));
    }

    #[tokio::test]
    async fn resolution_errors_degrade_quietly() {
        let h = harness();
        h.directory.fail.set(true);
        h.store.initialize().await;

        h.auth
            .emit(AuthEvent::SignedIn(tokens_for("user-1", "s@example.com")));
        h.spawner.drain().await;

        let state = h.store.state();
        assert!(state.profile.is_none());
        assert_eq!(state.role, RoleState::Resolved(Role::Student));
        assert!(state.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_every_field() {
        let h = harness();
        *h.directory.role.borrow_mut() = Some(Role::Student);
        h.store.initialize().await;

        h.auth
            .emit(AuthEvent::SignedIn(tokens_for("user-1", "s@example.com")));
        h.spawner.drain().await;

        h.store.logout().await;
        let state = h.store.state();
        assert!(state.identity.is_none());
        assert!(state.session.is_none());
        assert!(state.profile.is_none());
        assert_eq!(state.role, RoleState::Unknown);
        assert!(!state.is_authenticated());
    }

    #[tokio::test]
    async fn stale_resolution_cannot_repopulate_after_logout() {
        let h = harness();
        *h.directory.role.borrow_mut() = Some(Role::Admin);
        h.store.initialize().await;

        h.auth
            .emit(AuthEvent::SignedIn(tokens_for("user-1", "a@example.com")));
        // Logout lands while the resolution is still queued.
        h.store.logout().await;
        h.spawner.drain().await;

        let state = h.store.state();
        assert!(state.identity.is_none());
        assert!(state.profile.is_none());
        assert_eq!(state.role, RoleState::Unknown);
    }
}
