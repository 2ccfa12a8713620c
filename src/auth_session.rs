//! Session context for the UI: wires the session store to Dioxus signals.

use std::rc::Rc;

use dioxus::prelude::*;
use futures_util::future::LocalBoxFuture;

use crate::api_client::ApiClient;
use crate::auth_client::{PortalAuthBackend, PortalDirectory};
use crate::models::{Identity, Profile, RoleState};
use crate::session::{SessionConfig, SessionState, SessionStore, Spawner};

/// Defers work onto the UI task queue; the task runs after the current
/// event-handling turn unwinds.
struct UiSpawner;

impl Spawner for UiSpawner {
    fn defer(&self, task: LocalBoxFuture<'static, ()>) {
        spawn(task);
    }
}

/// Handle stored in context. The signal mirrors every store notification,
/// so components re-render on session changes.
#[derive(Clone)]
pub struct SessionHandle {
    pub store: SessionStore,
    pub backend: Rc<PortalAuthBackend>,
    pub state: Signal<SessionState>,
}

impl SessionHandle {
    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    pub fn initialized(&self) -> bool {
        self.state.read().initialized
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn role(&self) -> RoleState {
        self.state.read().role
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.read().identity.clone()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.state.read().profile.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().access_token()
    }

    /// An API client carrying the current session's bearer token.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.token())
    }
}

pub fn use_session() -> SessionHandle {
    use_context::<SessionHandle>()
}

/// Provider component that sets up the session context.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut state = use_signal(SessionState::empty);

    let handle = use_hook(|| {
        let backend = Rc::new(PortalAuthBackend::new());
        let directory = Rc::new(PortalDirectory::new(backend.clone()));
        let store = SessionStore::new(
            backend.clone(),
            directory,
            Rc::new(UiSpawner),
            SessionConfig::default(),
        );
        store.subscribe(move |s| {
            let mut state = state;
            state.set(s.clone());
        });
        SessionHandle {
            store,
            backend,
            state,
        }
    });

    let ctx = handle.clone();
    use_context_provider(move || ctx);

    use_future(move || {
        let store = handle.store.clone();
        async move {
            store.initialize().await;
        }
    });

    children
}
