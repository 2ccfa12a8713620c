//! Route gates. Both gates are pure functions of the session snapshot and
//! re-evaluate on every render; redirects happen silently, they are not
//! errors the user sees.

use dioxus::prelude::*;

use crate::auth_session::use_session;
use crate::models::{Role, RoleState};
use crate::session::SessionState;
use crate::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Render,
    ToLogin,
    ToHome(Role),
}

/// Home screen for a role.
pub fn home_route(role: Role) -> Route {
    match role {
        Role::Admin => Route::AdminDashboard {},
        Role::Student => Route::StudentDashboard {},
    }
}

/// Gate for screens that need a signed-in user, optionally restricted to an
/// allow-list of roles.
///
/// While the role is still `Unknown` the allow-list check is skipped: a
/// user whose role is mid-resolution is rendered, not bounced to a home
/// screen that may turn out to be the wrong one.
pub fn protected_gate(state: &SessionState, allowed: Option<&[Role]>) -> Gate {
    if !state.is_authenticated() {
        return Gate::ToLogin;
    }
    if let (Some(allowed), RoleState::Resolved(role)) = (allowed, state.role) {
        if !allowed.contains(&role) {
            return Gate::ToHome(role);
        }
    }
    Gate::Render
}

/// Gate for screens that only make sense signed-out (the auth page). An
/// authenticated user goes to their role's home; while the role is still
/// resolving the student home is assumed.
pub fn public_gate(state: &SessionState) -> Gate {
    if state.is_authenticated() {
        Gate::ToHome(state.role.resolved().unwrap_or(Role::Student))
    } else {
        Gate::Render
    }
}

#[component]
fn GateSpinner() -> Element {
    rsx! {
        div { class: "min-h-screen flex items-center justify-center bg-slate-50",
            div { class: "w-8 h-8 border-4 border-indigo-500 border-t-transparent rounded-full animate-spin" }
        }
    }
}

/// Wrapper admitting only authenticated users, optionally restricted by
/// role.
#[component]
pub fn Protected(#[props(optional)] allowed: Option<Vec<Role>>, children: Element) -> Element {
    let session = use_session();
    let nav = use_navigator();

    {
        let session = session.clone();
        let allowed = allowed.clone();
        use_effect(move || {
            let state = session.snapshot();
            if !state.initialized {
                return;
            }
            match protected_gate(&state, allowed.as_deref()) {
                Gate::ToLogin => {
                    nav.replace(Route::Auth {});
                }
                Gate::ToHome(role) => {
                    nav.replace(home_route(role));
                }
                Gate::Render => {}
            }
        });
    }

    let state = session.snapshot();
    if !state.initialized {
        return rsx! {
            GateSpinner {}
        };
    }

    match protected_gate(&state, allowed.as_deref()) {
        Gate::Render => rsx! {
            {children}
        },
        _ => rsx! {
            GateSpinner {}
        },
    }
}

/// Wrapper admitting only unauthenticated users.
#[component]
pub fn PublicOnly(children: Element) -> Element {
    let session = use_session();
    let nav = use_navigator();

    {
        let session = session.clone();
        use_effect(move || {
            let state = session.snapshot();
            if !state.initialized {
                return;
            }
            if let Gate::ToHome(role) = public_gate(&state) {
                nav.replace(home_route(role));
            }
        });
    }

    let state = session.snapshot();
    if !state.initialized {
        return rsx! {
            GateSpinner {}
        };
    }

    match public_gate(&state) {
        Gate::Render => rsx! {
            {children}
        },
        _ => rsx! {
            GateSpinner {}
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Identity, SessionTokens};

    fn anonymous() -> SessionState {
        let mut state = SessionState::empty();
        state.initialized = true;
        state
    }

    fn signed_in(role: RoleState) -> SessionState {
        let mut state = anonymous();
        let identity = Identity {
            id: "user-1".to_string(),
            email: "s@example.com".to_string(),
        };
        state.session = Some(SessionTokens {
            access_token: "token".to_string(),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
            user: identity.clone(),
        });
        state.identity = Some(identity);
        state.role = role;
        state
    }

    #[test]
    fn unauthenticated_user_is_sent_to_login() {
        let state = anonymous();
        assert_eq!(protected_gate(&state, None), Gate::ToLogin);
        assert_eq!(
            protected_gate(&state, Some(&[Role::Student])),
            Gate::ToLogin
        );
    }

    #[test]
    fn student_on_admin_screen_is_sent_to_student_home() {
        let state = signed_in(RoleState::Resolved(Role::Student));
        assert_eq!(
            protected_gate(&state, Some(&[Role::Admin])),
            Gate::ToHome(Role::Student)
        );
    }

    #[test]
    fn matching_role_renders() {
        let state = signed_in(RoleState::Resolved(Role::Admin));
        assert_eq!(protected_gate(&state, Some(&[Role::Admin])), Gate::Render);
    }

    #[test]
    fn pending_role_renders_instead_of_redirecting() {
        // Resolution is still in flight; an allow-list must not reject yet.
        let state = signed_in(RoleState::Unknown);
        assert_eq!(protected_gate(&state, Some(&[Role::Admin])), Gate::Render);
        assert_eq!(protected_gate(&state, Some(&[Role::Student])), Gate::Render);
    }

    #[test]
    fn no_allow_list_admits_any_authenticated_role() {
        for role in [
            RoleState::Unknown,
            RoleState::Resolved(Role::Admin),
            RoleState::Resolved(Role::Student),
        ] {
            assert_eq!(protected_gate(&signed_in(role), None), Gate::Render);
        }
    }

    #[test]
    fn auth_page_redirects_signed_in_users_to_their_home() {
        assert_eq!(
            public_gate(&signed_in(RoleState::Resolved(Role::Admin))),
            Gate::ToHome(Role::Admin)
        );
        assert_eq!(
            public_gate(&signed_in(RoleState::Resolved(Role::Student))),
            Gate::ToHome(Role::Student)
        );
        // Unknown role defaults to the student home.
        assert_eq!(
            public_gate(&signed_in(RoleState::Unknown)),
            Gate::ToHome(Role::Student)
        );
    }

    #[test]
    fn auth_page_renders_for_anonymous_users() {
        assert_eq!(public_gate(&anonymous()), Gate::Render);
    }
}
