use dioxus::prelude::*;

use crate::auth_session::use_session;
use crate::components::ui::{Button, ButtonVariant, Card, CardBody, InputType, TextInput};
use crate::guards::PublicOnly;
use crate::models::{Role, SignupRequest};
use crate::session::AuthError;

#[component]
pub fn Auth() -> Element {
    rsx! {
        PublicOnly {
            AuthPage {}
        }
    }
}

#[component]
fn AuthPage() -> Element {
    let session = use_session();
    let mut login_mode = use_signal(|| true);
    let mut role = use_signal(|| Role::Student);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut name = use_signal(String::new);
    let mut department = use_signal(String::new);
    let mut batch = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_submitting = use_signal(|| false);

    // Returning from the Google redirect: `/auth?code=...` carries the
    // one-time code; adopting it emits the session-change that signs us in.
    use_future({
        let session = session.clone();
        move || {
            let session = session.clone();
            async move {
                let Some(code) = oauth_code_from_location() else {
                    return;
                };
                if let Err(err) = session.backend.exchange_google_code(&code).await {
                    crate::toasts::toast_error(err.message());
                }
            }
        }
    });

    let submit = {
        let session = session.clone();
        move |e: FormEvent| {
            e.prevent_default();
            if is_submitting() {
                return;
            }
            is_submitting.set(true);
            error.set(None);

            let session = session.clone();
            spawn(async move {
                let result: Result<(), AuthError> = if login_mode() {
                    let (email_value, password_value) = (email.cloned(), password.cloned());
                    session.store.login(&email_value, &password_value).await
                } else {
                    session
                        .store
                        .signup(SignupRequest {
                            email: email.cloned(),
                            password: password.cloned(),
                            name: name.cloned(),
                            role: role(),
                            department: Some(department.cloned()).filter(|s| !s.is_empty()),
                            batch: Some(batch.cloned()).filter(|s| !s.is_empty()),
                        })
                        .await
                        .map(|_| ())
                };

                if let Err(err) = result {
                    error.set(Some(err.message()));
                }
                // On success the session notification redirects us through
                // the public-only gate; nothing more to do here.
                is_submitting.set(false);
            });
        }
    };

    let google_login = {
        let session = session.clone();
        move |_| {
            let session = session.clone();
            spawn(async move {
                if let Err(err) = session.store.login_with_google().await {
                    error.set(Some(err.message()));
                }
            });
        }
    };

    rsx! {
        div { class: "min-h-screen flex bg-slate-50",
            // Hero panel
            div { class: "hidden lg:flex lg:w-1/2 relative overflow-hidden bg-gradient-to-br from-indigo-700 via-indigo-600 to-purple-700",
                div { class: "relative z-10 flex flex-col justify-between p-12 text-white w-full",
                    div { class: "flex items-center gap-3",
                        div { class: "w-10 h-10 rounded-xl bg-white/20 backdrop-blur flex items-center justify-center font-bold",
                            "PC"
                        }
                        span { class: "font-bold text-xl", "Placement Portal" }
                    }
                    div { class: "max-w-md",
                        h1 { class: "text-4xl font-bold leading-tight mb-4",
                            "Launch Your Career"
                            br {}
                            "With Confidence."
                        }
                        p { class: "text-white/80 text-lg",
                            "Access exclusive placement drives, track your applications, and connect with recruiters directly from your campus dashboard."
                        }
                    }
                    div { class: "flex gap-12",
                        div {
                            p { class: "text-3xl font-bold", "500+" }
                            p { class: "text-white/70 text-sm", "Companies Hiring" }
                        }
                        div {
                            p { class: "text-3xl font-bold", "92%" }
                            p { class: "text-white/70 text-sm", "Placement Rate" }
                        }
                    }
                }
            }

            // Form panel
            div { class: "flex-1 flex items-center justify-center p-8",
                div { class: "w-full max-w-md",
                    div { class: "text-center mb-8",
                        h2 { class: "text-3xl font-bold text-slate-900 mb-2", "Welcome Back" }
                        p { class: "text-slate-500",
                            "Please enter your details to access your dashboard."
                        }
                    }

                    // Login / signup switcher
                    div { class: "flex bg-slate-200 rounded-lg p-1 mb-6",
                        button {
                            class: format!(
                                "flex-1 py-2.5 text-sm font-medium rounded-md transition-all {}",
                                if login_mode() { "bg-white text-slate-900 shadow-sm" } else { "text-slate-500 hover:text-slate-900" },
                            ),
                            onclick: move |_| login_mode.set(true),
                            "Login"
                        }
                        button {
                            class: format!(
                                "flex-1 py-2.5 text-sm font-medium rounded-md transition-all {}",
                                if !login_mode() { "bg-white text-slate-900 shadow-sm" } else { "text-slate-500 hover:text-slate-900" },
                            ),
                            onclick: move |_| login_mode.set(false),
                            "Sign Up"
                        }
                    }

                    Card {
                        CardBody {
                            form { class: "space-y-4", onsubmit: submit,
                                if !login_mode() {
                                    div {
                                        label { class: "block text-sm font-medium text-slate-700 mb-2",
                                            "I am a"
                                        }
                                        select {
                                            class: "w-full rounded-lg bg-white text-slate-900 px-4 py-2.5 text-sm border border-slate-300 focus:outline-none focus:ring-2 focus:ring-indigo-500/40",
                                            value: "{role().as_str()}",
                                            onchange: move |e| {
                                                role.set(Role::parse(&e.value()).unwrap_or(Role::Student));
                                            },
                                            option { value: "student", "Student" }
                                            option { value: "admin", "Admin" }
                                        }
                                    }
                                    div {
                                        label { class: "block text-sm font-medium text-slate-700 mb-2",
                                            "Full Name"
                                        }
                                        TextInput {
                                            value: name.cloned(),
                                            placeholder: Some("Enter your full name".to_string()),
                                            oninput: move |e: FormEvent| name.set(e.value()),
                                        }
                                    }
                                }

                                div {
                                    label { class: "block text-sm font-medium text-slate-700 mb-2",
                                        "Email Address"
                                    }
                                    TextInput {
                                        value: email.cloned(),
                                        input_type: Some(InputType::Email),
                                        placeholder: Some("student@college.edu".to_string()),
                                        oninput: move |e: FormEvent| email.set(e.value()),
                                    }
                                }
                                div {
                                    label { class: "block text-sm font-medium text-slate-700 mb-2",
                                        "Password"
                                    }
                                    TextInput {
                                        value: password.cloned(),
                                        input_type: Some(InputType::Password),
                                        placeholder: Some("Enter your password".to_string()),
                                        oninput: move |e: FormEvent| password.set(e.value()),
                                    }
                                }

                                if !login_mode() && role() == Role::Student {
                                    div { class: "grid grid-cols-2 gap-4",
                                        div {
                                            label { class: "block text-sm font-medium text-slate-700 mb-2",
                                                "Department"
                                            }
                                            TextInput {
                                                value: department.cloned(),
                                                placeholder: Some("Computer Science".to_string()),
                                                oninput: move |e: FormEvent| department.set(e.value()),
                                            }
                                        }
                                        div {
                                            label { class: "block text-sm font-medium text-slate-700 mb-2",
                                                "Batch"
                                            }
                                            TextInput {
                                                value: batch.cloned(),
                                                placeholder: Some("2026".to_string()),
                                                oninput: move |e: FormEvent| batch.set(e.value()),
                                            }
                                        }
                                    }
                                }

                                if let Some(e) = error.cloned() {
                                    p { class: "text-sm text-red-600", "{e}" }
                                }

                                Button {
                                    r#type: Some("submit".to_string()),
                                    variant: ButtonVariant::Primary,
                                    class: Some("w-full py-2.5".to_string()),
                                    disabled: is_submitting() || session.is_loading(),
                                    if is_submitting() {
                                        "Please wait…"
                                    } else if login_mode() {
                                        "Log In to Dashboard"
                                    } else {
                                        "Create Account"
                                    }
                                }
                            }

                            div { class: "relative my-6",
                                div { class: "absolute inset-0 flex items-center",
                                    div { class: "w-full border-t border-slate-200" }
                                }
                                div { class: "relative flex justify-center text-sm",
                                    span { class: "px-4 bg-white text-slate-400", "Or continue with" }
                                }
                            }

                            Button {
                                variant: ButtonVariant::Outline,
                                class: Some("w-full".to_string()),
                                onclick: google_login,
                                "Sign in with Google"
                            }

                            p { class: "text-center text-sm text-slate-500 mt-6",
                                if login_mode() {
                                    "Don't have an account? "
                                } else {
                                    "Already have an account? "
                                }
                                button {
                                    class: "text-indigo-600 font-medium hover:underline",
                                    onclick: move |_| {
                                        let current = login_mode();
                                        login_mode.set(!current);
                                    },
                                    if login_mode() { "Register your College ID" } else { "Log in" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The `code` query parameter from the current location, if present.
fn oauth_code_from_location() -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window()?;
        let search = window.location().search().ok()?;
        let query = search.strip_prefix('?')?;
        return query
            .split('&')
            .find_map(|pair| pair.strip_prefix("code="))
            .map(|code| urlencoding::decode(code).map(|c| c.into_owned()).ok())
            .flatten();
    }
    #[cfg(not(target_arch = "wasm32"))]
    None
}
