use dioxus::prelude::*;

use crate::auth_session::use_session;
use crate::components::ui::{Button, ButtonVariant, TextInput};
use crate::hooks;
use crate::models::{Role, RoleState, UpdateProfileRequest};
use crate::Route;

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

fn student_nav() -> Vec<(&'static str, Route)> {
    vec![
        ("Dashboard", Route::StudentDashboard {}),
        ("My Applications", Route::Applications {}),
        ("Interviews", Route::Interviews {}),
        ("Resume Builder", Route::ResumeBuilder {}),
        ("Resources", Route::Resources {}),
    ]
}

fn admin_nav() -> Vec<(&'static str, Route)> {
    vec![
        ("Dashboard", Route::AdminDashboard {}),
        (
            "Drives",
            Route::AdminSection {
                section: "drives".to_string(),
            },
        ),
        (
            "Students",
            Route::AdminSection {
                section: "students".to_string(),
            },
        ),
        (
            "Applications",
            Route::AdminSection {
                section: "applications".to_string(),
            },
        ),
        (
            "Settings",
            Route::AdminSection {
                section: "settings".to_string(),
            },
        ),
    ]
}

/// Shared layout for every signed-in screen: fixed sidebar plus content.
#[component]
pub fn SidebarLayout() -> Element {
    let session = use_session();

    rsx! {
        div { class: "min-h-screen bg-slate-50",
            if session.is_authenticated() {
                Sidebar {}
                main { class: "ml-64 p-8", Outlet::<Route> {} }
            } else {
                // Route guards inside the pages redirect shortly; render the
                // outlet so they get the chance to.
                main { class: "p-8", Outlet::<Route> {} }
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let session = use_session();
    let nav = use_navigator();
    let route: Route = use_route();
    let mut editing_profile = use_signal(|| false);

    let is_admin = session.role() == RoleState::Resolved(Role::Admin);
    let items = if is_admin { admin_nav() } else { student_nav() };

    let profile = session.profile();
    let display_name = profile
        .as_ref()
        .map(|p| p.name.clone())
        .or_else(|| session.identity().map(|i| i.email))
        .unwrap_or_default();
    let subtitle = profile
        .as_ref()
        .and_then(|p| p.department.clone())
        .unwrap_or_else(|| if is_admin { "Placement Cell".to_string() } else { String::new() });

    let logout = {
        let session = session.clone();
        move |_| {
            let session = session.clone();
            spawn(async move {
                session.store.logout().await;
                nav.replace(Route::Auth {});
            });
        }
    };

    rsx! {
        aside { class: "fixed left-0 top-0 h-screen w-64 bg-white border-r border-slate-200 flex flex-col",
            // Logo
            div { class: "p-6 border-b border-slate-200",
                Link { to: Route::Root {}, class: "flex items-center gap-3",
                    div { class: "w-10 h-10 rounded-xl bg-indigo-600 flex items-center justify-center text-white font-bold",
                        "PC"
                    }
                    div {
                        h1 { class: "font-bold text-slate-900", "PlacementCell" }
                        p { class: "text-xs text-slate-500",
                            if is_admin { "Admin Console" } else { "Student Portal" }
                        }
                    }
                }
            }

            // Profile chip; clicking it opens the edit form.
            div { class: "p-4 border-b border-slate-200",
                button {
                    class: "flex items-center gap-3 p-3 rounded-lg bg-slate-50 hover:bg-slate-100 w-full text-left transition-colors",
                    onclick: move |_| editing_profile.set(true),
                    div { class: "w-10 h-10 rounded-full bg-indigo-100 flex items-center justify-center shrink-0",
                        span { class: "text-sm font-medium text-indigo-700",
                            "{initials(&display_name)}"
                        }
                    }
                    div { class: "flex-1 min-w-0",
                        p { class: "font-medium text-slate-900 truncate", "{display_name}" }
                        p { class: "text-xs text-slate-500 truncate", "{subtitle}" }
                    }
                }
            }

            if editing_profile() {
                ProfileEditModal { on_close: move |_| editing_profile.set(false) }
            }

            // Navigation
            nav { class: "flex-1 p-4 overflow-y-auto",
                ul { class: "space-y-1",
                    for (label , target) in items {
                        li { key: "{label}",
                            Link {
                                to: target.clone(),
                                class: format!(
                                    "flex items-center gap-3 px-3 py-2 rounded-lg text-sm font-medium transition-colors {}",
                                    if route == target {
                                        "bg-indigo-50 text-indigo-700"
                                    } else {
                                        "text-slate-600 hover:bg-slate-100 hover:text-slate-900"
                                    },
                                ),
                                span { "{label}" }
                            }
                        }
                    }
                }
            }

            // Logout
            div { class: "p-4 border-t border-slate-200",
                button {
                    class: "flex items-center gap-3 px-3 py-2 rounded-lg text-sm font-medium text-slate-600 hover:text-red-600 hover:bg-red-50 w-full transition-colors",
                    onclick: logout,
                    "Logout"
                }
            }
        }
    }
}

#[component]
fn ProfileEditModal(on_close: EventHandler<()>) -> Element {
    let session = use_session();
    let profile = session.profile();

    let mut name = use_signal(|| profile.as_ref().map(|p| p.name.clone()).unwrap_or_default());
    let mut department = use_signal(|| {
        profile
            .as_ref()
            .and_then(|p| p.department.clone())
            .unwrap_or_default()
    });
    let mut batch = use_signal(|| {
        profile
            .as_ref()
            .and_then(|p| p.batch.clone())
            .unwrap_or_default()
    });
    let mut saving = use_signal(|| false);

    let save = {
        let session = session.clone();
        move |e: FormEvent| {
            e.prevent_default();
            if saving() {
                return;
            }
            saving.set(true);

            let client = session.client();
            let store = session.store.clone();
            let req = UpdateProfileRequest {
                name: Some(name.cloned()),
                department: Some(department.cloned()),
                batch: Some(batch.cloned()),
                avatar_url: None,
            };
            spawn(async move {
                if hooks::save_profile(client, &req).await.is_ok() {
                    // Pull the fresh row back into the session state.
                    store.refresh_directory();
                    on_close.call(());
                }
                saving.set(false);
            });
        }
    };

    rsx! {
        div { class: "fixed inset-0 bg-black/50 flex items-center justify-center z-50",
            div { class: "bg-white rounded-xl shadow-2xl w-full max-w-md mx-4",
                div { class: "px-6 py-4 border-b border-slate-200",
                    h3 { class: "text-xl font-bold text-slate-900", "Edit Profile" }
                }
                form { onsubmit: save,
                    div { class: "p-6 space-y-4",
                        div {
                            label { class: "block text-sm font-medium text-slate-700 mb-2", "Full Name" }
                            TextInput {
                                value: name.cloned(),
                                oninput: move |e: FormEvent| name.set(e.value()),
                            }
                        }
                        div {
                            label { class: "block text-sm font-medium text-slate-700 mb-2", "Department" }
                            TextInput {
                                value: department.cloned(),
                                placeholder: Some("Computer Science".to_string()),
                                oninput: move |e: FormEvent| department.set(e.value()),
                            }
                        }
                        div {
                            label { class: "block text-sm font-medium text-slate-700 mb-2", "Batch" }
                            TextInput {
                                value: batch.cloned(),
                                placeholder: Some("2026".to_string()),
                                oninput: move |e: FormEvent| batch.set(e.value()),
                            }
                        }
                    }
                    div { class: "px-6 py-4 border-t border-slate-200 flex justify-end gap-3",
                        button {
                            r#type: "button",
                            class: "px-4 py-2 text-slate-500 hover:text-slate-900 transition-colors",
                            onclick: move |_| on_close.call(()),
                            "Cancel"
                        }
                        Button {
                            r#type: Some("submit".to_string()),
                            variant: ButtonVariant::Primary,
                            disabled: saving(),
                            if saving() { "Saving…" } else { "Save Changes" }
                        }
                    }
                }
            }
        }
    }
}
