use dioxus::prelude::*;

use crate::auth_session::use_session;
use crate::components::status_badge::StatusBadge;
use crate::components::ui::{Button, ButtonVariant};
use crate::guards::Protected;
use crate::hooks::{self, use_drive, use_drive_messages, use_my_registrations};
use crate::models::{Role, RoleState, WatchedTable};
use crate::queries::use_query_client;
use crate::realtime::use_realtime;
use crate::Route;

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Any authenticated role may view a drive.
#[component]
pub fn CompanyDetail(id: String) -> Element {
    rsx! {
        Protected {
            CompanyDetailInner { id }
        }
    }
}

#[component]
fn CompanyDetailInner(id: String) -> Element {
    let session = use_session();
    let queries = use_query_client();
    use_realtime(WatchedTable::Messages, Some(id.clone()));
    use_realtime(WatchedTable::Registrations, None);

    let drive = use_drive(id.clone());
    let registrations = use_my_registrations();
    let is_admin = session.role() == RoleState::Resolved(Role::Admin);

    let registered = registrations
        .read()
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|regs| regs.iter().any(|r| r.company_id == id))
        .unwrap_or(false);

    let register = {
        let session = session.clone();
        let id = id.clone();
        move |_| {
            let client = session.client();
            let id = id.clone();
            spawn(async move {
                let _ = hooks::register_for_drive(client, queries, &id).await;
            });
        }
    };

    rsx! {
        nav { class: "flex items-center gap-2 text-sm text-slate-500 mb-6",
            Link { to: Route::StudentDashboard {}, class: "hover:text-slate-900", "Drives" }
            span { "/" }
            span { class: "text-slate-900",
                {
                    drive
                        .read()
                        .as_ref()
                        .and_then(|r| r.as_ref().ok())
                        .and_then(|c| c.as_ref())
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| "…".to_string())
                }
            }
        }

        match drive.read().as_ref() {
            Some(Ok(Some(company))) => rsx! {
                div { class: "grid grid-cols-1 lg:grid-cols-3 gap-8",
                    div { class: "lg:col-span-2 space-y-6",
                        // Header card
                        div { class: "bg-white rounded-xl p-6 border border-slate-200 shadow-sm",
                            div { class: "flex items-start justify-between mb-4",
                                div { class: "flex items-center gap-4",
                                    div { class: "w-16 h-16 rounded-xl bg-indigo-600 flex items-center justify-center text-xl font-bold text-white",
                                        "{initials(&company.name)}"
                                    }
                                    div {
                                        div { class: "flex items-center gap-3 mb-1",
                                            h1 { class: "text-2xl font-bold text-slate-900", "{company.name}" }
                                            StatusBadge { status: company.status }
                                        }
                                        p { class: "text-lg text-slate-500", "{company.role_title}" }
                                    }
                                }
                                if registered {
                                    span { class: "px-4 py-2 rounded-lg bg-emerald-50 text-emerald-700 text-sm font-medium",
                                        "Registered ✓"
                                    }
                                } else {
                                    Button { variant: ButtonVariant::Primary, onclick: register.clone(), "Register Now →" }
                                }
                            }
                            div { class: "flex flex-wrap items-center gap-4 text-sm text-slate-500",
                                span { "₹ {company.ctc}" }
                                span { "{company.location}" }
                                span { "{company.drive_date}" }
                                span { "{company.registration_count} registered" }
                            }
                        }

                        // About
                        div { class: "bg-white rounded-xl p-6 border border-slate-200 shadow-sm",
                            h2 { class: "font-semibold text-slate-900 mb-4", "About the Role" }
                            p { class: "text-slate-600",
                                {
                                    company
                                        .description
                                        .clone()
                                        .unwrap_or_else(|| format!(
                                            "{} is hiring {}s through this campus drive.",
                                            company.name,
                                            company.role_title,
                                        ))
                                }
                            }
                        }

                        // Eligibility
                        if let Some(eligibility) = &company.eligibility {
                            div { class: "bg-white rounded-xl p-6 border border-slate-200 shadow-sm",
                                h2 { class: "font-semibold text-slate-900 mb-4", "Eligibility Criteria" }
                                div { class: "grid grid-cols-2 md:grid-cols-4 gap-4",
                                    div {
                                        p { class: "text-xs text-slate-400 uppercase", "CGPA cutoff" }
                                        p { class: "font-semibold text-slate-900", "{eligibility.cgpa}" }
                                    }
                                    div {
                                        p { class: "text-xs text-slate-400 uppercase", "Branches" }
                                        p { class: "font-semibold text-slate-900", {eligibility.branches.join(", ")} }
                                    }
                                    div {
                                        p { class: "text-xs text-slate-400 uppercase", "Active backlogs" }
                                        p { class: "font-semibold text-slate-900", "{eligibility.backlogs_allowed} allowed" }
                                    }
                                    div {
                                        p { class: "text-xs text-slate-400 uppercase", "Class X & XII" }
                                        p { class: "font-semibold text-slate-900", "{eligibility.class_requirement}" }
                                    }
                                }
                            }
                        }

                        // Selection process
                        if !company.selection_process.is_empty() {
                            div { class: "bg-white rounded-xl p-6 border border-slate-200 shadow-sm",
                                h2 { class: "font-semibold text-slate-900 mb-6", "Selection Process" }
                                ol { class: "space-y-4",
                                    for (index , step) in company.selection_process.iter().enumerate() {
                                        li { key: "{index}", class: "flex items-start gap-4",
                                            div { class: "w-8 h-8 rounded-full bg-indigo-600 text-white flex items-center justify-center text-sm font-medium shrink-0",
                                                "{index + 1}"
                                            }
                                            div {
                                                p { class: "font-medium text-slate-900", "{step.title}" }
                                                p { class: "text-sm text-slate-500", "{step.description}" }
                                                if let Some(duration) = &step.duration {
                                                    p { class: "text-xs text-slate-400", "({duration})" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }

                        Discussion { company_id: id.clone(), is_admin }
                    }

                    // Side column
                    div { class: "space-y-6",
                        div { class: "bg-white rounded-xl p-6 border border-slate-200 shadow-sm",
                            h3 { class: "font-semibold text-slate-900 mb-4", "Drive Snapshot" }
                            dl { class: "space-y-3 text-sm",
                                div { class: "flex justify-between",
                                    dt { class: "text-slate-500", "Drive date" }
                                    dd { class: "font-medium text-slate-900", "{company.drive_date}" }
                                }
                                div { class: "flex justify-between",
                                    dt { class: "text-slate-500", "Compensation" }
                                    dd { class: "font-medium text-slate-900", "₹ {company.ctc}" }
                                }
                                div { class: "flex justify-between",
                                    dt { class: "text-slate-500", "Location" }
                                    dd { class: "font-medium text-slate-900", "{company.location}" }
                                }
                                div { class: "flex justify-between",
                                    dt { class: "text-slate-500", "Registrations" }
                                    dd { class: "font-medium text-slate-900", "{company.registration_count}" }
                                }
                            }
                        }
                    }
                }
            },
            Some(Ok(None)) => rsx! {
                div { class: "text-center py-16",
                    p { class: "text-slate-500", "Drive not found." }
                }
            },
            Some(Err(e)) => rsx! {
                div { class: "text-center py-16 text-red-600", "Failed to load drive: {e.user_message()}" }
            },
            None => rsx! {
                div { class: "text-center py-16 text-slate-500", "Loading drive..." }
            },
        }
    }
}

#[component]
fn Discussion(company_id: String, is_admin: bool) -> Element {
    let session = use_session();
    let queries = use_query_client();
    let messages = use_drive_messages(company_id.clone());
    let mut draft = use_signal(String::new);

    let my_id = session.identity().map(|i| i.id).unwrap_or_default();

    let post = {
        let session = session.clone();
        let company_id = company_id.clone();
        move |_| {
            let content = draft.read().trim().to_string();
            if content.is_empty() {
                return;
            }
            draft.set(String::new());
            let client = session.client();
            let company_id = company_id.clone();
            spawn(async move {
                let _ = hooks::send_drive_message(client, queries, &company_id, content).await;
            });
        }
    };

    rsx! {
        div { class: "bg-white rounded-xl p-6 border border-slate-200 shadow-sm",
            div { class: "flex items-center justify-between mb-6",
                h2 { class: "font-semibold text-slate-900", "💬 Discussion" }
                span { class: "text-sm text-slate-400",
                    {
                        messages
                            .read()
                            .as_ref()
                            .and_then(|r| r.as_ref().ok())
                            .map(|m| format!("{} comments", m.len()))
                            .unwrap_or_default()
                    }
                }
            }

            div { class: "space-y-3 max-h-96 overflow-y-auto mb-4",
                match messages.read().as_ref() {
                    Some(Ok(list)) if list.is_empty() => rsx! {
                        p { class: "text-sm text-slate-400 italic", "No questions yet. Ask the first one!" }
                    },
                    Some(Ok(list)) => rsx! {
                        for message in list.iter().cloned() {
                            div {
                                key: "{message.id}",
                                class: format!(
                                    "flex gap-3 p-3 rounded-lg {}",
                                    if message.pinned { "bg-indigo-50 border border-indigo-100" } else { "" },
                                ),
                                div { class: "w-8 h-8 rounded-full bg-indigo-100 flex items-center justify-center shrink-0",
                                    span { class: "text-xs font-medium text-indigo-700",
                                        "{initials(&message.author_name)}"
                                    }
                                }
                                div { class: "flex-1 min-w-0",
                                    div { class: "flex items-center gap-2 mb-1",
                                        span { class: "font-medium text-slate-900", "{message.author_name}" }
                                        if message.author_role == Some(Role::Admin) {
                                            span { class: "px-2 py-0.5 text-xs bg-indigo-600 text-white rounded",
                                                "ADMIN"
                                            }
                                        }
                                        span { class: "text-xs text-slate-400",
                                            {message.created_at.format("%b %d, %H:%M").to_string()}
                                        }
                                        if message.pinned {
                                            span { class: "text-xs text-indigo-600", "📌" }
                                        }
                                    }
                                    p { class: "text-sm text-slate-600", "{message.content}" }
                                }
                                div { class: "flex items-center gap-2 shrink-0",
                                    if is_admin {
                                        button {
                                            class: "text-xs text-slate-400 hover:text-indigo-600",
                                            onclick: {
                                                let session = session.clone();
                                                let company_id = company_id.clone();
                                                let message_id = message.id.clone();
                                                let pinned = message.pinned;
                                                move |_| {
                                                    let client = session.client();
                                                    let company_id = company_id.clone();
                                                    let message_id = message_id.clone();
                                                    spawn(async move {
                                                        let _ = hooks::set_message_pinned(
                                                                client,
                                                                queries,
                                                                &company_id,
                                                                &message_id,
                                                                !pinned,
                                                            )
                                                            .await;
                                                    });
                                                }
                                            },
                                            if message.pinned { "Unpin" } else { "Pin" }
                                        }
                                    }
                                    if is_admin || message.user_id == my_id {
                                        button {
                                            class: "text-xs text-slate-400 hover:text-red-600",
                                            onclick: {
                                                let session = session.clone();
                                                let company_id = company_id.clone();
                                                let message_id = message.id.clone();
                                                move |_| {
                                                    let client = session.client();
                                                    let company_id = company_id.clone();
                                                    let message_id = message_id.clone();
                                                    spawn(async move {
                                                        let _ = hooks::remove_message(
                                                                client,
                                                                queries,
                                                                &company_id,
                                                                &message_id,
                                                            )
                                                            .await;
                                                    });
                                                }
                                            },
                                            "Delete"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    Some(Err(e)) => rsx! {
                        p { class: "text-sm text-red-600", "Failed to load discussion: {e.user_message()}" }
                    },
                    None => rsx! {
                        p { class: "text-sm text-slate-400", "Loading discussion..." }
                    },
                }
            }

            div { class: "flex gap-3 pt-4 border-t border-slate-100",
                input {
                    class: "flex-1 rounded-lg bg-white text-slate-900 px-4 py-2.5 text-sm border border-slate-300 placeholder-slate-400 focus:outline-none focus:ring-2 focus:ring-indigo-500/40",
                    placeholder: "Ask a question about this drive...",
                    value: "{draft}",
                    oninput: move |e| draft.set(e.value()),
                    onkeypress: {
                        let mut post = post.clone();
                        move |e: KeyboardEvent| {
                            if e.key() == Key::Enter {
                                post(());
                            }
                        }
                    },
                }
                Button { variant: ButtonVariant::Primary, onclick: {
                        let mut post = post.clone();
                        move |_| post(())
                    },
                    "Post Question"
                }
            }
        }
    }
}
