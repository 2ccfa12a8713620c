use std::collections::HashMap;

use dioxus::prelude::*;

use crate::components::status_badge::ApplicationBadge;
use crate::guards::Protected;
use crate::hooks::{use_drives, use_my_registrations};
use crate::models::{ApplicationStatus, Company, Role, WatchedTable};
use crate::realtime::use_realtime;
use crate::Route;

#[component]
pub fn Interviews() -> Element {
    rsx! {
        Protected { allowed: vec![Role::Student], InterviewsInner {} }
    }
}

#[component]
fn InterviewsInner() -> Element {
    use_realtime(WatchedTable::Registrations, None);

    let registrations = use_my_registrations();
    let drives = use_drives();

    let drives_by_id: HashMap<String, Company> = drives
        .read()
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|list| list.iter().map(|c| (c.id.clone(), c.clone())).collect())
        .unwrap_or_default();

    let body = match registrations.read().as_ref() {
        Some(Ok(regs)) => {
            let active: Vec<_> = regs
                .iter()
                .filter(|r| {
                    matches!(
                        r.status,
                        ApplicationStatus::Shortlisted | ApplicationStatus::Interviewing
                    )
                })
                .cloned()
                .collect();

            if active.is_empty() {
                rsx! {
                    div { class: "text-center py-16",
                        p { class: "text-slate-500", "No interviews scheduled yet. Keep applying!" }
                    }
                }
            } else {
                rsx! {
                    div { class: "grid grid-cols-1 md:grid-cols-2 gap-6",
                        for reg in active {
                            div {
                                key: "{reg.id}",
                                class: "rounded-xl border border-slate-200 bg-white p-6 shadow-sm",
                                div { class: "flex items-center justify-between mb-3",
                                    h3 { class: "font-semibold text-slate-900",
                                        {
                                            drives_by_id
                                                .get(&reg.company_id)
                                                .map(|c| c.name.clone())
                                                .unwrap_or_else(|| "Unknown company".to_string())
                                        }
                                    }
                                    ApplicationBadge { status: reg.status }
                                }
                                p { class: "text-sm text-slate-500 mb-4",
                                    {
                                        drives_by_id
                                            .get(&reg.company_id)
                                            .map(|c| format!("{} · {}", c.role_title, c.drive_date))
                                            .unwrap_or_default()
                                    }
                                }
                                Link {
                                    to: Route::CompanyDetail { id: reg.company_id.clone() },
                                    class: "text-sm text-indigo-600 font-medium hover:underline",
                                    "View selection process →"
                                }
                            }
                        }
                    }
                }
            }
        }
        Some(Err(e)) => rsx! {
            div { class: "text-center py-12 text-red-600", "Failed to load interviews: {e.user_message()}" }
        },
        None => rsx! {
            div { class: "text-center py-12 text-slate-500", "Loading..." }
        },
    };

    rsx! {
        header { class: "mb-8",
            h1 { class: "text-3xl font-bold text-slate-900", "Interviews" }
            p { class: "text-slate-500 mt-1",
                "Drives where you are shortlisted or interviewing."
            }
        }

        {body}
    }
}
