use std::collections::HashMap;

use dioxus::prelude::*;

use crate::auth_session::use_session;
use crate::components::drive_card::DriveCard;
use crate::components::stat_card::StatCard;
use crate::guards::Protected;
use crate::hooks::{self, use_drives, use_my_registrations};
use crate::models::{ApplicationStatus, DriveStatus, Role, WatchedTable};
use crate::queries::use_query_client;
use crate::realtime::use_realtime;

#[component]
pub fn StudentDashboard() -> Element {
    rsx! {
        Protected { allowed: vec![Role::Student], DashboardInner {} }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DriveTab {
    Upcoming,
    Ongoing,
    Completed,
}

impl DriveTab {
    fn label(self) -> &'static str {
        match self {
            DriveTab::Upcoming => "Upcoming Drives",
            DriveTab::Ongoing => "Ongoing",
            DriveTab::Completed => "Completed",
        }
    }

    fn matches(self, status: DriveStatus) -> bool {
        match self {
            DriveTab::Upcoming => status == DriveStatus::Upcoming,
            DriveTab::Ongoing => status == DriveStatus::Ongoing,
            DriveTab::Completed => {
                status == DriveStatus::Completed || status == DriveStatus::Closed
            }
        }
    }
}

#[component]
fn DashboardInner() -> Element {
    let session = use_session();
    let queries = use_query_client();
    use_realtime(WatchedTable::Companies, None);
    use_realtime(WatchedTable::Registrations, None);

    let drives = use_drives();
    let registrations = use_my_registrations();

    let mut active_tab = use_signal(|| DriveTab::Upcoming);
    let mut search = use_signal(String::new);

    let first_name = session
        .profile()
        .map(|p| p.name)
        .unwrap_or_default()
        .split_whitespace()
        .next()
        .unwrap_or("Student")
        .to_string();

    let my_statuses: HashMap<String, ApplicationStatus> = registrations
        .read()
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|regs| {
            regs.iter()
                .map(|r| (r.company_id.clone(), r.status))
                .collect()
        })
        .unwrap_or_default();

    let shortlisted = my_statuses
        .values()
        .filter(|s| {
            matches!(
                s,
                ApplicationStatus::Shortlisted | ApplicationStatus::Interviewing
            )
        })
        .count();
    let offers = my_statuses
        .values()
        .filter(|s| matches!(s, ApplicationStatus::Selected))
        .count();

    let register = {
        let session = session.clone();
        move |company_id: String| {
            let client = session.client();
            spawn(async move {
                let _ = hooks::register_for_drive(client, queries, &company_id).await;
            });
        }
    };

    let body = match drives.read().as_ref() {
        Some(Ok(all_drives)) => {
            let total = all_drives.len();
            let filtered: Vec<_> = all_drives
                .iter()
                .filter(|c| active_tab().matches(c.status))
                .filter(|c| {
                    let query = search.read().to_lowercase();
                    query.is_empty()
                        || c.name.to_lowercase().contains(&query)
                        || c.role_title.to_lowercase().contains(&query)
                })
                .cloned()
                .collect();

            rsx! {
                div { class: "grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6 mb-8",
                    StatCard {
                        title: "Total Drives".to_string(),
                        value: total.to_string(),
                    }
                    StatCard {
                        title: "Applications".to_string(),
                        value: my_statuses.len().to_string(),
                    }
                    StatCard {
                        title: "Shortlisted".to_string(),
                        value: shortlisted.to_string(),
                        hint: Some("Pending interviews".to_string()),
                    }
                    StatCard {
                        title: "Offers".to_string(),
                        value: offers.to_string(),
                    }
                }

                div { class: "flex items-center justify-between mb-6",
                    div { class: "flex gap-1 bg-slate-200 p-1 rounded-lg",
                        for tab in [DriveTab::Upcoming, DriveTab::Ongoing, DriveTab::Completed] {
                            button {
                                key: "{tab.label()}",
                                class: format!(
                                    "px-4 py-2 text-sm font-medium rounded-md transition-all {}",
                                    if active_tab() == tab {
                                        "bg-white text-slate-900 shadow-sm"
                                    } else {
                                        "text-slate-500 hover:text-slate-900"
                                    },
                                ),
                                onclick: move |_| active_tab.set(tab),
                                "{tab.label()}"
                            }
                        }
                    }
                    input {
                        class: "pl-4 pr-4 py-2 w-80 rounded-lg border border-slate-300 bg-white text-sm placeholder-slate-400 focus:outline-none focus:ring-2 focus:ring-indigo-500/40",
                        placeholder: "Search by company or role...",
                        value: "{search}",
                        oninput: move |e| search.set(e.value()),
                    }
                }

                if filtered.is_empty() {
                    div { class: "text-center py-12",
                        p { class: "text-slate-500",
                            "No placement drives found matching your criteria."
                        }
                    }
                } else {
                    div { class: "grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6",
                        for company in filtered {
                            DriveCard {
                                key: "{company.id}",
                                application_status: my_statuses.get(&company.id).copied(),
                                company,
                                on_register: register.clone(),
                            }
                        }
                    }
                }
            }
        }
        Some(Err(e)) => rsx! {
            div { class: "text-center py-12 text-red-600", "Failed to load drives: {e.user_message()}" }
        },
        None => rsx! {
            div { class: "text-center py-12 text-slate-500", "Loading drives..." }
        },
    };

    rsx! {
        header { class: "flex items-center justify-between mb-8",
            div {
                h1 { class: "text-3xl font-bold text-slate-900", "Welcome back, {first_name} 👋" }
                p { class: "text-slate-500 mt-1",
                    "Here are the latest placement opportunities curated for your profile."
                }
            }
        }

        {body}
    }
}
