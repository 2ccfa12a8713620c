use std::collections::HashMap;

use dioxus::prelude::*;

use crate::auth_session::use_session;
use crate::components::status_badge::ApplicationBadge;
use crate::guards::Protected;
use crate::hooks::{self, use_drives, use_my_registrations};
use crate::models::{Company, Role, WatchedTable};
use crate::queries::use_query_client;
use crate::realtime::use_realtime;
use crate::Route;

#[component]
pub fn Applications() -> Element {
    rsx! {
        Protected { allowed: vec![Role::Student], ApplicationsInner {} }
    }
}

#[component]
fn ApplicationsInner() -> Element {
    let session = use_session();
    let queries = use_query_client();
    use_realtime(WatchedTable::Registrations, None);

    let registrations = use_my_registrations();
    let drives = use_drives();

    let drives_by_id: HashMap<String, Company> = drives
        .read()
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|list| list.iter().map(|c| (c.id.clone(), c.clone())).collect())
        .unwrap_or_default();

    let withdraw = {
        let session = session.clone();
        move |company_id: String| {
            let client = session.client();
            spawn(async move {
                let _ = hooks::unregister_from_drive(client, queries, &company_id).await;
            });
        }
    };

    rsx! {
        header { class: "mb-8",
            h1 { class: "text-3xl font-bold text-slate-900", "My Applications" }
            p { class: "text-slate-500 mt-1", "Track every drive you have registered for." }
        }

        match registrations.read().as_ref() {
            Some(Ok(regs)) if regs.is_empty() => rsx! {
                div { class: "text-center py-16",
                    p { class: "text-slate-500 mb-4", "You haven't registered for any drives yet." }
                    Link {
                        to: Route::StudentDashboard {},
                        class: "text-indigo-600 font-medium hover:underline",
                        "Browse upcoming drives"
                    }
                }
            },
            Some(Ok(regs)) => rsx! {
                div { class: "bg-white rounded-xl border border-slate-200 shadow-sm overflow-hidden",
                    table { class: "w-full text-sm",
                        thead { class: "bg-slate-50 text-left text-slate-500",
                            tr {
                                th { class: "px-6 py-3 font-medium", "Company" }
                                th { class: "px-6 py-3 font-medium", "Role" }
                                th { class: "px-6 py-3 font-medium", "Applied On" }
                                th { class: "px-6 py-3 font-medium", "Status" }
                                th { class: "px-6 py-3" }
                            }
                        }
                        tbody { class: "divide-y divide-slate-100",
                            for reg in regs.iter().cloned() {
                                tr { key: "{reg.id}", class: "hover:bg-slate-50",
                                    td { class: "px-6 py-4 font-medium text-slate-900",
                                        if let Some(company) = drives_by_id.get(&reg.company_id) {
                                            Link {
                                                to: Route::CompanyDetail { id: company.id.clone() },
                                                class: "hover:text-indigo-600",
                                                "{company.name}"
                                            }
                                        } else {
                                            "—"
                                        }
                                    }
                                    td { class: "px-6 py-4 text-slate-600",
                                        {
                                            drives_by_id
                                                .get(&reg.company_id)
                                                .map(|c| c.role_title.clone())
                                                .unwrap_or_else(|| "—".to_string())
                                        }
                                    }
                                    td { class: "px-6 py-4 text-slate-600",
                                        {reg.created_at.format("%b %d, %Y").to_string()}
                                    }
                                    td { class: "px-6 py-4",
                                        ApplicationBadge { status: reg.status }
                                    }
                                    td { class: "px-6 py-4 text-right",
                                        button {
                                            class: "text-sm text-red-600 hover:underline",
                                            onclick: {
                                                let withdraw = withdraw.clone();
                                                let company_id = reg.company_id.clone();
                                                move |_| withdraw(company_id.clone())
                                            },
                                            "Withdraw"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            Some(Err(e)) => rsx! {
                div { class: "text-center py-12 text-red-600", "Failed to load applications: {e.user_message()}" }
            },
            None => rsx! {
                div { class: "text-center py-12 text-slate-500", "Loading applications..." }
            },
        }
    }
}
