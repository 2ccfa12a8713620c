use dioxus::prelude::*;

use crate::components::status_badge::StatusBadge;
use crate::components::ui::{Button, ButtonVariant};
use crate::models::{ApplicationStatus, Company};
use crate::Route;

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

#[derive(Props, Clone, PartialEq)]
pub struct DriveCardProps {
    pub company: Company,
    /// The viewer's application status for this drive, if any.
    #[props(optional)]
    pub application_status: Option<ApplicationStatus>,
    pub on_register: EventHandler<String>,
}

#[component]
pub fn DriveCard(props: DriveCardProps) -> Element {
    let on_register = props.on_register;
    let company = &props.company;
    let registered = props.application_status.is_some();

    rsx! {
        div { class: "rounded-xl border border-slate-200 bg-white p-5 shadow-sm hover:shadow-md transition-shadow flex flex-col gap-4",
            div { class: "flex items-start justify-between",
                div { class: "flex items-center gap-3",
                    div { class: "w-12 h-12 rounded-xl bg-indigo-600 flex items-center justify-center text-base font-bold text-white",
                        "{initials(&company.name)}"
                    }
                    div {
                        Link {
                            to: Route::CompanyDetail { id: company.id.clone() },
                            class: "font-semibold text-slate-900 hover:text-indigo-600 transition-colors",
                            "{company.name}"
                        }
                        p { class: "text-sm text-slate-500", "{company.role_title}" }
                    }
                }
                StatusBadge { status: company.status }
            }

            div { class: "flex flex-wrap gap-x-4 gap-y-1 text-sm text-slate-500",
                span { "₹ {company.ctc}" }
                span { "{company.location}" }
                span { "{company.drive_date}" }
            }

            div { class: "flex items-center justify-between mt-auto pt-2 border-t border-slate-100",
                span { class: "text-xs text-slate-400",
                    "{company.registration_count} registered"
                }
                if let Some(status) = props.application_status {
                    span { class: "text-xs font-medium text-emerald-600 capitalize",
                        "{status.as_str()}"
                    }
                } else {
                    Button {
                        variant: ButtonVariant::Primary,
                        disabled: registered,
                        onclick: {
                            let id = company.id.clone();
                            move |_| on_register.call(id.clone())
                        },
                        "Register"
                    }
                }
            }
        }
    }
}
