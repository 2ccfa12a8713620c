use dioxus::prelude::*;

use crate::models::{ApplicationStatus, DriveStatus};

fn drive_badge_classes(status: DriveStatus) -> &'static str {
    match status {
        DriveStatus::Upcoming => "bg-amber-100 text-amber-700",
        DriveStatus::Ongoing => "bg-blue-100 text-blue-700",
        DriveStatus::Completed => "bg-emerald-100 text-emerald-700",
        DriveStatus::Closed => "bg-slate-200 text-slate-600",
    }
}

#[component]
pub fn StatusBadge(status: DriveStatus) -> Element {
    rsx! {
        span {
            class: format!(
                "inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium capitalize {}",
                drive_badge_classes(status),
            ),
            "{status.as_str()}"
        }
    }
}

fn application_badge_classes(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Registered => "bg-slate-100 text-slate-700",
        ApplicationStatus::Applied => "bg-blue-100 text-blue-700",
        ApplicationStatus::Shortlisted => "bg-amber-100 text-amber-700",
        ApplicationStatus::Interviewing => "bg-purple-100 text-purple-700",
        ApplicationStatus::Selected => "bg-emerald-100 text-emerald-700",
        ApplicationStatus::Rejected => "bg-red-100 text-red-700",
    }
}

#[component]
pub fn ApplicationBadge(status: ApplicationStatus) -> Element {
    rsx! {
        span {
            class: format!(
                "inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium capitalize {}",
                application_badge_classes(status),
            ),
            "{status.as_str()}"
        }
    }
}
