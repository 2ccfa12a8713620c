use dioxus::prelude::*;

use crate::auth_session::use_session;
use crate::components::stat_card::StatCard;
use crate::components::status_badge::{ApplicationBadge, StatusBadge};
use crate::components::ui::{Button, ButtonVariant, TextInput};
use crate::guards::Protected;
use crate::hooks::{self, use_all_registrations, use_drives, use_students};
use crate::models::{
    ApplicationStatus, Company, CreateDriveRequest, DriveStatus, Role, UpdateDriveRequest,
    WatchedTable,
};
use crate::queries::use_query_client;
use crate::realtime::use_realtime;
use crate::Route;

#[component]
pub fn AdminDashboard() -> Element {
    rsx! {
        Protected { allowed: vec![Role::Admin], AdminOverview {} }
    }
}

#[component]
pub fn AdminSection(section: String) -> Element {
    rsx! {
        Protected { allowed: vec![Role::Admin],
            match section.as_str() {
                "drives" => rsx! {
                    DriveManager {}
                },
                "students" => rsx! {
                    StudentsTable {}
                },
                "applications" => rsx! {
                    RegistrationsTable {}
                },
                "settings" => rsx! {
                    AdminSettings {}
                },
                other => rsx! {
                    div { class: "text-center py-16",
                        p { class: "text-slate-500", "Unknown admin section: {other}" }
                        Link {
                            to: Route::AdminDashboard {},
                            class: "text-indigo-600 hover:underline",
                            "Back to the overview"
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn AdminOverview() -> Element {
    use_realtime(WatchedTable::Companies, None);
    use_realtime(WatchedTable::Registrations, None);

    let drives = use_drives();
    let registrations = use_all_registrations();
    let students = use_students();

    let (total_drives, ongoing) = drives
        .read()
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|list| {
            (
                list.len(),
                list.iter()
                    .filter(|c| c.status == DriveStatus::Ongoing)
                    .count(),
            )
        })
        .unwrap_or((0, 0));

    let total_students = students
        .read()
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|s| s.len())
        .unwrap_or(0);

    let placed = registrations
        .read()
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|regs| {
            regs.iter()
                .filter(|r| r.registration.status == ApplicationStatus::Selected)
                .count()
        })
        .unwrap_or(0);

    rsx! {
        header { class: "flex items-center justify-between mb-8",
            div {
                h1 { class: "text-3xl font-bold text-slate-900", "Placement Overview" }
                p { class: "text-slate-500 mt-1",
                    "Manage drives, monitor student progress, and oversee recruitment."
                }
            }
            Link { to: Route::AdminSection { section: "drives".to_string() },
                Button { variant: ButtonVariant::Primary, "+ Create New Drive" }
            }
        }

        div { class: "grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6 mb-8",
            StatCard { title: "Total Students".to_string(), value: total_students.to_string() }
            StatCard { title: "Placed Students".to_string(), value: placed.to_string() }
            StatCard {
                title: "Ongoing Drives".to_string(),
                value: ongoing.to_string(),
                hint: Some("Active".to_string()),
            }
            StatCard { title: "Total Drives".to_string(), value: total_drives.to_string() }
        }

        div { class: "grid grid-cols-1 lg:grid-cols-2 gap-6",
            // Status summary
            div { class: "bg-white rounded-xl p-6 border border-slate-200 shadow-sm",
                h2 { class: "font-semibold text-slate-900 mb-6", "Drive Status Summary" }
                match drives.read().as_ref() {
                    Some(Ok(list)) => rsx! {
                        div { class: "space-y-3",
                            for status in [
                                DriveStatus::Upcoming,
                                DriveStatus::Ongoing,
                                DriveStatus::Completed,
                                DriveStatus::Closed,
                            ]
                            {
                                div { key: "{status.as_str()}", class: "flex items-center justify-between",
                                    StatusBadge { status }
                                    span { class: "font-semibold text-slate-900",
                                        {list.iter().filter(|c| c.status == status).count().to_string()}
                                    }
                                }
                            }
                        }
                    },
                    _ => rsx! {
                        p { class: "text-slate-400 text-sm", "Loading..." }
                    },
                }
            }

            // Recent applications
            div { class: "bg-white rounded-xl p-6 border border-slate-200 shadow-sm",
                h2 { class: "font-semibold text-slate-900 mb-6", "Recent Applications" }
                match registrations.read().as_ref() {
                    Some(Ok(regs)) if regs.is_empty() => rsx! {
                        p { class: "text-slate-400 text-sm", "No applications yet." }
                    },
                    Some(Ok(regs)) => rsx! {
                        div { class: "space-y-3",
                            for detail in regs.iter().take(6).cloned() {
                                div { key: "{detail.registration.id}", class: "flex items-center justify-between",
                                    div {
                                        p { class: "font-medium text-slate-900 text-sm", "{detail.student_name}" }
                                        p { class: "text-xs text-slate-500", "{detail.company_name}" }
                                    }
                                    ApplicationBadge { status: detail.registration.status }
                                }
                            }
                        }
                    },
                    _ => rsx! {
                        p { class: "text-slate-400 text-sm", "Loading..." }
                    },
                }
            }
        }
    }
}

#[derive(Clone, PartialEq)]
struct DriveForm {
    name: String,
    location: String,
    role_title: String,
    ctc: String,
    drive_date: String,
    status: DriveStatus,
    description: String,
}

impl DriveForm {
    fn empty() -> Self {
        Self {
            name: String::new(),
            location: String::new(),
            role_title: String::new(),
            ctc: String::new(),
            drive_date: String::new(),
            status: DriveStatus::Upcoming,
            description: String::new(),
        }
    }

    fn from_company(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            location: company.location.clone(),
            role_title: company.role_title.clone(),
            ctc: company.ctc.clone(),
            drive_date: company.drive_date.clone(),
            status: company.status,
            description: company.description.clone().unwrap_or_default(),
        }
    }
}

#[component]
fn DriveManager() -> Element {
    let session = use_session();
    let queries = use_query_client();
    use_realtime(WatchedTable::Companies, None);

    let drives = use_drives();
    // `Some(None)` = creating, `Some(Some(id))` = editing that drive.
    let mut editing = use_signal(|| None::<Option<String>>);
    let mut form = use_signal(DriveForm::empty);

    let submit = {
        let session = session.clone();
        move |_| {
            let client = session.client();
            let form_value = form.cloned();
            let target = editing.cloned();
            spawn(async move {
                let result = match target {
                    Some(Some(company_id)) => hooks::update_drive(
                        client,
                        queries,
                        &company_id,
                        &UpdateDriveRequest {
                            name: Some(form_value.name),
                            location: Some(form_value.location),
                            role_title: Some(form_value.role_title),
                            ctc: Some(form_value.ctc),
                            drive_date: Some(form_value.drive_date),
                            status: Some(form_value.status),
                            description: Some(form_value.description),
                            ..Default::default()
                        },
                    )
                    .await
                    .map(|_| ()),
                    _ => hooks::create_drive(
                        client,
                        queries,
                        &CreateDriveRequest {
                            name: form_value.name,
                            location: form_value.location,
                            role_title: form_value.role_title,
                            ctc: form_value.ctc,
                            drive_date: form_value.drive_date,
                            status: form_value.status,
                            description: Some(form_value.description).filter(|s| !s.is_empty()),
                            eligibility: None,
                            selection_process: Vec::new(),
                        },
                    )
                    .await
                    .map(|_| ()),
                };
                if result.is_ok() {
                    editing.set(None);
                }
            });
        }
    };

    let remove = {
        let session = session.clone();
        move |company_id: String| {
            let client = session.client();
            spawn(async move {
                let _ = hooks::delete_drive(client, queries, &company_id).await;
            });
        }
    };

    rsx! {
        header { class: "flex items-center justify-between mb-8",
            div {
                h1 { class: "text-3xl font-bold text-slate-900", "Drives" }
                p { class: "text-slate-500 mt-1", "Create, edit and close recruiting drives." }
            }
            Button {
                variant: ButtonVariant::Primary,
                onclick: move |_| {
                    form.set(DriveForm::empty());
                    editing.set(Some(None));
                },
                "+ New Drive"
            }
        }

        match drives.read().as_ref() {
            Some(Ok(list)) => rsx! {
                div { class: "bg-white rounded-xl border border-slate-200 shadow-sm overflow-hidden",
                    table { class: "w-full text-sm",
                        thead { class: "bg-slate-50 text-left text-slate-500",
                            tr {
                                th { class: "px-6 py-3 font-medium", "Company" }
                                th { class: "px-6 py-3 font-medium", "Role" }
                                th { class: "px-6 py-3 font-medium", "Drive Date" }
                                th { class: "px-6 py-3 font-medium", "Status" }
                                th { class: "px-6 py-3 font-medium", "Registered" }
                                th { class: "px-6 py-3" }
                            }
                        }
                        tbody { class: "divide-y divide-slate-100",
                            for company in list.iter().cloned() {
                                tr { key: "{company.id}", class: "hover:bg-slate-50",
                                    td { class: "px-6 py-4 font-medium text-slate-900",
                                        Link {
                                            to: Route::CompanyDetail { id: company.id.clone() },
                                            class: "hover:text-indigo-600",
                                            "{company.name}"
                                        }
                                    }
                                    td { class: "px-6 py-4 text-slate-600", "{company.role_title}" }
                                    td { class: "px-6 py-4 text-slate-600", "{company.drive_date}" }
                                    td { class: "px-6 py-4",
                                        StatusBadge { status: company.status }
                                    }
                                    td { class: "px-6 py-4 text-slate-600", "{company.registration_count}" }
                                    td { class: "px-6 py-4 text-right space-x-3",
                                        button {
                                            class: "text-sm text-indigo-600 hover:underline",
                                            onclick: {
                                                let company = company.clone();
                                                move |_| {
                                                    form.set(DriveForm::from_company(&company));
                                                    editing.set(Some(Some(company.id.clone())));
                                                }
                                            },
                                            "Edit"
                                        }
                                        button {
                                            class: "text-sm text-red-600 hover:underline",
                                            onclick: {
                                                let remove = remove.clone();
                                                let id = company.id.clone();
                                                move |_| remove(id.clone())
                                            },
                                            "Delete"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            Some(Err(e)) => rsx! {
                div { class: "text-center py-12 text-red-600", "Failed to load drives: {e.user_message()}" }
            },
            None => rsx! {
                div { class: "text-center py-12 text-slate-500", "Loading drives..." }
            },
        }

        if editing.read().is_some() {
            DriveFormModal {
                form,
                is_edit: matches!(editing.cloned(), Some(Some(_))),
                on_close: move |_| editing.set(None),
                on_submit: submit.clone(),
            }
        }
    }
}

#[component]
fn DriveFormModal(
    form: Signal<DriveForm>,
    is_edit: bool,
    on_close: EventHandler<()>,
    on_submit: EventHandler<()>,
) -> Element {
    let mut form = form;

    rsx! {
        div { class: "fixed inset-0 bg-black/50 flex items-center justify-center z-50",
            div { class: "bg-white rounded-xl shadow-2xl w-full max-w-lg mx-4",
                div { class: "px-6 py-4 border-b border-slate-200",
                    h3 { class: "text-xl font-bold text-slate-900",
                        if is_edit { "Edit Drive" } else { "Create Drive" }
                    }
                }
                form {
                    onsubmit: move |e: FormEvent| {
                        e.prevent_default();
                        on_submit.call(());
                    },
                    div { class: "p-6 space-y-4 max-h-[60vh] overflow-y-auto",
                        div { class: "grid grid-cols-2 gap-4",
                            div {
                                label { class: "block text-sm font-medium text-slate-700 mb-2", "Company" }
                                TextInput {
                                    value: form.read().name.clone(),
                                    placeholder: Some("Acme Corp".to_string()),
                                    oninput: move |e: FormEvent| form.write().name = e.value(),
                                }
                            }
                            div {
                                label { class: "block text-sm font-medium text-slate-700 mb-2", "Role" }
                                TextInput {
                                    value: form.read().role_title.clone(),
                                    placeholder: Some("Software Engineer".to_string()),
                                    oninput: move |e: FormEvent| form.write().role_title = e.value(),
                                }
                            }
                        }
                        div { class: "grid grid-cols-2 gap-4",
                            div {
                                label { class: "block text-sm font-medium text-slate-700 mb-2", "CTC" }
                                TextInput {
                                    value: form.read().ctc.clone(),
                                    placeholder: Some("12 LPA".to_string()),
                                    oninput: move |e: FormEvent| form.write().ctc = e.value(),
                                }
                            }
                            div {
                                label { class: "block text-sm font-medium text-slate-700 mb-2", "Location" }
                                TextInput {
                                    value: form.read().location.clone(),
                                    placeholder: Some("Bengaluru".to_string()),
                                    oninput: move |e: FormEvent| form.write().location = e.value(),
                                }
                            }
                        }
                        div { class: "grid grid-cols-2 gap-4",
                            div {
                                label { class: "block text-sm font-medium text-slate-700 mb-2", "Drive Date" }
                                TextInput {
                                    value: form.read().drive_date.clone(),
                                    input_type: Some(crate::components::ui::InputType::Date),
                                    oninput: move |e: FormEvent| form.write().drive_date = e.value(),
                                }
                            }
                            div {
                                label { class: "block text-sm font-medium text-slate-700 mb-2", "Status" }
                                select {
                                    class: "w-full rounded-lg bg-white text-slate-900 px-4 py-2.5 text-sm border border-slate-300 focus:outline-none focus:ring-2 focus:ring-indigo-500/40",
                                    value: "{form.read().status.as_str()}",
                                    onchange: move |e| {
                                        if let Some(status) = DriveStatus::parse(&e.value()) {
                                            form.write().status = status;
                                        }
                                    },
                                    option { value: "upcoming", "Upcoming" }
                                    option { value: "ongoing", "Ongoing" }
                                    option { value: "completed", "Completed" }
                                    option { value: "closed", "Closed" }
                                }
                            }
                        }
                        div {
                            label { class: "block text-sm font-medium text-slate-700 mb-2", "Description" }
                            textarea {
                                class: "w-full rounded-lg bg-white text-slate-900 px-4 py-2.5 text-sm border border-slate-300 placeholder-slate-400 focus:outline-none focus:ring-2 focus:ring-indigo-500/40 min-h-24",
                                placeholder: "What makes this drive interesting...",
                                value: "{form.read().description}",
                                oninput: move |e| form.write().description = e.value(),
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
                            if is_edit { "Save Changes" } else { "Create Drive" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StudentsTable() -> Element {
    let students = use_students();

    rsx! {
        header { class: "mb-8",
            h1 { class: "text-3xl font-bold text-slate-900", "Students" }
            p { class: "text-slate-500 mt-1", "Every student registered on the portal." }
        }

        match students.read().as_ref() {
            Some(Ok(list)) => rsx! {
                div { class: "bg-white rounded-xl border border-slate-200 shadow-sm overflow-hidden",
                    table { class: "w-full text-sm",
                        thead { class: "bg-slate-50 text-left text-slate-500",
                            tr {
                                th { class: "px-6 py-3 font-medium", "Name" }
                                th { class: "px-6 py-3 font-medium", "Email" }
                                th { class: "px-6 py-3 font-medium", "Department" }
                                th { class: "px-6 py-3 font-medium", "Batch" }
                            }
                        }
                        tbody { class: "divide-y divide-slate-100",
                            for student in list.iter().cloned() {
                                tr { key: "{student.id}", class: "hover:bg-slate-50",
                                    td { class: "px-6 py-4 font-medium text-slate-900", "{student.name}" }
                                    td { class: "px-6 py-4 text-slate-600", "{student.email}" }
                                    td { class: "px-6 py-4 text-slate-600",
                                        {student.department.clone().unwrap_or_else(|| "—".to_string())}
                                    }
                                    td { class: "px-6 py-4 text-slate-600",
                                        {student.batch.clone().unwrap_or_else(|| "—".to_string())}
                                    }
                                }
                            }
                        }
                    }
                }
            },
            Some(Err(e)) => rsx! {
                div { class: "text-center py-12 text-red-600", "Failed to load students: {e.user_message()}" }
            },
            None => rsx! {
                div { class: "text-center py-12 text-slate-500", "Loading students..." }
            },
        }
    }
}

#[component]
fn RegistrationsTable() -> Element {
    let session = use_session();
    let queries = use_query_client();
    use_realtime(WatchedTable::Registrations, None);

    let registrations = use_all_registrations();

    let advance = {
        let session = session.clone();
        move |(registration_id, status): (String, ApplicationStatus)| {
            let client = session.client();
            spawn(async move {
                let _ = hooks::set_registration_status(client, queries, &registration_id, status)
                    .await;
            });
        }
    };

    rsx! {
        header { class: "mb-8",
            h1 { class: "text-3xl font-bold text-slate-900", "Applications" }
            p { class: "text-slate-500 mt-1",
                "Move candidates through the selection pipeline."
            }
        }

        match registrations.read().as_ref() {
            Some(Ok(regs)) if regs.is_empty() => rsx! {
                div { class: "text-center py-16 text-slate-500", "No applications yet." }
            },
            Some(Ok(regs)) => rsx! {
                div { class: "bg-white rounded-xl border border-slate-200 shadow-sm overflow-hidden",
                    table { class: "w-full text-sm",
                        thead { class: "bg-slate-50 text-left text-slate-500",
                            tr {
                                th { class: "px-6 py-3 font-medium", "Student" }
                                th { class: "px-6 py-3 font-medium", "Drive" }
                                th { class: "px-6 py-3 font-medium", "Status" }
                                th { class: "px-6 py-3 font-medium", "Update" }
                            }
                        }
                        tbody { class: "divide-y divide-slate-100",
                            for detail in regs.iter().cloned() {
                                tr { key: "{detail.registration.id}", class: "hover:bg-slate-50",
                                    td { class: "px-6 py-4",
                                        p { class: "font-medium text-slate-900", "{detail.student_name}" }
                                        p { class: "text-xs text-slate-500", "{detail.student_email}" }
                                    }
                                    td { class: "px-6 py-4",
                                        p { class: "font-medium text-slate-900", "{detail.company_name}" }
                                        p { class: "text-xs text-slate-500", "{detail.company_role}" }
                                    }
                                    td { class: "px-6 py-4",
                                        ApplicationBadge { status: detail.registration.status }
                                    }
                                    td { class: "px-6 py-4",
                                        select {
                                            class: "rounded-lg bg-white text-slate-900 px-3 py-1.5 text-sm border border-slate-300 focus:outline-none focus:ring-2 focus:ring-indigo-500/40",
                                            value: "{detail.registration.status.as_str()}",
                                            onchange: {
                                                let advance = advance.clone();
                                                let registration_id = detail.registration.id.clone();
                                                move |e: FormEvent| {
                                                    if let Some(status) = ApplicationStatus::parse(&e.value()) {
                                                        advance((registration_id.clone(), status));
                                                    }
                                                }
                                            },
                                            option { value: "registered", "Registered" }
                                            option { value: "applied", "Applied" }
                                            option { value: "shortlisted", "Shortlisted" }
                                            option { value: "interviewing", "Interviewing" }
                                            option { value: "selected", "Selected" }
                                            option { value: "rejected", "Rejected" }
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

#[component]
fn AdminSettings() -> Element {
    rsx! {
        header { class: "mb-8",
            h1 { class: "text-3xl font-bold text-slate-900", "Settings" }
            p { class: "text-slate-500 mt-1", "Portal configuration." }
        }
        div { class: "bg-white rounded-xl p-6 border border-slate-200 shadow-sm max-w-xl",
            p { class: "text-sm text-slate-500",
                "Deployment-level settings (database path, public URL, Google sign-in credentials) are configured through environment variables on the server."
            }
        }
    }
}
