#![allow(non_snake_case)]

use dioxus::prelude::*;
use views::{
    AdminDashboard, AdminSection, Applications, Auth, CompanyDetail, Interviews, NotFound,
    Resources, ResumeBuilder, SidebarLayout, StudentDashboard,
};

mod api_client;
mod auth;
mod auth_client;
mod auth_session;
mod companies;
mod components;
mod guards;
mod hooks;
mod messages;
mod models;
mod problem;
mod queries;
mod realtime;
mod registrations;
mod server;
mod session;
mod toasts;
mod users;
mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/auth")]
    Auth {},
    #[layout(SidebarLayout)]
        #[route("/dashboard")]
        StudentDashboard {},
        #[route("/applications")]
        Applications {},
        #[route("/interviews")]
        Interviews {},
        #[route("/resume")]
        ResumeBuilder {},
        #[route("/resources")]
        Resources {},
        #[route("/company/:id")]
        CompanyDetail { id: String },
        #[route("/admin")]
        AdminDashboard {},
        #[route("/admin/:section")]
        AdminSection { section: String },
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[cfg(feature = "server")]
pub static DB: once_cell::sync::Lazy<aurora_db::Aurora> = once_cell::sync::Lazy::new(|| {
    let db_path = server::config::db_path();
    let db = aurora_db::Aurora::open(&db_path).expect("Failed to open database");

    // Initialize collections
    use aurora_db::FieldType;
    let _ = db.new_collection(
        "users",
        vec![
            ("id", FieldType::String, true),
            ("email", FieldType::String, true),
            ("password_hash", FieldType::String, false),
            ("created_at", FieldType::String, false),
            ("updated_at", FieldType::String, false),
        ],
    );
    let _ = db.new_collection(
        "profiles",
        vec![
            ("id", FieldType::String, true),
            ("email", FieldType::String, false),
            ("name", FieldType::String, false),
            ("department", FieldType::String, false),
            ("batch", FieldType::String, false),
            ("avatar_url", FieldType::String, false),
            ("updated_at", FieldType::String, false),
        ],
    );
    let _ = db.new_collection(
        "user_roles",
        vec![
            ("user_id", FieldType::String, true),
            ("role", FieldType::String, false),
            ("created_at", FieldType::String, false),
        ],
    );
    let _ = db.new_collection(
        "companies",
        vec![
            ("id", FieldType::String, true),
            ("name", FieldType::String, false),
            ("location", FieldType::String, false),
            ("role_title", FieldType::String, false),
            ("ctc", FieldType::String, false),
            ("drive_date", FieldType::String, false),
            ("status", FieldType::String, false),
            ("description", FieldType::String, false),
            ("eligibility", FieldType::String, false),
            ("selection_process", FieldType::String, false),
            ("created_by", FieldType::String, false),
            ("created_at", FieldType::String, false),
            ("updated_at", FieldType::String, false),
        ],
    );
    let _ = db.new_collection(
        "registrations",
        vec![
            ("id", FieldType::String, true),
            ("user_id", FieldType::String, false),
            ("company_id", FieldType::String, false),
            ("status", FieldType::String, false),
            ("created_at", FieldType::String, false),
            ("updated_at", FieldType::String, false),
        ],
    );
    let _ = db.new_collection(
        "messages",
        vec![
            ("id", FieldType::String, true),
            ("company_id", FieldType::String, false),
            ("user_id", FieldType::String, false),
            ("content", FieldType::String, false),
            ("pinned", FieldType::String, false),
            ("created_at", FieldType::String, false),
        ],
    );

    db
});

fn main() {
    dioxus::launch(App);
}

/// `/` lands on the auth screen; the public-only gate bounces signed-in
/// users straight to their home from there.
#[component]
fn Root() -> Element {
    let nav = use_navigator();

    use_effect(move || {
        nav.replace(Route::Auth {});
    });

    rsx! {
        div { class: "flex items-center justify-center min-h-screen bg-slate-50 text-slate-500",
            "Redirecting..."
        }
    }
}

#[component]
fn App() -> Element {
    use_context_provider(queries::QueryClient::new);

    rsx! {
        script { src: "https://cdn.tailwindcss.com" }

        auth_session::AuthProvider {
            realtime::RealtimeProvider {
                Router::<Route> {}
                toasts::ToastHost {}
            }
        }
    }
}
