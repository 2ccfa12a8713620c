use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div { class: "min-h-screen flex flex-col items-center justify-center bg-slate-50 text-center px-4",
            p { class: "text-6xl font-bold text-indigo-600 mb-4", "404" }
            h1 { class: "text-2xl font-bold text-slate-900 mb-2", "Page not found" }
            p { class: "text-slate-500 mb-6", "The page /{path} doesn't exist." }
            Link {
                to: Route::Root {},
                class: "px-6 py-2.5 bg-indigo-600 hover:bg-indigo-500 text-white rounded-lg font-medium transition-colors",
                "Back to the portal"
            }
        }
    }
}
