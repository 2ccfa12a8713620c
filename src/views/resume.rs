use dioxus::prelude::*;

use crate::components::ui::{Button, ButtonVariant, Card, CardBody, CardHeader, TextInput};
use crate::guards::Protected;
use crate::models::Role;

#[component]
pub fn ResumeBuilder() -> Element {
    rsx! {
        Protected { allowed: vec![Role::Student], ResumeInner {} }
    }
}

/// Local-only form state; nothing here is persisted.
#[component]
fn ResumeInner() -> Element {
    let mut headline = use_signal(String::new);
    let mut summary = use_signal(String::new);
    let mut skills = use_signal(String::new);
    let mut projects = use_signal(Vec::<String>::new);
    let mut new_project = use_signal(String::new);

    rsx! {
        header { class: "mb-8",
            h1 { class: "text-3xl font-bold text-slate-900", "Resume Builder" }
            p { class: "text-slate-500 mt-1", "Draft the highlights recruiters see first." }
        }

        div { class: "grid grid-cols-1 lg:grid-cols-2 gap-8",
            Card {
                CardHeader { title: "Basics".to_string() }
                CardBody {
                    div { class: "space-y-4",
                        div {
                            label { class: "block text-sm font-medium text-slate-700 mb-2", "Headline" }
                            TextInput {
                                value: headline.cloned(),
                                placeholder: Some("Final-year CS undergrad, backend enthusiast".to_string()),
                                oninput: move |e: FormEvent| headline.set(e.value()),
                            }
                        }
                        div {
                            label { class: "block text-sm font-medium text-slate-700 mb-2", "Summary" }
                            textarea {
                                class: "w-full rounded-lg bg-white text-slate-900 px-4 py-2.5 text-sm border border-slate-300 placeholder-slate-400 focus:outline-none focus:ring-2 focus:ring-indigo-500/40 min-h-32",
                                placeholder: "A few sentences about you...",
                                value: "{summary}",
                                oninput: move |e| summary.set(e.value()),
                            }
                        }
                        div {
                            label { class: "block text-sm font-medium text-slate-700 mb-2", "Skills (comma separated)" }
                            TextInput {
                                value: skills.cloned(),
                                placeholder: Some("Rust, SQL, systems design".to_string()),
                                oninput: move |e: FormEvent| skills.set(e.value()),
                            }
                        }
                        div {
                            label { class: "block text-sm font-medium text-slate-700 mb-2", "Projects" }
                            div { class: "flex gap-2",
                                TextInput {
                                    value: new_project.cloned(),
                                    placeholder: Some("Project name and one-liner".to_string()),
                                    oninput: move |e: FormEvent| new_project.set(e.value()),
                                }
                                Button {
                                    variant: ButtonVariant::Outline,
                                    onclick: move |_| {
                                        let entry = new_project.read().trim().to_string();
                                        if !entry.is_empty() {
                                            projects.write().push(entry);
                                            new_project.set(String::new());
                                        }
                                    },
                                    "Add"
                                }
                            }
                        }
                    }
                }
            }

            Card {
                CardHeader { title: "Preview".to_string() }
                CardBody {
                    if headline.read().is_empty() && summary.read().is_empty() {
                        p { class: "text-slate-400 text-sm italic", "Start typing to see your resume take shape." }
                    } else {
                        div { class: "space-y-4",
                            h3 { class: "text-lg font-semibold text-slate-900", "{headline}" }
                            p { class: "text-sm text-slate-600 whitespace-pre-wrap", "{summary}" }
                            if !skills.read().is_empty() {
                                div { class: "flex flex-wrap gap-2",
                                    for skill in skills.read().split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
                                        span {
                                            key: "{skill}",
                                            class: "px-2.5 py-0.5 rounded-full bg-indigo-50 text-indigo-700 text-xs font-medium",
                                            "{skill}"
                                        }
                                    }
                                }
                            }
                            if !projects.read().is_empty() {
                                ul { class: "list-disc list-inside text-sm text-slate-600 space-y-1",
                                    for (i , project) in projects.read().iter().enumerate() {
                                        li { key: "{i}", "{project}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
