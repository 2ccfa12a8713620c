use dioxus::prelude::*;

use crate::guards::Protected;
use crate::models::Role;

struct ResourceEntry {
    title: &'static str,
    blurb: &'static str,
    tag: &'static str,
}

const RESOURCES: &[ResourceEntry] = &[
    ResourceEntry {
        title: "Aptitude Question Bank",
        blurb: "Quant, logical reasoning and verbal sets used in last season's screens.",
        tag: "Aptitude",
    },
    ResourceEntry {
        title: "DSA Crash Course",
        blurb: "Eight-week plan covering arrays to graphs, with curated problem lists.",
        tag: "Coding",
    },
    ResourceEntry {
        title: "System Design Primer",
        blurb: "Notes and diagrams for the design rounds of product companies.",
        tag: "Interviews",
    },
    ResourceEntry {
        title: "HR Round Playbook",
        blurb: "Common behavioural questions and how seniors answered them.",
        tag: "Interviews",
    },
    ResourceEntry {
        title: "Resume Review Checklist",
        blurb: "The placement cell's checklist before your resume goes to recruiters.",
        tag: "Resume",
    },
];

#[component]
pub fn Resources() -> Element {
    rsx! {
        Protected { allowed: vec![Role::Student], ResourcesInner {} }
    }
}

#[component]
fn ResourcesInner() -> Element {
    rsx! {
        header { class: "mb-8",
            h1 { class: "text-3xl font-bold text-slate-900", "Resources" }
            p { class: "text-slate-500 mt-1", "Preparation material curated by the placement cell." }
        }

        div { class: "grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6",
            for entry in RESOURCES {
                div {
                    key: "{entry.title}",
                    class: "rounded-xl border border-slate-200 bg-white p-6 shadow-sm hover:shadow-md transition-shadow",
                    span { class: "inline-block px-2.5 py-0.5 rounded-full bg-slate-100 text-slate-600 text-xs font-medium mb-3",
                        "{entry.tag}"
                    }
                    h3 { class: "font-semibold text-slate-900 mb-1", "{entry.title}" }
                    p { class: "text-sm text-slate-500", "{entry.blurb}" }
                }
            }
        }
    }
}
