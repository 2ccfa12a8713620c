use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct StatCardProps {
    pub title: String,
    pub value: String,
    #[props(optional)]
    pub hint: Option<String>,
}

#[component]
pub fn StatCard(props: StatCardProps) -> Element {
    rsx! {
        div { class: "rounded-xl border border-slate-200 bg-white p-5 shadow-sm",
            p { class: "text-sm text-slate-500", "{props.title}" }
            p { class: "mt-1 text-3xl font-bold text-slate-900", "{props.value}" }
            if let Some(hint) = &props.hint {
                p { class: "mt-1 text-xs text-slate-400", "{hint}" }
            }
        }
    }
}
