use dioxus::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ButtonVariant {
    Primary,
    Outline,
    Danger,
    Ghost,
}

impl ButtonVariant {
    fn classes(self) -> &'static str {
        match self {
            Self::Primary => {
                "bg-indigo-600 hover:bg-indigo-500 active:bg-indigo-700 text-white shadow-sm"
            }
            Self::Outline => {
                "border border-slate-300 bg-white hover:bg-slate-50 text-slate-700"
            }
            Self::Danger => "bg-red-600 hover:bg-red-500 text-white",
            Self::Ghost => "text-slate-600 hover:bg-slate-100",
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct ButtonProps {
    #[props(optional)]
    pub variant: Option<ButtonVariant>,
    #[props(optional)]
    pub class: Option<String>,
    #[props(optional)]
    pub r#type: Option<String>,
    #[props(optional)]
    pub disabled: Option<bool>,
    #[props(default)]
    pub onclick: EventHandler<MouseEvent>,
    pub children: Element,
}

#[component]
pub fn Button(props: ButtonProps) -> Element {
    let base = "inline-flex items-center justify-center gap-2 rounded-lg px-4 py-2 text-sm font-medium transition-colors disabled:opacity-50 disabled:cursor-not-allowed";
    let variant = props.variant.unwrap_or(ButtonVariant::Primary).classes();
    let class = match props.class {
        Some(extra) if !extra.is_empty() => format!("{base} {variant} {extra}"),
        _ => format!("{base} {variant}"),
    };

    rsx! {
        button {
            class,
            r#type: props.r#type.unwrap_or_else(|| "button".to_string()),
            disabled: props.disabled.unwrap_or(false),
            onclick: move |e| props.onclick.call(e),
            {props.children}
        }
    }
}
