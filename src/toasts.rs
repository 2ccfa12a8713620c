//! Toast notification store.

use std::sync::atomic::{AtomicU64, Ordering};

use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

pub static TOASTS: GlobalSignal<Vec<Toast>> = Signal::global(Vec::new);

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

const MAX_VISIBLE: usize = 4;

fn push(kind: ToastKind, message: impl Into<String>) {
    let toast = Toast {
        id: NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed),
        kind,
        message: message.into(),
    };
    let mut toasts = TOASTS.write();
    toasts.push(toast);
    let overflow = toasts.len().saturating_sub(MAX_VISIBLE);
    if overflow > 0 {
        toasts.drain(..overflow);
    }
}

pub fn toast_success(message: impl Into<String>) {
    push(ToastKind::Success, message);
}

pub fn toast_error(message: impl Into<String>) {
    push(ToastKind::Error, message);
}

pub fn dismiss_toast(id: u64) {
    TOASTS.write().retain(|t| t.id != id);
}

/// Fixed-position toast stack; mounted once at the app root.
#[component]
pub fn ToastHost() -> Element {
    rsx! {
        div { class: "fixed bottom-6 right-6 z-50 flex flex-col gap-2",
            for toast in TOASTS.read().iter().cloned() {
                div {
                    key: "{toast.id}",
                    class: format!(
                        "flex items-center gap-3 px-4 py-3 rounded-lg shadow-lg text-sm text-white {}",
                        match toast.kind {
                            ToastKind::Success => "bg-emerald-600",
                            ToastKind::Error => "bg-red-600",
                        },
                    ),
                    span { "{toast.message}" }
                    button {
                        class: "ml-2 text-white/70 hover:text-white",
                        onclick: move |_| dismiss_toast(toast.id),
                        "✕"
                    }
                }
            }
        }
    }
}
