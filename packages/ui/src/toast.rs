//! Transient success/error toasts.
//!
//! [`ToastQueue`] lives in a context signal provided by
//! [`SiteProvider`](crate::SiteProvider); [`ToastHost`] renders it and each
//! toast removes itself after the configured duration. [`ToastNotifier`] is
//! the [`Notifier`] handed to the API client. When no queue is mounted it
//! falls back to a blocking alert.

use std::time::Duration;

use api::{NoticeKind, Notifier};
use dioxus::prelude::*;

use crate::page::{BrowserPage, Page};

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

impl Toast {
    pub fn class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "toast show align-items-center text-white bg-success border-0",
            NoticeKind::Error => "toast show align-items-center text-white bg-danger border-0",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastQueue {
    pub toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn push(&mut self, kind: NoticeKind, message: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            kind,
            message: message.to_string(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }
}

pub fn use_toasts() -> Option<Signal<ToastQueue>> {
    try_use_context::<Signal<ToastQueue>>()
}

/// Pushes notices onto the toast queue, or alerts through `P` when there is
/// none.
#[derive(Clone, Copy)]
pub struct ToastNotifier<P = BrowserPage> {
    queue: Option<Signal<ToastQueue>>,
    page: P,
}

impl ToastNotifier {
    pub fn new(queue: Option<Signal<ToastQueue>>) -> Self {
        Self::with_page(queue, BrowserPage)
    }
}

impl<P: Page> ToastNotifier<P> {
    pub fn with_page(queue: Option<Signal<ToastQueue>>, page: P) -> Self {
        Self { queue, page }
    }
}

impl<P: Page> Notifier for ToastNotifier<P> {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match self.queue {
            Some(mut queue) => {
                queue.write().push(kind, message);
            }
            None => self.page.alert(message),
        }
    }
}

/// Fixed-position stack of the current toasts.
#[component]
pub fn ToastHost(duration_ms: u64) -> Element {
    let Some(queue) = use_toasts() else {
        return rsx! {};
    };
    let toasts = queue().toasts.clone();

    rsx! {
        div {
            class: "toast-container position-fixed top-0 end-0 p-3",
            for toast in toasts {
                ToastItem {
                    key: "{toast.id}",
                    toast: toast.clone(),
                    duration_ms,
                }
            }
        }
    }
}

#[component]
fn ToastItem(toast: Toast, duration_ms: u64) -> Element {
    let mut queue = use_context::<Signal<ToastQueue>>();
    let id = toast.id;

    use_future(move || async move {
        sleep(Duration::from_millis(duration_ms)).await;
        queue.write().dismiss(id);
    });

    rsx! {
        div {
            class: toast.class(),
            role: "alert",
            div {
                class: "d-flex",
                div { class: "toast-body", "{toast.message}" }
                button {
                    r#type: "button",
                    class: "btn-close btn-close-white me-2 m-auto",
                    onclick: move |_| queue.write().dismiss(id),
                }
            }
        }
    }
}

async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}
