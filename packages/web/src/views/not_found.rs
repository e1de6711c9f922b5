use dioxus::prelude::*;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    tracing::debug!("no client view for /{}", segments.join("/"));
    rsx! {}
}
