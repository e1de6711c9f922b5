//! Detail pages (`/scenic/12/`, `/routes/3/`, ...) get a favorite button.

use api::TargetType;
use dioxus::prelude::*;
use ui::{target_from_attributes, FavoriteButton};

use crate::MOUNT_ID;

fn section_type(section: &str) -> Option<TargetType> {
    match section {
        "scenic" => Some(TargetType::Scenic),
        "routes" => Some(TargetType::Route),
        "hotels" => Some(TargetType::Hotel),
        "foods" => Some(TargetType::Food),
        _ => None,
    }
}

#[component]
pub fn Detail(section: String, id: String) -> Element {
    let Some(kind) = section_type(&section) else {
        tracing::debug!("no favorite button for section {section}");
        return rsx! {};
    };

    // Attributes on the mount element take precedence over the URL.
    let mut attributes = ui::page::mount_dataset(MOUNT_ID);
    attributes.push((format!("data-{kind}-id"), id.clone()));

    let target = target_from_attributes(
        attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );

    match target {
        Some(target) => rsx! {
            div {
                class: "favorite-action my-3",
                FavoriteButton { target: target }
            }
        },
        None => rsx! {},
    }
}
