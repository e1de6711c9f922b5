//! This crate contains all shared UI for the site: toasts, the favorite
//! button, order cards and the formatting helpers they use.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;

    pub mod regular {
        pub use dioxus_free_icons::icons::fa_regular_icons::*;
    }
}

pub mod format;
pub use format::{format_date, format_datetime, format_price, image_url, truncate_text};

pub mod page;
pub use page::{confirm_action, BrowserPage, DocumentTokenSources, Page};

mod site;
pub use site::{use_api_client, use_client_config, SiteProvider, WebClient};

pub mod toast;
pub use toast::{ToastHost, ToastNotifier, ToastQueue};

pub mod favorite;
pub use favorite::{
    target_from_attributes, toggle_favorite, FavoriteButton, FavoriteControl, FavoriteState,
};

pub mod order;
pub use order::{OrderCard, OrderList, OrderView};
