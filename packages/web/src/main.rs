use api::ClientConfig;
use dioxus::prelude::*;

use ui::SiteProvider;
use views::{Detail, NotFound, Orders};

mod views;

/// Id of the element the server-rendered template reserves for the app.
pub(crate) const MOUNT_ID: &str = "main";

/// Id of the optional inline TOML block with the client configuration.
const CONFIG_ID: &str = "site-config";

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/users/orders")]
    Orders {},
    #[route("/:section/:id")]
    Detail { section: String, id: String },
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

fn main() {
    if let Err(e) = dioxus::logger::init(dioxus::logger::tracing::Level::INFO) {
        eprintln!("failed to initialise logging: {e}");
    }
    dioxus::launch(App);
}

fn site_config() -> ClientConfig {
    let embedded = ui::page::inline_text(CONFIG_ID);
    let origin = ui::page::page_origin();
    ClientConfig::from_page(embedded.as_deref(), origin.as_deref())
}

#[component]
fn App() -> Element {
    let config = use_hook(site_config);

    rsx! {
        SiteProvider {
            config: config,
            Router::<Route> {}
        }
    }
}
