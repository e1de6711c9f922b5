//! Site-wide context: configuration, toasts and the API client.

use api::{ApiClient, ClientConfig, ReqwestTransport};
use dioxus::prelude::*;

use crate::page::DocumentTokenSources;
use crate::toast::{ToastHost, ToastNotifier, ToastQueue};

/// The client every component talks to the backend through.
pub type WebClient = ApiClient<ReqwestTransport, ToastNotifier, DocumentTokenSources>;

pub fn use_api_client() -> WebClient {
    use_context::<WebClient>()
}

pub fn use_client_config() -> ClientConfig {
    use_context::<ClientConfig>()
}

/// Provides config, the toast queue and the API client to its children.
/// Wrap the app with this component.
#[component]
pub fn SiteProvider(config: ClientConfig, children: Element) -> Element {
    let toasts = use_signal(ToastQueue::default);
    use_context_provider(|| toasts);

    let provided = config.clone();
    use_context_provider(|| provided);

    let transport_config = config.clone();
    use_context_provider(move || {
        ApiClient::new(
            ReqwestTransport::new(transport_config),
            ToastNotifier::new(Some(toasts)),
            DocumentTokenSources,
        )
    });

    rsx! {
        {children}
        ToastHost { duration_ms: config.toast_duration_ms }
    }
}
