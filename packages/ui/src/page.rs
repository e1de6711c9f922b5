//! Access to the hosting page: dialogs, navigation and the CSRF token sources.
//!
//! Controllers only see the [`Page`] and [`api::TokenSources`] traits. On the
//! web they are backed by `web_sys`; elsewhere dialogs are logged and
//! declined, and no token is available.

use api::TokenSources;

pub trait Page {
    /// Blocking yes/no question.
    fn confirm(&self, message: &str) -> bool;
    /// Blocking message box.
    fn alert(&self, message: &str);
    /// Leave the current page.
    fn redirect(&self, url: &str);
}

/// The browser window this app runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrowserPage;

#[cfg(target_arch = "wasm32")]
impl Page for BrowserPage {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn redirect(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(url);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Page for BrowserPage {
    fn confirm(&self, message: &str) -> bool {
        tracing::warn!("confirm dialog unavailable, declining: {message}");
        false
    }

    fn alert(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn redirect(&self, url: &str) {
        tracing::info!("redirect requested to {url}");
    }
}

/// Ask the user to confirm an action.
pub fn confirm_action(page: &impl Page, message: &str) -> bool {
    page.confirm(message)
}

/// Reads the CSRF token candidates out of the live document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentTokenSources;

#[cfg(target_arch = "wasm32")]
impl DocumentTokenSources {
    fn query(selector: &str) -> Option<web_sys::Element> {
        web_sys::window()?
            .document()?
            .query_selector(selector)
            .ok()
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl TokenSources for DocumentTokenSources {
    fn meta_content(&self) -> Option<String> {
        Self::query(&format!("meta[name={}]", api::token::META_NAME))?.get_attribute("content")
    }

    fn cookie_string(&self) -> Option<String> {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?.document()?;
        document
            .dyn_into::<web_sys::HtmlDocument>()
            .ok()?
            .cookie()
            .ok()
    }

    fn hidden_field(&self) -> Option<String> {
        use wasm_bindgen::JsCast;

        let input = Self::query(&format!("input[name={}]", api::token::HIDDEN_FIELD_NAME))?;
        input
            .dyn_into::<web_sys::HtmlInputElement>()
            .ok()
            .map(|i| i.value())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TokenSources for DocumentTokenSources {
    fn meta_content(&self) -> Option<String> {
        None
    }

    fn cookie_string(&self) -> Option<String> {
        None
    }

    fn hidden_field(&self) -> Option<String> {
        None
    }
}

/// `data-*` attributes of the element the app is mounted on, in document order.
///
/// The server-rendered template uses them to tell the app what it is showing
/// (e.g. `data-scenic-id="12"`).
pub fn mount_dataset(element_id: &str) -> Vec<(String, String)> {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(element) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(element_id))
        else {
            return Vec::new();
        };
        let attrs = element.attributes();
        (0..attrs.length())
            .filter_map(|i| attrs.item(i))
            .map(|attr| (attr.name(), attr.value()))
            .filter(|(name, _)| name.starts_with("data-"))
            .collect()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = element_id;
        Vec::new()
    }
}

/// Text content of the element with `element_id`, such as an inline
/// `<script type="application/toml">` block.
pub fn inline_text(element_id: &str) -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()?
            .document()?
            .get_element_by_id(element_id)?
            .text_content()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = element_id;
        None
    }
}

/// Current page origin, e.g. `"https://travel.example.com"`.
pub fn page_origin() -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()?.location().origin().ok()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::Page;

    /// Page whose confirm answer is fixed and which records every interaction.
    #[derive(Clone, Default)]
    pub struct ScriptedPage {
        pub answer: bool,
        pub confirms: Rc<RefCell<Vec<String>>>,
        pub alerts: Rc<RefCell<Vec<String>>>,
        pub redirects: Rc<RefCell<Vec<String>>>,
    }

    impl ScriptedPage {
        pub fn answering(answer: bool) -> Self {
            Self {
                answer,
                ..Default::default()
            }
        }
    }

    impl Page for ScriptedPage {
        fn confirm(&self, message: &str) -> bool {
            self.confirms.borrow_mut().push(message.to_string());
            self.answer
        }

        fn alert(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_string());
        }

        fn redirect(&self, url: &str) {
            self.redirects.borrow_mut().push(url.to_string());
        }
    }
}
