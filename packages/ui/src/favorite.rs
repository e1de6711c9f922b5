//! # Favorite toggle
//!
//! Each favorite button owns a [`FavoriteControl`]: the target it refers to,
//! its [`FavoriteState`] and an in-flight flag. The rendered classes, icon and
//! label are derived from that value and nothing else.
//!
//! - On mount, and whenever the button is given another target, the state is
//!   reconciled with `GET users/favorites/`, so it always matches the server
//!   whatever it showed before.
//! - On click: without a CSRF token the user is sent to the login page;
//!   while a request is pending further clicks are ignored; otherwise a
//!   favorited target is removed (`DELETE`, query string) and any other is
//!   added (`POST`, JSON body). The new state comes from the server reply.
//!   Failures leave the state untouched.

use api::{
    ApiClient, ApiError, FavoriteList, FavoriteTarget, FavoriteToggle, Notifier, TargetType,
    TokenSources, Transport,
};
use dioxus::prelude::*;

use crate::page::{BrowserPage, Page};
use crate::site::{use_api_client, use_client_config};
use crate::{icons, Icon};

/// Attributes that may carry the target id, in lookup order. Kind-specific
/// names also imply the target type.
const ID_ATTRIBUTES: [(&str, Option<TargetType>); 6] = [
    ("target-id", None),
    ("id", None),
    ("scenic-id", Some(TargetType::Scenic)),
    ("route-id", Some(TargetType::Route)),
    ("hotel-id", Some(TargetType::Hotel)),
    ("food-id", Some(TargetType::Food)),
];

const TYPE_ATTRIBUTES: [&str; 2] = ["target-type", "type"];

/// Read the target from `data-*` attributes. The first non-empty alias wins;
/// the type defaults to scenic. Returns `None` when no id is present.
pub fn target_from_attributes<'a, I>(attributes: I) -> Option<FavoriteTarget>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let attributes: Vec<(&str, &str)> = attributes
        .into_iter()
        .map(|(name, value)| (name.strip_prefix("data-").unwrap_or(name), value.trim()))
        .filter(|(_, value)| !value.is_empty())
        .collect();
    let lookup = |name: &str| {
        attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    };

    let (target_id, implied_type) = ID_ATTRIBUTES
        .iter()
        .find_map(|(name, implied)| lookup(name).map(|id| (id, *implied)))?;

    let explicit_type = TYPE_ATTRIBUTES
        .iter()
        .find_map(|name| lookup(name))
        .and_then(|value| match value.parse::<TargetType>() {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!("{e}, using default");
                None
            }
        });

    let target_type = explicit_type.or(implied_type).unwrap_or_default();
    Some(FavoriteTarget::new(target_id, target_type))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FavoriteState {
    #[default]
    NotFavorited,
    Favorited,
}

impl From<bool> for FavoriteState {
    fn from(favorited: bool) -> Self {
        if favorited {
            FavoriteState::Favorited
        } else {
            FavoriteState::NotFavorited
        }
    }
}

/// Request a click turns into.
#[derive(Clone, Debug, PartialEq)]
pub enum FavoriteIntent {
    Add(FavoriteTarget),
    Remove(FavoriteTarget),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickAction {
    /// No token: send the user to the login page.
    Login,
    /// A request for this control is still pending.
    Busy,
    Send(FavoriteIntent),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FavoriteControl {
    pub target: FavoriteTarget,
    pub state: FavoriteState,
    in_flight: bool,
}

impl FavoriteControl {
    pub fn new(target: FavoriteTarget) -> Self {
        Self {
            target,
            state: FavoriteState::NotFavorited,
            in_flight: false,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Point the control at another target, forgetting everything known
    /// about the previous one.
    pub fn retarget(&mut self, target: FavoriteTarget) {
        *self = Self::new(target);
    }

    /// Adopt the server's view of whether this target is a favorite.
    pub fn reconcile(&mut self, favorites: &FavoriteList) {
        self.state = favorites.contains(&self.target).into();
    }

    /// Decide what a click does and, when a request is due, mark it in flight.
    pub fn click(&mut self, has_token: bool) -> ClickAction {
        if !has_token {
            return ClickAction::Login;
        }
        if self.in_flight {
            return ClickAction::Busy;
        }
        self.in_flight = true;
        let target = self.target.clone();
        ClickAction::Send(match self.state {
            FavoriteState::Favorited => FavoriteIntent::Remove(target),
            FavoriteState::NotFavorited => FavoriteIntent::Add(target),
        })
    }

    /// Apply the outcome of `intent`. Returns a message to show when the
    /// server answered but refused the change.
    pub fn settle(
        &mut self,
        intent: &FavoriteIntent,
        result: &Result<FavoriteToggle, ApiError>,
    ) -> Option<String> {
        self.in_flight = false;
        let reply = match result {
            Ok(reply) => reply,
            // already reported by the client
            Err(_) => return None,
        };
        if !reply.status.is_empty() && reply.status != "success" {
            let message = reply.message.as_deref().unwrap_or(api::error::GENERIC_FAILURE);
            return Some(format!("操作失败: {message}"));
        }
        self.state = match reply.is_favorited {
            Some(flag) => flag.into(),
            None => matches!(intent, FavoriteIntent::Add(_)).into(),
        };
        None
    }

    pub fn class(&self) -> &'static str {
        match self.state {
            FavoriteState::Favorited => "btn active btn-danger",
            FavoriteState::NotFavorited => "btn btn-outline-danger",
        }
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            FavoriteState::Favorited => "已收藏",
            FavoriteState::NotFavorited => "收藏",
        }
    }
}

/// Fetch the favorites of the control's type and reconcile against them.
pub async fn load_favorite_state<T, N, S>(
    client: &ApiClient<T, N, S>,
    control: &mut FavoriteControl,
) -> Result<FavoriteState, ApiError>
where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    let favorites = client.favorites().list(control.target.target_type).await?;
    control.reconcile(&favorites);
    Ok(control.state)
}

/// Issue the request for `intent`.
pub async fn send_intent<T, N, S>(
    client: &ApiClient<T, N, S>,
    intent: &FavoriteIntent,
) -> Result<FavoriteToggle, ApiError>
where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    match intent {
        FavoriteIntent::Add(target) => client.favorites().add(target).await,
        FavoriteIntent::Remove(target) => client.favorites().remove(target).await,
    }
}

/// Mutable access to a [`FavoriteControl`], held only between awaits.
pub trait ControlSlot {
    fn with_control<R>(&mut self, f: impl FnOnce(&mut FavoriteControl) -> R) -> R;
}

impl ControlSlot for FavoriteControl {
    fn with_control<R>(&mut self, f: impl FnOnce(&mut FavoriteControl) -> R) -> R {
        f(self)
    }
}

impl ControlSlot for Signal<FavoriteControl> {
    fn with_control<R>(&mut self, f: impl FnOnce(&mut FavoriteControl) -> R) -> R {
        let mut control = self.write();
        f(&mut *control)
    }
}

/// Handle one click on a favorite button.
///
/// Without a token the page goes to `login_url` and nothing is sent. An
/// authentication failure from the server does the same after it has been
/// reported.
pub async fn toggle_favorite<T, N, S>(
    client: &ApiClient<T, N, S>,
    page: &impl Page,
    control: &mut impl ControlSlot,
    login_url: &str,
) where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    let has_token = client.token().is_some();
    let intent = match control.with_control(|c| c.click(has_token)) {
        ClickAction::Login => {
            page.redirect(login_url);
            return;
        }
        ClickAction::Busy => return,
        ClickAction::Send(intent) => intent,
    };

    let result = send_intent(client, &intent).await;
    if let Some(message) = control.with_control(|c| c.settle(&intent, &result)) {
        client.notifier().error(&message);
    }
    if matches!(&result, Err(e) if e.is_auth()) {
        page.redirect(login_url);
    }
}

#[component]
pub fn FavoriteButton(target: FavoriteTarget) -> Element {
    let client = use_api_client();
    let config = use_client_config();
    let mut control = use_signal(|| FavoriteControl::new(target.clone()));

    let loader = client.clone();
    use_effect(use_reactive((&target,), move |(target,)| {
        if control.peek().target != target {
            control.write().retarget(target);
        }
        // anonymous visitors have no favorites to show
        if loader.token().is_none() {
            return;
        }
        let client = loader.clone();
        spawn(async move {
            let mut current = (*control.peek()).clone();
            if load_favorite_state(&client, &mut current).await.is_ok()
                && control.peek().target == current.target
            {
                control.write().state = current.state;
            }
        });
    }));

    let onclick = move |_| {
        let client = client.clone();
        let login_url = config.login_url.clone();
        async move {
            toggle_favorite(&client, &BrowserPage, &mut control, &login_url).await;
        }
    };

    let current = control();
    rsx! {
        button {
            id: "favoriteButton",
            class: current.class(),
            disabled: current.is_in_flight(),
            onclick: onclick,
            if current.state == FavoriteState::Favorited {
                Icon { icon: icons::FaHeart, width: 14, height: 14 }
            } else {
                Icon { icon: icons::regular::FaHeart, width: 14, height: 14 }
            }
            " {current.label()}"
        }
    }
}
