//! Order cards and the cancellation flow.
//!
//! Cancelling asks for confirmation first and only then sends
//! `PUT orders/cancel/<sn>/`. A successful cancellation is one-way: the card's
//! actions collapse to a single "view details" link, so the order cannot be
//! cancelled twice from the same card.

use api::{ApiClient, ApiError, Notifier, OrderStatus, OrderSummary, TokenSources, Transport};
use dioxus::prelude::*;

use crate::format::{format_datetime, format_price, truncate_text};
use crate::page::{confirm_action, BrowserPage, Page};
use crate::site::use_api_client;

pub const CONFIRM_CANCEL: &str = "您确定要取消这个订单吗？";
pub const MISSING_SERIAL: &str = "无法获取订单号";
pub const CANCELLED: &str = "订单已成功取消！";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderActions {
    Cancellable,
    DetailsOnly,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderView {
    pub order_sn: Option<String>,
    pub status: OrderStatus,
    pub actions: OrderActions,
    pub total: Option<f64>,
    pub created_at: Option<String>,
    pub title: Option<String>,
}

impl From<OrderSummary> for OrderView {
    fn from(order: OrderSummary) -> Self {
        let actions = if order.status.is_cancellable() {
            OrderActions::Cancellable
        } else {
            OrderActions::DetailsOnly
        };
        Self {
            order_sn: order.order_sn,
            status: order.status,
            actions,
            total: order.total,
            created_at: order.created_at,
            title: order.title,
        }
    }
}

impl OrderView {
    pub fn mark_cancelled(&mut self) {
        self.status = OrderStatus::Cancelled;
        self.actions = OrderActions::DetailsOnly;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    MissingSerial,
    Declined,
    /// The card no longer offers cancellation.
    NotCancellable,
    Cancelled,
    /// The server answered with a non-success status.
    Refused(String),
    Failed(ApiError),
}

/// Run the cancellation flow for one order card.
pub async fn cancel_order<T, N, S>(
    client: &ApiClient<T, N, S>,
    page: &impl Page,
    order: &mut OrderView,
) -> CancelOutcome
where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    if order.actions == OrderActions::DetailsOnly {
        return CancelOutcome::NotCancellable;
    }
    let Some(order_sn) = order.order_sn.clone().filter(|sn| !sn.trim().is_empty()) else {
        page.alert(MISSING_SERIAL);
        return CancelOutcome::MissingSerial;
    };
    if !confirm_action(page, CONFIRM_CANCEL) {
        return CancelOutcome::Declined;
    }

    match client.orders().cancel(&order_sn).await {
        Ok(reply) if reply.is_success() => {
            tracing::info!("order {order_sn} cancelled");
            order.mark_cancelled();
            client.notifier().success(CANCELLED);
            CancelOutcome::Cancelled
        }
        Ok(reply) => {
            let message = format!(
                "操作失败: {}",
                reply.message.as_deref().unwrap_or(api::error::GENERIC_FAILURE)
            );
            client.notifier().error(&message);
            CancelOutcome::Refused(message)
        }
        Err(e) => CancelOutcome::Failed(e),
    }
}

#[component]
pub fn OrderCard(order: OrderView) -> Element {
    let client = use_api_client();
    let mut view = use_signal(|| order.clone());

    let on_cancel = move |evt: MouseEvent| {
        evt.prevent_default();
        let client = client.clone();
        async move {
            let mut current = view();
            let outcome = cancel_order(&client, &BrowserPage, &mut current).await;
            if outcome == CancelOutcome::Cancelled {
                view.set(current);
            }
        }
    };

    let current = view();
    let serial = current.order_sn.clone().unwrap_or_default();
    let price = format_price(current.total);
    let created = current.created_at.as_deref().map(format_datetime);

    rsx! {
        div {
            class: "card mb-3",
            div {
                class: "card-header d-flex justify-content-between",
                span { "订单号：{serial}" }
                span { class: current.status.css_class(), "{current.status.label()}" }
            }
            div {
                class: "card-body",
                if let Some(title) = current.title.as_deref().map(|t| truncate_text(t, 40)) {
                    h6 { class: "card-title", "{title}" }
                }
                p { class: "card-text mb-1", "金额：{price}" }
                if let Some(created) = created {
                    p { class: "card-text text-muted small", "下单时间：{created}" }
                }
            }
            div {
                class: "card-footer",
                {match current.actions {
                    OrderActions::Cancellable => rsx! {
                        a {
                            href: "#",
                            class: "btn btn-sm btn-outline-danger btn-cancel-order me-2",
                            "data-order-sn": "{serial}",
                            onclick: on_cancel,
                            "取消订单"
                        }
                        a { href: "#", class: "btn btn-sm btn-outline-secondary", "查看详情" }
                    },
                    OrderActions::DetailsOnly => rsx! {
                        a { href: "#", class: "btn btn-sm btn-outline-secondary", "查看详情" }
                    },
                }}
            }
        }
    }
}

/// The current user's orders, one [`OrderCard`] each.
#[component]
pub fn OrderList() -> Element {
    let client = use_api_client();
    let orders = use_resource(move || {
        let client = client.clone();
        async move { client.orders().list(&[]).await }
    });

    match &*orders.read_unchecked() {
        None => rsx! {
            p { class: "text-muted", "加载中..." }
        },
        Some(Err(_)) => rsx! {
            p { class: "text-danger", "订单加载失败" }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            p { class: "text-muted", "暂无订单" }
        },
        Some(Ok(list)) => {
            let cards: Vec<(String, OrderView)> = list
                .iter()
                .enumerate()
                .map(|(i, order)| {
                    let key = order.order_sn.clone().unwrap_or_else(|| i.to_string());
                    (key, OrderView::from(order.clone()))
                })
                .collect();
            rsx! {
                for (key, view) in cards {
                    OrderCard { key: "{key}", order: view }
                }
            }
        }
    }
}
