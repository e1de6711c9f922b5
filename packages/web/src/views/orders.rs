use dioxus::prelude::*;
use ui::OrderList;

/// The signed-in user's orders at `/users/orders/`.
#[component]
pub fn Orders() -> Element {
    rsx! {
        div {
            class: "container py-4",
            h4 { class: "mb-3", "我的订单" }
            OrderList {}
        }
    }
}
