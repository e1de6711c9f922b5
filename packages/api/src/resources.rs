//! Resource-scoped call groups on top of [`ApiClient`].
//!
//! Catalog-style resources (routes, hotels, foods, news) share
//! [`CatalogApi`]; the rest have their own group with typed results where a
//! controller depends on the shape.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    DataList, FavoriteList, FavoriteTarget, FavoriteToggle, OrderSummary, StatusReply, TargetType,
};
use crate::notify::Notifier;
use crate::token::TokenSources;
use crate::transport::{ApiRequest, Transport};

pub type Params<'p> = &'p [(&'p str, &'p str)];

impl<T, N, S> ApiClient<T, N, S>
where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    pub fn scenic(&self) -> ScenicApi<'_, T, N, S> {
        ScenicApi {
            catalog: CatalogApi::new(self, "scenic"),
        }
    }

    pub fn routes(&self) -> CatalogApi<'_, T, N, S> {
        CatalogApi::new(self, "routes")
    }

    pub fn hotels(&self) -> CatalogApi<'_, T, N, S> {
        CatalogApi::new(self, "hotels")
    }

    pub fn foods(&self) -> CatalogApi<'_, T, N, S> {
        CatalogApi::new(self, "foods")
    }

    pub fn news(&self) -> CatalogApi<'_, T, N, S> {
        CatalogApi::new(self, "news")
    }

    pub fn users(&self) -> UsersApi<'_, T, N, S> {
        UsersApi { client: self }
    }

    pub fn favorites(&self) -> FavoritesApi<'_, T, N, S> {
        FavoritesApi { client: self }
    }

    pub fn orders(&self) -> OrdersApi<'_, T, N, S> {
        OrdersApi { client: self }
    }

    pub fn comments(&self) -> CommentsApi<'_, T, N, S> {
        CommentsApi { client: self }
    }
}

/// `list/` and `<id>/` under one resource prefix.
pub struct CatalogApi<'a, T, N, S> {
    client: &'a ApiClient<T, N, S>,
    resource: &'static str,
}

impl<'a, T, N, S> CatalogApi<'a, T, N, S>
where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    fn new(client: &'a ApiClient<T, N, S>, resource: &'static str) -> Self {
        Self { client, resource }
    }

    pub async fn list(&self, params: Params<'_>) -> Result<Value, ApiError> {
        let request = ApiRequest::get(format!("{}/list/", self.resource))
            .query_pairs(params.iter().copied());
        self.client.send(request).await
    }

    pub async fn detail(&self, id: &str) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get(format!("{}/{id}/", self.resource)))
            .await
    }
}

pub struct ScenicApi<'a, T, N, S> {
    catalog: CatalogApi<'a, T, N, S>,
}

impl<T, N, S> ScenicApi<'_, T, N, S>
where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    pub async fn list(&self, params: Params<'_>) -> Result<Value, ApiError> {
        self.catalog.list(params).await
    }

    pub async fn detail(&self, id: &str) -> Result<Value, ApiError> {
        self.catalog.detail(id).await
    }

    pub async fn search(&self, keyword: &str) -> Result<Value, ApiError> {
        let request = ApiRequest::get("scenic/search/").query("q", keyword);
        self.catalog.client.send(request).await
    }
}

pub struct UsersApi<'a, T, N, S> {
    client: &'a ApiClient<T, N, S>,
}

impl<T, N, S> UsersApi<'_, T, N, S>
where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    pub async fn profile(&self) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get("users/profile/")).await
    }

    pub async fn update_profile(&self, profile: Value) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::put("users/profile/").json(profile))
            .await
    }

}

pub struct FavoritesApi<'a, T, N, S> {
    client: &'a ApiClient<T, N, S>,
}

impl<T, N, S> FavoritesApi<'_, T, N, S>
where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    /// `GET users/favorites/?target_type=<t>`
    pub async fn list(&self, target_type: TargetType) -> Result<FavoriteList, ApiError> {
        let request = ApiRequest::get("users/favorites/").query("target_type", target_type.as_str());
        self.client.send_as(request).await
    }

    /// `POST users/favorites/` with the target in the body.
    pub async fn add(&self, target: &FavoriteTarget) -> Result<FavoriteToggle, ApiError> {
        let request = ApiRequest::post("users/favorites/").json(target.to_body());
        self.client.send_as(request).await
    }

    /// `DELETE users/favorites/` with the target in the query string.
    pub async fn remove(&self, target: &FavoriteTarget) -> Result<FavoriteToggle, ApiError> {
        let request = ApiRequest::delete("users/favorites/").query_pairs(target.to_query());
        self.client.send_as(request).await
    }
}

pub struct OrdersApi<'a, T, N, S> {
    client: &'a ApiClient<T, N, S>,
}

impl<T, N, S> OrdersApi<'_, T, N, S>
where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    pub async fn create(&self, order: Value) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::post("orders/create/").json(order))
            .await
    }

    /// Orders of the signed-in user, newest first.
    pub async fn list(&self, params: Params<'_>) -> Result<Vec<OrderSummary>, ApiError> {
        let request = ApiRequest::get("orders/list/").query_pairs(params.iter().copied());
        let list: DataList<OrderSummary> = self.client.send_as(request).await?;
        Ok(list.data)
    }

    pub async fn detail(&self, order_sn: &str) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get(format!("orders/detail/{}/", encode(order_sn))))
            .await
    }

    /// `PUT orders/cancel/<order_sn>/`. A non-success `status` in the body is
    /// returned as-is for the caller to show.
    pub async fn cancel(&self, order_sn: &str) -> Result<StatusReply, ApiError> {
        self.client
            .send_as(ApiRequest::put(format!("orders/cancel/{}/", encode(order_sn))))
            .await
    }
}

pub struct CommentsApi<'a, T, N, S> {
    client: &'a ApiClient<T, N, S>,
}

impl<T, N, S> CommentsApi<'_, T, N, S>
where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    pub async fn list(&self, target: &FavoriteTarget) -> Result<Value, ApiError> {
        let request = ApiRequest::get("comments/").query_pairs(target.to_query());
        self.client.send(request).await
    }

    pub async fn create(&self, comment: Value) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::post("comments/").json(comment))
            .await
    }

    pub async fn delete(&self, comment_id: &str) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::delete(format!("comments/{}/", encode(comment_id))))
            .await
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::token::StaticTokenSources;
    use crate::transport::{MemoryTransport, Method};
    use serde_json::json;

    fn client() -> (
        ApiClient<MemoryTransport, RecordingNotifier, StaticTokenSources>,
        MemoryTransport,
    ) {
        let transport = MemoryTransport::new();
        let tokens = StaticTokenSources {
            meta: Some("meta-token".into()),
            ..Default::default()
        };
        let client = ApiClient::new(transport.clone(), RecordingNotifier::new(), tokens);
        (client, transport)
    }

    #[tokio::test]
    async fn test_catalog_paths() {
        let (client, transport) = client();
        for _ in 0..4 {
            transport.respond(200, json!({ "status": "success", "data": [] }));
        }

        client.scenic().list(&[("page", "2")]).await.unwrap();
        client.scenic().search("莲池").await.unwrap();
        client.hotels().detail("5").await.unwrap();
        client.news().list(&[]).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].path, "scenic/list/");
        assert_eq!(sent[0].query_value("page"), Some("2"));
        assert_eq!(sent[1].path, "scenic/search/");
        assert_eq!(sent[1].query_value("q"), Some("莲池"));
        assert_eq!(sent[2].path, "hotels/5/");
        assert_eq!(sent[3].path, "news/list/");
    }

    #[tokio::test]
    async fn test_favorite_requests_shape() {
        let (client, transport) = client();
        transport
            .respond(200, json!({ "status": "success", "data": [] }))
            .respond(200, json!({ "status": "success", "is_favorited": true }))
            .respond(200, json!({ "status": "success" }));

        let target = FavoriteTarget::new("9", TargetType::Route);
        client.favorites().list(TargetType::Route).await.unwrap();
        let added = client.favorites().add(&target).await.unwrap();
        let removed = client.favorites().remove(&target).await.unwrap();

        assert_eq!(added.is_favorited, Some(true));
        assert_eq!(removed.is_favorited, None);

        let sent = transport.sent();
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(sent[0].query_value("target_type"), Some("route"));

        assert_eq!(sent[1].method, Method::POST);
        assert_eq!(
            sent[1].body,
            Some(json!({ "target_id": 9, "target_type": "route" }))
        );
        assert_eq!(sent[1].header_value("X-CSRFToken"), Some("meta-token"));

        assert_eq!(sent[2].method, Method::DELETE);
        assert_eq!(sent[2].body, None);
        assert_eq!(sent[2].query_value("target_id"), Some("9"));
        assert_eq!(sent[2].query_value("target_type"), Some("route"));
    }

    #[tokio::test]
    async fn test_order_cancel_is_put_with_serial() {
        let (client, transport) = client();
        transport.respond(200, json!({ "status": "fail", "message": "already shipped" }));

        let reply = client.orders().cancel("BD20240101001").await.unwrap();

        assert!(!reply.is_success());
        assert_eq!(reply.message.as_deref(), Some("already shipped"));
        let sent = transport.sent();
        assert_eq!(sent[0].method, Method::PUT);
        assert_eq!(sent[0].path, "orders/cancel/BD20240101001/");
    }

    #[tokio::test]
    async fn test_order_list_unwraps_data() {
        let (client, transport) = client();
        transport.respond(
            200,
            json!({
                "status": "success",
                "data": [{ "order_sn": "BD1", "status": "pending", "total_amount": 88.0 }]
            }),
        );

        let orders = client.orders().list(&[]).await.unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_sn.as_deref(), Some("BD1"));
        assert_eq!(orders[0].total, Some(88.0));
        assert_eq!(transport.sent()[0].path, "orders/list/");
    }
}
