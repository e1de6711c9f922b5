//! # Wire models for the `/api/v1/` backend
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`TargetType`] | Kind of favoritable entity: `scenic`, `route`, `hotel`, `food`. |
//! | [`FavoriteTarget`] | The (identifier, type) pair a favorite refers to. |
//! | [`FavoriteRecord`] | One entry of `GET users/favorites/`. |
//! | [`FavoriteList`] / [`FavoriteToggle`] | Response envelopes of the favorite endpoints. |
//! | [`StatusReply`] | The `{status, message?}` envelope most mutating endpoints return. |
//! | [`OrderSummary`] / [`OrderStatus`] | One order row as listed for the current user. |
//!
//! Identifiers arrive as JSON numbers or strings depending on the endpoint, so
//! they are normalised to `String` on the way in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    #[default]
    Scenic,
    Route,
    Hotel,
    Food,
}

impl TargetType {
    pub const ALL: [TargetType; 4] = [
        TargetType::Scenic,
        TargetType::Route,
        TargetType::Hotel,
        TargetType::Food,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Scenic => "scenic",
            TargetType::Route => "route",
            TargetType::Hotel => "hotel",
            TargetType::Food => "food",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scenic" => Ok(TargetType::Scenic),
            "route" => Ok(TargetType::Route),
            "hotel" => Ok(TargetType::Hotel),
            "food" => Ok(TargetType::Food),
            other => Err(format!("unknown target type: {other}")),
        }
    }
}

/// A favoritable entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FavoriteTarget {
    #[serde(deserialize_with = "id_string")]
    pub target_id: String,
    pub target_type: TargetType,
}

impl FavoriteTarget {
    pub fn new(target_id: impl Into<String>, target_type: TargetType) -> Self {
        Self {
            target_id: target_id.into(),
            target_type,
        }
    }

    /// JSON body for `POST users/favorites/`. Numeric ids are sent as numbers.
    pub fn to_body(&self) -> Value {
        json!({
            "target_id": id_value(&self.target_id),
            "target_type": self.target_type.as_str(),
        })
    }

    /// Query pairs for `DELETE users/favorites/` and comment listing.
    pub fn to_query(&self) -> [(String, String); 2] {
        [
            ("target_id".to_string(), self.target_id.clone()),
            ("target_type".to_string(), self.target_type.as_str().to_string()),
        ]
    }
}

pub type FavoriteRecord = FavoriteTarget;

/// `GET users/favorites/?target_type=<t>`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FavoriteList {
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "known_records")]
    pub data: Vec<FavoriteRecord>,
}

impl FavoriteList {
    /// Whether `target` appears with exactly the same id and type.
    pub fn contains(&self, target: &FavoriteTarget) -> bool {
        self.data.iter().any(|record| record == target)
    }
}

/// `POST` / `DELETE users/favorites/`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FavoriteToggle {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_favorited: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `{status, message?}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusReply {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Completed,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    /// Parse either the status code (`"pending"`) or its label (`"待支付"`).
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "pending" | "待支付" => OrderStatus::Pending,
            "paid" | "已支付" => OrderStatus::Paid,
            "completed" | "已完成" => OrderStatus::Completed,
            "cancelled" | "已取消" => OrderStatus::Cancelled,
            other => OrderStatus::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Pending => "待支付",
            OrderStatus::Paid => "已支付",
            OrderStatus::Completed => "已完成",
            OrderStatus::Cancelled => "已取消",
            OrderStatus::Other(s) => s,
        }
    }

    /// Bootstrap text class for the status label.
    pub fn css_class(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "text-warning",
            OrderStatus::Paid | OrderStatus::Completed => "text-success",
            OrderStatus::Cancelled | OrderStatus::Other(_) => "text-muted",
        }
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Paid)
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(OrderStatus::parse(&s))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderSummary {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub order_sn: Option<String>,
    pub status: OrderStatus,
    #[serde(default, alias = "total_amount")]
    pub total: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// `{status, data: [...]}` list envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataList<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

fn id_value(id: &str) -> Value {
    id.parse::<i64>().map(Value::from).unwrap_or_else(|_| json!(id))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

/// Favorite records of a kind this client does not know are dropped rather
/// than failing the whole list.
fn known_records<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<FavoriteRecord>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|record| match FavoriteRecord::deserialize(&record) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("skipping favorite record {record}: {e}");
                None
            }
        })
        .collect())
}

fn opt_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_type_parse() {
        assert_eq!("Hotel".parse::<TargetType>(), Ok(TargetType::Hotel));
        assert!("museum".parse::<TargetType>().is_err());
        assert_eq!(TargetType::default(), TargetType::Scenic);
    }

    #[test]
    fn test_favorite_list_accepts_numeric_and_string_ids() {
        let list: FavoriteList = serde_json::from_value(json!({
            "status": "success",
            "data": [
                { "target_id": 12, "target_type": "scenic" },
                { "target_id": "7", "target_type": "route" }
            ]
        }))
        .unwrap();

        assert!(list.contains(&FavoriteTarget::new("12", TargetType::Scenic)));
        assert!(list.contains(&FavoriteTarget::new("7", TargetType::Route)));
        // same id, different type
        assert!(!list.contains(&FavoriteTarget::new("12", TargetType::Route)));
    }

    #[test]
    fn test_favorite_list_skips_unknown_records() {
        let list: FavoriteList = serde_json::from_value(json!({
            "status": "success",
            "data": [
                { "target_id": 3, "target_type": "ai_query" },
                { "target_type": "hotel" },
                { "target_id": 9, "target_type": "hotel" }
            ]
        }))
        .unwrap();

        assert_eq!(list.data, vec![FavoriteTarget::new("9", TargetType::Hotel)]);

        let empty: FavoriteList =
            serde_json::from_value(json!({ "status": "success", "data": null })).unwrap();
        assert!(empty.data.is_empty());
    }

    #[test]
    fn test_body_and_query() {
        let target = FavoriteTarget::new("42", TargetType::Food);
        assert_eq!(target.to_body(), json!({ "target_id": 42, "target_type": "food" }));

        let slug = FavoriteTarget::new("lianchi", TargetType::Scenic);
        assert_eq!(slug.to_body()["target_id"], json!("lianchi"));
        assert_eq!(slug.to_query()[1], ("target_type".into(), "scenic".into()));
    }

    #[test]
    fn test_order_status_labels() {
        assert_eq!(OrderStatus::parse("待支付"), OrderStatus::Pending);
        assert_eq!(OrderStatus::parse("cancelled").label(), "已取消");
        assert_eq!(OrderStatus::Cancelled.css_class(), "text-muted");
        assert!(OrderStatus::Paid.is_cancellable());
        assert!(!OrderStatus::Completed.is_cancellable());
    }

    #[test]
    fn test_order_summary_from_list_row() {
        let row: OrderSummary = serde_json::from_value(json!({
            "order_sn": "BD202511040001",
            "status": "待支付",
            "total": 500.0
        }))
        .unwrap();
        assert_eq!(row.order_sn.as_deref(), Some("BD202511040001"));
        assert_eq!(row.status, OrderStatus::Pending);
        assert_eq!(row.total, Some(500.0));
    }
}
