//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::serde_helpers::{bool_false, lenient_f64, lenient_i64};

/// Kitchen pipeline status
///
/// The pipeline is linear: `pending → preparing → ready → completed`.
/// An order may move one step forward or one step back at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
        }
    }

    /// Position in the pipeline (0 = pending)
    fn step(&self) -> i8 {
        match self {
            Self::Pending => 0,
            Self::Preparing => 1,
            Self::Ready => 2,
            Self::Completed => 3,
        }
    }

    /// Next status forward, `None` at `completed`
    pub fn next(&self) -> Option<Self> {
        Self::ALL.get(self.step() as usize + 1).copied()
    }

    /// Previous status, `None` at `pending`
    pub fn previous(&self) -> Option<Self> {
        (self.step() as usize).checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Exactly one step forward or backward
    pub fn is_adjacent(&self, to: OrderStatus) -> bool {
        (self.step() - to.step()).abs() == 1
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid order status: {:?}", self.0)
    }
}

impl std::error::Error for InvalidStatus {}

impl FromStr for OrderStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

/// Largest quantity accepted for one line of a new order
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Order line item (copied from the cart at creation)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Menu item id, also the inventory key
    #[serde(alias = "itemId", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub quantity: i64,
    /// Unit price in currency unit
    #[serde(alias = "unitPrice", default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl OrderItem {
    /// Label used when ranking best sellers
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.id.is_empty() {
            &self.id
        } else {
            "Unknown item"
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "bool_false")]
    pub paid: bool,
    /// Total in currency unit, captured at creation
    #[serde(alias = "totalPrice", default, deserialize_with = "lenient_f64")]
    pub total_price: f64,
    #[serde(alias = "customerName", default)]
    pub customer_name: String,
    #[serde(alias = "customerPhone", default)]
    pub customer_phone: String,
    #[serde(alias = "customerEmail", default)]
    pub customer_email: String,
    #[serde(default)]
    pub notes: String,
    /// Linked customer account, if the order was placed while signed in
    #[serde(alias = "userId", default)]
    pub user_id: Option<String>,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create order payload
///
/// Everything is optional at the wire level so that missing fields surface as
/// validation errors rather than body rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(alias = "customerName", default)]
    pub customer_name: Option<String>,
    #[serde(alias = "customerPhone", default)]
    pub customer_phone: Option<String>,
    #[serde(alias = "customerEmail", default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(alias = "totalPrice", default, deserialize_with = "lenient_f64")]
    pub total_price: f64,
    #[serde(alias = "userId", default)]
    pub user_id: Option<String>,
}

/// Update status payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Mark paid payload (`paid` defaults to true)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkPaidRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub paid: Option<bool>,
}

/// Payload carrying only an order id (delete, reorder)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderIdRequest {
    #[serde(default)]
    pub id: Option<String>,
}

/// `{id}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub id: String,
}

/// `{order}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEnvelope {
    pub order: Order,
}

/// `{success}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parse() {
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!("completed".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        assert!("Completed".parse::<OrderStatus>().is_err());
        assert!("cancelled".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_adjacency() {
        use OrderStatus::*;
        assert!(Pending.is_adjacent(Preparing));
        assert!(Preparing.is_adjacent(Pending));
        assert!(Ready.is_adjacent(Completed));
        assert!(Completed.is_adjacent(Ready));
        assert!(!Pending.is_adjacent(Ready));
        assert!(!Pending.is_adjacent(Completed));
        assert!(!Completed.is_adjacent(Preparing));
        assert!(!Ready.is_adjacent(Ready));
    }

    #[test]
    fn test_status_neighbours() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Preparing));
        assert_eq!(OrderStatus::Completed.next(), None);
        assert_eq!(OrderStatus::Pending.previous(), None);
        assert_eq!(OrderStatus::Completed.previous(), Some(OrderStatus::Ready));
    }

    #[test]
    fn test_order_decodes_legacy_document() {
        let doc = json!({
            "id": "1700000000000-abcdefg",
            "items": [
                {"id": "chops", "name": "Lamb Chops", "quantity": "2", "price": "89.5", "category": "Meat"},
                {"itemId": "pap", "quantity": null, "unitPrice": "free"}
            ],
            "status": "ready",
            "paid": null,
            "total_price": "not-a-number",
            "customer_name": "Thabo",
            "customer_phone": "+27 82 555 0101",
            "created_at": "2026-03-01T10:00:00Z"
        });

        let order: Order = serde_json::from_value(doc).unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
        assert!(!order.paid);
        assert_eq!(order.total_price, 0.0);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].price, 89.5);
        assert_eq!(order.items[1].id, "pap");
        assert_eq!(order.items[1].quantity, 0);
        assert_eq!(order.items[1].price, 0.0);
        assert_eq!(order.customer_email, "");
        assert!(order.user_id.is_none());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut item = OrderItem {
            id: "wors".to_string(),
            name: "Boerewors".to_string(),
            quantity: 1,
            price: 45.0,
            category: None,
        };
        assert_eq!(item.display_name(), "Boerewors");
        item.name.clear();
        assert_eq!(item.display_name(), "wors");
        item.id.clear();
        assert_eq!(item.display_name(), "Unknown item");
    }

    #[test]
    fn test_create_request_accepts_camel_case() {
        let req: CreateOrderRequest = serde_json::from_value(json!({
            "items": [{"itemId": "chops", "name": "Chops", "quantity": 1, "unitPrice": 80}],
            "customerName": "Lindiwe",
            "customerPhone": "0825550101",
            "totalPrice": 80
        }))
        .unwrap();
        assert_eq!(req.customer_name.as_deref(), Some("Lindiwe"));
        assert_eq!(req.total_price, 80.0);
        assert_eq!(req.items[0].id, "chops");
    }
}
