//! Order Pack Model
//!
//! A named cart saved under a customer account, placed again later as a
//! fresh order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order::OrderItem;

/// Saved cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderPack {
    pub id: String,
    /// Owning customer account
    #[serde(alias = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Save pack payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavePackRequest {
    #[serde(alias = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Payload naming one pack of one account (delete)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackIdRequest {
    #[serde(alias = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Place-order-from-pack payload; contact details are not stored on the pack
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackOrderRequest {
    #[serde(alias = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "customerName", default)]
    pub customer_name: Option<String>,
    #[serde(alias = "customerPhone", default)]
    pub customer_phone: Option<String>,
    #[serde(alias = "customerEmail", default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `{pack}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackEnvelope {
    pub pack: OrderPack,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_accepts_camel_case() {
        let req: SavePackRequest = serde_json::from_str(
            r#"{"userId":"u1","name":"Friday braai","items":[{"itemId":"chops","quantity":"2","unitPrice":129}]}"#,
        )
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert_eq!(req.items[0].id, "chops");
        assert_eq!(req.items[0].quantity, 2);
        assert_eq!(req.items[0].price, 129.0);
    }
}
