//! 通知服务 - 订单邮件通知
//!
//! 两种投递模式：
//!
//! - [`HttpNotifier`] - 配置了 `NOTIFY_URL` 时，POST 到外部投递服务
//! - [`SimulatedNotifier`] - 未配置时只记录日志，返回 `mock-…` 回执
//!
//! 通知是 fire-and-forget：[`dispatch_in_background`] 在后台任务中发送，
//! 失败只记录日志，从不影响订单操作的结果。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use shared::models::{DispatchReceipt, DispatchStatus, Notification, Order};
use shared::util::timestamped_id;
use shared::{AppError, AppResult, ErrorCode};

use crate::core::Config;

const MOCK_ID_SUFFIX_LEN: usize = 9;

/// Outbound notification channel
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Provider label reported in receipts
    fn provider(&self) -> &'static str;

    async fn send(&self, notification: &Notification) -> AppResult<DispatchReceipt>;
}

/// Logs the message instead of delivering it
#[derive(Debug, Clone)]
pub struct SimulatedNotifier {
    from: String,
}

impl SimulatedNotifier {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Notifier for SimulatedNotifier {
    fn provider(&self) -> &'static str {
        "console-log"
    }

    async fn send(&self, notification: &Notification) -> AppResult<DispatchReceipt> {
        let id = format!("mock-{}", timestamped_id(MOCK_ID_SUFFIX_LEN));
        let preview: String = notification.body.chars().take(200).collect();
        tracing::info!(
            from = %self.from,
            to = %notification.to,
            subject = %notification.subject,
            order_id = %notification.order_id,
            preview = %preview,
            mock_id = %id,
            "Simulated notification"
        );
        Ok(DispatchReceipt {
            status: DispatchStatus::Simulated,
            id,
            provider: self.provider().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }
}

/// Posts notifications to an external delivery endpoint
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpNotifier {
    pub fn new(url: impl Into<String>, api_key: Option<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
            from: from.into(),
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    fn provider(&self) -> &'static str {
        "http"
    }

    async fn send(&self, notification: &Notification) -> AppResult<DispatchReceipt> {
        let mut request = self.client.post(&self.url).json(&json!({
            "from": self.from,
            "to": notification.to,
            "subject": notification.subject,
            "body": notification.body,
            "orderId": notification.order_id,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await.map_err(|e| {
            AppError::with_message(
                ErrorCode::NetworkError,
                format!("Notification endpoint unreachable: {}", e),
            )
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::with_message(
                ErrorCode::NotificationFailed,
                format!("Notification rejected: {} - {}", status, text),
            ));
        }

        resp.json::<DispatchReceipt>().await.map_err(|e| {
            AppError::with_message(
                ErrorCode::NotificationFailed,
                format!("Invalid notification receipt: {}", e),
            )
        })
    }
}

/// Pick the delivery mode from configuration
pub fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    match &config.notify_url {
        Some(url) => {
            tracing::info!(url = %url, "Notifications delivered over HTTP");
            Arc::new(HttpNotifier::new(
                url.clone(),
                config.notify_api_key.clone(),
                config.notify_from.clone(),
            ))
        }
        None => {
            tracing::info!("NOTIFY_URL not set, notifications are simulated");
            Arc::new(SimulatedNotifier::new(config.notify_from.clone()))
        }
    }
}

/// Confirmation sent when an order is placed
pub fn order_placed(order: &Order) -> Option<Notification> {
    let to = recipient(order)?;
    let lines: Vec<String> = order
        .items
        .iter()
        .map(|item| format!("{} x {}", item.quantity, item.display_name()))
        .collect();
    Some(Notification {
        to,
        subject: format!("Order received #{}", short_id(&order.id)),
        body: format!(
            "Hi {},\n\nWe received your order:\n{}\n\nTotal: {:.2}\nStatus: {}",
            order.customer_name,
            lines.join("\n"),
            order.total_price,
            order.status
        ),
        order_id: order.id.clone(),
    })
}

/// Update sent when the kitchen moves an order
pub fn status_changed(order: &Order) -> Option<Notification> {
    let to = recipient(order)?;
    Some(Notification {
        to,
        subject: format!("Order #{} is {}", short_id(&order.id), order.status),
        body: format!(
            "Hi {},\n\nYour order is now {}.",
            order.customer_name, order.status
        ),
        order_id: order.id.clone(),
    })
}

fn recipient(order: &Order) -> Option<String> {
    let email = order.customer_email.trim();
    (!email.is_empty()).then(|| email.to_string())
}

/// Random suffix of the order id, readable enough for a subject line
fn short_id(id: &str) -> &str {
    id.rsplit('-').next().unwrap_or(id)
}

/// Send without waiting; the outcome is only logged
pub fn dispatch_in_background(notifier: Arc<dyn Notifier>, notification: Notification) {
    tokio::spawn(async move {
        match notifier.send(&notification).await {
            Ok(receipt) => tracing::debug!(
                order_id = %notification.order_id,
                receipt_id = %receipt.id,
                status = ?receipt.status,
                "Notification dispatched"
            ),
            Err(e) => tracing::warn!(
                order_id = %notification.order_id,
                provider = notifier.provider(),
                error = %e,
                "Notification failed"
            ),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{OrderItem, OrderStatus};

    fn order(email: &str) -> Order {
        Order {
            id: "1700000000000-abc1234".to_string(),
            items: vec![OrderItem {
                id: "chops".to_string(),
                name: "Lamb Chops".to_string(),
                quantity: 2,
                price: 89.5,
                category: Some("Meat".to_string()),
            }],
            status: OrderStatus::Pending,
            paid: false,
            total_price: 179.0,
            customer_name: "Thabo".to_string(),
            customer_phone: "+27 82 555 1234".to_string(),
            customer_email: email.to_string(),
            notes: String::new(),
            user_id: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_no_email_no_notification() {
        assert!(order_placed(&order("")).is_none());
        assert!(status_changed(&order("   ")).is_none());
    }

    #[test]
    fn test_order_placed_content() {
        let n = order_placed(&order("thabo@example.com")).unwrap();
        assert_eq!(n.to, "thabo@example.com");
        assert_eq!(n.order_id, "1700000000000-abc1234");
        assert_eq!(n.subject, "Order received #abc1234");
        assert!(n.body.contains("2 x Lamb Chops"));
        assert!(n.body.contains("179.00"));
    }

    #[tokio::test]
    async fn test_simulated_receipt() {
        let notifier = SimulatedNotifier::new("noreply@example.com");
        let n = status_changed(&order("thabo@example.com")).unwrap();
        let receipt = notifier.send(&n).await.unwrap();
        assert_eq!(receipt.status, DispatchStatus::Simulated);
        assert_eq!(receipt.provider, "console-log");
        assert!(receipt.id.starts_with("mock-"));
    }

    #[tokio::test]
    async fn test_http_notifier_unreachable_is_error() {
        // Port 9 (discard) on localhost is not listening in test environments
        let notifier = HttpNotifier::new("http://127.0.0.1:9/send", None, "noreply@example.com");
        let n = order_placed(&order("thabo@example.com")).unwrap();
        let err = notifier.send(&n).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
    }
}
