//! Hosted backend order client.

use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use super::{OrderError, OrderLine, OrderReceipt, OrderSink};
use crate::config::BackendConfig;

/// Inserts order rows into the backend's `orders` table and triggers the
/// order notification e-mail.
#[derive(Clone)]
pub struct OrderClient {
    client: reqwest::Client,
    orders_url: Url,
    notify_url: Option<Url>,
}

impl std::fmt::Debug for OrderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderClient")
            .field("orders_url", &self.orders_url.as_str())
            .field("notify_url", &self.notify_url.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}

impl OrderClient {
    /// Create a new order client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key cannot be used as a header, the orders
    /// URL cannot be built, or the HTTP client fails to build.
    pub fn new(backend: &BackendConfig) -> Result<Self, OrderError> {
        let key = backend.anon_key.expose_secret();
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|e| OrderError::InvalidHeader(format!("Invalid API key format: {e}")))?,
        );
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| OrderError::InvalidHeader(format!("Invalid API key format: {e}")))?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            orders_url: backend.rest_url("orders")?,
            notify_url: backend.order_notify_url.clone(),
        })
    }

    /// Insert every line in one request.
    async fn insert(&self, lines: &[OrderLine]) -> Result<Vec<OrderReceipt>, OrderError> {
        let response = self
            .client
            .post(self.orders_url.clone())
            // Ask for the stored rows back
            .header("Prefer", "return=representation")
            .json(lines)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Order API returned non-success status"
            );
            return Err(OrderError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Post the order summary to the notification endpoint.
    async fn notify(&self, url: &Url, summary: &OrderSummary) -> Result<(), OrderError> {
        let response = self.client.post(url.clone()).json(summary).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OrderError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

impl OrderSink for OrderClient {
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    async fn submit(&self, lines: &[OrderLine]) -> Result<Vec<OrderReceipt>, OrderError> {
        let receipts = self.insert(lines).await?;

        if let Some(url) = &self.notify_url
            && let Some(summary) = OrderSummary::from_lines(lines)
            && let Err(e) = self.notify(url, &summary).await
        {
            tracing::warn!(
                error = %e,
                checkout_ref = %summary.checkout_ref,
                "Order stored but notification failed"
            );
        }

        Ok(receipts)
    }
}

/// Payload for the order notification e-mail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub checkout_ref: Uuid,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub city: String,
    pub address: String,
    pub notes: Option<String>,
    pub items: Vec<SummaryItem>,
    pub total: Decimal,
}

/// One product in an [`OrderSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl OrderSummary {
    /// Summarize the lines of one checkout. Buyer details come from the first
    /// line. Returns `None` for an empty slice.
    #[must_use]
    pub fn from_lines(lines: &[OrderLine]) -> Option<Self> {
        let first = lines.first()?;
        Some(Self {
            checkout_ref: first.checkout_ref,
            customer_name: first.customer_name.clone(),
            phone: first.phone.to_string(),
            email: first.email.as_ref().map(ToString::to_string),
            city: first.city.clone(),
            address: first.address.clone(),
            notes: first.notes.clone(),
            items: lines
                .iter()
                .map(|line| SummaryItem {
                    product_id: line.product_id.to_string(),
                    product_name: line.product_name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    line_total: line.line_total,
                })
                .collect(),
            total: lines.iter().map(|line| line.line_total).sum(),
        })
    }
}
