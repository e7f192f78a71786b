//! Order intake.
//!
//! Turns the cart into order rows for the hosted backend. Each cart entry
//! becomes one [`OrderLine`]; every line of one checkout shares the buyer's
//! contact details and a checkout reference. The ordered entries leave the
//! cart only once an [`OrderSink`] has accepted the rows.

mod client;

use std::future::Future;

use breeze_core::{Email, EmailError, Locale, OrderId, Phone, PhoneError, ProductId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use client::{OrderClient, OrderSummary, SummaryItem};

use crate::session::ShopSession;
use crate::store::CartEntry;

/// Errors raised while validating buyer details.
#[derive(Debug, Error)]
pub enum ContactError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Phone number is invalid.
    #[error("Invalid phone: {0}")]
    Phone(#[from] PhoneError),

    /// Email address is invalid.
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// There is nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// Buyer details failed validation.
    #[error("Contact error: {0}")]
    Contact(#[from] ContactError),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the order.
    #[error("Order API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend URL cannot address the orders table.
    #[error("Invalid order URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// API key cannot be sent as a header.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

/// Validated buyer details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerContact {
    full_name: String,
    phone: Phone,
    email: Option<Email>,
    city: String,
    address: String,
    notes: Option<String>,
}

impl BuyerContact {
    /// Validate buyer details.
    ///
    /// Name, city and address must be non-blank. A blank email or note is
    /// treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `ContactError` naming the first invalid field.
    pub fn new(
        full_name: &str,
        phone: &str,
        email: Option<&str>,
        city: &str,
        address: &str,
        notes: Option<&str>,
    ) -> Result<Self, ContactError> {
        let full_name = required("full name", full_name)?;
        let phone = Phone::parse(phone)?;
        let email = optional(email).map(Email::parse).transpose()?;
        let city = required("city", city)?;
        let address = required("address", address)?;
        let notes = optional(notes).map(str::to_string);

        Ok(Self {
            full_name,
            phone,
            email,
            city,
            address,
            notes,
        })
    }

    /// Buyer's full name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Normalized phone number.
    #[must_use]
    pub const fn phone(&self) -> &Phone {
        &self.phone
    }

    /// Email address, if given.
    #[must_use]
    pub const fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ContactError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ContactError::MissingField(field));
    }
    Ok(value.to_string())
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// One order row: a cart entry plus the buyer's details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    /// Shared by every line of one checkout.
    pub checkout_ref: Uuid,
    pub product_id: ProductId,
    /// Product name in the shopper's language at checkout time.
    pub product_name: String,
    pub quantity: u32,
    /// Unit price from the cart snapshot.
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub customer_name: String,
    pub phone: Phone,
    pub email: Option<Email>,
    pub city: String,
    pub address: String,
    pub notes: Option<String>,
    pub locale: Locale,
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    fn new(
        entry: &CartEntry,
        contact: &BuyerContact,
        locale: Locale,
        checkout_ref: Uuid,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            checkout_ref,
            product_id: entry.product.id.clone(),
            product_name: entry.product.name(locale).to_string(),
            quantity: entry.quantity,
            unit_price: entry.product.unit_price().amount(),
            line_total: entry.line_total(),
            customer_name: contact.full_name.clone(),
            phone: contact.phone.clone(),
            email: contact.email.clone(),
            city: contact.city.clone(),
            address: contact.address.clone(),
            notes: contact.notes.clone(),
            locale,
            created_at,
        }
    }
}

/// A stored order row as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderReceipt {
    #[serde(deserialize_with = "string_or_number")]
    pub id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub status: Option<String>,
}

/// Row ids are either text (uuid) or bigint depending on the table.
fn string_or_number<'de, D>(deserializer: D) -> Result<OrderId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => OrderId::new(id),
        RawId::Number(id) => OrderId::new(id.to_string()),
    })
}

/// Destination for order rows.
pub trait OrderSink: Send + Sync {
    /// Store `lines` as one order. Either every line is accepted or none is.
    fn submit(
        &self,
        lines: &[OrderLine],
    ) -> impl Future<Output = Result<Vec<OrderReceipt>, OrderError>> + Send;
}

/// Place an order for everything in the session's cart.
///
/// On success the submitted entries are removed from the cart and the stored
/// rows are returned. Entries added while the order was in flight are kept.
/// On any failure the cart is left as it was.
///
/// # Errors
///
/// Returns `OrderError::EmptyCart` if the cart is empty, or the sink's error
/// if the order could not be stored.
pub async fn checkout<S: OrderSink>(
    session: &ShopSession,
    sink: &S,
    contact: &BuyerContact,
    locale: Locale,
) -> Result<Vec<OrderReceipt>, OrderError> {
    let entries = session.cart().entries();
    if entries.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    let checkout_ref = Uuid::new_v4();
    let created_at = Utc::now();
    let lines: Vec<OrderLine> = entries
        .iter()
        .map(|entry| OrderLine::new(entry, contact, locale, checkout_ref, created_at))
        .collect();

    let receipts = sink.submit(&lines).await.inspect_err(|e| {
        tracing::error!(error = %e, %checkout_ref, "Order submission failed, cart kept");
    })?;

    tracing::info!(
        %checkout_ref,
        lines = lines.len(),
        receipts = receipts.len(),
        "Order placed"
    );
    // Entries added while the order was in flight stay in the cart.
    let submitted: Vec<ProductId> = lines.iter().map(|line| line.product_id.clone()).collect();
    session.cart().remove_all(&submitted);
    Ok(receipts)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use breeze_core::{Price, Product};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSink {
        submitted: Mutex<Vec<Vec<OrderLine>>>,
    }

    impl OrderSink for RecordingSink {
        async fn submit(&self, lines: &[OrderLine]) -> Result<Vec<OrderReceipt>, OrderError> {
            self.submitted.lock().unwrap().push(lines.to_vec());
            Ok(lines
                .iter()
                .enumerate()
                .map(|(i, line)| OrderReceipt {
                    id: OrderId::new(format!("order-{i}")),
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                    status: Some("pending".to_string()),
                })
                .collect())
        }
    }

    struct FailingSink;

    impl OrderSink for FailingSink {
        async fn submit(&self, _lines: &[OrderLine]) -> Result<Vec<OrderReceipt>, OrderError> {
            Err(OrderError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    fn contact() -> BuyerContact {
        BuyerContact::new(
            "Noura Al-Harbi",
            "+966 55 123 4567",
            Some(" "),
            "Riyadh",
            "King Fahd Rd, Building 12",
            None,
        )
        .unwrap()
    }

    fn session_with_items() -> ShopSession {
        let session = ShopSession::load(Arc::new(MemoryStorage::new()));
        let split = Product::new("split-18k")
            .with_names("Split AC", "مكيف سبليت")
            .with_price(Price::from_units(2350));
        session.cart().add(&split, 2);
        session.cart().add(&Product::new("filter"), 1);
        session
    }

    #[test]
    fn test_contact_validation() {
        let contact = contact();
        assert_eq!(contact.phone().as_str(), "+966551234567");
        assert!(contact.email().is_none());

        assert!(matches!(
            BuyerContact::new("  ", "0551234567", None, "Riyadh", "Street 1", None),
            Err(ContactError::MissingField("full name"))
        ));
        assert!(matches!(
            BuyerContact::new("Noura", "abc", None, "Riyadh", "Street 1", None),
            Err(ContactError::Phone(_))
        ));
        assert!(matches!(
            BuyerContact::new("Noura", "0551234567", Some("bad"), "Riyadh", "Street 1", None),
            Err(ContactError::Email(_))
        ));
        assert!(matches!(
            BuyerContact::new("Noura", "0551234567", None, "Riyadh", "", None),
            Err(ContactError::MissingField("address"))
        ));
    }

    #[tokio::test]
    async fn test_checkout_clears_cart() {
        let session = session_with_items();
        let sink = RecordingSink::default();

        let receipts = checkout(&session, &sink, &contact(), Locale::Ar)
            .await
            .unwrap();
        assert_eq!(receipts.len(), 2);
        assert!(session.cart().is_empty());

        let submitted = sink.submitted.lock().unwrap();
        let lines = &submitted[0];
        assert_eq!(lines[0].product_name, "مكيف سبليت");
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].line_total, Decimal::from(4700));
        assert_eq!(lines[1].unit_price, Decimal::ZERO);
        assert_eq!(lines[0].checkout_ref, lines[1].checkout_ref);
        assert_eq!(lines[1].customer_name, "Noura Al-Harbi");
    }

    /// Accepts the order after another view adds to the cart mid-request.
    struct BusySink {
        session: ShopSession,
    }

    impl OrderSink for BusySink {
        async fn submit(&self, lines: &[OrderLine]) -> Result<Vec<OrderReceipt>, OrderError> {
            self.session
                .cart()
                .add(&Product::new("remote").with_price(Price::from_units(60)), 1);
            RecordingSink::default().submit(lines).await
        }
    }

    #[tokio::test]
    async fn test_checkout_keeps_entries_added_in_flight() {
        let session = session_with_items();
        let sink = BusySink {
            session: session.clone(),
        };

        let receipts = checkout(&session, &sink, &contact(), Locale::En)
            .await
            .unwrap();

        assert_eq!(receipts.len(), 2);
        let ids: Vec<_> = session
            .cart()
            .entries()
            .into_iter()
            .map(|entry| entry.product.id.into_inner())
            .collect();
        assert_eq!(ids, ["remote"]);
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_cart() {
        let session = session_with_items();
        let before = session.cart().entries();

        let result = checkout(&session, &FailingSink, &contact(), Locale::En).await;
        assert!(matches!(result, Err(OrderError::Api { status: 503, .. })));
        assert_eq!(session.cart().entries(), before);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let session = ShopSession::load(Arc::new(MemoryStorage::new()));
        let sink = RecordingSink::default();

        let result = checkout(&session, &sink, &contact(), Locale::Ar).await;
        assert!(matches!(result, Err(OrderError::EmptyCart)));
        assert!(sink.submitted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_receipt_accepts_numeric_id() {
        let receipts: Vec<OrderReceipt> = serde_json::from_str(
            r#"[{"id": 42, "product_id": "split-18k", "quantity": 2, "status": "pending", "city": "Riyadh"},
                {"id": "5f0c", "product_id": "filter", "quantity": 1}]"#,
        )
        .unwrap();
        assert_eq!(receipts[0].id.as_str(), "42");
        assert_eq!(receipts[1].id.as_str(), "5f0c");
        assert_eq!(receipts[1].status, None);
    }

    #[test]
    fn test_line_serializes_as_row() {
        let session = session_with_items();
        let entry = session.cart().entries().remove(0);
        let line = OrderLine::new(&entry, &contact(), Locale::En, Uuid::nil(), Utc::now());

        let row = serde_json::to_value(&line).unwrap();
        assert_eq!(row["product_id"], "split-18k");
        assert_eq!(row["product_name"], "Split AC");
        assert_eq!(row["line_total"], "4700");
        assert_eq!(row["locale"], "en");
        assert_eq!(row["phone"], "+966551234567");
        assert!(row["email"].is_null());
    }
}
