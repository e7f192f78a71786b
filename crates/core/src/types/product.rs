//! Product snapshot carried by the cart, compare and favorites lists.
//!
//! A [`Product`] is a value copy of a catalog row taken when the shopper
//! acts on it. Only `id`, `price` and `inventory` matter to the list
//! engines; every other column rides along untouched in [`Product::extra`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{Locale, Price, ProductId};

/// How many units of a product a single cart entry may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capacity {
    /// Stock is tracked; at most this many units.
    Limited(u32),
    /// Stock is not tracked.
    Unlimited,
}

impl Capacity {
    /// Whether a line of `quantity` units fits.
    #[must_use]
    pub fn admits(&self, quantity: u64) -> bool {
        match self {
            Self::Limited(max) => quantity <= u64::from(*max),
            Self::Unlimited => true,
        }
    }

    /// Clamp `quantity` to this capacity.
    #[must_use]
    pub fn clamp(&self, quantity: u32) -> u32 {
        match self {
            Self::Limited(max) => quantity.min(*max),
            Self::Unlimited => quantity,
        }
    }
}

/// A catalog product as seen by the storefront lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable, unique catalog id.
    pub id: ProductId,
    /// English display name. Missing or null reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name_en: String,
    /// Arabic display name. Missing or null reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name_ar: String,
    /// Unit price. Absent prices count as zero in totals.
    #[serde(default)]
    pub price: Option<Price>,
    /// Units in stock. Absent means stock is not tracked.
    #[serde(default)]
    pub inventory: Option<u32>,
    /// Primary image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Remaining catalog columns (brand, category, specs, descriptions...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a bare product with the given id and no other data.
    #[must_use]
    pub fn new(id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            name_en: String::new(),
            name_ar: String::new(),
            price: None,
            inventory: None,
            image_url: None,
            extra: Map::new(),
        }
    }

    /// Set the unit price.
    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the tracked stock level.
    #[must_use]
    pub fn with_inventory(mut self, inventory: u32) -> Self {
        self.inventory = Some(inventory);
        self
    }

    /// Set both display names.
    #[must_use]
    pub fn with_names(mut self, en: impl Into<String>, ar: impl Into<String>) -> Self {
        self.name_en = en.into();
        self.name_ar = ar.into();
        self
    }

    /// The most units a single cart entry for this product may hold.
    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        match self.inventory {
            Some(max) => Capacity::Limited(max),
            None => Capacity::Unlimited,
        }
    }

    /// Display name in `locale`, falling back to the other language.
    #[must_use]
    pub fn name(&self, locale: Locale) -> &str {
        let name = locale.pick(&self.name_ar, &self.name_en);
        if name.trim().is_empty() {
            self.id.as_str()
        } else {
            name
        }
    }

    /// Unit price, with an absent price treated as zero.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.price.unwrap_or(Price::ZERO)
    }
}

/// Nullable text columns: `null` becomes an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_capacity_from_inventory() {
        let tracked = Product::new("a").with_inventory(2);
        assert_eq!(tracked.capacity(), Capacity::Limited(2));
        assert!(tracked.capacity().admits(2));
        assert!(!tracked.capacity().admits(3));
        assert_eq!(tracked.capacity().clamp(9), 2);

        let untracked = Product::new("b");
        assert_eq!(untracked.capacity(), Capacity::Unlimited);
        assert!(untracked.capacity().admits(u64::MAX));
        assert_eq!(untracked.capacity().clamp(9), 9);
    }

    #[test]
    fn test_zero_inventory_admits_nothing() {
        let sold_out = Product::new("c").with_inventory(0);
        assert!(!sold_out.capacity().admits(1));
        assert_eq!(sold_out.capacity().clamp(4), 0);
    }

    #[test]
    fn test_deserialize_catalog_row_keeps_unknown_columns() {
        let row = r#"{
            "id": "9b2e",
            "name_en": "Inverter Split 18000 BTU",
            "name_ar": "مكيف سبليت انفرتر 18000 وحدة",
            "price": 2399.00,
            "inventory": null,
            "brand_id": "gree",
            "specs": {"btu": 18000, "cooling_only": true}
        }"#;
        let product: Product = serde_json::from_str(row).unwrap();

        assert_eq!(product.id.as_str(), "9b2e");
        assert_eq!(product.unit_price().amount(), Decimal::new(2399, 0));
        assert_eq!(product.capacity(), Capacity::Unlimited);
        assert_eq!(product.extra.get("brand_id").unwrap(), "gree");
        assert!(product.extra.contains_key("specs"));

        let round_trip: Product =
            serde_json::from_str(&serde_json::to_string(&product).unwrap()).unwrap();
        assert_eq!(round_trip, product);
    }

    #[test]
    fn test_null_names_read_as_empty() {
        let product: Product =
            serde_json::from_str(r#"{"id": "A", "name_en": null, "name_ar": null, "price": 100}"#)
                .unwrap();
        assert_eq!(product.name_en, "");
        assert_eq!(product.name_ar, "");
        assert_eq!(product.name(Locale::En), "A");
        assert_eq!(product.unit_price().amount(), Decimal::from(100));
    }

    #[test]
    fn test_missing_price_counts_as_zero() {
        assert_eq!(Product::new("x").unit_price(), Price::ZERO);
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let product = Product::new("sku-1");
        assert_eq!(product.name(Locale::En), "sku-1");
        let named = product.with_names("Window unit", "مكيف شباك");
        assert_eq!(named.name(Locale::Ar), "مكيف شباك");
    }
}
