//! Compare commands.
//!
//! After the first product goes in, the shopper is asked for a second one.
//! When the second arrives the comparison table is shown right away.

use std::collections::BTreeSet;
use std::fmt::Write;

use breeze_core::{CurrencyCode, Locale, Product, ProductId};
use breeze_storefront::Result;
use breeze_storefront::format::format_price;
use breeze_storefront::store::MAX_COMPARE_ITEMS;
use serde_json::Value;

use super::{Context, stock_label};

const COLUMN_WIDTH: usize = 24;

/// Add product `id` to the comparison list.
///
/// # Errors
///
/// Returns an error if the product cannot be looked up.
#[allow(clippy::print_stdout)]
pub async fn add(ctx: &Context, id: &str) -> Result<()> {
    let compare = ctx.session.compare();
    let product_id = ProductId::new(id);
    if compare.contains(&product_id) {
        println!("{product_id} is already being compared.");
        return Ok(());
    }
    if !compare.can_add_more() {
        println!("You can compare at most {MAX_COMPARE_ITEMS} products. Remove one first.");
        return Ok(());
    }

    let product = ctx.product(id).await?;
    let before = compare.len();
    compare.add(&product);
    let after = compare.len();

    match (before, after) {
        (0, 1) => {
            println!("Added {} to compare.", ctx.name(&product));
            println!("Pick a second product to compare it with: breeze compare add <id>");
        }
        (1, 2) => print!("{}", render(ctx, &compare.products())),
        _ => println!(
            "Added {} to compare ({after}/{MAX_COMPARE_ITEMS}).",
            ctx.name(&product)
        ),
    }
    Ok(())
}

/// Remove product `id` from the comparison list.
#[allow(clippy::print_stdout)]
pub fn remove(ctx: &Context, id: &str) {
    let id = ProductId::new(id);
    ctx.session.compare().remove(&id);
    println!("Removed {id} from compare.");
}

/// Empty the comparison list.
#[allow(clippy::print_stdout)]
pub fn clear(ctx: &Context) {
    ctx.session.compare().clear();
    println!("Compare list cleared.");
}

/// Print the comparison table.
#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) {
    let products = ctx.session.compare().products();
    if products.is_empty() {
        println!("Nothing to compare yet.");
        return;
    }
    print!("{}", render(ctx, &products));
}

fn render(ctx: &Context, products: &[Product]) -> String {
    comparison_table(products, ctx.config.locale, ctx.config.currency)
}

/// Side-by-side table: one column per product, one row per attribute.
/// Catalog columns missing from a product show as `-`.
fn comparison_table(products: &[Product], locale: Locale, currency: CurrencyCode) -> String {
    let attributes: BTreeSet<&str> = products
        .iter()
        .flat_map(|product| product.extra.keys().map(String::as_str))
        .collect();

    let mut rows: Vec<(String, Vec<String>)> = vec![
        (
            "Product".to_string(),
            products.iter().map(|p| p.name(locale).to_string()).collect(),
        ),
        (
            "Price".to_string(),
            products
                .iter()
                .map(|p| format_price(p.unit_price().amount(), currency, locale))
                .collect(),
        ),
        (
            "Stock".to_string(),
            products.iter().map(stock_label).collect(),
        ),
    ];
    for attribute in attributes {
        rows.push((
            attribute.to_string(),
            products
                .iter()
                .map(|p| p.extra.get(attribute).map_or_else(|| "-".to_string(), cell))
                .collect(),
        ));
    }

    let mut table = String::new();
    for (label, cells) in rows {
        let _ = write!(table, "{label:<16}");
        for value in cells {
            let _ = write!(table, " | {}", fit(&value));
        }
        table.push('\n');
    }
    table
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn fit(value: &str) -> String {
    let width = value.chars().count();
    if width > COLUMN_WIDTH {
        let mut cut: String = value.chars().take(COLUMN_WIDTH - 1).collect();
        cut.push('…');
        cut
    } else {
        format!("{value}{}", " ".repeat(COLUMN_WIDTH - width))
    }
}
