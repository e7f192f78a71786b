//! Catalog browsing.

use breeze_storefront::Result;
use breeze_storefront::catalog::ProductSource;

use super::{Context, stock_label};

/// List every product, marking the ones already in the shopper's lists.
///
/// # Errors
///
/// Returns an error if no catalog is configured or it cannot be read.
#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context) -> Result<()> {
    let products = ctx.catalog()?.products().await?;
    tracing::debug!(count = products.len(), "Listing products");

    if products.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }

    let session = &ctx.session;
    for product in &products {
        let mut markers = Vec::new();
        if let Some(entry) = session.cart().get(&product.id) {
            markers.push(format!("cart x{}", entry.quantity));
        }
        if session.compare().contains(&product.id) {
            markers.push("compare".to_string());
        }
        if session.favorites().contains(&product.id) {
            markers.push("favorite".to_string());
        }
        let markers = if markers.is_empty() {
            String::new()
        } else {
            format!(" [{}]", markers.join(", "))
        };

        println!(
            "{:<20} {:<32} {:>14}  stock {:>5}{markers}",
            product.id.as_str(),
            ctx.name(product),
            ctx.price(product.unit_price().amount()),
            stock_label(product),
        );
    }
    Ok(())
}
