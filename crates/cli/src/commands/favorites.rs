//! Favorites commands.

use breeze_core::ProductId;
use breeze_storefront::Result;

use super::Context;

/// Mark product `id` as a favorite.
///
/// # Errors
///
/// Returns an error if the product cannot be looked up.
#[allow(clippy::print_stdout)]
pub async fn add(ctx: &Context, id: &str) -> Result<()> {
    let product = ctx.product(id).await?;
    ctx.session.favorites().add(&product);
    println!("{} is a favorite.", ctx.name(&product));
    Ok(())
}

/// Flip the favorite state of product `id`.
///
/// # Errors
///
/// Returns an error if the product has to be added and cannot be looked up.
#[allow(clippy::print_stdout)]
pub async fn toggle(ctx: &Context, id: &str) -> Result<()> {
    let favorites = ctx.session.favorites();
    let product_id = ProductId::new(id);
    if favorites.contains(&product_id) {
        favorites.remove(&product_id);
        println!("Removed {product_id} from favorites.");
        return Ok(());
    }

    let product = ctx.product(id).await?;
    favorites.toggle(&product);
    println!("{} is a favorite.", ctx.name(&product));
    Ok(())
}

/// Remove product `id` from favorites.
#[allow(clippy::print_stdout)]
pub fn remove(ctx: &Context, id: &str) {
    let id = ProductId::new(id);
    ctx.session.favorites().remove(&id);
    println!("Removed {id} from favorites.");
}

/// Remove every favorite.
#[allow(clippy::print_stdout)]
pub fn clear(ctx: &Context) {
    ctx.session.favorites().clear();
    println!("Favorites cleared.");
}

/// Print the favorites.
#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) {
    let products = ctx.session.favorites().products();
    if products.is_empty() {
        println!("No favorites yet.");
        return;
    }
    for product in &products {
        let marker = if ctx.session.cart().contains(&product.id) {
            " [in cart]"
        } else {
            ""
        };
        println!(
            "{:<20} {:<32} {:>14}{marker}",
            product.id.as_str(),
            ctx.name(product),
            ctx.price(product.unit_price().amount())
        );
    }
}
