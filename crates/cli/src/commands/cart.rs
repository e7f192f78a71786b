//! Cart commands.
//!
//! The cart engine never reports failures; these commands compare the
//! cart before and after each change to tell the shopper what happened.

use breeze_core::ProductId;
use breeze_storefront::Result;

use super::{Context, stock_label};

/// Add `quantity` units of product `id`.
///
/// # Errors
///
/// Returns an error if the product cannot be looked up.
#[allow(clippy::print_stdout)]
pub async fn add(ctx: &Context, id: &str, quantity: u32) -> Result<()> {
    let product = ctx.product(id).await?;
    let cart = ctx.session.cart();
    let before = cart.get(&product.id).map(|entry| entry.quantity);

    cart.add(&product, quantity);

    let after = cart.get(&product.id).map(|entry| entry.quantity);
    match (before, after) {
        (_, None) => println!("Nothing added."),
        (Some(old), Some(new)) if old == new => println!(
            "Only {} of {} in stock; cart still holds {old}.",
            stock_label(&product),
            ctx.name(&product)
        ),
        (_, Some(new)) => println!("{} x{new} in cart.", ctx.name(&product)),
    }
    print_totals(ctx);
    Ok(())
}

/// Set the quantity of the cart entry for `id`.
#[allow(clippy::print_stdout)]
pub fn set(ctx: &Context, id: &str, quantity: i64) {
    let id = ProductId::new(id);
    let cart = ctx.session.cart();
    if !cart.contains(&id) {
        println!("{id} is not in the cart.");
        return;
    }

    cart.update_quantity(&id, quantity);

    match cart.get(&id) {
        None => println!("Removed {id} from the cart."),
        Some(entry) if i64::from(entry.quantity) < quantity => println!(
            "Only {} of {} in stock; quantity set to {}.",
            stock_label(&entry.product),
            ctx.name(&entry.product),
            entry.quantity
        ),
        Some(entry) => println!("{} x{} in cart.", ctx.name(&entry.product), entry.quantity),
    }
    print_totals(ctx);
}

/// Remove product `id` from the cart.
#[allow(clippy::print_stdout)]
pub fn remove(ctx: &Context, id: &str) {
    let id = ProductId::new(id);
    if ctx.session.cart().contains(&id) {
        ctx.session.cart().remove(&id);
        println!("Removed {id} from the cart.");
    } else {
        println!("{id} is not in the cart.");
    }
    print_totals(ctx);
}

/// Empty the cart.
#[allow(clippy::print_stdout)]
pub fn clear(ctx: &Context) {
    ctx.session.cart().clear();
    println!("Cart cleared.");
}

/// Print every cart entry and the totals.
#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) {
    let entries = ctx.session.cart().entries();
    if entries.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for entry in &entries {
        println!(
            "{:<20} {:<32} {:>4} x {:>14} = {:>16}",
            entry.product.id.as_str(),
            ctx.name(&entry.product),
            entry.quantity,
            ctx.price(entry.product.unit_price().amount()),
            ctx.price(entry.line_total()),
        );
    }
    print_totals(ctx);
}

#[allow(clippy::print_stdout)]
fn print_totals(ctx: &Context) {
    let cart = ctx.session.cart();
    println!(
        "Items: {}  Total: {}",
        cart.total_items(),
        ctx.price(cart.total_price())
    );
}
