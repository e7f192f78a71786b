//! Order submission.

use breeze_storefront::Result;
use breeze_storefront::orders::{BuyerContact, OrderClient, checkout};

use super::Context;

/// Buyer details as typed on the command line.
pub struct OrderForm {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub city: String,
    pub address: String,
    pub notes: Option<String>,
}

/// Send the cart to the backend as an order. The ordered entries leave the
/// cart only if the backend accepted every line.
///
/// # Errors
///
/// Returns an error if the buyer details are invalid, the cart is empty, no
/// backend is configured, or the backend rejects the order.
#[allow(clippy::print_stdout)]
pub async fn submit(ctx: &Context, form: &OrderForm) -> Result<()> {
    let contact = BuyerContact::new(
        &form.name,
        &form.phone,
        form.email.as_deref(),
        &form.city,
        &form.address,
        form.notes.as_deref(),
    )?;
    let backend = ctx.config.require_backend()?;
    let client = OrderClient::new(backend)?;

    let total = ctx.session.cart().total_price();
    let receipts = checkout(&ctx.session, &client, &contact, ctx.config.locale).await?;

    println!("Order placed. Total: {}", ctx.price(total));
    for receipt in &receipts {
        println!(
            "  #{:<12} {:<20} x{}",
            receipt.id.as_str(),
            receipt.product_id.as_str(),
            receipt.quantity
        );
    }
    Ok(())
}
