//! Checkout and order history commands.

use clap::Subcommand;
use storefront_api::{CommerceClient, Order};
use storefront_cart::{place_order, CartEngine, CheckoutError, ShippingAddress};

use crate::cart::print_cart;

/// Sub-commands available under `orders`.
#[derive(Debug, Subcommand)]
pub enum OrderCommands {
    /// List past orders
    List,
    /// Show one order
    Show { id: i64 },
}

pub(crate) async fn run(client: &CommerceClient, command: OrderCommands) -> anyhow::Result<()> {
    match command {
        OrderCommands::List => {
            let orders = client.list_orders().await?;
            if orders.is_empty() {
                println!("no orders yet");
            }
            for order in &orders {
                println!("{}", order_row(order));
            }
        }
        OrderCommands::Show { id } => {
            let order = client
                .get_order(id)
                .await
                .map_err(|e| anyhow::anyhow!("order {id}: {e}"))?;
            println!("{}", order_row(&order));
            for item in &order.items {
                let price = item
                    .price
                    .map_or_else(String::new, |p| format!(" @ ${p:.2}"));
                println!("  product {} x{}{price}", item.product_id, item.quantity);
            }
        }
    }
    Ok(())
}

/// Places an order for the current cart.
///
/// # Errors
///
/// Fails with the checkout error's message; a rejected submission surfaces as
/// "Failed to place order. Please try again." with the cause logged.
pub(crate) async fn run_checkout(
    engine: &CartEngine<CommerceClient>,
    client: &CommerceClient,
    address: &ShippingAddress,
    payment_method: &str,
) -> anyhow::Result<()> {
    match place_order(engine, client, address, payment_method).await {
        Ok(order) => {
            println!("order #{} placed", order.id);
            println!("{}", order_row(&order));
            Ok(())
        }
        Err(err) => {
            if let CheckoutError::Submission(cause) = &err {
                tracing::error!(error = %cause, "checkout failed");
            }
            print_cart(&engine.view());
            Err(anyhow::anyhow!("{err}"))
        }
    }
}

pub(crate) fn order_row(order: &Order) -> String {
    let status = if order.status.is_empty() {
        "unknown"
    } else {
        order.status.as_str()
    };
    format!(
        "#{:<6} {:<10} {:>3} item(s)  ${:.2}  {}",
        order.id,
        status,
        order.items.len(),
        order.total,
        order.created_at.as_deref().unwrap_or("")
    )
}
