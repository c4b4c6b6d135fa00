//! Cart command handlers.
//!
//! A one-shot `cart` invocation starts a fresh engine, so anything held in
//! local mode is gone when the process exits. Commands that only make sense on
//! a long-lived engine (`clear`, `sync`) live in the interactive shell.

use clap::Subcommand;
use storefront_api::CommerceClient;
use storefront_cart::{CartEngine, SyncOutcome};
use storefront_core::{CartLine, CartView, LineId, Mode, ProductId};

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show the current cart
    Show,
    /// Add a product to the cart
    Add {
        product_id: i64,
        #[arg(long, default_value = "1")]
        quantity: u32,
    },
    /// Set the quantity of a cart line
    Update { line_id: i64, quantity: u32 },
    /// Remove a line from the cart
    Remove { line_id: i64 },
}

pub(crate) async fn run(
    engine: &CartEngine<CommerceClient>,
    client: &CommerceClient,
    command: CartCommands,
) -> anyhow::Result<()> {
    match command {
        CartCommands::Show => {}
        CartCommands::Add {
            product_id,
            quantity,
        } => {
            let product_id = ProductId(product_id);
            // Best effort; a missing snapshot only affects local-mode display.
            let snapshot = match client.get_product(product_id).await {
                Ok(product) => Some(product.snapshot()),
                Err(e) => {
                    tracing::debug!(%product_id, error = %e, "product lookup failed, adding without snapshot");
                    None
                }
            };
            let outcome = engine.add_to_cart(product_id, quantity, snapshot).await?;
            report_outcome("added", outcome);
        }
        CartCommands::Update { line_id, quantity } => {
            let outcome = engine.update_quantity(LineId(line_id), quantity).await?;
            report_outcome("updated", outcome);
        }
        CartCommands::Remove { line_id } => {
            let outcome = engine.remove_from_cart(LineId(line_id)).await;
            report_outcome("removed", outcome);
        }
    }

    print_cart(&engine.view());
    Ok(())
}

fn report_outcome(action: &str, outcome: SyncOutcome) {
    match outcome {
        SyncOutcome::Confirmed => println!("{action}"),
        SyncOutcome::Local => println!("{action} (local only, remote cart unavailable)"),
    }
}

pub(crate) fn print_cart(view: &CartView) {
    if view.mode == Mode::Local {
        println!("[offline] showing local cart");
        if let Some(err) = &view.last_error {
            println!("  last error: {err}");
        }
    }
    if view.lines().is_empty() {
        println!("cart is empty");
        return;
    }
    for line in view.lines() {
        println!("{}", line_row(line));
    }
    println!(
        "{} item(s), total ${:.2}",
        view.total_items(),
        view.total_price()
    );
}

pub(crate) fn line_row(line: &CartLine) -> String {
    let name = line
        .name()
        .map_or_else(|| format!("product {}", line.product_id()), str::to_string);
    let marker = if line.is_local() { "*" } else { " " };
    format!(
        "{marker}{:>14}  {:<40} x{:<3} ${:.2}",
        line.id().0,
        name,
        line.quantity().get(),
        line.subtotal()
    )
}

