//! Catalog browsing commands.

use clap::Subcommand;
use storefront_api::CommerceClient;
use storefront_core::{Product, ProductId};

/// Sub-commands available under `products`.
#[derive(Debug, Subcommand)]
pub enum ProductCommands {
    /// List every product in the catalog
    List {
        /// Only show products with stock available
        #[arg(long)]
        in_stock: bool,
    },
    /// Show one product in detail
    Show { id: i64 },
}

pub(crate) async fn run(client: &CommerceClient, command: ProductCommands) -> anyhow::Result<()> {
    match command {
        ProductCommands::List { in_stock } => {
            let products = client.list_products().await?;
            let shown: Vec<&Product> = products
                .iter()
                .filter(|p| !in_stock || p.in_stock())
                .collect();
            if shown.is_empty() {
                println!("no products found");
                return Ok(());
            }
            for product in shown {
                println!("{}", product_row(product));
            }
        }
        ProductCommands::Show { id } => {
            let product = client
                .get_product(ProductId(id))
                .await
                .map_err(|e| anyhow::anyhow!("product {id}: {e}"))?;
            print_product(&product);
        }
    }
    Ok(())
}

pub(crate) fn product_row(product: &Product) -> String {
    let stock = if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "out of stock".to_string()
    };
    format!(
        "{:>5}  {:<40}  {:>10}  {}",
        product.id.0,
        product.name,
        format!("${:.2}", product.price),
        stock
    )
}

fn print_product(product: &Product) {
    println!("{} (#{})", product.name, product.id);
    if let Some(brand) = &product.brand {
        println!("  brand:    {brand}");
    }
    if let Some(category) = &product.category {
        println!("  category: {category}");
    }
    println!("  price:    ${:.2}", product.price);
    println!("  stock:    {}", product.stock);
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }
    if let Some(specs) = &product.specs {
        for (key, value) in specs {
            println!("  {key}: {value}");
        }
    }
}
