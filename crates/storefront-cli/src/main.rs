use clap::{Parser, Subcommand};
use storefront_api::CommerceClient;
use storefront_cart::{CartEngine, EngineConfig};
use storefront_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod assistant;
mod cart;
mod orders;
mod products;
mod shell;

use cart::CartCommands;
use orders::OrderCommands;
use products::ProductCommands;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Storefront command line shell")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Inspect and modify the cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Place an order for the current cart
    Checkout {
        #[arg(long)]
        street: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        zip: String,
        /// Payment method; defaults to `STOREFRONT_PAYMENT_METHOD`
        #[arg(long)]
        payment_method: Option<String>,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        command: OrderCommands,
    },
    /// Ask the shopping assistant a question
    Chat {
        message: String,
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Check that the commerce API is reachable
    Health,
    /// Interactive cart session that keeps one engine alive between commands
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = storefront_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("storefront-cli ready ({} against {})", config.env, config.api_url);
        return Ok(());
    };

    let client = CommerceClient::from_config(&config)?;
    match command {
        Commands::Products { command } => products::run(&client, command).await,
        Commands::Cart { command } => {
            let engine = start_engine(&client, &config).await;
            cart::run(&engine, &client, command).await
        }
        Commands::Checkout {
            street,
            city,
            state,
            zip,
            payment_method,
        } => {
            let engine = start_engine(&client, &config).await;
            let address = storefront_cart::ShippingAddress {
                street,
                city,
                state,
                zip_code: zip,
            };
            let payment_method = payment_method.unwrap_or_else(|| config.payment_method.clone());
            orders::run_checkout(&engine, &client, &address, &payment_method).await
        }
        Commands::Orders { command } => orders::run(&client, command).await,
        Commands::Chat { message, user_id } => {
            assistant::run_chat(&client, &message, user_id.as_deref()).await
        }
        Commands::Health => assistant::run_health(&client).await,
        Commands::Shell => {
            let engine = start_engine(&client, &config).await;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run(&engine, &client, stdin).await
        }
    }
}

async fn start_engine(client: &CommerceClient, config: &AppConfig) -> CartEngine<CommerceClient> {
    CartEngine::start(client.clone(), EngineConfig::from_app_config(config)).await
}
