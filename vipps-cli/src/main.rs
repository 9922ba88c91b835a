//! Command-line client for the Vipps eCommerce payment API.
//!
//! # Usage
//!
//! ```bash
//! # Fetch an access token
//! vipps token
//!
//! # Start a payment of 12.00 NOK
//! vipps initiate --order-id order-1001 --amount 1200 --text "Two pairs of socks" \
//!     --callback https://shop.example/vipps --fallback https://shop.example/order/1001 \
//!     --option mobileNumber=91234567 --option isApp=false
//!
//! # Capture, then look at the result
//! vipps capture --order-id order-1001 --text Shipped --amount 1200
//! vipps details --order-id order-1001
//! ```
//!
//! # Environment Variables
//!
//! - `VIPPS_CONFIG` — Path to TOML configuration file (default: `vipps.toml`)
//! - `RUST_LOG` — Log level filter (default: `info`)
//!
//! Variables from a `.env` file in the working directory are loaded first.

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;
use vipps::{InitiatePaymentOptions, Vipps};

#[derive(Debug, Parser)]
#[command(name = "vipps", version, about = "Call the Vipps eCommerce payment API")]
struct Cli {
    /// Configuration file.
    #[arg(long, env = "VIPPS_CONFIG", default_value = "vipps.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Exchange the client credentials for an access token.
    Token,
    /// Start a payment.
    Initiate {
        #[arg(long)]
        order_id: String,
        /// Amount in øre.
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        text: String,
        /// Callback URL prefix.
        #[arg(long)]
        callback: String,
        /// Where the user returns to.
        #[arg(long)]
        fallback: String,
        /// Optional parameter as `key=value`; JSON values are accepted.
        #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
        options: Vec<(String, Value)>,
    },
    /// Capture a reserved payment.
    Capture {
        #[arg(long)]
        order_id: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        amount: u64,
    },
    /// Cancel a payment that has not been captured.
    Cancel {
        #[arg(long)]
        order_id: String,
        #[arg(long)]
        text: String,
    },
    /// Refund a captured payment.
    Refund {
        #[arg(long)]
        order_id: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        amount: u64,
    },
    /// Show the status of an order.
    Status {
        #[arg(long)]
        order_id: String,
    },
    /// Show the transaction history of an order.
    Details {
        #[arg(long)]
        order_id: String,
    },
}

fn parse_option(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load(&cli.config)?;
    tracing::info!(
        environment = ?config.environment,
        merchant_serial_number = %config.credentials.merchant_serial_number,
        "Loaded configuration"
    );

    let client = Vipps::from_config(&config)?;
    let payment = client.payment();

    match cli.command {
        Command::Token => print(&client.authorization().get_token().await?),
        Command::Initiate {
            order_id,
            amount,
            text,
            callback,
            fallback,
            options,
        } => {
            let bag: Map<String, Value> = options.into_iter().collect();
            let options = InitiatePaymentOptions::from_bag(bag);
            print(
                &payment
                    .initiate_payment(&order_id, amount, &text, &callback, &fallback, options)
                    .await?,
            )
        }
        Command::Capture {
            order_id,
            text,
            amount,
        } => print(&payment.capture_payment(&order_id, &text, amount).await?),
        Command::Cancel { order_id, text } => {
            print(&payment.cancel_payment(&order_id, &text).await?)
        }
        Command::Refund {
            order_id,
            text,
            amount,
        } => print(&payment.refund_payment(&order_id, &text, amount).await?),
        Command::Status { order_id } => print(&payment.get_order_status(&order_id).await?),
        Command::Details { order_id } => print(&payment.get_payment_details(&order_id).await?),
    }
}

#[allow(clippy::print_stdout)]
fn print(value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
