//! Fondant Booth CLI - catalog management tools.
//!
//! The storefront reads its catalog from a JSON file on every request, so
//! edits made here go live immediately, no restart needed. Every save
//! first copies the previous file contents to a `.backup` sibling.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog with indices
//! fondant-cli list
//!
//! # Add a product
//! fondant-cli add --title "Unicorn Topper" --price 24.99 \
//!     --link https://example.com/listing --image-url https://example.com/img.jpg
//!
//! # Remove the product at index 3
//! fondant-cli remove 3
//!
//! # Bulk import from CSV (header: title,price,link,image_url)
//! fondant-cli import new_products.csv
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fondant-cli")]
#[command(author, version, about = "Fondant Booth catalog manager")]
struct Cli {
    /// Path to the catalog JSON file
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products with their indices
    List,
    /// Add a single product
    Add {
        /// Product title
        #[arg(long)]
        title: String,

        /// Decimal price, e.g. 24.99
        #[arg(long)]
        price: String,

        /// External listing link
        #[arg(long, default_value = "")]
        link: String,

        /// Product image URL
        #[arg(long, default_value = "")]
        image_url: String,
    },
    /// Remove the product at an index
    Remove {
        /// Zero-based catalog index
        index: usize,
    },
    /// Bulk-import products from a CSV file
    Import {
        /// CSV file with header title,price,link,image_url
        csv_file: PathBuf,
    },
}

/// Resolve the catalog path: `--file`, then `PRODUCTS_FILE`, then the
/// storefront default.
fn catalog_path(cli_file: Option<PathBuf>) -> PathBuf {
    cli_file
        .or_else(|| std::env::var("PRODUCTS_FILE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data/extracted_products.json"))
}

fn main() {
    // Load .env so PRODUCTS_FILE matches the storefront's view
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let path = catalog_path(cli.file);

    let result = match cli.command {
        Commands::List => commands::catalog::list(&path),
        Commands::Add {
            title,
            price,
            link,
            image_url,
        } => commands::catalog::add(&path, &title, &price, &link, &image_url),
        Commands::Remove { index } => commands::catalog::remove(&path, index),
        Commands::Import { csv_file } => commands::catalog::import(&path, &csv_file),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}
