//! # Tax Catalog Seeder
//!
//! Populates a database with the default tax catalog for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p gymdesk-db --bin seed
//!
//! # Specify database path
//! cargo run -p gymdesk-db --bin seed -- --db ./data/gymdesk.db
//!
//! # More logging
//! RUST_LOG=debug cargo run -p gymdesk-db --bin seed
//! ```
//!
//! ## Default Catalog
//! | id        | name    | rate | kind      |
//! |-----------|---------|------|-----------|
//! | `gst`     | GST     | 18%  | inclusive |
//! | `vat`     | VAT     | 12%  | inclusive |
//! | `service` | Service | 15%  | exclusive |
//! | `luxury`  | Luxury  | 10%  | exclusive |

use std::env;

use gymdesk_core::{format_tax_breakdown, TaxSelection, TaxSetting};
use gymdesk_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// (id, name, rate, is_inclusive)
const DEFAULT_TAXES: &[(&str, &str, f64, bool)] = &[
    ("gst", "GST", 18.0, true),
    ("vat", "VAT", 12.0, true),
    ("service", "Service", 15.0, false),
    ("luxury", "Luxury", 10.0, false),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gymdesk=debug,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./gymdesk_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("GymDesk Tax Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./gymdesk_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(path = %db_path, "Seeding tax catalog");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let repo = db.tax_settings();

    let existing = repo.count().await?;
    if existing > 0 {
        warn!(existing, "Catalog already populated, skipping seed");
        return Ok(());
    }

    for &(id, name, rate, is_inclusive) in DEFAULT_TAXES {
        repo.insert(&TaxSetting::new(id, name, rate, is_inclusive))
            .await?;
    }

    let count = repo.count().await?;
    info!(count, "Tax catalog seeded");

    // Smoke-check the catalog against the engine
    let sample = repo
        .quote(1000.0, &TaxSelection::new().with("service", true).with("luxury", true))
        .await?;
    info!(
        total = sample.total_amount,
        breakdown = %format_tax_breakdown(&sample.tax_breakdown),
        "Sample quote on 1000.00"
    );

    db.close().await;
    Ok(())
}
