use std::error::Error;
use std::fs;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use sales_report::{
    DEFAULT_SEED_URL, SeedRecord, fetch_seed_data, import_seed_records, initialize_db,
};

/// A utility for loading the product dataset into a database without running the server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. It is created if it does not exist.
    #[arg(long, short)]
    db_path: String,

    /// A URL or local file path to read the product dataset from.
    #[arg(long, short, default_value = DEFAULT_SEED_URL)]
    source: String,
}

/// Create the database tables and import the product dataset.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let records = if args.source.starts_with("http://") || args.source.starts_with("https://") {
        println!("Fetching products from {}", args.source);
        fetch_seed_data(&args.source).await?
    } else {
        println!("Reading products from {:#?}", args.source);
        let text = fs::read_to_string(&args.source)?;
        serde_json::from_str::<Vec<SeedRecord>>(&text)?
    };

    if records.is_empty() {
        eprintln!("The dataset at {} has no products.", args.source);
        exit(1);
    }

    println!("Opening database at {:#?}", args.db_path);
    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let record_count = records.len();
    let inserted_count = import_seed_records(records, &conn)?;

    println!(
        "Imported {inserted_count} new products ({} already in the database).",
        record_count - inserted_count
    );

    Ok(())
}
