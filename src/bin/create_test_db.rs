use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;

use bangketicket_api::{
    NewVendorTransaction, count_vendor_transactions, initialize_db, insert_vendor_transaction,
};

/// A utility for creating a test database for the bangketicket API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of transactions to create for today (UTC).
    #[arg(long, short, default_value_t = 0)]
    seed: u32,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    if args.seed > 0 {
        println!("Creating {} test transactions...", args.seed);
        let today = OffsetDateTime::now_utc().date();

        for i in 1..=args.seed {
            insert_vendor_transaction(
                NewVendorTransaction {
                    vendor_id: format!("V-{:03}", i % 25 + 1),
                    date: today.to_string(),
                    amount: i64::from(i) * 10,
                    collector_id: format!("C-{}", i % 3 + 1),
                },
                today,
                &conn,
            )?;
        }
    }

    println!(
        "Success! The database has {} transactions.",
        count_vendor_transactions(&conn)?
    );

    Ok(())
}
