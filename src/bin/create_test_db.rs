use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::Arc;

use clap::Parser;

use transaction_records::{
    Database, FixedOffsetClock, SQLiteTransactionRepository, TransactionInput,
    TransactionRepository,
};

/// A utility for creating a test database for the transaction records server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const SAMPLE_TRANSACTIONS: [(&str, &str, f64); 4] = [
    ("TX-1001", "card", 1250.00),
    ("TX-1002", "cash", 480.50),
    ("TX-1003", "bank transfer", 15000.00),
    ("TX-1004", "card", 99.99),
];

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
    let database = Database::open(output_path)?;
    let repository = SQLiteTransactionRepository::new(Arc::new(FixedOffsetClock::default()));

    println!("Creating sample transactions...");

    let session = database.session()?;
    for (reference_number, payment_method, amount) in SAMPLE_TRANSACTIONS {
        repository.create(
            &session,
            &TransactionInput::new(reference_number, payment_method, amount),
        )?;
    }

    println!("Success!");

    Ok(())
}
