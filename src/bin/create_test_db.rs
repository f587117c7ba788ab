use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use spese_rs::{
    Amount, Category, DEFAULT_CATEGORIES, Transaction, create_category, create_transaction,
    initialize_db,
};

/// A utility for creating a test database for the spese_rs server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Sample transactions as (category, days before today, cents, note).
const SAMPLE_TRANSACTIONS: [(&str, i64, i64, Option<&str>); 10] = [
    ("Stipendio", 40, 185_000, None),
    ("Stipendio", 10, 185_000, None),
    ("Altre Entrate", 5, 12_000, Some("rimborso")),
    ("Utenze", 35, 9_830, Some("bolletta luce")),
    ("Utenze", 3, 4_250, Some("bolletta gas")),
    ("Negozi Vari", 8, 6_720, None),
    ("Negozi Vari", 2, 2_315, Some("ferramenta")),
    ("Macchina", 12, 6_000, Some("benzina")),
    ("Divertimento", 6, 3_500, Some("cinema")),
    ("Visite/Esami medici", 20, 8_000, None),
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
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating categories...");

    let categories = DEFAULT_CATEGORIES
        .into_iter()
        .map(|(name, kind)| create_category(name, kind, &conn))
        .collect::<Result<Vec<Category>, _>>()?;

    println!("Creating sample transactions...");

    let today: Date = OffsetDateTime::now_utc().date();

    for (category_name, days_ago, cents, note) in SAMPLE_TRANSACTIONS {
        let Some(category) = categories
            .iter()
            .find(|category| category.name == category_name)
        else {
            eprintln!("Unknown sample category {category_name}");
            exit(1);
        };

        create_transaction(
            Transaction::build(
                category.id,
                today - Duration::days(days_ago),
                Amount::from_cents(cents),
            )
            .note(note.map(str::to_owned)),
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
