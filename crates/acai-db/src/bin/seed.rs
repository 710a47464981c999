//! # Operator Seed
//!
//! Creates the two shop operator accounts in a fresh database. Catalog and
//! reference data come from the migrations; this only adds logins.
//!
//! ## Usage
//! ```bash
//! # Default database path
//! cargo run -p acai-db --bin seed
//!
//! # Specify database path and initial password
//! cargo run -p acai-db --bin seed -- --db ./data/acai.db --password s3gredo
//! ```
//!
//! Runs once: if any operator already exists the seed does nothing.

use acai_core::OperatorRole;
use acai_db::password::hash_password;
use acai_db::{Database, DbConfig, NewOperator};
use std::env;

/// Accounts created on first run: (name, email, role).
const OPERATORS: &[(&str, &str, OperatorRole)] = &[
    ("Administrador", "admin@megaacai", OperatorRole::Admin),
    ("Esposa", "esposa@megaacai", OperatorRole::Operator),
];

const DEFAULT_PASSWORD: &str = "senha123";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./data/acai.db");
    let mut password = String::from(DEFAULT_PASSWORD);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--password" | "-p" => {
                if i + 1 < args.len() {
                    password = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mega Açaí Operator Seed");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>        Database file path (default: ./data/acai.db)");
                println!("  -p, --password <PW>    Initial password (default: {})", DEFAULT_PASSWORD);
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Mega Açaí Operator Seed");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.operators().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} operators", existing);
        println!("  Skipping seed.");
        return Ok(());
    }

    for (name, email, role) in OPERATORS {
        let password_hash = hash_password(&password).map_err(|e| e.to_string())?;
        let id = db
            .operators()
            .insert(&NewOperator {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role: *role,
            })
            .await?;
        println!("  Created {} <{}> ({}) id={}", name, email, role.as_str(), id);
    }

    if password == DEFAULT_PASSWORD {
        println!();
        println!("⚠ Default password in use. Change it before going live.");
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
