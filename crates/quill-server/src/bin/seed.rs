//! Populate the database with demo users, posts, and comments.
//! Usage: `cargo run --bin seed` (honors QUILL_DB_PATH).

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use quill_core::credentials;
use quill_db::seed::{DEMO_USERS, SeedUser};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=info".into()),
        )
        .init();

    let db_path = std::env::var("QUILL_DB_PATH").unwrap_or_else(|_| "quill.db".into());
    let db = quill_db::Database::open(&PathBuf::from(&db_path))?;

    // Demo passwords go through the same hashing choke point as
    // registration; nothing lands in the store as plaintext.
    let users = DEMO_USERS
        .iter()
        .copied()
        .map(|(username, email, password)| {
            Ok(SeedUser {
                username,
                email,
                password_hash: credentials::hash_password(password)
                    .map_err(|e| anyhow::anyhow!("hashing seed password: {e}"))?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    quill_db::seed::run(&db, &users)?;
    info!("Seeding complete");
    Ok(())
}
