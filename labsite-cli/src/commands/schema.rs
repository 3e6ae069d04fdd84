//! Print the PostgreSQL schema
//!
//! Pipe into psql to set up a database:
//!   labsite schema | psql "$DATABASE_URL"

use anyhow::Result;

use labsite_server::db::SCHEMA;

pub fn run_schema() -> Result<()> {
    print!("{}", SCHEMA);
    Ok(())
}
