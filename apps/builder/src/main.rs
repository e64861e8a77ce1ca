mod card;
mod catalog;
mod topics;

use std::path::Path;

use anyhow::Result;

// Fixed layout relative to the invocation directory, matching what the
// front end and the card authors expect.
const DB_DIR: &str = "database";
const TOPICS_FILE: &str = "database/Train to DA.md";
const OUTPUT_FILE: &str = "data.json";

fn main() -> Result<()> {
    let count = catalog::build(
        Path::new(DB_DIR),
        Path::new(TOPICS_FILE),
        Path::new(OUTPUT_FILE),
    )?;
    println!("✓ {OUTPUT_FILE} written: {count} cards");
    Ok(())
}
