//! Demo 01: Favorites CRUD and response formats
//!
//! Drives the in-memory repository directly (no catalog, no HTTP) and renders
//! the collection in each wire format.
//!
//! Run with: cargo run --example 01_favorites_crud

use chrono::Utc;
use eyre::Result;
use recipebox::format::proto::DEFAULT_SCHEMA;
use recipebox::normalize::{FAVORITE_PREVIEW_CHARS, truncate_preview};
use recipebox::{Candidate, FavoritesRepository, Format, FormatEncoder, ListSchema, Payload, SchemaSlot};

fn candidate(external_id: &str, name: &str, category: &str, instructions: &str) -> Candidate {
    Candidate {
        external_id: external_id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        instructions_preview: truncate_preview(instructions, FAVORITE_PREVIEW_CHARS),
        date_added: Utc::now(),
    }
}

fn main() -> Result<()> {
    println!("recipebox Favorites CRUD Demo");
    println!("=============================\n");

    let repo = FavoritesRepository::new();

    // ADD
    println!("1. ADD - Storing two favorites...");
    let pie = repo.add(candidate(
        "52805",
        "Cheese Pie",
        "Dessert",
        "Preheat the oven to 180C. Mix the cheese with the eggs and pour into the pastry case.",
    ))?;
    let casserole = repo.add(candidate(
        "52772",
        "Teriyaki Chicken Casserole",
        "Chicken",
        "Preheat oven to 350 F. Spray a 9x13-inch baking pan with non-stick spray.",
    ))?;
    println!("   Added #{} {}", pie.id, pie.name);
    println!("   Added #{} {}\n", casserole.id, casserole.name);

    // DUPLICATE
    println!("2. ADD again - Same external id is rejected...");
    match repo.add(candidate("52805", "Cheese Pie", "Dessert", "")) {
        Ok(record) => println!("   Unexpectedly stored #{}", record.id),
        Err(e) => println!("   Rejected: {}", e),
    }
    println!();

    // RENAME
    println!("3. RENAME - Changing the display name...");
    let renamed = repo.rename(pie.id, Some("Grandma's Cheese Pie"))?;
    println!("   #{} is now {}\n", renamed.id, renamed.name);

    // FORMATS
    println!("4. LIST - Rendering the collection...");
    let encoder = FormatEncoder::new(SchemaSlot::ready(ListSchema::parse(DEFAULT_SCHEMA)?));
    let records = repo.list();
    for format in [Format::Default, Format::Xml, Format::Proto] {
        let encoded = encoder.encode(Payload::Collection(&records), format)?;
        println!("   {:<8} {:<22} {} bytes", format.to_string(), encoded.content_type, encoded.bytes.len());
    }
    println!();

    // REMOVE
    println!("5. REMOVE - Dropping the casserole...");
    repo.remove(casserole.id)?;
    println!("   Remaining favorites: {}", repo.len());
    match repo.remove(casserole.id) {
        Ok(()) => println!("   Unexpectedly removed twice"),
        Err(e) => println!("   Second remove: {}", e),
    }

    println!("\nDone.");
    Ok(())
}
