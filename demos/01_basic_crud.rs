//! Demo 01: Basic CRUD
//!
//! This example walks through adding, editing and deleting quotes against a
//! local blob file, including the validation and duplicate rules.
//!
//! Run with: cargo run --example 01_basic_crud

use eyre::Result;
use quotebase::{LocalStorageAdapter, QuoteDraft, QuoteStore, StoreError};

fn draft(series: &str, title: &str, characters: &str, quote: &str, author: &str) -> QuoteDraft {
    QuoteDraft {
        book_series: series.to_string(),
        book_title: title.to_string(),
        characters: characters.to_string(),
        quote: quote.to_string(),
        author: author.to_string(),
    }
}

fn main() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let blob = temp_dir.path().join("quotes.json");

    println!("Quotebase CRUD Example");
    println!("======================\n");

    let mut store = QuoteStore::open(Box::new(LocalStorageAdapter::new(&blob)))?;

    // Create quotes. Series and characters are optional: they default to the
    // title and the author.
    println!("Adding quotes...");
    let dune = store.add(&draft(
        "",
        "Dune",
        "Paul Atreides",
        "Fear is the mind-killer.",
        "Frank Herbert",
    ))?;
    let mort = store.add(&draft(
        "Discworld",
        "Mort",
        "",
        "THERE IS NO JUSTICE. THERE IS JUST ME.",
        "Terry Pratchett",
    ))?;
    println!("  {} -> series defaulted to {:?}", dune.id, dune.book_series);
    println!("  {} -> characters defaulted to {:?}\n", mort.id, mort.characters);

    // Exact duplicates are rejected
    println!("Re-adding the first quote verbatim...");
    match store.add(&draft(
        "Dune",
        "Dune",
        "Paul Atreides",
        "Fear is the mind-killer.",
        "Frank Herbert",
    )) {
        Err(StoreError::Duplicate) => println!("  rejected: duplicate\n"),
        other => println!("  unexpected: {:?}\n", other.map(|r| r.id)),
    }

    // Edit by id; the id and creation time survive
    println!("Editing {}...", mort.id);
    let edited = store.update(
        &mort.id,
        &draft(
            "Discworld",
            "Mort",
            "Death",
            "THERE IS NO JUSTICE. THERE IS JUST ME.",
            "Terry Pratchett",
        ),
    )?;
    println!("  characters now {:?}\n", edited.characters);

    // Delete by id; a second delete with the stale id fails
    println!("Deleting {} twice...", dune.id);
    store.delete(&dune.id)?;
    match store.delete(&dune.id) {
        Err(StoreError::NotFound(id)) => println!("  second delete failed: {} is gone\n", id),
        other => println!("  unexpected: {:?}\n", other),
    }

    println!("{} quote(s) remain in {}", store.len(), blob.display());

    println!("\nExample complete!");
    Ok(())
}
