//! Demo 02: Search, sort and pagination
//!
//! This example shows how the query operations compose: search narrows the
//! collection, sort orders the narrowed view, and pagination windows the
//! result. The canonical collection never changes.
//!
//! Run with: cargo run --example 02_search_sort_paginate

use eyre::Result;
use quotebase::{MemoryAdapter, QuoteDraft, QuoteField, QuoteStore, SearchScope};

fn main() -> Result<()> {
    println!("Quotebase Query Example");
    println!("=======================\n");

    let mut store = QuoteStore::open(Box::new(MemoryAdapter::new()))?;

    let seed = [
        ("Dune", "Dune", "Paul", "Fear is the mind-killer.", "Frank Herbert"),
        ("Dune", "Dune Messiah", "Stilgar", "Here lies a toppled god.", "Frank Herbert"),
        ("Discworld", "Mort", "Death", "THERE IS NO JUSTICE.", "Terry Pratchett"),
        ("Discworld", "Guards! Guards!", "Vimes", "It was the usual trouble.", "Terry Pratchett"),
        ("Earthsea", "A Wizard of Earthsea", "Ged", "To light a candle is to cast a shadow.", "Ursula K. Le Guin"),
        ("Harry Potter", "HP1", "Dumbledore", "It does not do to dwell on dreams.", "J.K. Rowling"),
    ];
    for (series, title, characters, quote, author) in seed {
        store.add(&QuoteDraft {
            book_series: series.to_string(),
            book_title: title.to_string(),
            characters: characters.to_string(),
            quote: quote.to_string(),
            author: author.to_string(),
        })?;
    }
    println!("Seeded {} quotes\n", store.len());

    // 1. Global search matches any field, case-insensitively
    println!("1. Global search for 'dune':");
    let hits = store.search("dune", SearchScope::Global);
    for quote in &hits {
        println!("   - {} ({})", quote.book_title, quote.author);
    }
    println!();

    // 2. Field search only looks at that field
    println!("2. Search 'death' in characters:");
    let hits = store.search("death", SearchScope::Field(QuoteField::Characters));
    for quote in &hits {
        println!("   - {} : {}", quote.characters, quote.quote);
    }
    println!();

    // 3. Sorting the same field twice flips direction
    println!("3. Sort by author, twice:");
    let ascending = store.sort(QuoteField::Author);
    println!("   first:  {} ... {}", ascending[0].author, ascending[5].author);
    let descending = store.sort(QuoteField::Author);
    println!("   second: {} ... {}", descending[0].author, descending[5].author);
    println!();

    // 4. Search narrows, then pagination windows the narrowed list
    println!("4. Page 2 of Pratchett quotes, one per page:");
    let hits = store.search("pratchett", SearchScope::Field(QuoteField::Author));
    let window = store.paginate(&hits, 2, 1);
    for quote in &window.items {
        println!("   - {}", quote.book_title);
    }
    println!("   (page {}/{})\n", window.page, window.total_pages);

    // 5. Distinct values power autocomplete suggestion lists
    println!("5. Known series:");
    for series in store.distinct_values(QuoteField::BookSeries) {
        println!("   - {}", series);
    }

    println!("\nExample complete!");
    Ok(())
}
