use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use quotebase::{
    Config, LocalStorageAdapter, PersistenceAdapter, QuoteDraft, QuoteField, QuoteRecord,
    QuoteStore, RemoteAdapter, SearchScope, SortOrder, sort_by,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quotebase")]
#[command(about = "Quotebase CLI - manage a collection of book quotes")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the local quotes file (overrides the config)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Base URL of a quote-base server; switches persistence to the remote API
    #[arg(short, long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a quote to the collection
    Add {
        #[arg(short = 't', long)]
        book_title: String,
        #[arg(short, long)]
        quote: String,
        #[arg(short, long)]
        author: String,
        /// Defaults to the book title
        #[arg(short = 's', long, default_value = "")]
        book_series: String,
        /// Defaults to the author
        #[arg(short = 'c', long, default_value = "")]
        characters: String,
    },

    /// List quotes, optionally searched, sorted and paginated
    List {
        /// Search term, applied before pagination
        #[arg(long, default_value = "")]
        search: String,
        /// Where to search: global, bookSeries, bookTitle, characters, quote, author
        #[arg(long, default_value = "global")]
        field: SearchScope,
        /// Sort by this field before paginating
        #[arg(long)]
        sort: Option<QuoteField>,
        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Page to show
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Items per page (overrides the config)
        #[arg(long)]
        per_page: Option<usize>,
    },

    /// Replace the fields of an existing quote
    Edit {
        id: String,
        #[arg(short = 't', long)]
        book_title: String,
        #[arg(short, long)]
        quote: String,
        #[arg(short, long)]
        author: String,
        #[arg(short = 's', long, default_value = "")]
        book_series: String,
        #[arg(short = 'c', long, default_value = "")]
        characters: String,
    },

    /// Delete a quote by id
    Delete { id: String },

    /// Show the distinct values of one field, for autocompletion
    Suggest { field: QuoteField },

    /// End the server session (remote mode only)
    Logout,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let server = cli.server.clone().or_else(|| config.server_url.clone());

    if matches!(cli.command, Commands::Logout) {
        let Some(server) = server else {
            eyre::bail!("logout needs a server (--server or server-url in the config)");
        };
        let target = RemoteAdapter::new(server).logout()?;
        println!("Logged out; continue at {}", target);
        return Ok(());
    }

    let adapter: Box<dyn PersistenceAdapter> = match &server {
        Some(url) => Box::new(RemoteAdapter::new(url.clone())),
        None => {
            let path = cli.file.clone().unwrap_or_else(|| config.storage_path());
            Box::new(LocalStorageAdapter::new(path))
        }
    };

    let mut store = QuoteStore::open(adapter)?;

    match cli.command {
        Commands::Add {
            book_title,
            quote,
            author,
            book_series,
            characters,
        } => {
            let record = store.add(&QuoteDraft {
                book_series,
                book_title,
                characters,
                quote,
                author,
            })?;
            println!(
                "Added quote {} ({} - {})",
                record.id, record.book_title, record.author
            );
        }

        Commands::List {
            search,
            field,
            sort,
            desc,
            page,
            per_page,
        } => {
            let mut view = store.search(&search, field);
            if let Some(key) = sort {
                let order = if desc {
                    SortOrder::Descending
                } else {
                    SortOrder::Ascending
                };
                view = sort_by(&view, key, order);
            }

            let window = store.paginate(&view, page, per_page.unwrap_or(config.items_per_page));
            if window.items.is_empty() {
                println!("No quotes found");
                return Ok(());
            }

            print_table(&window.items);
            println!("\nPage {}/{}", window.page, window.total_pages);
        }

        Commands::Edit {
            id,
            book_title,
            quote,
            author,
            book_series,
            characters,
        } => {
            let record = store.update(
                &id,
                &QuoteDraft {
                    book_series,
                    book_title,
                    characters,
                    quote,
                    author,
                },
            )?;
            println!("Updated quote {}", record.id);
        }

        Commands::Delete { id } => {
            store.delete(&id)?;
            println!("Deleted quote {}", id);
        }

        Commands::Suggest { field } => {
            for value in store.distinct_values(field) {
                println!("{}", value);
            }
        }

        Commands::Logout => unreachable!("handled before the store opens"),
    }

    Ok(())
}

fn print_table(records: &[QuoteRecord]) {
    let header = format!(
        "{:<36}  {:<18}  {:<18}  {:<14}  {:<40}  {:<14}  {}",
        "ID", "SERIES", "TITLE", "CHARACTERS", "QUOTE", "AUTHOR", "UPDATED"
    );
    println!("{}", header.bold());

    for record in records {
        println!(
            "{:<36}  {:<18}  {:<18}  {:<14}  {:<40}  {:<14}  {}",
            record.id,
            truncate(&record.book_series, 18),
            truncate(&record.book_title, 18),
            truncate(&record.characters, 14),
            truncate(&record.quote, 40),
            truncate(&record.author, 14),
            format_day(record.updated_at),
        );
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept: String = value.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

fn format_day(ms: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
