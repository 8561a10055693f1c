// Quotebase - book-quote collection management with pluggable persistence

pub mod adapter;
pub mod config;
pub mod error;
pub mod local;
pub mod models;
pub mod page;
pub mod query;
pub mod remote;
pub mod store;

// Re-export main types for convenience
pub use adapter::{MemoryAdapter, Mutation, PersistenceAdapter};
pub use config::Config;
pub use error::StoreError;
pub use local::LocalStorageAdapter;
pub use models::{QuoteDraft, QuoteRecord, now_ms};
pub use page::{Page, paginate};
pub use query::{QuoteField, SearchScope, SortOrder, search, sort_by};
pub use remote::RemoteAdapter;
pub use store::QuoteStore;
