// Persistence backends for the quote collection

use crate::error::StoreError;
use crate::models::QuoteRecord;

/// What a single store mutation changed.
///
/// Backends that persist the whole collection at once can ignore this;
/// per-operation backends (the HTTP adapter) dispatch on it.
#[derive(Debug, Clone, Copy)]
pub enum Mutation<'a> {
    Insert(&'a QuoteRecord),
    Replace(&'a QuoteRecord),
    Remove(&'a str),
}

/// A persistence backend for the quote collection.
///
/// `save` is called exactly once per mutating store operation and returns the
/// authoritative canonical collection, which the store adopts wholesale. A
/// local backend simply echoes what it was given; a remote backend answers
/// with whatever the server now holds (including server-assigned ids).
pub trait PersistenceAdapter {
    /// The starting collection.
    fn load(&mut self) -> Result<Vec<QuoteRecord>, StoreError>;

    /// Persist one mutation. `all` already reflects it.
    fn save(
        &mut self,
        mutation: Mutation<'_>,
        all: &[QuoteRecord],
    ) -> Result<Vec<QuoteRecord>, StoreError>;
}

/// Backend holding the collection in memory only, mirroring the original
/// system's bootstrap data embedded in the page. Also the unit-test backend.
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    records: Vec<QuoteRecord>,
    saves: usize,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an embedded collection.
    pub fn with_records(records: Vec<QuoteRecord>) -> Self {
        Self { records, saves: 0 }
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn load(&mut self) -> Result<Vec<QuoteRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn save(
        &mut self,
        _mutation: Mutation<'_>,
        all: &[QuoteRecord],
    ) -> Result<Vec<QuoteRecord>, StoreError> {
        self.records = all.to_vec();
        self.saves += 1;
        Ok(self.records.clone())
    }
}
