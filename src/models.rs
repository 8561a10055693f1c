// Data models for quotebase

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored book quote.
///
/// Field names serialize in camelCase, matching the wire format of the
/// quote-base API. Remote backends answer with Mongo-style `_id` keys, which
/// deserialize into `id` via the alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// Stable opaque identifier. Locally created records get a UUID v7;
    /// records loaded from a server keep whatever id the server assigned.
    #[serde(default, alias = "_id")]
    pub id: String,
    pub book_series: String,
    pub book_title: String,
    pub characters: String,
    pub quote: String,
    pub author: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl QuoteRecord {
    /// True when all five semantic fields match exactly. Ids and timestamps
    /// are not part of record identity.
    pub fn same_fields(&self, other: &QuoteRecord) -> bool {
        self.book_series == other.book_series
            && self.book_title == other.book_title
            && self.characters == other.characters
            && self.quote == other.quote
            && self.author == other.author
    }
}

/// Raw field values as collected from a form, before validation.
#[derive(Debug, Clone, Default)]
pub struct QuoteDraft {
    pub book_series: String,
    pub book_title: String,
    pub characters: String,
    pub quote: String,
    pub author: String,
}

impl QuoteDraft {
    /// Trim every field, reject empty required fields, then apply the
    /// defaulting rules: an empty series falls back to the title, empty
    /// characters fall back to the author.
    pub fn normalize(&self) -> Result<QuoteDraft, StoreError> {
        let book_title = self.book_title.trim();
        let quote = self.quote.trim();
        let author = self.author.trim();

        if book_title.is_empty() {
            return Err(StoreError::MissingField("bookTitle"));
        }
        if quote.is_empty() {
            return Err(StoreError::MissingField("quote"));
        }
        if author.is_empty() {
            return Err(StoreError::MissingField("author"));
        }

        let book_series = self.book_series.trim();
        let characters = self.characters.trim();

        Ok(QuoteDraft {
            book_series: if book_series.is_empty() { book_title } else { book_series }.to_string(),
            book_title: book_title.to_string(),
            characters: if characters.is_empty() { author } else { characters }.to_string(),
            quote: quote.to_string(),
            author: author.to_string(),
        })
    }

    /// True when the draft's effective fields match a stored record exactly.
    /// Call on a normalized draft; an un-normalized one compares raw input.
    pub fn same_fields(&self, record: &QuoteRecord) -> bool {
        self.book_series == record.book_series
            && self.book_title == record.book_title
            && self.characters == record.characters
            && self.quote == record.quote
            && self.author == record.author
    }

    /// Build a brand-new record from a normalized draft.
    pub(crate) fn into_record(self) -> QuoteRecord {
        let now = now_ms();
        QuoteRecord {
            id: Uuid::now_v7().to_string(),
            book_series: self.book_series,
            book_title: self.book_title,
            characters: self.characters,
            quote: self.quote,
            author: self.author,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replacement record for an edit: the previous id and creation time are
    /// kept, the fields are replaced wholesale.
    pub(crate) fn replace(self, previous: &QuoteRecord) -> QuoteRecord {
        QuoteRecord {
            id: previous.id.clone(),
            book_series: self.book_series,
            book_title: self.book_title,
            characters: self.characters,
            quote: self.quote,
            author: self.author,
            created_at: previous.created_at,
            updated_at: now_ms(),
        }
    }
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before Unix epoch")
        .as_millis() as i64
}
