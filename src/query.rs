// Search and sort over quote collections

use crate::models::QuoteRecord;
use std::fmt;
use std::str::FromStr;

/// The five searchable and sortable fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteField {
    BookSeries,
    BookTitle,
    Characters,
    Quote,
    Author,
}

impl QuoteField {
    pub const ALL: [QuoteField; 5] = [
        QuoteField::BookSeries,
        QuoteField::BookTitle,
        QuoteField::Characters,
        QuoteField::Quote,
        QuoteField::Author,
    ];

    /// The field's value on a record.
    pub fn value_of<'a>(&self, record: &'a QuoteRecord) -> &'a str {
        match self {
            QuoteField::BookSeries => &record.book_series,
            QuoteField::BookTitle => &record.book_title,
            QuoteField::Characters => &record.characters,
            QuoteField::Quote => &record.quote,
            QuoteField::Author => &record.author,
        }
    }
}

impl fmt::Display for QuoteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuoteField::BookSeries => "bookSeries",
            QuoteField::BookTitle => "bookTitle",
            QuoteField::Characters => "characters",
            QuoteField::Quote => "quote",
            QuoteField::Author => "author",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for QuoteField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bookSeries" | "book-series" | "series" => Ok(QuoteField::BookSeries),
            "bookTitle" | "book-title" | "title" => Ok(QuoteField::BookTitle),
            "characters" => Ok(QuoteField::Characters),
            "quote" => Ok(QuoteField::Quote),
            "author" => Ok(QuoteField::Author),
            other => Err(format!("unknown field `{}`", other)),
        }
    }
}

/// What a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Any of the five semantic fields. Ids and timestamps never match.
    Global,
    /// One specific field.
    Field(QuoteField),
}

impl FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "global" {
            Ok(SearchScope::Global)
        } else {
            s.parse().map(SearchScope::Field)
        }
    }
}

/// Sort direction for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> SortOrder {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Case-insensitive substring search. An empty query matches every record,
/// and record order is preserved.
pub fn search(records: &[QuoteRecord], query: &str, scope: SearchScope) -> Vec<QuoteRecord> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|record| match scope {
            SearchScope::Global => QuoteField::ALL
                .iter()
                .any(|field| field.value_of(record).to_lowercase().contains(&needle)),
            SearchScope::Field(field) => field.value_of(record).to_lowercase().contains(&needle),
        })
        .cloned()
        .collect()
}

/// Stable, case-insensitive lexicographic sort on one field. Records that
/// compare equal keep their relative order.
pub fn sort_by(records: &[QuoteRecord], field: QuoteField, order: SortOrder) -> Vec<QuoteRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let lhs = field.value_of(a).to_lowercase();
        let rhs = field.value_of(b).to_lowercase();
        match order {
            SortOrder::Ascending => lhs.cmp(&rhs),
            SortOrder::Descending => rhs.cmp(&lhs),
        }
    });
    sorted
}
