// The quote collection and every operation over it

use crate::adapter::{Mutation, PersistenceAdapter};
use crate::error::StoreError;
use crate::models::{QuoteDraft, QuoteRecord};
use crate::page::{Page, paginate};
use crate::query::{QuoteField, SearchScope, SortOrder, search, sort_by};
use std::collections::BTreeSet;
use tracing::{debug, info};
use uuid::Uuid;

/// Owns the canonical list of quote records and all read and derive
/// operations over it.
///
/// One instance per session. Every mutating operation validates first,
/// applies the change in memory, persists through the adapter and adopts the
/// canonical collection the adapter answers with; a failed save rolls the
/// in-memory change back, so an error never leaves local state mutated.
pub struct QuoteStore {
    quotes: Vec<QuoteRecord>,
    adapter: Box<dyn PersistenceAdapter>,
    last_sort: Option<(QuoteField, SortOrder)>,
}

impl QuoteStore {
    /// Load the starting collection from the adapter.
    ///
    /// Records arriving without an id (older local blobs predating ids) are
    /// assigned one here, so update and delete can always address records by
    /// id instead of by content.
    pub fn open(mut adapter: Box<dyn PersistenceAdapter>) -> Result<Self, StoreError> {
        let mut quotes = adapter.load()?;
        for record in &mut quotes {
            if record.id.is_empty() {
                record.id = Uuid::now_v7().to_string();
            }
        }

        info!(count = quotes.len(), "opened quote store");
        Ok(Self {
            quotes,
            adapter,
            last_sort: None,
        })
    }

    /// The canonical collection, in insertion order.
    pub fn records(&self) -> &[QuoteRecord] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Validate and default the draft, reject exact five-field duplicates,
    /// then append and persist. Returns the stored record, with whatever id
    /// the backend settled on.
    pub fn add(&mut self, draft: &QuoteDraft) -> Result<QuoteRecord, StoreError> {
        let normalized = draft.normalize()?;
        if self.quotes.iter().any(|existing| normalized.same_fields(existing)) {
            return Err(StoreError::Duplicate);
        }

        let record = normalized.into_record();
        self.quotes.push(record.clone());

        match self.adapter.save(Mutation::Insert(&record), &self.quotes) {
            Ok(canonical) => {
                self.quotes = canonical;
                debug!(id = %record.id, title = %record.book_title, "added quote");
                Ok(self.canonical_twin(&record))
            }
            Err(err) => {
                self.quotes.pop();
                Err(err)
            }
        }
    }

    /// Replace the record with the given id. Same validation and defaulting
    /// as `add`; id and creation time survive the edit.
    pub fn update(&mut self, id: &str, draft: &QuoteDraft) -> Result<QuoteRecord, StoreError> {
        let normalized = draft.normalize()?;
        let index = self
            .quotes
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let previous = self.quotes[index].clone();
        let record = normalized.replace(&previous);
        self.quotes[index] = record.clone();

        match self.adapter.save(Mutation::Replace(&record), &self.quotes) {
            Ok(canonical) => {
                self.quotes = canonical;
                debug!(id = %record.id, "updated quote");
                Ok(self.canonical_twin(&record))
            }
            Err(err) => {
                self.quotes[index] = previous;
                Err(err)
            }
        }
    }

    /// Remove the record with the given id. A second delete with the same,
    /// now stale, id fails with `NotFound`.
    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let index = self
            .quotes
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let removed = self.quotes.remove(index);

        match self.adapter.save(Mutation::Remove(id), &self.quotes) {
            Ok(canonical) => {
                self.quotes = canonical;
                debug!(id, title = %removed.book_title, "deleted quote");
                Ok(())
            }
            Err(err) => {
                self.quotes.insert(index, removed);
                Err(err)
            }
        }
    }

    /// Non-mutating filtered view of the collection; composes with
    /// `paginate`, which windows whatever the search narrowed down to.
    pub fn search(&self, query: &str, scope: SearchScope) -> Vec<QuoteRecord> {
        search(&self.quotes, query, scope)
    }

    /// Ordered view of the collection.
    ///
    /// Sorting the same field twice in a row flips direction; a different
    /// field resets to ascending. View-only: the canonical order and the
    /// persisted collection stay untouched.
    pub fn sort(&mut self, field: QuoteField) -> Vec<QuoteRecord> {
        let order = match self.last_sort {
            Some((last, order)) if last == field => order.toggled(),
            _ => SortOrder::Ascending,
        };
        self.last_sort = Some((field, order));
        sort_by(&self.quotes, field, order)
    }

    /// Window any list (the full collection, or a search/sort view) to one
    /// page.
    pub fn paginate(&self, list: &[QuoteRecord], page: usize, page_size: usize) -> Page {
        paginate(list, page, page_size)
    }

    /// De-duplicated, non-empty values of one field across the whole
    /// collection, for suggestion lists.
    pub fn distinct_values(&self, field: QuoteField) -> BTreeSet<String> {
        self.quotes
            .iter()
            .map(|q| field.value_of(q))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The stored version of a just-persisted record. Matched by id first;
    /// when the backend assigned its own id, by the five semantic fields,
    /// newest first.
    fn canonical_twin(&self, record: &QuoteRecord) -> QuoteRecord {
        self.quotes
            .iter()
            .find(|q| q.id == record.id)
            .or_else(|| self.quotes.iter().rev().find(|q| q.same_fields(record)))
            .cloned()
            .unwrap_or_else(|| record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MemoryAdapter;

    fn draft(series: &str, title: &str, characters: &str, quote: &str, author: &str) -> QuoteDraft {
        QuoteDraft {
            book_series: series.to_string(),
            book_title: title.to_string(),
            characters: characters.to_string(),
            quote: quote.to_string(),
            author: author.to_string(),
        }
    }

    fn store() -> QuoteStore {
        QuoteStore::open(Box::new(MemoryAdapter::new())).unwrap()
    }

    fn seeded_store() -> QuoteStore {
        let mut store = store();
        store
            .add(&draft("Harry Potter", "HP1", "Harry", "Quote A", "Rowling"))
            .unwrap();
        store
            .add(&draft("Dune", "Dune", "Paul", "Fear is the mind-killer", "Herbert"))
            .unwrap();
        store
            .add(&draft("Discworld", "Mort", "Death", "THERE IS NO JUSTICE", "Pratchett"))
            .unwrap();
        store
    }

    /// Backend whose saves always fail, for checking rollback.
    struct FailingAdapter;

    impl PersistenceAdapter for FailingAdapter {
        fn load(&mut self) -> Result<Vec<QuoteRecord>, StoreError> {
            Ok(Vec::new())
        }

        fn save(
            &mut self,
            _mutation: Mutation<'_>,
            _all: &[QuoteRecord],
        ) -> Result<Vec<QuoteRecord>, StoreError> {
            Err(StoreError::SessionExpired)
        }
    }

    /// Backend that rewrites ids on insert, the way a server assigns its own.
    struct RenamingAdapter {
        next: usize,
    }

    impl PersistenceAdapter for RenamingAdapter {
        fn load(&mut self) -> Result<Vec<QuoteRecord>, StoreError> {
            Ok(Vec::new())
        }

        fn save(
            &mut self,
            _mutation: Mutation<'_>,
            all: &[QuoteRecord],
        ) -> Result<Vec<QuoteRecord>, StoreError> {
            let mut canonical = all.to_vec();
            for record in &mut canonical {
                if record.id.len() != 7 {
                    self.next += 1;
                    record.id = format!("srv-{:03}", self.next);
                }
            }
            Ok(canonical)
        }
    }

    #[test]
    fn test_add_appends_exactly_one_record() {
        let mut store = store();
        assert!(store.is_empty());

        let record = store.add(&draft("", "HP1", "", "Quote A", "Rowling")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(record.book_series, "HP1");
        assert_eq!(record.characters, "Rowling");
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_add_missing_field_leaves_collection_unchanged() {
        let mut store = seeded_store();
        let err = store.add(&draft("", "", "", "q", "a")).unwrap_err();
        assert!(matches!(err, StoreError::MissingField("bookTitle")));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_add_exact_duplicate_is_rejected() {
        let mut store = seeded_store();
        let err = store
            .add(&draft("Harry Potter", "HP1", "Harry", "Quote A", "Rowling"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_duplicate_check_runs_after_defaulting() {
        // Stored record has bookSeries = "HP1" and characters = "Rowling"
        let mut store = store();
        store
            .add(&draft("HP1", "HP1", "Rowling", "Quote A", "Rowling"))
            .unwrap();

        // Empty series/characters default to exactly those values, so all
        // five effective fields collide
        let err = store.add(&draft("", "HP1", "", "Quote A", "Rowling")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_near_duplicate_is_accepted() {
        let mut store = seeded_store();
        store
            .add(&draft("Harry Potter", "HP1", "Harry", "Quote A (reprise)", "Rowling"))
            .unwrap();
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut store = seeded_store();
        let id = store.records()[1].id.clone();
        let created_at = store.records()[1].created_at;

        let updated = store
            .update(&id, &draft("", "Dune Messiah", "Paul", "New quote", "Herbert"))
            .unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.created_at, created_at);
        assert_eq!(updated.book_series, "Dune Messiah");
        assert_eq!(store.len(), 3);
        // Position is preserved
        assert_eq!(store.records()[1].book_title, "Dune Messiah");
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let mut store = seeded_store();
        let err = store
            .update("missing", &draft("", "T", "", "Q", "A"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_update_validation_failure_leaves_record_untouched() {
        let mut store = seeded_store();
        let id = store.records()[0].id.clone();
        let before = store.records()[0].clone();

        let err = store.update(&id, &draft("", "T", "", "", "A")).unwrap_err();
        assert!(matches!(err, StoreError::MissingField("quote")));
        assert_eq!(store.records()[0], before);
    }

    #[test]
    fn test_delete_then_stale_delete_fails() {
        let mut store = seeded_store();
        let id = store.records()[0].id.clone();

        store.delete(&id).unwrap();
        assert_eq!(store.len(), 2);

        let err = store.delete(&id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_failed_save_rolls_back_add() {
        let mut store = QuoteStore::open(Box::new(FailingAdapter)).unwrap();
        let err = store.add(&draft("", "T", "", "Q", "A")).unwrap_err();
        assert!(matches!(err, StoreError::SessionExpired));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_save_rolls_back_update_and_delete() {
        let mut store = seeded_store();
        let id = store.records()[0].id.clone();
        let before: Vec<QuoteRecord> = store.records().to_vec();

        store.adapter = Box::new(FailingAdapter);

        let err = store.update(&id, &draft("", "T", "", "Q", "A")).unwrap_err();
        assert!(matches!(err, StoreError::SessionExpired));
        assert_eq!(store.records(), &before[..]);

        let err = store.delete(&id).unwrap_err();
        assert!(matches!(err, StoreError::SessionExpired));
        assert_eq!(store.records(), &before[..]);
    }

    #[test]
    fn test_add_adopts_server_assigned_ids() {
        let mut store = QuoteStore::open(Box::new(RenamingAdapter { next: 0 })).unwrap();
        let record = store.add(&draft("", "HP1", "", "Quote A", "Rowling")).unwrap();
        assert_eq!(record.id, "srv-001");
        assert_eq!(store.records()[0].id, "srv-001");
    }

    #[test]
    fn test_open_backfills_missing_ids() {
        let orphan = QuoteRecord {
            id: String::new(),
            book_series: "S".to_string(),
            book_title: "T".to_string(),
            characters: "C".to_string(),
            quote: "Q".to_string(),
            author: "A".to_string(),
            created_at: 0,
            updated_at: 0,
        };
        let store = QuoteStore::open(Box::new(MemoryAdapter::with_records(vec![orphan]))).unwrap();
        assert!(!store.records()[0].id.is_empty());
    }

    #[test]
    fn test_empty_search_returns_everything_in_order() {
        let store = seeded_store();
        let hits = store.search("", SearchScope::Global);
        assert_eq!(hits, store.records());
    }

    #[test]
    fn test_search_does_not_mutate_the_collection() {
        let store = seeded_store();
        let before: Vec<QuoteRecord> = store.records().to_vec();
        let _ = store.search("dune", SearchScope::Global);
        assert_eq!(store.records(), &before[..]);
    }

    #[test]
    fn test_sort_toggles_direction_on_repeat() {
        let mut store = seeded_store();
        let ascending = store.sort(QuoteField::Author);
        let descending = store.sort(QuoteField::Author);

        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed);
        assert_eq!(ascending[0].author, "Herbert");
    }

    #[test]
    fn test_sorting_a_different_field_resets_to_ascending() {
        let mut store = seeded_store();
        store.sort(QuoteField::Author);
        store.sort(QuoteField::Author); // now descending on author

        let by_title = store.sort(QuoteField::BookTitle);
        assert_eq!(by_title[0].book_title, "Dune");
        assert_eq!(by_title[2].book_title, "Mort");
    }

    #[test]
    fn test_sort_is_view_only() {
        let mut store = seeded_store();
        let before: Vec<QuoteRecord> = store.records().to_vec();
        store.sort(QuoteField::Quote);
        assert_eq!(store.records(), &before[..]);
    }

    #[test]
    fn test_search_then_paginate_compose() {
        let mut store = store();
        for i in 0..25 {
            store
                .add(&draft("", &format!("Book {:02}", i), "", &format!("Quote {:02}", i), "Author"))
                .unwrap();
        }

        // Narrowing search first, then windowing: 10 hits for "Quote 1x"
        let hits = store.search("quote 1", SearchScope::Field(QuoteField::Quote));
        assert_eq!(hits.len(), 10);

        // The caller was on page 3 of the full collection; the narrowed list
        // only has one page, so the window clamps down
        let window = store.paginate(&hits, 3, 10);
        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.items.len(), 10);
    }

    #[test]
    fn test_distinct_values_dedup_and_skip_empty() {
        let records = vec![
            QuoteRecord {
                id: "a".to_string(),
                book_series: "Dune".to_string(),
                book_title: "Dune".to_string(),
                characters: "Paul".to_string(),
                quote: "Q1".to_string(),
                author: "Herbert".to_string(),
                created_at: 0,
                updated_at: 0,
            },
            QuoteRecord {
                id: "b".to_string(),
                book_series: "Dune".to_string(),
                book_title: "Dune Messiah".to_string(),
                characters: String::new(),
                quote: "Q2".to_string(),
                author: "Herbert".to_string(),
                created_at: 0,
                updated_at: 0,
            },
        ];
        let store = QuoteStore::open(Box::new(MemoryAdapter::with_records(records))).unwrap();

        let series = store.distinct_values(QuoteField::BookSeries);
        assert_eq!(series.len(), 1);
        assert!(series.contains("Dune"));

        let titles = store.distinct_values(QuoteField::BookTitle);
        assert_eq!(titles.len(), 2);

        // The empty characters value is dropped
        let characters = store.distinct_values(QuoteField::Characters);
        assert_eq!(characters.len(), 1);
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut store = QuoteStore::open(Box::new(MemoryAdapter::new())).unwrap();
        store.add(&draft("", "T1", "", "Q1", "A")).unwrap();
        store.add(&draft("", "T2", "", "Q2", "A")).unwrap();
        let id = store.records()[0].id.clone();
        store.update(&id, &draft("", "T1b", "", "Q1", "A")).unwrap();
        store.delete(&id).unwrap();

        // Reopen from the same backend state via a fresh adapter view
        let survivors: Vec<QuoteRecord> = store.records().to_vec();
        let reopened =
            QuoteStore::open(Box::new(MemoryAdapter::with_records(survivors.clone()))).unwrap();
        assert_eq!(reopened.records(), &survivors[..]);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.records()[0].book_title, "T2");
    }
}
