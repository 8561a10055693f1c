// Page windowing over an already-filtered collection

use crate::models::QuoteRecord;

/// One page window of a (possibly filtered or sorted) collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<QuoteRecord>,
    /// The page actually shown, after clamping. 0 only for an empty list.
    pub page: usize,
    pub total_pages: usize,
}

/// Window `records` to one page of `page_size` items.
///
/// The requested page is clamped into `[1, total_pages]`: a search that
/// narrows the collection can leave the caller on a page that no longer
/// exists, and the last page is shown instead. An empty list yields an empty
/// page numbered 0 of 0.
pub fn paginate(records: &[QuoteRecord], page: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let total_pages = records.len().div_ceil(page_size);
    if total_pages == 0 {
        return Page {
            items: Vec::new(),
            page: 0,
            total_pages: 0,
        };
    }

    let page = page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(records.len());
    Page {
        items: records[start..end].to_vec(),
        page,
        total_pages,
    }
}
