use serde::Serialize;

/// Default page size for listing endpoints.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a listing, with enough metadata for pager controls.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice a sequence into a 1-based page. Out-of-range page numbers are
/// clamped into the valid range rather than rejected, so a stale pager
/// link still lands somewhere sensible.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    let slice = if start < total_items {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items: slice,
        page,
        total_pages,
        total_items,
    }
}
