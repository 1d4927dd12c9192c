pub const PAGE_SIZE: usize = 10;

/// One page of a longer list, with enough context to draw navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paged<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        (self.page + 1) * PAGE_SIZE < self.total
    }

    pub fn page_count(&self) -> usize {
        page_count(self.total)
    }

    /// Position of the first item of this page in the full list.
    pub fn offset(&self) -> usize {
        self.page * PAGE_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE).max(1)
}

/// Slices `items` to `page`. Pages past the end are clamped to the last one.
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Paged<T> {
    let page = page.min(page_count(items.len()) - 1);
    let start = page * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(items.len());

    Paged {
        items: items[start.min(end)..end].to_vec(),
        page,
        total: items.len(),
    }
}
