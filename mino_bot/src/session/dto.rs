use mino_core::catalog::dto::PlayerField;
use mino_core::helpers::pagination::{Paged, paginate};

/// Which inline list a chat is currently paging through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Players,
    Values(PlayerField),
}

/// The most recently computed list for a chat together with the page on
/// screen. Navigation callbacks only ever slice `items`.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    pub kind: ListKind,
    pub title: String,
    pub items: Vec<String>,
    pub page: usize,
}

impl PaginationState {
    pub fn players(title: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            kind: ListKind::Players,
            title: title.into(),
            items: names,
            page: 0,
        }
    }

    pub fn values(field: PlayerField, values: Vec<String>) -> Self {
        Self {
            kind: ListKind::Values(field),
            title: field.label().to_string(),
            items: values,
            page: 0,
        }
    }

    pub fn current(&self) -> Paged<String> {
        paginate(&self.items, self.page)
    }
}
