use std::sync::Arc;

use dashmap::DashMap;
use mino_core::helpers::pagination::page_count;
use teloxide::types::ChatId;

use super::dto::{ListKind, PaginationState};

/// Per-chat pagination state. Lives in memory only; a restart simply makes
/// open inline menus report that the list expired.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<ChatId, PaginationState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, chat_id: ChatId, state: PaginationState) {
        self.inner.insert(chat_id, state);
    }

    #[cfg(test)]
    pub fn get(&self, chat_id: ChatId) -> Option<PaginationState> {
        self.inner.get(&chat_id).map(|entry| entry.clone())
    }

    /// Moves the chat's stored list to `page`, clamped to the last page.
    /// Returns `None` when there is no list or `accepts` rejects its kind.
    pub fn turn_page(
        &self,
        chat_id: ChatId,
        page: usize,
        accepts: impl Fn(&ListKind) -> bool,
    ) -> Option<PaginationState> {
        let mut entry = self.inner.get_mut(&chat_id)?;
        if !accepts(&entry.kind) {
            return None;
        }
        entry.page = page.min(page_count(entry.items.len()) - 1);
        Some(entry.clone())
    }

    pub fn clear(&self, chat_id: ChatId) {
        self.inner.remove(&chat_id);
    }
}
