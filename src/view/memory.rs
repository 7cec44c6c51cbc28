//! In-memory page: keeps the latest content of every target.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use super::{Content, Notice, RenderTarget, View};

#[derive(Debug, Clone)]
struct TargetState {
    content: Option<Content>,
    visible: bool,
    updated_at: Option<DateTime<Utc>>,
}

impl TargetState {
    fn new(target: RenderTarget) -> Self {
        TargetState {
            content: None,
            visible: target.visible_by_default(),
            updated_at: None,
        }
    }
}

#[derive(Debug)]
struct Page {
    targets: HashMap<RenderTarget, TargetState>,
    notices: Vec<Notice>,
    mutations: u64,
}

/// A [`View`] that records everything rendered into it.
#[derive(Debug)]
pub struct MemoryView {
    page: Mutex<Page>,
}

impl MemoryView {
    pub fn new() -> Self {
        let targets = RenderTarget::ALL
            .into_iter()
            .map(|t| (t, TargetState::new(t)))
            .collect();
        MemoryView {
            page: Mutex::new(Page {
                targets,
                notices: Vec::new(),
                mutations: 0,
            }),
        }
    }

    fn page(&self) -> MutexGuard<'_, Page> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current content of `target`, if anything was rendered yet.
    pub fn content(&self, target: RenderTarget) -> Option<Content> {
        self.page()
            .targets
            .get(&target)
            .and_then(|s| s.content.clone())
    }

    /// Child rows of `target` (empty for text content).
    pub fn rows(&self, target: RenderTarget) -> Vec<String> {
        self.content(target)
            .map(|c| c.rows().to_vec())
            .unwrap_or_default()
    }

    /// Text content of `target`, if it currently holds plain text.
    pub fn text(&self, target: RenderTarget) -> Option<String> {
        match self.content(target)? {
            Content::Text(text) => Some(text),
            Content::Rows(_) => None,
        }
    }

    pub fn is_visible(&self, target: RenderTarget) -> bool {
        self.page().targets.get(&target).is_some_and(|s| s.visible)
    }

    pub fn updated_at(&self, target: RenderTarget) -> Option<DateTime<Utc>> {
        self.page().targets.get(&target).and_then(|s| s.updated_at)
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.page().notices.clone()
    }

    /// Number of replace / reveal / notify calls seen so far.
    pub fn mutations(&self) -> u64 {
        self.page().mutations
    }
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for MemoryView {
    fn replace(&self, target: RenderTarget, content: Content) {
        let mut page = self.page();
        page.mutations += 1;
        let state = page
            .targets
            .entry(target)
            .or_insert_with(|| TargetState::new(target));
        state.content = Some(content);
        state.updated_at = Some(Utc::now());
    }

    fn reveal(&self, target: RenderTarget) {
        let mut page = self.page();
        page.mutations += 1;
        let state = page
            .targets
            .entry(target)
            .or_insert_with(|| TargetState::new(target));
        state.visible = true;
        state.updated_at = Some(Utc::now());
    }

    fn notify(&self, notice: Notice) {
        let mut page = self.page();
        page.mutations += 1;
        page.notices.push(notice);
    }
}
