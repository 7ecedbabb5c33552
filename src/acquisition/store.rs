//! Show snapshot store and search query input
//!
//! The store holds the last fetched `Show` plus the active tab. The snapshot
//! is only ever replaced whole; there is no partial update.

use crate::models::Show;

// =============================================================================
// Tabs
// =============================================================================

/// Tabs of the show detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Seasons,
    Releases,
    Search,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Seasons, Tab::Releases, Tab::Search];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Seasons => "SEASONS",
            Tab::Releases => "RELEASES",
            Tab::Search => "SEARCH",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Seasons => Tab::Releases,
            Tab::Releases => Tab::Search,
            Tab::Search => Tab::Seasons,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Seasons => Tab::Search,
            Tab::Releases => Tab::Seasons,
            Tab::Search => Tab::Releases,
        }
    }
}

// =============================================================================
// Snapshot Store
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ShowStore {
    snapshot: Option<Show>,
    active_tab: Tab,
}

impl ShowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the held snapshot
    pub fn replace(&mut self, show: Show) {
        self.snapshot = Some(show);
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// `None` until the first fetch succeeds
    pub fn snapshot(&self) -> Option<&Show> {
        self.snapshot.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }
}

// =============================================================================
// Query Input
// =============================================================================

/// Editing operations on the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEdit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Search box contents.
///
/// Until the user edits it, the box mirrors the show's default query. The
/// cursor counts chars, not bytes, so Cyrillic titles edit correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryInput {
    text: String,
    cursor: usize,
    edited: bool,
}

impl QueryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text to display or submit
    pub fn effective<'a>(&'a self, default: &'a str) -> &'a str {
        if self.edited {
            &self.text
        } else {
            default
        }
    }

    /// Apply an edit, seeding the text with `default` on the first one
    pub fn apply(&mut self, edit: QueryEdit, default: &str) {
        if !self.edited {
            self.text = default.to_string();
            self.cursor = self.char_len();
            self.edited = true;
        }

        match edit {
            QueryEdit::Insert(c) => {
                let at = self.byte_offset(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
            }
            QueryEdit::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_offset(self.cursor);
                    self.text.remove(at);
                }
            }
            QueryEdit::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_offset(self.cursor);
                    self.text.remove(at);
                }
            }
            QueryEdit::Left => self.cursor = self.cursor.saturating_sub(1),
            QueryEdit::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            QueryEdit::Home => self.cursor = 0,
            QueryEdit::End => self.cursor = self.char_len(),
        }
    }

    /// Split the effective text at the cursor (for rendering)
    pub fn split_at_cursor<'a>(&'a self, default: &'a str) -> (&'a str, &'a str) {
        let text = self.effective(default);
        let cursor = if self.edited {
            self.cursor
        } else {
            text.chars().count()
        };
        let at = text
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        text.split_at(at)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}
