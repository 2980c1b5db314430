//! View models for the presentation layer.
//!
//! Hosts draw these however they like; they only hold the local UI state a
//! component needs (a draft, an edit buffer) and forward intents through the
//! callbacks they are handed. `render` turns a whole `TodoState` into plain
//! text for terminal hosts.

use std::fmt::Write as _;

use crate::state::{Counts, TodoState};
use crate::types::{Filter, Todo, TodoId};

pub const MAX_TEXT_CHARS: usize = 500;
/// Draft length above which the form shows a character counter.
pub const COUNTER_THRESHOLD: usize = 400;
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this todo?";

/// The "add a todo" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    draft: String,
}

impl TodoForm {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft, truncated to the maximum todo length.
    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.chars().take(MAX_TEXT_CHARS).collect();
    }

    pub fn can_submit(&self, is_adding: bool) -> bool {
        !is_adding && !self.draft.trim().is_empty()
    }

    /// `"n/500 characters"` once the draft is long enough to warrant it.
    pub fn counter(&self) -> Option<String> {
        let len = self.draft.chars().count();
        (len > COUNTER_THRESHOLD).then(|| format!("{len}/{MAX_TEXT_CHARS} characters"))
    }

    /// Submit the trimmed draft through `on_add`. Returns `Ok(false)` when
    /// there was nothing to submit. The draft is cleared on success and kept
    /// on failure.
    pub fn submit<E>(
        &mut self,
        is_adding: bool,
        on_add: impl FnOnce(&str) -> Result<Todo, E>,
    ) -> Result<bool, E> {
        if !self.can_submit(is_adding) {
            return Ok(false);
        }
        on_add(self.draft.trim())?;
        self.draft.clear();
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
}

/// One row of the list, with inline editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    todo: Todo,
    editing: bool,
    draft: String,
}

impl TodoRow {
    pub fn new(todo: Todo) -> Self {
        let draft = todo.text.clone();
        Self {
            todo,
            editing: false,
            draft,
        }
    }

    pub fn todo(&self) -> &Todo {
        &self.todo
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Take the server's copy of the record. An open edit buffer is kept.
    pub fn sync(&mut self, todo: Todo) {
        if !self.editing {
            self.draft = todo.text.clone();
        }
        self.todo = todo;
    }

    pub fn begin_edit(&mut self) {
        self.editing = true;
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    pub fn cancel(&mut self) {
        self.draft = self.todo.text.clone();
        self.editing = false;
    }

    /// Save the trimmed draft through `on_update`. An empty draft is ignored.
    /// On failure the draft reverts to the record's text and editing stays
    /// open.
    pub fn save<E>(
        &mut self,
        on_update: impl FnOnce(TodoId, &str) -> Result<Todo, E>,
    ) -> Result<(), E> {
        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return Ok(());
        }
        match on_update(self.todo.id, &text) {
            Ok(todo) => {
                self.editing = false;
                self.sync(todo);
                Ok(())
            }
            Err(err) => {
                self.draft = self.todo.text.clone();
                Err(err)
            }
        }
    }

    /// Enter saves, Escape cancels.
    pub fn key<E>(
        &mut self,
        key: EditKey,
        on_update: impl FnOnce(TodoId, &str) -> Result<Todo, E>,
    ) -> Result<(), E> {
        match key {
            EditKey::Enter => self.save(on_update),
            EditKey::Escape => {
                self.cancel();
                Ok(())
            }
        }
    }

    /// Losing focus saves, like Enter.
    pub fn blur<E>(
        &mut self,
        on_update: impl FnOnce(TodoId, &str) -> Result<Todo, E>,
    ) -> Result<(), E> {
        if !self.editing {
            return Ok(());
        }
        self.save(on_update)
    }

    /// Ask `confirm` with `DELETE_PROMPT`; delete only on a yes. Returns
    /// whether a delete was issued.
    pub fn delete<E>(
        &self,
        confirm: impl FnOnce(&str) -> bool,
        on_delete: impl FnOnce(TodoId) -> Result<(), E>,
    ) -> Result<bool, E> {
        if !confirm(DELETE_PROMPT) {
            return Ok(false);
        }
        on_delete(self.todo.id)?;
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterItem {
    pub filter: Filter,
    pub label: &'static str,
    pub count: usize,
    pub selected: bool,
}

/// Filter buttons with counts. Empty when there are no todos at all, in
/// which case the selector is not shown.
pub fn filter_bar(filter: Filter, counts: Counts) -> Vec<FilterItem> {
    if counts.all == 0 {
        return Vec::new();
    }
    Filter::ALL
        .into_iter()
        .map(|item| FilterItem {
            filter: item,
            label: item.label(),
            count: counts.for_filter(item),
            selected: item == filter,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl EmptyState {
    pub fn for_filter(filter: Filter) -> Self {
        match filter {
            Filter::Active => Self {
                title: "No active todos",
                description: "All your todos are completed! Great job!",
                icon: "🎉",
            },
            Filter::Completed => Self {
                title: "No completed todos",
                description: "Start completing your todos to see them here.",
                icon: "📝",
            },
            Filter::All => Self {
                title: "No todos yet",
                description: "Add your first todo to get started!",
                icon: "✨",
            },
        }
    }
}

/// `("2 of 3 remaining", "33% complete")`, or `None` for an empty list.
pub fn stats(counts: Counts) -> Option<(String, String)> {
    let percent = counts.percent_complete()?;
    Some((
        format!("{} of {} remaining", counts.active, counts.all),
        format!("{percent}% complete"),
    ))
}

/// Plain-text rendering of the whole view. Rows are prefixed with the
/// first eight characters of their id so a terminal user can refer to them.
pub fn render(state: &TodoState) -> String {
    if state.loading {
        return "Loading your todos...\n".to_string();
    }
    if let Some(error) = &state.error {
        return format!("Error: {error}\nRun the command again to retry.\n");
    }

    let mut out = String::new();
    let counts = state.counts();
    let bar = filter_bar(state.filter, counts);
    if !bar.is_empty() {
        let items: Vec<String> = bar
            .iter()
            .map(|item| {
                let label = format!("{} ({})", item.label, item.count);
                if item.selected {
                    format!("[{label}]")
                } else {
                    label
                }
            })
            .collect();
        let _ = writeln!(out, "{}", items.join("  "));
        out.push('\n');
    }

    let mut visible = state.visible().peekable();
    if visible.peek().is_none() {
        let empty = EmptyState::for_filter(state.filter);
        let _ = writeln!(out, "{} {}", empty.icon, empty.title);
        let _ = writeln!(out, "  {}", empty.description);
    }
    for todo in visible {
        let mark = if todo.completed { 'x' } else { ' ' };
        let id = todo.id.simple().to_string();
        let _ = writeln!(out, "[{mark}] {}  {}", &id[..8], todo.text);
    }

    if let Some((remaining, complete)) = stats(counts) {
        out.push('\n');
        let _ = writeln!(out, "{remaining}  ·  {complete}");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::state::tests::todo;
    use crate::state::{reduce, Action};

    #[test]
    fn form_submits_trimmed_text_and_clears() {
        let mut form = TodoForm::default();
        form.set_draft("  buy milk  ");
        let submitted = form
            .submit(false, |text| {
                assert_eq!(text, "buy milk");
                Ok::<_, ()>(todo(1, text, false))
            })
            .unwrap();
        assert!(submitted);
        assert_eq!(form.draft(), "");
    }

    #[test]
    fn form_keeps_draft_on_failure() {
        let mut form = TodoForm::default();
        form.set_draft("buy milk");
        let result = form.submit(false, |_| Err::<Todo, _>("offline"));
        assert_eq!(result, Err("offline"));
        assert_eq!(form.draft(), "buy milk");
    }

    #[test]
    fn form_is_disabled_while_adding_or_blank() {
        let mut form = TodoForm::default();
        form.set_draft("   ");
        assert!(!form.can_submit(false));
        form.set_draft("x");
        assert!(form.can_submit(false));
        assert!(!form.can_submit(true));
        let called = Cell::new(false);
        let submitted = form
            .submit(true, |_| {
                called.set(true);
                Ok::<_, ()>(todo(1, "x", false))
            })
            .unwrap();
        assert!(!submitted);
        assert!(!called.get());
    }

    #[test]
    fn form_counter_appears_past_threshold_and_draft_is_capped() {
        let mut form = TodoForm::default();
        form.set_draft(&"a".repeat(400));
        assert_eq!(form.counter(), None);
        form.set_draft(&"a".repeat(401));
        assert_eq!(form.counter().as_deref(), Some("401/500 characters"));
        form.set_draft(&"a".repeat(600));
        assert_eq!(form.draft().len(), 500);
    }

    #[test]
    fn row_escape_restores_original_text() {
        let mut row = TodoRow::new(todo(1, "original", false));
        row.begin_edit();
        row.set_draft("changed");
        row.key(EditKey::Escape, |_, _| Ok::<_, ()>(todo(1, "unused", false)))
            .unwrap();
        assert!(!row.is_editing());
        assert_eq!(row.draft(), "original");
    }

    #[test]
    fn row_enter_saves_trimmed_draft() {
        let mut row = TodoRow::new(todo(1, "original", false));
        row.begin_edit();
        row.set_draft("  changed ");
        row.key(EditKey::Enter, |id, text| {
            assert_eq!(id, uuid::Uuid::from_u128(1));
            Ok::<_, ()>(todo(1, text, false))
        })
        .unwrap();
        assert!(!row.is_editing());
        assert_eq!(row.todo().text, "changed");
    }

    #[test]
    fn row_failed_save_reverts_draft() {
        let mut row = TodoRow::new(todo(1, "original", false));
        row.begin_edit();
        row.set_draft("changed");
        let result = row.blur(|_, _| Err::<Todo, _>("server down"));
        assert_eq!(result, Err("server down"));
        assert_eq!(row.draft(), "original");
        assert!(row.is_editing());
    }

    #[test]
    fn row_empty_save_is_a_no_op() {
        let mut row = TodoRow::new(todo(1, "original", false));
        row.begin_edit();
        row.set_draft("   ");
        let called = Cell::new(false);
        row.save(|_, _| {
            called.set(true);
            Ok::<_, ()>(todo(1, "", false))
        })
        .unwrap();
        assert!(!called.get());
        assert!(row.is_editing());
    }

    #[test]
    fn row_delete_requires_confirmation() {
        let row = TodoRow::new(todo(1, "a", false));
        let deleted = row
            .delete(
                |prompt| {
                    assert_eq!(prompt, DELETE_PROMPT);
                    false
                },
                |_| Ok::<_, ()>(()),
            )
            .unwrap();
        assert!(!deleted);
        assert!(row.delete(|_| true, |_| Ok::<_, ()>(())).unwrap());
    }

    #[test]
    fn filter_bar_hidden_for_empty_list() {
        assert!(filter_bar(Filter::All, Counts::default()).is_empty());
        let counts = Counts {
            all: 3,
            active: 2,
            completed: 1,
        };
        let bar = filter_bar(Filter::Active, counts);
        assert_eq!(bar.len(), 3);
        assert_eq!(bar[1].label, "Active");
        assert_eq!(bar[1].count, 2);
        assert!(bar[1].selected);
        assert!(!bar[0].selected);
    }

    #[test]
    fn empty_state_depends_on_filter() {
        assert_eq!(EmptyState::for_filter(Filter::All).title, "No todos yet");
        assert_eq!(EmptyState::for_filter(Filter::Active).title, "No active todos");
        assert_eq!(
            EmptyState::for_filter(Filter::Completed).description,
            "Start completing your todos to see them here."
        );
    }

    #[test]
    fn render_lists_visible_rows_and_stats() {
        let state = reduce(
            TodoState::default(),
            Action::Loaded(vec![todo(1, "a", false), todo(2, "b", true)]),
        );
        let text = render(&state);
        assert!(text.contains("[All (2)]  Active (1)  Completed (1)"));
        assert!(text.contains("[ ] 00000000  a"));
        assert!(text.contains("[x] 00000000  b"));
        assert!(text.contains("1 of 2 remaining"));
        assert!(text.contains("50% complete"));
    }

    #[test]
    fn render_shows_empty_state_for_filter() {
        let state = reduce(TodoState::default(), Action::Loaded(vec![todo(1, "a", false)]));
        let state = reduce(state, Action::FilterChanged(Filter::Completed));
        let text = render(&state);
        assert!(text.contains("No completed todos"));
        assert!(!text.contains("  a\n"));
    }

    #[test]
    fn render_loading_and_error_screens() {
        assert_eq!(render(&TodoState::default()), "Loading your todos...\n");
        let failed = reduce(TodoState::default(), Action::LoadFailed("Failed to fetch todos".into()));
        assert!(render(&failed).starts_with("Error: Failed to fetch todos"));
    }
}
