//! Client view state and its transitions.
//!
//! # Design
//! `TodoState` is owned by exactly one `Controller`, which changes it only by
//! feeding an `Action` through `reduce`. Mutation results are merged into the
//! list by id (prepend on create, replace on update/toggle, remove on delete)
//! instead of refetching the collection. Filtered views, counts and stats
//! are computed on demand and never stored.

use crate::types::{Filter, Todo, TodoId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoState {
    /// Newest first, as the server lists them.
    pub todos: Vec<Todo>,
    pub filter: Filter,
    pub loading: bool,
    pub error: Option<String>,
    pub is_adding: bool,
}

impl Default for TodoState {
    /// Nothing has been fetched yet, so the view starts out loading.
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            filter: Filter::All,
            loading: true,
            error: None,
            is_adding: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadStarted,
    Loaded(Vec<Todo>),
    LoadFailed(String),
    AddStarted,
    Added(Todo),
    AddFailed,
    /// An update or toggle came back; swap in the server's copy.
    Replaced(Todo),
    Deleted(TodoId),
    FilterChanged(Filter),
}

pub fn reduce(mut state: TodoState, action: Action) -> TodoState {
    match action {
        Action::LoadStarted => {
            state.loading = true;
            state.error = None;
        }
        Action::Loaded(todos) => {
            state.todos = todos;
            state.loading = false;
        }
        Action::LoadFailed(message) => {
            state.error = Some(message);
            state.loading = false;
        }
        Action::AddStarted => state.is_adding = true,
        Action::Added(todo) => {
            state.todos.insert(0, todo);
            state.is_adding = false;
        }
        Action::AddFailed => state.is_adding = false,
        Action::Replaced(todo) => {
            // A record deleted while its request was in flight stays deleted.
            if let Some(slot) = state.todos.iter_mut().find(|t| t.id == todo.id) {
                *slot = todo;
            }
        }
        Action::Deleted(id) => state.todos.retain(|t| t.id != id),
        Action::FilterChanged(filter) => state.filter = filter,
    }
    state
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
}

impl Counts {
    pub fn of(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|t| t.completed).count();
        Self {
            all: todos.len(),
            active: todos.len() - completed,
            completed,
        }
    }

    pub fn for_filter(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.all,
            Filter::Active => self.active,
            Filter::Completed => self.completed,
        }
    }

    /// Share of completed todos as a whole percentage; `None` for an empty list.
    pub fn percent_complete(&self) -> Option<u32> {
        if self.all == 0 {
            return None;
        }
        Some(((self.completed as f64 / self.all as f64) * 100.0).round() as u32)
    }
}

impl TodoState {
    pub fn visible(&self) -> impl Iterator<Item = &Todo> {
        let filter = self.filter;
        self.todos.iter().filter(move |todo| filter.matches(todo))
    }

    pub fn counts(&self) -> Counts {
        Counts::of(&self.todos)
    }

    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }
}
