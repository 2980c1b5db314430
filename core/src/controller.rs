//! Synchronizes `TodoState` with the server.
//!
//! # Design
//! The controller owns the state, a `TodoClient`, the host's `Transport` and
//! a `FilterStore`. Each user action issues one request; on success the
//! affected record is merged through `reduce`, on failure the error goes back
//! to the caller and the list is left as it was. Only a failed full fetch is
//! recorded in `TodoState::error`, since that is what the view renders
//! instead of the list.

use log::{debug, error};

use crate::client::TodoClient;
use crate::error::{ActionError, ApiError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::persist::{load_filter, save_filter, FilterStore};
use crate::state::{reduce, Action, TodoState};
use crate::types::{Filter, Health, Todo, TodoId};

pub struct Controller<T, S> {
    client: TodoClient,
    transport: T,
    filters: S,
    state: TodoState,
}

impl<T: Transport, S: FilterStore> Controller<T, S> {
    pub fn new(client: TodoClient, transport: T, filters: S) -> Self {
        Self {
            client,
            transport,
            filters,
            state: TodoState::default(),
        }
    }

    pub fn state(&self) -> &TodoState {
        &self.state
    }

    /// Hands back the transport and the filter store, e.g. to build a fresh
    /// controller over the same persisted preferences.
    pub fn into_parts(self) -> (T, S) {
        (self.transport, self.filters)
    }

    /// Restore the persisted filter, then load the full list.
    pub fn mount(&mut self) -> Result<(), ActionError> {
        let filter = load_filter(&self.filters);
        self.dispatch(Action::FilterChanged(filter));
        self.fetch()
    }

    /// Replace the local list with the server's. A failure is kept in
    /// `state().error` as well as returned.
    pub fn fetch(&mut self) -> Result<(), ActionError> {
        self.dispatch(Action::LoadStarted);
        let request = self.client.build_list_todos();
        match self.call(Ok(request), TodoClient::parse_list_todos) {
            Ok(todos) => {
                self.dispatch(Action::Loaded(todos));
                Ok(())
            }
            Err(err) => {
                error!("event=todo_fetch status=error error={err}");
                self.dispatch(Action::LoadFailed(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn add(&mut self, text: &str) -> Result<Todo, ActionError> {
        self.dispatch(Action::AddStarted);
        let request = self.client.build_create_todo(text);
        match self.call(request, TodoClient::parse_create_todo) {
            Ok(todo) => {
                self.dispatch(Action::Added(todo.clone()));
                Ok(todo)
            }
            Err(err) => {
                error!("event=todo_add status=error error={err}");
                self.dispatch(Action::AddFailed);
                Err(err)
            }
        }
    }

    pub fn update(&mut self, id: TodoId, text: &str) -> Result<Todo, ActionError> {
        let request = self.client.build_update_todo(id, text);
        let result = self.call(request, TodoClient::parse_update_todo);
        self.merge("todo_update", id, result)
    }

    pub fn toggle(&mut self, id: TodoId) -> Result<Todo, ActionError> {
        let request = self.client.build_toggle_todo(id);
        let result = self.call(Ok(request), TodoClient::parse_toggle_todo);
        self.merge("todo_toggle", id, result)
    }

    pub fn delete(&mut self, id: TodoId) -> Result<(), ActionError> {
        let request = self.client.build_delete_todo(id);
        match self.call(Ok(request), TodoClient::parse_delete_todo) {
            Ok(_) => {
                self.dispatch(Action::Deleted(id));
                Ok(())
            }
            Err(err) => {
                error!("event=todo_delete status=error id={id} error={err}");
                Err(err)
            }
        }
    }

    /// Change the view filter and persist it.
    pub fn set_filter(&mut self, filter: Filter) {
        self.dispatch(Action::FilterChanged(filter));
        save_filter(&mut self.filters, filter);
    }

    /// Server liveness; does not touch local state.
    pub fn health(&mut self) -> Result<Health, ActionError> {
        let request = self.client.build_health();
        self.call(Ok(request), TodoClient::parse_health)
    }

    fn merge(
        &mut self,
        event: &str,
        id: TodoId,
        result: Result<Todo, ActionError>,
    ) -> Result<Todo, ActionError> {
        match result {
            Ok(todo) => {
                self.dispatch(Action::Replaced(todo.clone()));
                Ok(todo)
            }
            Err(err) => {
                error!("event={event} status=error id={id} error={err}");
                Err(err)
            }
        }
    }

    fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    fn call<R>(
        &mut self,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ActionError> {
        let request = request?;
        let (method, path) = (request.method, request.path.clone());
        let response = self.transport.execute(request)?;
        debug!(
            "event=http status={} method={} url={path}",
            response.status,
            method.as_str()
        );
        Ok(parse(&self.client, response)?)
    }
}
