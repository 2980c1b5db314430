//! Client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps the client's view
//! state in sync with the server.
//!
//! # Design
//! - `TodoClient` is stateless; each operation is split into `build_*` and
//!   `parse_*` so the I/O boundary is explicit.
//! - `Controller` owns the `TodoState` and applies every change through the
//!   pure `state::reduce`. The host supplies the `Transport` and the
//!   `FilterStore`.
//! - `view` holds the per-component UI state (form draft, row edit buffer)
//!   and a plain-text renderer.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod persist;
pub mod state;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use controller::Controller;
pub use error::{ActionError, ApiError, FilterStoreError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use persist::{FilterStore, MemoryFilterStore, FILTER_STATE_KEY};
pub use state::{Action, Counts, TodoState};
pub use types::{Envelope, Filter, Health, Todo, TodoId};
