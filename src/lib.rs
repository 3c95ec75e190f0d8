//! # task-tracker
//!
//! A minimal task tracker: one HTTP resource over a single `tasks` table,
//! plus a terminal client that keeps a local copy of the list in step with
//! the server.
//!
//! ## Modules
//!
//! - `domain`: the `Task` record and its ordering
//! - `infrastructure`: storage backends and the factory that picks one
//! - `api`: axum handlers and router for `/api/tasks`
//! - `view`: HTTP client, local list state and the terminal front end

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod api;
pub mod domain;
pub mod infrastructure;
pub mod view;
