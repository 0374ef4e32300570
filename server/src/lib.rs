//! Todo list web service backed by a single JSON file.
//!
//! # Overview
//! `store` owns the todo collection and its on-disk mirror; `api` maps the
//! HTTP endpoints onto store operations. The store is handed to the router
//! through `AppState`, so it can be exercised without any HTTP in between.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;

pub use api::{app, run, AppState, CreateTodo};
pub use config::Config;
pub use error::{ApiError, ConfigError, StoreError};
pub use store::{Todo, TodoStore};
