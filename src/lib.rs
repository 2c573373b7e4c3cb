//! # Contact Book
//!
//! A small contact-management service. Clients create, list (paginated),
//! update, and delete contacts (name, email, phone) over a JSON HTTP API;
//! email and phone are unique across all contacts.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐
//! │   HTTP   │   │   CLI    │
//! │  (axum)  │   │(contacts)│
//! └────┬─────┘   └────┬─────┘
//!      └──────┬───────┘
//!             ▼
//!      ┌─────────────┐   ┌──────────────┐
//!      │   Service   │──▶│    Store     │
//!      │ validation  │   │ SQLite / mem │
//!      └─────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! contacts init                 # create database
//! contacts serve                # start HTTP server on :5000
//! contacts add "Ana" ana@x.com 1234567890
//! contacts list --page 1 --limit 10
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`models`] | Core data types |
//! | [`validate`] | Field and format validation |
//! | [`store`] | Storage trait with SQLite and in-memory backends |
//! | [`service`] | Create, list, update, delete business rules |
//! | [`server`] | JSON HTTP server |
//! | [`error`] | Store and service error types |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |

pub mod config;
pub mod db;
pub mod error;
pub mod migrate;
pub mod models;
pub mod server;
pub mod service;
pub mod store;
pub mod validate;
