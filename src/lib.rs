//! # Context Sources
//!
//! Read-only connectors for local data sources, exposed as named,
//! self-describing operations that an LLM pipeline calls to gather context
//! before answering a question.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  ┌────────────┐  ┌────────────┐
//! │ Text file  │  │    PDF     │  │   SQLite   │
//! └─────┬──────┘  └─────┬──────┘  └─────┬──────┘
//!       ▼               ▼               ▼
//! ┌──────────────────────────────────────────────┐
//! │   OperationRegistry (name → description,     │
//! │   parameter schema, handler)                 │
//! └──────────────┬──────────────────┬────────────┘
//!                ▼                  ▼
//!          ┌──────────┐       ┌──────────┐
//!          │   CLI    │       │   HTTP   │
//!          │  (ctxs)  │       │  server  │
//!          └──────────┘       └──────────┘
//! ```
//!
//! Operations always return a string: plain text for documents, a JSON
//! array for database records. Source faults are logged and folded into
//! that string; they never propagate to the caller.
//!
//! ## Quick Start
//!
//! ```bash
//! ctxs sources                                   # what is configured, what exists
//! ctxs list                                      # discoverable operations
//! ctxs call Sqlite.ReadUserLedgerRecords --param userName=Alice
//! ctxs serve                                     # HTTP operation server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Score and ledger records |
//! | [`error`] | Source error taxonomy |
//! | [`connector_text`] | Text file connector |
//! | [`connector_pdf`] | PDF document connector |
//! | [`connector_sqlite`] | SQLite connector |
//! | [`traits`] | Operation trait and registry |
//! | [`operations`] | Built-in operations |
//! | [`sources`] | Source status listing |
//! | [`server`] | HTTP operation server |

pub mod config;
pub mod connector_pdf;
pub mod connector_sqlite;
pub mod connector_text;
pub mod error;
pub mod fsutil;
pub mod models;
pub mod operations;
pub mod server;
pub mod sources;
pub mod traits;
