//! Product tree analysis and export service.
//!
//! A small HTTP backend around an in-memory product tree snapshot:
//! a chat endpoint backed by a local language model with a rule-based
//! analyzer as fallback, structural diagnostics, and a nested XML
//! export. State is a single process-wide slot replaced wholesale on
//! import; there is no persistence.

pub mod ai;
pub mod analysis;
pub mod api;
pub mod diagnostics;
pub mod models;
pub mod store;
pub mod xml;
