//! Domain models for the product tree service.
//!
//! A [`ProductTree`] is a flat list of [`Node`]s plus parent/child
//! [`Edge`]s. The hierarchy is reconstructed on demand by the XML export
//! and the diagnostics pass; nothing here enforces that the edges form a
//! forest. Request and response DTOs for the HTTP layer live in `api`.

mod api;
mod node;
mod tree;

pub use api::*;
pub use node::*;
pub use tree::*;
