//! OpenSearch implementation of the search backend.
//!
//! Logical index names are served through aliases over versioned concrete
//! indices, which is what makes [`SearchBackend::move_index`] atomic: a move is
//! a single `_aliases` request.
//!
//! [`SearchBackend::move_index`]: crate::interfaces::SearchBackend::move_index

mod client;
mod index_config;

pub use client::OpenSearchBackend;
