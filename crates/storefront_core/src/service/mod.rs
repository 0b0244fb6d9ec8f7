//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate data sources into form-level state.
//! - Keep UI/FFI layers decoupled from fetch and storage details.

pub mod category_store;
