//! Catalog domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by tree, selection and storage.
//!
//! # Invariants
//! - Every category is identified by a backend-assigned `CategoryId`.

pub mod category;
