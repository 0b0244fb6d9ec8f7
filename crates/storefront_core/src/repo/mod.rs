//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the category cache contract used by data sources.
//! - Isolate SQLite query details from fetch/store orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`InvalidData`) in addition to DB
//!   transport errors.

pub mod category_repo;
