//! Hierarchical category selection.
//!
//! # Responsibility
//! - Compute next selection sets for toggle interactions (pure reducer).
//! - Derive tri-state checkbox state from a selection set.
//! - Hold per-widget collapse flags, independent from selection.
//!
//! # Invariants
//! - The engine never mutates a caller-owned selection; it returns a new set.
//! - Selecting a node selects all its descendants and all its ancestors.
//! - Deselecting a node removes it and its descendants, never its ancestors.

pub mod collapse;
pub mod engine;
