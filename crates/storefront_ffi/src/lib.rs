//! UI-facing bindings for the storefront category picker.

pub mod api;
