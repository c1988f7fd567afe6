//! Saltbox Core - Shared domain types.
//!
//! This crate provides the normalized entities the Saltbox client exposes
//! to consumers:
//!
//! - [`types::Credential`] - anonymous visitor credential with expiry math
//! - [`types::CatalogItem`] / [`types::Category`] - normalized catalog data
//! - [`types::QuerySpec`] / [`types::Page`] - query descriptions and results
//! - [`types::Cart`] / [`types::CartLine`] - normalized cart data
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. Upstream payloads never appear here; the client crate normalizes
//! them into these shapes at its adapter boundary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
