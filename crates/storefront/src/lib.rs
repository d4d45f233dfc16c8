//! Tangelo Storefront library.
//!
//! The public, read-only face of the marketplace: navbar with the
//! category tree, search, product cards, product and store pages. Writes
//! happen only on the dashboard; this crate renders the catalog.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod models;
pub mod routes;
pub mod state;
