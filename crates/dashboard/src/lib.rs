//! Tangelo Dashboard library.
//!
//! This crate provides the seller/admin dashboard as a library, allowing
//! it to be tested and reused.
//!
//! # Surface
//!
//! - Admin category and subcategory management
//! - Seller store onboarding (multi-step wizard with a session-held draft)
//! - Product and variant catalog authoring
//! - Per-country shipping rate configuration
//! - Image uploads delegated to the external media host

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod actions;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod media;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validate;
pub mod wizard;
