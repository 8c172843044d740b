//! Apex Storefront library.
//!
//! JSON API for the Apex Sneakers shop: catalog, accounts with bearer
//! tokens, and atomic order placement over `SQLite`. The binary in
//! `main.rs` and the integration tests both serve [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
