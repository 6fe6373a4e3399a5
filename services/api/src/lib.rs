//! services/api/src/lib.rs
//!
//! The HTTP service crate: adapters for the core's ports, configuration,
//! error types and the web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
