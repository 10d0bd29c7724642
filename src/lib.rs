//! Course catalog search service.
//!
//! Request flow: semester resolution → cache lookup → query classification →
//! ranked retrieval → section hydration → cache store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
