//! Asana task board adapter.

pub mod client;
pub mod models;

pub use client::{AsanaClient, ASANA_API_BASE};
