//! Adapters for the external services a sync run talks to.

pub mod asana;
pub mod github;
