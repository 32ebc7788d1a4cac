pub mod sync_runner;

pub use sync_runner::{SyncReport, SyncRunner, SyncSettings};
