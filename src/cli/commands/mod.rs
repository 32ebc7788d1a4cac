//! CLI command implementations.

pub mod decode;
pub mod init;
pub mod orgs;
pub mod sync;
