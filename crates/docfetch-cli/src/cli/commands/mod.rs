//! CLI command handlers, one per file.

mod checksum;
mod fetch;
mod inspect;
mod serve;

pub use checksum::run_checksum;
pub use fetch::run_fetch;
pub use inspect::run_inspect;
pub use serve::run_serve;
