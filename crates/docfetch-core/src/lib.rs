pub mod config;
pub mod logging;

pub mod checksum;
pub mod error;
pub mod filename;
pub mod probe;
pub mod provider;
pub mod reference;
pub mod resolver;
pub mod server;

pub use error::{ResolveError, TransportError};
pub use resolver::{ResolvedDocument, Resolver};
