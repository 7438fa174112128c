//! Command handlers, one per subcommand.

pub mod index;
pub mod serve;

pub use index::IndexCommandHandler;
pub use serve::ServeCommandHandler;
