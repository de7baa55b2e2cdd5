pub mod errors;
pub mod formatting;
pub mod ids;
pub mod profiles;
pub mod repositories;
pub mod scans;
pub mod tokens;

// Re-exports
pub use errors::{RepositoryError, ScanError};
