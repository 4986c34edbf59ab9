pub mod config;
pub mod error;
pub mod lease;
pub mod quote;
pub mod time_value;
pub mod types;

pub use config::EngineConfig;
pub use error::LeaseQuoteError;
pub use types::*;

/// Standard result type for all lease-quote operations
pub type LeaseQuoteResult<T> = Result<T, LeaseQuoteError>;
