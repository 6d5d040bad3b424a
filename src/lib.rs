// Tokensync — Library root
//
// Re-exports the store, engine, configuration and CLI modules.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod store;

pub use config::SyncConfig;
pub use engine::{MutationOutcome, SyncEngine, SyncReport};
pub use error::{Result, TokensyncError};
