//! # Eloquia Domain
//!
//! Business domain types and models for the Eloquia client core.
//!
//! This crate contains:
//! - Domain data types (JournalEntry, Patient, LinkRequest, etc.)
//! - The network error taxonomy and `ApiResult` outcome wrapper
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Eloquia crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod errors;
pub mod ids;
pub mod network;
pub mod sync;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use ids::*;
pub use network::*;
pub use sync::*;
pub use types::*;
