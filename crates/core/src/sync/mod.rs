//! Offline-first synchronization

pub mod ports;
pub mod service;

pub use ports::SyncGateway;
pub use service::SyncService;
