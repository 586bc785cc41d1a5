//! Session retention and teardown

pub mod ports;

pub use ports::AuthSessionStore;
