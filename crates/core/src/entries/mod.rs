//! Local journal entry cache

pub mod ports;

pub use ports::EntryStore;
