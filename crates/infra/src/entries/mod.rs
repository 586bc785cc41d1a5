//! Local journal entry cache implementations

pub mod local;

pub use local::MemoryEntryStore;
