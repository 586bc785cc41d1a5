//! Durable key-value preference stores

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryKeyValueStore;
