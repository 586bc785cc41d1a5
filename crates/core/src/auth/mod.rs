//! Authentication and account linking

pub mod ports;

pub use ports::AuthRepository;
