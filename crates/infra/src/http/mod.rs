//! HTTP client infrastructure

pub mod client;

pub use client::{NetworkClient, NetworkClientBuilder, NetworkClientConfig, TokenProvider};
