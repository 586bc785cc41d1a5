//! Typed API surface: wire DTOs, mappers, and HTTP repositories

pub mod auth;
pub mod dto;
pub mod entries;
mod mappers;

pub use auth::{AuthApi, HttpAuthRepository};
pub use entries::EntriesSyncApi;
