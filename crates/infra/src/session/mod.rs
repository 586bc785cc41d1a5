//! Session store implementation

mod store;

pub use store::CookieSessionStore;
