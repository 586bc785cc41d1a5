//! Port interface for durable key-value preferences

/// Small durable key-value store for client preferences.
///
/// The interface is infallible by design: implementations tolerate load
/// failures by returning defaults and log write failures instead of
/// propagating them. Methods are synchronous so the store can be used from
/// non-async call sites (the cookie jar's lock-held sections).
pub trait KeyValueStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;

    fn put_string(&self, key: &str, value: &str);

    fn get_bool(&self, key: &str, default: bool) -> bool;

    fn put_bool(&self, key: &str, value: bool);

    fn remove(&self, key: &str);
}
