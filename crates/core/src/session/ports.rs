//! Port interfaces for session state

use async_trait::async_trait;

/// Trait for controlling session cookie retention and teardown.
///
/// "Remember me" governs whether session cookies survive a process restart;
/// the in-memory session always lives for the remainder of the run.
#[async_trait]
pub trait AuthSessionStore: Send + Sync {
    /// Whether session cookies are persisted across restarts.
    async fn is_remember_me_enabled(&self) -> bool;

    /// Toggle retention. Disabling wipes only the persisted copy; the
    /// in-memory session stays valid for the rest of the process.
    async fn set_remember_me_enabled(&self, enabled: bool);

    /// Drop the persisted cookie copy without touching the live session.
    async fn clear_remembered_session(&self);

    /// Wipe persisted and in-memory session state. Use on logout or when an
    /// invalid session is detected.
    async fn clear_session(&self);
}
