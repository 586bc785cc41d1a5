//! Port interfaces for auth operations

use async_trait::async_trait;
use eloquia_domain::{AuthResult, LinkRequest, Patient};

/// Trait for account, login, and doctor-link operations against the backend.
///
/// Implementations translate HTTP statuses into domain `AuthError` variants
/// carrying user-facing text; callers must treat any `Err` as authoritative.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Ask a doctor to link this patient by code and email.
    async fn request_link(&self, patient_code: &str, email: &str) -> AuthResult<LinkRequest>;

    /// Redeem a pairing code handed out by a doctor.
    async fn redeem_pairing_code(&self, code: &str) -> AuthResult<LinkRequest>;

    /// Register a new patient account.
    async fn patient_register(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> AuthResult<Patient>;

    /// Log in with email and password. Session state arrives via cookie.
    async fn patient_login(&self, email: &str, password: &str) -> AuthResult<Patient>;

    /// Fetch the currently authenticated patient.
    async fn patient_me(&self) -> AuthResult<Patient>;
}
