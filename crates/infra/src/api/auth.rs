//! Auth endpoints and repository
//!
//! The repository translates HTTP statuses into domain `AuthError` variants
//! per endpoint. Validation-shaped failures carry the server's
//! `{"error": ...}` message when present, with endpoint-specific fallbacks.

use std::sync::Arc;

use async_trait::async_trait;
use eloquia_core::AuthRepository;
use eloquia_domain::{ApiResult, AuthError, AuthResult, LinkRequest, NetworkError, Patient};
use tracing::{debug, info, instrument, warn};

use super::dto::{
    LinkInviteRequest, LinkResponse, PairingCodeRedeemRequest, PatientLoginRequest,
    PatientMeResponse, PatientRegisterRequest,
};
use super::mappers::{link_request_from_wire, parse_server_error_message, patient_from_wire};
use crate::http::NetworkClient;

const INVALID_PAYLOAD: &str = "Invalid server payload";

/// HTTP access to the auth and linking endpoints.
pub struct AuthApi {
    client: Arc<NetworkClient>,
}

impl AuthApi {
    pub fn new(client: Arc<NetworkClient>) -> Self {
        Self { client }
    }

    pub async fn request_link(&self, request: &LinkInviteRequest) -> ApiResult<LinkResponse> {
        self.client.post("/links/request", request).await
    }

    pub async fn redeem_pairing_code(
        &self,
        request: &PairingCodeRedeemRequest,
    ) -> ApiResult<LinkResponse> {
        self.client.post("/links/redeem", request).await
    }

    pub async fn patient_register(
        &self,
        request: &PatientRegisterRequest,
    ) -> ApiResult<LinkResponse> {
        self.client.post("/patient/register", request).await
    }

    pub async fn patient_login(&self, request: &PatientLoginRequest) -> ApiResult<LinkResponse> {
        self.client.post("/patient/login", request).await
    }

    pub async fn patient_me(&self) -> ApiResult<PatientMeResponse> {
        self.client.get("/patient/me").await
    }
}

/// [`AuthRepository`] over the HTTP auth endpoints.
pub struct HttpAuthRepository {
    api: AuthApi,
}

impl HttpAuthRepository {
    pub fn new(client: Arc<NetworkClient>) -> Self {
        Self { api: AuthApi::new(client) }
    }
}

#[async_trait]
impl AuthRepository for HttpAuthRepository {
    #[instrument(skip_all)]
    async fn request_link(&self, patient_code: &str, email: &str) -> AuthResult<LinkRequest> {
        debug!(code_len = patient_code.trim().len(), "requesting doctor link");

        let result = self
            .api
            .request_link(&LinkInviteRequest {
                patient_code: patient_code.to_string(),
                patient_email: email.to_string(),
            })
            .await;

        let mapped = map_link_response(result, |status, body| match status {
            400 => validation(body, "Invalid request"),
            404 => AuthError::InvalidCodeOrEmail,
            409 => validation(body, "Conflict"),
            _ => http_error(status, body),
        });

        match &mapped {
            Ok(link) => info!(link_id = %link.link_id, "link request accepted"),
            Err(_) => warn!("link request failed"),
        }
        mapped
    }

    #[instrument(skip_all)]
    async fn redeem_pairing_code(&self, code: &str) -> AuthResult<LinkRequest> {
        let normalized = code.trim();
        debug!(code_len = normalized.len(), "redeeming pairing code");

        let result = self
            .api
            .redeem_pairing_code(&PairingCodeRedeemRequest { code: normalized.to_string() })
            .await;

        let mapped = map_link_response(result, |status, body| match status {
            400 => validation(body, "Invalid code"),
            404 => AuthError::InvalidCode,
            409 => validation(body, "Conflict"),
            _ => http_error(status, body),
        });

        match &mapped {
            Ok(link) => info!(link_id = %link.link_id, status = ?link.status, "pairing code redeemed"),
            Err(_) => warn!("pairing code redemption failed"),
        }
        mapped
    }

    #[instrument(skip_all)]
    async fn patient_register(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> AuthResult<Patient> {
        debug!("registering patient account");

        let result = self
            .api
            .patient_register(&PatientRegisterRequest {
                email: email.to_string(),
                display_name: display_name.to_string(),
                password: password.to_string(),
            })
            .await;

        let mapped = map_patient_response(result, |status, body| match status {
            400 => validation(body, "Invalid registration"),
            409 => validation(body, "An account with that email already exists"),
            _ => http_error(status, body),
        });

        match &mapped {
            Ok(patient) => info!(patient_id = %patient.id, "patient registered"),
            Err(_) => warn!("patient registration failed"),
        }
        mapped
    }

    #[instrument(skip_all)]
    async fn patient_login(&self, email: &str, password: &str) -> AuthResult<Patient> {
        debug!("logging in patient");

        let result = self
            .api
            .patient_login(&PatientLoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await;

        let mapped = map_patient_response(result, |status, body| match status {
            400 => validation(body, "Email and password are required"),
            401 => validation(body, "Invalid email or password"),
            _ => http_error(status, body),
        });

        match &mapped {
            Ok(patient) => info!(patient_id = %patient.id, "patient logged in"),
            Err(_) => warn!("patient login failed"),
        }
        mapped
    }

    #[instrument(skip_all)]
    async fn patient_me(&self) -> AuthResult<Patient> {
        let mapped = match self.api.patient_me().await {
            ApiResult::Ok { value, .. } => value
                .patient
                .as_ref()
                .and_then(patient_from_wire)
                .ok_or_else(|| AuthError::Unexpected(INVALID_PAYLOAD.to_string())),
            ApiResult::Err { error } => Err(map_network_error(error, |status, body| {
                match status {
                    401 => validation(body, "Your session has expired"),
                    _ => http_error(status, body),
                }
            })),
        };

        match &mapped {
            Ok(patient) => debug!(patient_id = %patient.id, "fetched current patient"),
            Err(_) => warn!("fetching current patient failed"),
        }
        mapped
    }
}

fn validation(body: Option<&str>, fallback: &str) -> AuthError {
    AuthError::Validation(
        parse_server_error_message(body).unwrap_or_else(|| fallback.to_string()),
    )
}

fn http_error(status: u16, body: Option<&str>) -> AuthError {
    AuthError::Network(NetworkError::Http { status, body: body.map(str::to_owned) })
}

fn map_link_response(
    result: ApiResult<LinkResponse>,
    map_http: impl Fn(u16, Option<&str>) -> AuthError,
) -> AuthResult<LinkRequest> {
    match result {
        ApiResult::Ok { value, .. } => link_request_from_wire(&value)
            .ok_or_else(|| AuthError::Unexpected(INVALID_PAYLOAD.to_string())),
        ApiResult::Err { error } => Err(map_network_error(error, map_http)),
    }
}

fn map_patient_response(
    result: ApiResult<LinkResponse>,
    map_http: impl Fn(u16, Option<&str>) -> AuthError,
) -> AuthResult<Patient> {
    match result {
        ApiResult::Ok { value, .. } => value
            .patient
            .as_ref()
            .and_then(patient_from_wire)
            .ok_or_else(|| AuthError::Unexpected(INVALID_PAYLOAD.to_string())),
        ApiResult::Err { error } => Err(map_network_error(error, map_http)),
    }
}

fn map_network_error(
    error: NetworkError,
    map_http: impl Fn(u16, Option<&str>) -> AuthError,
) -> AuthError {
    match error {
        NetworkError::Http { status, body } => map_http(status, body.as_deref()),
        other => AuthError::Network(other),
    }
}
