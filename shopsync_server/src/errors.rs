use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use shopsync_engine::{InsightsError, TenantApiError, WebhookError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Invalid request. {0}")]
    InvalidRequest(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationFailed(#[from] Rejection),
    #[error("The request came from a peer that is not on the whitelist.")]
    ForbiddenPeer,
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The record already exists. {0}")]
    RecordAlreadyExists(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            Self::ForbiddenPeer => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::RecordAlreadyExists(_) => StatusCode::CONFLICT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

/// Reasons a webhook delivery is refused before its body is looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("No HMAC signature was provided.")]
    MissingSignature,
    #[error("No shop domain was provided.")]
    MissingShopDomain,
    #[error("The request body is empty.")]
    EmptyBody,
    #[error("The HMAC signature is not valid base64.")]
    InvalidSignatureEncoding,
    #[error("Invalid HMAC signature.")]
    SignatureMismatch,
}

impl From<WebhookError> for ServerError {
    fn from(e: WebhookError) -> Self {
        match e {
            WebhookError::TenantNotFound(shop) => Self::NoRecordFound(format!("No tenant is registered for {shop}")),
            WebhookError::PersistenceFailed(e) => Self::BackendError(e.to_string()),
        }
    }
}

impl From<TenantApiError> for ServerError {
    fn from(e: TenantApiError) -> Self {
        match e {
            TenantApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
            TenantApiError::AlreadyExists(s) => Self::RecordAlreadyExists(s),
            TenantApiError::MissingField(_) => Self::InvalidRequest(e.to_string()),
        }
    }
}

impl From<InsightsError> for ServerError {
    fn from(e: InsightsError) -> Self {
        match e {
            InsightsError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
            InsightsError::QueryError(s) => Self::InvalidRequest(s),
        }
    }
}
