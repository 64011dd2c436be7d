use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use donation_engine::{
    traits::{DonationStoreError, GatewayError},
    DonationFlowError,
    ReconciliationError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Notification signature invalid or not provided. {0}")]
    InvalidSignature(String),
    #[error("The request conflicts with the current state. {0}")]
    Conflict(String),
    #[error("The payment gateway could not complete the request. {0}")]
    PaymentGatewayError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSignature(_) => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PaymentGatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<DonationStoreError> for ServerError {
    fn from(e: DonationStoreError) -> Self {
        Self::BackendError(e.to_string())
    }
}

impl From<DonationFlowError> for ServerError {
    fn from(e: DonationFlowError) -> Self {
        match e {
            DonationFlowError::InvalidAmount(_) => Self::InvalidRequestBody(e.to_string()),
            DonationFlowError::CampaignNotFound(_) => Self::NoRecordFound(e.to_string()),
            DonationFlowError::CampaignTargetReached(_) => Self::Conflict(e.to_string()),
            DonationFlowError::PaymentInitiationFailed { .. } => Self::PaymentGatewayError(e.to_string()),
            DonationFlowError::DatabaseError(_) => Self::BackendError(e.to_string()),
        }
    }
}

impl From<ReconciliationError> for ServerError {
    fn from(e: ReconciliationError) -> Self {
        match e {
            ReconciliationError::MissingOrderId => Self::InvalidRequestBody(e.to_string()),
            ReconciliationError::DonationNotFound(_) => Self::NoRecordFound(e.to_string()),
            ReconciliationError::GatewayError(GatewayError::TransactionNotFound(_)) => {
                Self::NoRecordFound(e.to_string())
            },
            ReconciliationError::GatewayError(_) => Self::PaymentGatewayError(e.to_string()),
            ReconciliationError::CampaignVanished { .. } => Self::BackendError(e.to_string()),
            ReconciliationError::DatabaseError(_) => Self::BackendError(e.to_string()),
        }
    }
}
