use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("dotenv error: {0}")]
    DotEnvError(#[from] dotenv::Error),

    #[error("jwt error: {0}")]
    JWTError(#[from] jsonwebtoken::errors::Error),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("casbin error: {0}")]
    CasbinError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("failed to contact AI service: {0}")]
    AiService(String),

    #[error("invalid AI response: {0}")]
    AiResponse(String),

    #[error("failed to contact payment gateway: {0}")]
    PaymentGateway(String),

    #[error("server error: {0}")]
    ServerError(String),
}

impl Error {
    /// Message that is safe to show to the caller. Internal details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            Error::DatabaseError(sqlx::Error::RowNotFound) => "resource not found".into(),
            Error::JWTError(_) => "invalid token".into(),
            Error::Unauthorized(msg) | Error::NotFound(msg) | Error::BadRequest(msg) | Error::Conflict(msg) => msg.clone(),
            Error::AiService(_) => "failed to contact AI service".into(),
            Error::AiResponse(reason) => format!("AI service returned an unusable response: {}", reason),
            Error::PaymentGateway(_) => "failed to contact payment gateway".into(),
            _ => "internal server error".into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::DatabaseError(sqlx::Error::RowNotFound) | Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::JWTError(_) | Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::BadRequest(_) | Error::JsonError(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::AiService(_) | Error::AiResponse(_) | Error::PaymentGateway(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("{}", self);
        }
        HttpResponse::build(status).json(ErrorBody { error: self.public_message() })
    }
}
