use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, async_trait};
use serde::Serialize;
use thiserror::Error;

use salon_core::error::CoreError;
use salon_db::error::DbError;
use salon_service::error::ServiceError;

use crate::config::Settings;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// JSON body rendered for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn db_status(err: &DbError) -> StatusCode {
    match err {
        DbError::PoolError(_) => StatusCode::SERVICE_UNAVAILABLE,
        DbError::CoreError(CoreError::ValidationError(_)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::CoreError(CoreError::ValidationError(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::CoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DatabaseError(err) => db_status(err),
            Self::ServiceError(err) => match err {
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Conflict(_) => StatusCode::CONFLICT,
                ServiceError::DatabaseError(db) => db_status(db),
                _ if err.is_validation() => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// ## Summary
    /// Builds the response body.
    ///
    /// Client errors carry their own message. Server errors get a generic
    /// message, with the underlying error attached only when `expose_details`
    /// is set.
    #[must_use]
    pub fn to_response(&self, expose_details: bool) -> ErrorResponse {
        let status = self.status_code();
        if status.is_server_error() {
            let error = if status == StatusCode::SERVICE_UNAVAILABLE {
                "Service temporarily unavailable"
            } else {
                "Internal server error"
            };
            ErrorResponse {
                error: error.to_string(),
                details: expose_details.then(|| self.to_string()),
            }
        } else {
            ErrorResponse {
                error: self.client_message(),
                details: None,
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::CoreError(CoreError::ValidationError(msg))
            | Self::ServiceError(
                ServiceError::NotFound(msg)
                | ServiceError::Conflict(msg)
                | ServiceError::ValidationError(msg)
                | ServiceError::CoreError(CoreError::ValidationError(msg)),
            ) => msg.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
impl salvo::Writer for AppError {
    async fn write(self, _req: &mut Request, depot: &mut Depot, res: &mut Response) {
        let expose_details = depot
            .obtain::<std::sync::Arc<Settings>>()
            .is_ok_and(|settings| settings.server.expose_error_details);

        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        res.status_code(status);
        res.render(Json(self.to_response(expose_details)));
    }
}
