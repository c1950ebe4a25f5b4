use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::api::LeadResponse;

#[derive(Debug)]
pub enum AppError {
    /// Internal errors - logged but return a generic 500 to the user.
    /// The only internal failure path here is the persistence write.
    Internal(anyhow::Error),
    /// User-facing errors - message is safe to show
    External(StatusCode, &'static str),
    /// Validation errors - safe to show
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Internal(err) => {
                tracing::error!("internal error: {:?}", err);
                sentry::capture_error(
                    err.as_ref() as &(dyn std::error::Error + Send + Sync + 'static)
                );

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(LeadResponse::error("falha ao salvar lead")),
                )
                    .into_response()
            }
            AppError::External(status, msg) => {
                (status, Json(LeadResponse::error(msg))).into_response()
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(LeadResponse::error(msg))).into_response()
            }
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
