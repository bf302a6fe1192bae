use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::warn;
use serde::Serialize;

use crate::repo::{ErrorKind, FacadeError};

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    FacadeError(#[from] FacadeError),
    /// Request body is declared as JSON but can't be parsed
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ServerError {
    /// Store failures always produce status 500, the failure kind is attached to
    /// the response extensions so that [`apply_error_mode`] can refine it.
    fn into_response(self) -> Response {
        match self {
            ServerError::FacadeError(err) => {
                warn!("store operation failed: {err}");

                let kind = err.kind();
                let mut response = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: err.to_string(),
                    }),
                )
                    .into_response();
                response.extensions_mut().insert(kind);
                response
            }
            ServerError::BadRequest(msg) => {
                warn!("bad request: {msg}");
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error: msg })).into_response()
            }
        }
    }
}

/// How store failures are reported to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ErrorMode {
    /// Every store failure is a 500
    #[default]
    Compat,
    /// Store failures are mapped to a status code matching their kind
    Typed,
}

impl ErrorMode {
    pub fn status(&self, kind: ErrorKind) -> StatusCode {
        match self {
            ErrorMode::Compat => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorMode::Typed => match kind {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::ConstraintViolation => StatusCode::BAD_REQUEST,
                ErrorKind::ConnectivityFailure => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }
}

/// Response mapper rewriting the status of store failures according to the error mode.
pub async fn apply_error_mode(State(mode): State<ErrorMode>, mut response: Response) -> Response {
    if let Some(kind) = response.extensions().get::<ErrorKind>().copied() {
        *response.status_mut() = mode.status(kind);
    }
    response
}
