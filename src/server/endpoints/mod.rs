//! HTTP endpoints, one module per resource.
//!
//! Handlers only extract path parameters and bodies, call the matching façade
//! operation and wrap the result into a response.

pub mod aplicaciones;
pub mod clientes;
pub mod freelancer_habilidades;
pub mod freelancers;
pub mod habilidades;
pub mod index;
pub mod proyectos;
pub mod tables;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use serde_json::Value;

use crate::{server::errors::ServerError, types::Row};

/// JSON object sent as request body.
///
/// Bodies that are not declared as JSON, empty bodies and JSON values other than
/// objects are all read as an empty object.
#[derive(Debug, Default)]
pub struct JsonBody(pub Row);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("json"));

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(row)) => Ok(Self(row)),
            Ok(_) => Ok(Self::default()),
            Err(e) => Err(ServerError::BadRequest(e.to_string())),
        }
    }
}
