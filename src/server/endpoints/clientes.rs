use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::JsonBody;
use crate::{
    repo::{FacadeMarketplace, RelationalStore},
    server::errors::ServerError,
    types::{Listing, Row},
};

pub async fn list<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
) -> Result<Json<Listing>, ServerError> {
    Ok(Json(facade.clientes().await?))
}

pub async fn get<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
    Path(id): Path<String>,
) -> Result<Json<Row>, ServerError> {
    Ok(Json(facade.cliente(&id).await?))
}

/// Inserts a client, status 201 with the inserted rows.
pub async fn create<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Vec<Row>>), ServerError> {
    let rows = facade.create_cliente(&body).await?;
    Ok((StatusCode::CREATED, Json(rows)))
}
