use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use log::info;

use super::JsonBody;
use crate::{
    repo::{FacadeMarketplace, RelationalStore},
    server::errors::ServerError,
    types::{Listing, Row},
};

pub async fn list<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
) -> Result<Json<Listing>, ServerError> {
    Ok(Json(facade.aplicaciones().await?))
}

pub async fn create<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Vec<Row>>), ServerError> {
    let rows = facade.create_aplicacion(&body).await?;
    Ok((StatusCode::CREATED, Json(rows)))
}

/// Updates the `estado` of an application, any other field in the body is ignored.
pub async fn update_estado<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<Vec<Row>>, ServerError> {
    if !body.contains_key("estado") {
        info!("no `estado` provided for aplicacion `{id}`, nothing to update");
    }
    Ok(Json(facade.update_aplicacion_estado(&id, &body).await?))
}
