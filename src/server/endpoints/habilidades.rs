use axum::{Json, extract::State, http::StatusCode};

use super::JsonBody;
use crate::{
    repo::{FacadeMarketplace, RelationalStore},
    server::errors::ServerError,
    types::{Listing, Row},
};

pub async fn list<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
) -> Result<Json<Listing>, ServerError> {
    Ok(Json(facade.habilidades().await?))
}

pub async fn create<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Vec<Row>>), ServerError> {
    let rows = facade.create_habilidad(&body).await?;
    Ok((StatusCode::CREATED, Json(rows)))
}
