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
    Ok(Json(facade.freelancers().await?))
}

/// Freelancer with its skills (level, years of experience and skill name).
pub async fn get<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
    Path(id): Path<String>,
) -> Result<Json<Row>, ServerError> {
    Ok(Json(facade.freelancer(&id).await?))
}

pub async fn create<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Vec<Row>>), ServerError> {
    let rows = facade.create_freelancer(&body).await?;
    Ok((StatusCode::CREATED, Json(rows)))
}
