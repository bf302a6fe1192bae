use axum::{Json, extract::State};

use crate::{
    repo::{FacadeMarketplace, RelationalStore, TablesDump},
    server::errors::ServerError,
    types::SchemaDescription,
};

pub async fn dump<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
) -> Result<Json<TablesDump>, ServerError> {
    Ok(Json(facade.dump().await?))
}

pub async fn schema<S: RelationalStore>(
    State(facade): State<FacadeMarketplace<S>>,
) -> Json<&'static SchemaDescription> {
    Json(facade.schema())
}
