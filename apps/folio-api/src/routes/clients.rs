//! Client endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use folio_core::validation::validate_uuid;
use folio_core::{Client, NewClient};

use crate::error::ApiResult;
use crate::routes::page_size;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListClientsParams {
    pub limit: Option<i64>,
}

/// `GET /api/clients`
pub async fn list_clients(
    State(state): State<AppState>,
    Query(params): Query<ListClientsParams>,
) -> ApiResult<Json<Vec<Client>>> {
    let clients = state.db.clients().list(page_size(params.limit)).await?;
    Ok(Json(clients))
}

/// `POST /api/clients`
pub async fn create_client(
    State(state): State<AppState>,
    Json(input): Json<NewClient>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let client = Client::create(input, Utc::now())?;
    state.db.clients().insert(&client).await?;

    info!(id = %client.id, name = %client.name, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// `GET /api/clients/{id}`
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Client>> {
    validate_uuid(&id)?;
    let client = state.db.clients().require(&id).await?;
    Ok(Json(client))
}
