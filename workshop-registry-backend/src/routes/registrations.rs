use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use http::StatusCode;
use serde::Deserialize;
use workshop_registry_database::models::{Registration, Workshop};

use crate::error::AppError;
use crate::registration::RegistrationLedger;
use crate::routes::extract::{JsonBody, PathParam, QueryParams};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub workshop_id: i64,
    pub username: String,
}

#[derive(Deserialize, Debug)]
pub struct UnregisterQuery {
    pub username: String,
}

pub async fn register(
    State(registrations): State<Arc<RegistrationLedger>>,
    JsonBody(payload): JsonBody<RegisterPayload>,
) -> Result<(StatusCode, Json<Registration>), AppError> {
    let registration = registrations
        .register_workshop(payload.workshop_id, &payload.username)
        .await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

pub async fn unregister(
    State(registrations): State<Arc<RegistrationLedger>>,
    PathParam(workshop_id): PathParam<i64>,
    QueryParams(query): QueryParams<UnregisterQuery>,
) -> Result<StatusCode, AppError> {
    registrations
        .unregister_workshop(workshop_id, &query.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn workshops(
    State(registrations): State<Arc<RegistrationLedger>>,
    PathParam(username): PathParam<String>,
) -> Result<Json<Vec<Workshop>>, AppError> {
    Ok(Json(registrations.get_registered_workshops(&username).await?))
}
