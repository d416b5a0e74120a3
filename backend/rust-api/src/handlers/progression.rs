use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::Error,
    models::{
        answer::SubmitAnswerRequest, AdvanceRequest, GeofenceQuery, GeofenceResponse, LatLong,
        QuestCompletionResponse, StartQuestRequest,
    },
    services::AppState,
};

pub async fn start_quest(
    State(state): State<Arc<AppState>>,
    Path(customer_quest_id): Path<String>,
    Json(req): Json<StartQuestRequest>,
) -> Result<impl IntoResponse, Error> {
    req.validate().map_err(|e| Error::BadRequest(e.to_string()))?;
    tracing::info!(
        "Starting quest {} for customer quest {}",
        req.quest_id,
        customer_quest_id
    );

    let task = state
        .progression
        .start_quest(&customer_quest_id, &req.quest_id)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(customer_quest_id): Path<String>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, Error> {
    req.validate().map_err(|e| Error::BadRequest(e.to_string()))?;
    tracing::info!(
        "Answer submitted for customer quest {} at item {}",
        customer_quest_id,
        req.quest_item_id
    );

    let response = state
        .progression
        .submit_answer(&customer_quest_id, &req.quest_item_id, &req.reply)
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

pub async fn request_suggestion(
    State(state): State<Arc<AppState>>,
    Path(customer_quest_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    tracing::info!("Suggestion requested for customer quest {}", customer_quest_id);

    let response = state
        .progression
        .request_suggestion(&customer_quest_id)
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

pub async fn advance_to_next(
    State(state): State<Arc<AppState>>,
    Path(customer_quest_id): Path<String>,
    Json(req): Json<AdvanceRequest>,
) -> Result<impl IntoResponse, Error> {
    req.validate().map_err(|e| Error::BadRequest(e.to_string()))?;
    tracing::info!(
        "Advancing customer quest {} within quest {}",
        customer_quest_id,
        req.quest_id
    );

    let task = state
        .progression
        .advance_to_next(&req.quest_id, &customer_quest_id)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn quest_completion(
    State(state): State<Arc<AppState>>,
    Path(customer_quest_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let complete = state
        .progression
        .is_quest_complete(&customer_quest_id)
        .await?;
    Ok((StatusCode::OK, Json(QuestCompletionResponse { complete })))
}

/// Geofence against the item the customer is currently working on.
pub async fn check_customer_geofence(
    State(state): State<Arc<AppState>>,
    Path(customer_quest_id): Path<String>,
    Query(query): Query<GeofenceQuery>,
) -> Result<impl IntoResponse, Error> {
    query
        .validate()
        .map_err(|e| Error::BadRequest(e.to_string()))?;

    let within_range = state
        .geofence
        .is_customer_at_current_item(
            &customer_quest_id,
            LatLong::new(query.latitude, query.longitude),
        )
        .await?;
    Ok((StatusCode::OK, Json(GeofenceResponse { within_range })))
}

/// Geofence against the quest's head item, gating quest entry.
pub async fn check_quest_geofence(
    State(state): State<Arc<AppState>>,
    Path(quest_id): Path<String>,
    Query(query): Query<GeofenceQuery>,
) -> Result<impl IntoResponse, Error> {
    query
        .validate()
        .map_err(|e| Error::BadRequest(e.to_string()))?;

    let within_range = state
        .geofence
        .is_customer_at_quest_start(&quest_id, LatLong::new(query.latitude, query.longitude))
        .await?;
    Ok((StatusCode::OK, Json(GeofenceResponse { within_range })))
}
