use axum::{
    extract::{Json, State, rejection::JsonRejection},
    http::{StatusCode, Uri},
    response::IntoResponse,
};

use app_api::{
    ActivityRequest, AppContext, EmptyRequest, ExportRequest, FactorsReplaceRequest,
    LeaderboardRequest, RangeRequest,
};
use footprint_app::Result as AppResult;

use crate::{errors::HttpError, state::HttpState};

/// Runs a blocking service call off the async runtime.
async fn run_blocking<T, F>(state: &HttpState, call: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&AppContext) -> AppResult<T> + Send + 'static,
{
    let context = state.context.clone();
    let result = tokio::task::spawn_blocking(move || call(&context))
        .await
        .map_err(|err| HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None))?;
    Ok(result?)
}

pub async fn submit(
    State(state): State<HttpState>,
    payload: Result<Json<ActivityRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload?;
    let response = run_blocking(&state, move |ctx| app_api::submit(ctx, req)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn leaderboard(
    State(state): State<HttpState>,
    payload: Result<Json<LeaderboardRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload?;
    let response = run_blocking(&state, move |ctx| app_api::leaderboard(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn chart(
    State(state): State<HttpState>,
    payload: Result<Json<RangeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload?;
    let response = run_blocking(&state, move |ctx| app_api::chart(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn records(
    State(state): State<HttpState>,
    payload: Result<Json<RangeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload?;
    let response = run_blocking(&state, move |ctx| app_api::records(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn factors_get(
    State(state): State<HttpState>,
    payload: Result<Json<EmptyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(_) = payload?;
    let response = run_blocking(&state, app_api::factors_get).await?;
    Ok(Json(response))
}

pub async fn factors_replace(
    State(state): State<HttpState>,
    payload: Result<Json<FactorsReplaceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload?;
    let response = run_blocking(&state, move |ctx| app_api::factors_replace(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn export_csv(
    State(state): State<HttpState>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload?;
    let response = run_blocking(&state, move |ctx| app_api::export_csv(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn settings_get(
    State(state): State<HttpState>,
    payload: Result<Json<EmptyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(_) = payload?;
    let response = run_blocking(&state, app_api::settings_get).await?;
    Ok(Json(response))
}

pub async fn not_found(uri: Uri) -> HttpError {
    HttpError::new(
        StatusCode::NOT_FOUND,
        format!("no route for {}", uri.path()),
        Some("not_found".to_string()),
    )
}
