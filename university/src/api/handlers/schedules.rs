use crate::api::models::{
    pagination::{PaginatedResponse, Pagination},
    schedules::{ScheduleCreate, ScheduleResponse, ScheduleUpdate},
    validation::positive_id,
};
use crate::errors::Result;
use crate::types::ScheduleId;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/schedules",
    tag = "schedules",
    summary = "List lessons",
    params(Pagination),
    responses(
        (status = 200, description = "Paginated list of lessons", body = PaginatedResponse<ScheduleResponse>),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<ScheduleResponse>>> {
    let (skip, limit) = pagination.params();
    let page = state.services.schedules.find_all(skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

/// Search the timetable.
///
/// Recognized keys are `groupDescription`, `teacherId`, `from` and `to` (dates as
/// `YYYY-MM-DD`, both bounds inclusive). Empty values are ignored, as are unknown keys.
#[utoipa::path(
    get,
    path = "/schedules/filter",
    tag = "schedules",
    summary = "Search lessons",
    params(
        ("groupDescription" = Option<String>, Query, description = "Group description"),
        ("teacherId" = Option<i32>, Query, description = "Teacher ID"),
        ("from" = Option<String>, Query, description = "Earliest lesson date (inclusive)"),
        ("to" = Option<String>, Query, description = "Latest lesson date (inclusive)"),
    ),
    responses(
        (status = 200, description = "Matching lessons ordered by id", body = Vec<ScheduleResponse>),
        (status = 400, description = "A filter value could not be parsed"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn search_schedules(
    State(state): State<AppState>,
    Query(filters): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ScheduleResponse>>> {
    let lessons = state.services.schedules.search(&filters).await?;
    Ok(Json(lessons.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/schedules",
    tag = "schedules",
    summary = "Schedule a lesson",
    request_body = ScheduleCreate,
    responses(
        (status = 201, description = "Lesson scheduled", body = ScheduleResponse),
        (status = 400, description = "Invalid request or lesson in the past"),
        (status = 404, description = "Group, course, teacher or lecture hall not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleCreate>,
) -> Result<(StatusCode, Json<ScheduleResponse>)> {
    request.validate(Local::now().naive_local())?;
    let lesson = state.services.schedules.create(&request).await?;
    Ok((StatusCode::CREATED, Json(lesson.into())))
}

#[utoipa::path(
    get,
    path = "/schedules/{id}",
    tag = "schedules",
    summary = "Get lesson",
    params(("id" = i32, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson details", body = ScheduleResponse),
        (status = 404, description = "Lesson not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_schedule(State(state): State<AppState>, Path(id): Path<ScheduleId>) -> Result<Json<ScheduleResponse>> {
    positive_id(id)?;
    let lesson = state.services.schedules.find_by_id(id).await?;
    Ok(Json(lesson.into()))
}

#[utoipa::path(
    patch,
    path = "/schedules/{id}",
    tag = "schedules",
    summary = "Update lesson",
    params(("id" = i32, Path, description = "Lesson ID")),
    request_body = ScheduleUpdate,
    responses(
        (status = 200, description = "Lesson updated", body = ScheduleResponse),
        (status = 400, description = "Invalid request or lesson in the past"),
        (status = 404, description = "Lesson or one of its references not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<ScheduleId>,
    Json(request): Json<ScheduleUpdate>,
) -> Result<Json<ScheduleResponse>> {
    positive_id(id)?;
    request.validate()?;
    let lesson = state
        .services
        .schedules
        .update(id, &request, Local::now().naive_local())
        .await?;
    Ok(Json(lesson.into()))
}

#[utoipa::path(
    delete,
    path = "/schedules/{id}",
    tag = "schedules",
    summary = "Delete lesson",
    params(("id" = i32, Path, description = "Lesson ID")),
    responses(
        (status = 204, description = "Lesson deleted"),
        (status = 404, description = "Lesson not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_schedule(State(state): State<AppState>, Path(id): Path<ScheduleId>) -> Result<StatusCode> {
    positive_id(id)?;
    state.services.schedules.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
