use crate::api::models::{
    groups::{GroupCreate, GroupResponse, GroupUpdate},
    pagination::{PaginatedResponse, Pagination},
    students::StudentResponse,
    validation::{not_blank, positive_id},
};
use crate::errors::Result;
use crate::types::{GroupId, StudentId};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

#[utoipa::path(
    get,
    path = "/groups",
    tag = "groups",
    summary = "List groups",
    params(Pagination),
    responses(
        (status = 200, description = "Paginated list of groups", body = PaginatedResponse<GroupResponse>),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_groups(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<GroupResponse>>> {
    let (skip, limit) = pagination.params();
    let page = state.services.groups.find_all(skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/groups",
    tag = "groups",
    summary = "Create group",
    request_body = GroupCreate,
    responses(
        (status = 201, description = "Group created", body = GroupResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Training program not found"),
        (status = 409, description = "A group with this description already exists"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<GroupCreate>,
) -> Result<(StatusCode, Json<GroupResponse>)> {
    request.validate()?;
    let group = state.services.groups.create(&request).await?;
    Ok((StatusCode::CREATED, Json(group.into())))
}

#[utoipa::path(
    get,
    path = "/groups/{id}",
    tag = "groups",
    summary = "Get group",
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group details", body = GroupResponse),
        (status = 404, description = "Group not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_group(State(state): State<AppState>, Path(id): Path<GroupId>) -> Result<Json<GroupResponse>> {
    positive_id(id)?;
    let group = state.services.groups.find_by_id(id).await?;
    Ok(Json(group.into()))
}

#[utoipa::path(
    get,
    path = "/groups/description/{description}",
    tag = "groups",
    summary = "Get group by description",
    params(("description" = String, Path, description = "Group description")),
    responses(
        (status = 200, description = "Group details", body = GroupResponse),
        (status = 404, description = "Group not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_group_by_description(
    State(state): State<AppState>,
    Path(description): Path<String>,
) -> Result<Json<GroupResponse>> {
    not_blank(&description, "Group description should not be blank")?;
    let group = state.services.groups.find_by_description(&description).await?;
    Ok(Json(group.into()))
}

#[utoipa::path(
    patch,
    path = "/groups/{id}",
    tag = "groups",
    summary = "Update group",
    params(("id" = i32, Path, description = "Group ID")),
    request_body = GroupUpdate,
    responses(
        (status = 200, description = "Group updated", body = GroupResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Group or training program not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<GroupId>,
    Json(request): Json<GroupUpdate>,
) -> Result<Json<GroupResponse>> {
    positive_id(id)?;
    request.validate()?;
    let group = state.services.groups.update(id, &request).await?;
    Ok(Json(group.into()))
}

#[utoipa::path(
    delete,
    path = "/groups/{id}",
    tag = "groups",
    summary = "Delete group",
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 404, description = "Group not found"),
        (status = 409, description = "Group still has students or lessons"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_group(State(state): State<AppState>, Path(id): Path<GroupId>) -> Result<StatusCode> {
    positive_id(id)?;
    state.services.groups.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/groups/{id}/students",
    tag = "groups",
    summary = "List students of a group",
    params(("id" = i32, Path, description = "Group ID"), Pagination),
    responses(
        (status = 200, description = "Paginated list of students", body = PaginatedResponse<StudentResponse>),
        (status = 404, description = "Group not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_group_students(
    State(state): State<AppState>,
    Path(id): Path<GroupId>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<StudentResponse>>> {
    positive_id(id)?;
    let (skip, limit) = pagination.params();
    let page = state.services.groups.students(id, skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/groups/{id}/students/{student_id}",
    tag = "groups",
    summary = "Move a student into a group",
    params(
        ("id" = i32, Path, description = "Group ID"),
        ("student_id" = i32, Path, description = "Student ID"),
    ),
    responses(
        (status = 201, description = "Student moved", body = StudentResponse),
        (status = 404, description = "Group or student not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_student_to_group(
    State(state): State<AppState>,
    Path((group_id, student_id)): Path<(GroupId, StudentId)>,
) -> Result<(StatusCode, Json<StudentResponse>)> {
    positive_id(group_id)?;
    positive_id(student_id)?;
    let student = state.services.groups.add_student(group_id, student_id).await?;
    Ok((StatusCode::CREATED, Json(student.into())))
}
