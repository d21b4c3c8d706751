use crate::api::models::{
    courses::CourseResponse,
    pagination::{PaginatedResponse, Pagination},
    training_programs::{TrainingProgramCreate, TrainingProgramResponse, TrainingProgramUpdate},
    validation::{not_blank, positive_id},
};
use crate::errors::Result;
use crate::types::{CourseId, TrainingProgramId};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

#[utoipa::path(
    get,
    path = "/training-programs",
    tag = "training-programs",
    summary = "List training programs",
    params(Pagination),
    responses(
        (status = 200, description = "Paginated list of training programs", body = PaginatedResponse<TrainingProgramResponse>),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_training_programs(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<TrainingProgramResponse>>> {
    let (skip, limit) = pagination.params();
    let page = state.services.training_programs.find_all(skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/training-programs",
    tag = "training-programs",
    summary = "Create training program",
    request_body = TrainingProgramCreate,
    responses(
        (status = 201, description = "Training program created", body = TrainingProgramResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "A training program with this speciality already exists"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_training_program(
    State(state): State<AppState>,
    Json(request): Json<TrainingProgramCreate>,
) -> Result<(StatusCode, Json<TrainingProgramResponse>)> {
    request.validate()?;
    let program = state.services.training_programs.create(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(program.into())))
}

#[utoipa::path(
    get,
    path = "/training-programs/{id}",
    tag = "training-programs",
    summary = "Get training program",
    params(("id" = i32, Path, description = "Training program ID")),
    responses(
        (status = 200, description = "Training program details", body = TrainingProgramResponse),
        (status = 404, description = "Training program not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_training_program(
    State(state): State<AppState>,
    Path(id): Path<TrainingProgramId>,
) -> Result<Json<TrainingProgramResponse>> {
    positive_id(id)?;
    let program = state.services.training_programs.find_by_id(id).await?;
    Ok(Json(program.into()))
}

#[utoipa::path(
    get,
    path = "/training-programs/speciality/{speciality}",
    tag = "training-programs",
    summary = "Get training program by speciality",
    params(("speciality" = String, Path, description = "Training program speciality")),
    responses(
        (status = 200, description = "Training program details", body = TrainingProgramResponse),
        (status = 404, description = "Training program not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_training_program_by_speciality(
    State(state): State<AppState>,
    Path(speciality): Path<String>,
) -> Result<Json<TrainingProgramResponse>> {
    not_blank(&speciality, "TrainingProgram speciality should not be blank")?;
    let program = state.services.training_programs.find_by_speciality(&speciality).await?;
    Ok(Json(program.into()))
}

#[utoipa::path(
    patch,
    path = "/training-programs/{id}",
    tag = "training-programs",
    summary = "Update training program",
    params(("id" = i32, Path, description = "Training program ID")),
    request_body = TrainingProgramUpdate,
    responses(
        (status = 200, description = "Training program updated", body = TrainingProgramResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Training program not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_training_program(
    State(state): State<AppState>,
    Path(id): Path<TrainingProgramId>,
    Json(request): Json<TrainingProgramUpdate>,
) -> Result<Json<TrainingProgramResponse>> {
    positive_id(id)?;
    request.validate()?;
    let program = state.services.training_programs.update(id, &request.into()).await?;
    Ok(Json(program.into()))
}

#[utoipa::path(
    delete,
    path = "/training-programs/{id}",
    tag = "training-programs",
    summary = "Delete training program",
    params(("id" = i32, Path, description = "Training program ID")),
    responses(
        (status = 204, description = "Training program deleted"),
        (status = 404, description = "Training program not found"),
        (status = 409, description = "Training program still has groups"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_training_program(
    State(state): State<AppState>,
    Path(id): Path<TrainingProgramId>,
) -> Result<StatusCode> {
    positive_id(id)?;
    state.services.training_programs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/training-programs/{id}/courses",
    tag = "training-programs",
    summary = "List courses of a training program",
    params(("id" = i32, Path, description = "Training program ID"), Pagination),
    responses(
        (status = 200, description = "Paginated list of courses", body = PaginatedResponse<CourseResponse>),
        (status = 404, description = "Training program not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_training_program_courses(
    State(state): State<AppState>,
    Path(id): Path<TrainingProgramId>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<CourseResponse>>> {
    positive_id(id)?;
    let (skip, limit) = pagination.params();
    let page = state.services.training_programs.courses(id, skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/training-programs/{id}/courses/{course_id}",
    tag = "training-programs",
    summary = "Add a course to a training program",
    params(
        ("id" = i32, Path, description = "Training program ID"),
        ("course_id" = i32, Path, description = "Course ID"),
    ),
    responses(
        (status = 201, description = "Course added"),
        (status = 404, description = "Training program or course not found"),
        (status = 409, description = "Course already in the training program"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_course_to_training_program(
    State(state): State<AppState>,
    Path((program_id, course_id)): Path<(TrainingProgramId, CourseId)>,
) -> Result<StatusCode> {
    positive_id(program_id)?;
    positive_id(course_id)?;
    state.services.training_programs.add_course(program_id, course_id).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    post,
    path = "/training-programs/{id}/courses/name/{course_name}",
    tag = "training-programs",
    summary = "Add a course to a training program by course name",
    params(
        ("id" = i32, Path, description = "Training program ID"),
        ("course_name" = String, Path, description = "Course name"),
    ),
    responses(
        (status = 201, description = "Course added"),
        (status = 404, description = "Training program or course not found"),
        (status = 409, description = "Course already in the training program"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_course_to_training_program_by_name(
    State(state): State<AppState>,
    Path((program_id, course_name)): Path<(TrainingProgramId, String)>,
) -> Result<StatusCode> {
    positive_id(program_id)?;
    not_blank(&course_name, "Course name should not be blank")?;
    state
        .services
        .training_programs
        .add_course_by_name(program_id, &course_name)
        .await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/training-programs/{id}/courses/{course_id}",
    tag = "training-programs",
    summary = "Remove a course from a training program",
    params(
        ("id" = i32, Path, description = "Training program ID"),
        ("course_id" = i32, Path, description = "Course ID"),
    ),
    responses(
        (status = 204, description = "Course removed"),
        (status = 404, description = "Training program or course not found"),
        (status = 409, description = "Course is not in the training program"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn remove_course_from_training_program(
    State(state): State<AppState>,
    Path((program_id, course_id)): Path<(TrainingProgramId, CourseId)>,
) -> Result<StatusCode> {
    positive_id(program_id)?;
    positive_id(course_id)?;
    state.services.training_programs.remove_course(program_id, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
