use crate::api::models::{
    courses::{CourseCreate, CourseResponse, CourseUpdate},
    pagination::{PaginatedResponse, Pagination},
    teachers::TeacherResponse,
    training_programs::TrainingProgramResponse,
    validation::{not_blank, positive_id},
};
use crate::errors::Result;
use crate::types::{CourseId, TeacherId, TrainingProgramId};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

const COURSE_NAME_BLANK: &str = "Course name should not be blank";

#[utoipa::path(
    get,
    path = "/courses",
    tag = "courses",
    summary = "List courses",
    params(Pagination),
    responses(
        (status = 200, description = "Paginated list of courses", body = PaginatedResponse<CourseResponse>),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<CourseResponse>>> {
    let (skip, limit) = pagination.params();
    let page = state.services.courses.find_all(skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/courses",
    tag = "courses",
    summary = "Create course",
    request_body = CourseCreate,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "A course with this name already exists"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_course(
    State(state): State<AppState>,
    Json(request): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>)> {
    request.validate()?;
    let course = state.services.courses.create(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

#[utoipa::path(
    get,
    path = "/courses/{id}",
    tag = "courses",
    summary = "Get course",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course details", body = CourseResponse),
        (status = 400, description = "Id should be positive"),
        (status = 404, description = "Course not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_course(State(state): State<AppState>, Path(id): Path<CourseId>) -> Result<Json<CourseResponse>> {
    positive_id(id)?;
    let course = state.services.courses.find_by_id(id).await?;
    Ok(Json(course.into()))
}

#[utoipa::path(
    get,
    path = "/courses/name/{name}",
    tag = "courses",
    summary = "Get course by name",
    params(("name" = String, Path, description = "Course name")),
    responses(
        (status = 200, description = "Course details", body = CourseResponse),
        (status = 404, description = "Course not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_course_by_name(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<CourseResponse>> {
    not_blank(&name, COURSE_NAME_BLANK)?;
    let course = state.services.courses.find_by_name(&name).await?;
    Ok(Json(course.into()))
}

#[utoipa::path(
    patch,
    path = "/courses/{id}",
    tag = "courses",
    summary = "Update course",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = CourseUpdate,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Course not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    Json(request): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>> {
    positive_id(id)?;
    request.validate()?;
    let course = state.services.courses.update(id, &request.into()).await?;
    Ok(Json(course.into()))
}

#[utoipa::path(
    delete,
    path = "/courses/{id}",
    tag = "courses",
    summary = "Delete course",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_course(State(state): State<AppState>, Path(id): Path<CourseId>) -> Result<StatusCode> {
    positive_id(id)?;
    state.services.courses.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/courses/{id}/teachers",
    tag = "courses",
    summary = "List teachers of a course",
    params(("id" = i32, Path, description = "Course ID"), Pagination),
    responses(
        (status = 200, description = "Paginated list of teachers", body = PaginatedResponse<TeacherResponse>),
        (status = 404, description = "Course not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_course_teachers(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<TeacherResponse>>> {
    positive_id(id)?;
    let (skip, limit) = pagination.params();
    let page = state.services.courses.teachers(id, skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/courses/{id}/teachers/{teacher_id}",
    tag = "courses",
    summary = "Assign a teacher to a course",
    params(
        ("id" = i32, Path, description = "Course ID"),
        ("teacher_id" = i32, Path, description = "Teacher ID"),
    ),
    responses(
        (status = 201, description = "Teacher assigned"),
        (status = 404, description = "Course or teacher not found"),
        (status = 409, description = "Teacher already assigned to the course"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_teacher_to_course(
    State(state): State<AppState>,
    Path((course_id, teacher_id)): Path<(CourseId, TeacherId)>,
) -> Result<StatusCode> {
    positive_id(course_id)?;
    positive_id(teacher_id)?;
    state.services.courses.add_teacher(course_id, teacher_id).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/courses/{id}/teachers/{teacher_id}",
    tag = "courses",
    summary = "Remove a teacher from a course",
    params(
        ("id" = i32, Path, description = "Course ID"),
        ("teacher_id" = i32, Path, description = "Teacher ID"),
    ),
    responses(
        (status = 204, description = "Teacher removed"),
        (status = 404, description = "Course or teacher not found"),
        (status = 409, description = "Teacher is not assigned to the course"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn remove_teacher_from_course(
    State(state): State<AppState>,
    Path((course_id, teacher_id)): Path<(CourseId, TeacherId)>,
) -> Result<StatusCode> {
    positive_id(course_id)?;
    positive_id(teacher_id)?;
    state.services.courses.remove_teacher(course_id, teacher_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/courses/{id}/training-programs",
    tag = "courses",
    summary = "List training programs including a course",
    params(("id" = i32, Path, description = "Course ID"), Pagination),
    responses(
        (status = 200, description = "Paginated list of training programs", body = PaginatedResponse<TrainingProgramResponse>),
        (status = 404, description = "Course not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_course_training_programs(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<TrainingProgramResponse>>> {
    positive_id(id)?;
    let (skip, limit) = pagination.params();
    let page = state.services.courses.training_programs(id, skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/courses/{id}/training-programs/{program_id}",
    tag = "courses",
    summary = "Include a course in a training program",
    params(
        ("id" = i32, Path, description = "Course ID"),
        ("program_id" = i32, Path, description = "Training program ID"),
    ),
    responses(
        (status = 201, description = "Course included"),
        (status = 404, description = "Course or training program not found"),
        (status = 409, description = "Course already included"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_training_program_to_course(
    State(state): State<AppState>,
    Path((course_id, program_id)): Path<(CourseId, TrainingProgramId)>,
) -> Result<StatusCode> {
    positive_id(course_id)?;
    positive_id(program_id)?;
    state.services.courses.add_training_program(course_id, program_id).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    post,
    path = "/courses/{id}/training-programs/speciality/{speciality}",
    tag = "courses",
    summary = "Include a course in the training program with a given speciality",
    params(
        ("id" = i32, Path, description = "Course ID"),
        ("speciality" = String, Path, description = "Training program speciality"),
    ),
    responses(
        (status = 201, description = "Course included"),
        (status = 404, description = "Course or training program not found"),
        (status = 409, description = "Course already included"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_training_program_to_course_by_speciality(
    State(state): State<AppState>,
    Path((course_id, speciality)): Path<(CourseId, String)>,
) -> Result<StatusCode> {
    positive_id(course_id)?;
    not_blank(&speciality, "TrainingProgram speciality should not be blank")?;
    state
        .services
        .courses
        .add_training_program_by_speciality(course_id, &speciality)
        .await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/courses/{id}/training-programs/{program_id}",
    tag = "courses",
    summary = "Remove a course from a training program",
    params(
        ("id" = i32, Path, description = "Course ID"),
        ("program_id" = i32, Path, description = "Training program ID"),
    ),
    responses(
        (status = 204, description = "Course removed"),
        (status = 404, description = "Course or training program not found"),
        (status = 409, description = "Course is not included in the training program"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn remove_training_program_from_course(
    State(state): State<AppState>,
    Path((course_id, program_id)): Path<(CourseId, TrainingProgramId)>,
) -> Result<StatusCode> {
    positive_id(course_id)?;
    positive_id(program_id)?;
    state.services.courses.remove_training_program(course_id, program_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::models::{courses::CourseResponse, pagination::PaginatedResponse, teachers::TeacherResponse};
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_course_crud(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app.post("/api/courses").json(&json!({ "name": "course_1", "hours": 36 })).await;
        response.assert_status(StatusCode::CREATED);
        let created: CourseResponse = response.json();
        assert_eq!(created.name, "course_1");

        let fetched: CourseResponse = app.get(&format!("/api/courses/{}", created.id)).await.json();
        assert_eq!(fetched, created);

        let by_name: CourseResponse = app.get("/api/courses/name/course_1").await.json();
        assert_eq!(by_name, created);

        let response = app
            .patch(&format!("/api/courses/{}", created.id))
            .json(&json!({ "hours": 48 }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<CourseResponse>().hours, 48);

        let page: PaginatedResponse<CourseResponse> = app.get("/api/courses?limit=5").await.json();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.limit, 5);

        app.delete(&format!("/api/courses/{}", created.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        app.get(&format!("/api/courses/{}", created.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_course_validation(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app.post("/api/courses").json(&json!({ "name": "  ", "hours": 36 })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("Course name should not be blank");

        let response = app.get("/api/courses/0").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("Id should be positive");

        create_test_course(&pool, "course_1").await;
        let response = app.post("/api/courses").json(&json!({ "name": "course_1", "hours": 10 })).await;
        response.assert_status(StatusCode::CONFLICT);
        response.assert_json(&json!({
            "message": "A course with this name already exists",
            "resource": "course"
        }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_teacher_assignment(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let course = create_test_course(&pool, "course_1").await;
        let teacher = create_test_teacher(&pool, "teacher_1").await;
        let path = format!("/api/courses/{}/teachers/{}", course.id, teacher.id);

        app.post(&path).await.assert_status(StatusCode::CREATED);
        app.post(&path).await.assert_status(StatusCode::CONFLICT);

        let page: PaginatedResponse<TeacherResponse> =
            app.get(&format!("/api/courses/{}/teachers", course.id)).await.json();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, teacher.id);

        app.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        app.delete(&path).await.assert_status(StatusCode::CONFLICT);

        let response = app.delete(&format!("/api/courses/{}/teachers/99", course.id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_text("Teacher with id 99 not found");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_training_program_by_speciality(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let course = create_test_course(&pool, "course_1").await;
        create_test_training_program(&pool, "trainingProgram_1").await;

        app.post(&format!(
            "/api/courses/{}/training-programs/speciality/trainingProgram_1",
            course.id
        ))
        .await
        .assert_status(StatusCode::CREATED);

        let response = app
            .post(&format!("/api/courses/{}/training-programs/speciality/unknown", course.id))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_text("TrainingProgram unknown not found");
    }
}
