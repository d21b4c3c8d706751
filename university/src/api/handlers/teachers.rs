use crate::api::models::{
    courses::CourseResponse,
    pagination::{PaginatedResponse, Pagination},
    teachers::{TeacherCreate, TeacherResponse, TeacherUpdate},
    validation::{not_blank, positive_id},
};
use crate::errors::Result;
use crate::types::{CourseId, TeacherId};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

#[utoipa::path(
    get,
    path = "/teachers",
    tag = "teachers",
    summary = "List teachers",
    params(Pagination),
    responses(
        (status = 200, description = "Paginated list of teachers", body = PaginatedResponse<TeacherResponse>),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_teachers(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<TeacherResponse>>> {
    let (skip, limit) = pagination.params();
    let page = state.services.teachers.find_all(skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/teachers",
    tag = "teachers",
    summary = "Create teacher",
    request_body = TeacherCreate,
    responses(
        (status = 201, description = "Teacher created", body = TeacherResponse),
        (status = 400, description = "Invalid request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_teacher(
    State(state): State<AppState>,
    Json(request): Json<TeacherCreate>,
) -> Result<(StatusCode, Json<TeacherResponse>)> {
    request.validate()?;
    let teacher = state.services.teachers.create(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(teacher.into())))
}

#[utoipa::path(
    get,
    path = "/teachers/{id}",
    tag = "teachers",
    summary = "Get teacher",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher details", body = TeacherResponse),
        (status = 400, description = "Id should be positive"),
        (status = 404, description = "Teacher not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_teacher(State(state): State<AppState>, Path(id): Path<TeacherId>) -> Result<Json<TeacherResponse>> {
    positive_id(id)?;
    let teacher = state.services.teachers.find_by_id(id).await?;
    Ok(Json(teacher.into()))
}

#[utoipa::path(
    patch,
    path = "/teachers/{id}",
    tag = "teachers",
    summary = "Update teacher",
    params(("id" = i32, Path, description = "Teacher ID")),
    request_body = TeacherUpdate,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Teacher not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<TeacherId>,
    Json(request): Json<TeacherUpdate>,
) -> Result<Json<TeacherResponse>> {
    positive_id(id)?;
    request.validate()?;
    let teacher = state.services.teachers.update(id, &request.into()).await?;
    Ok(Json(teacher.into()))
}

#[utoipa::path(
    delete,
    path = "/teachers/{id}",
    tag = "teachers",
    summary = "Delete teacher",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 404, description = "Teacher not found"),
        (status = 409, description = "Teacher still has scheduled lessons"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_teacher(State(state): State<AppState>, Path(id): Path<TeacherId>) -> Result<StatusCode> {
    positive_id(id)?;
    state.services.teachers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/teachers/{id}/courses",
    tag = "teachers",
    summary = "List courses taught by a teacher",
    params(("id" = i32, Path, description = "Teacher ID"), Pagination),
    responses(
        (status = 200, description = "Paginated list of courses", body = PaginatedResponse<CourseResponse>),
        (status = 404, description = "Teacher not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_teacher_courses(
    State(state): State<AppState>,
    Path(id): Path<TeacherId>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<CourseResponse>>> {
    positive_id(id)?;
    let (skip, limit) = pagination.params();
    let page = state.services.teachers.courses(id, skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/teachers/{id}/courses/{course_id}",
    tag = "teachers",
    summary = "Assign a course to a teacher",
    params(
        ("id" = i32, Path, description = "Teacher ID"),
        ("course_id" = i32, Path, description = "Course ID"),
    ),
    responses(
        (status = 201, description = "Course assigned"),
        (status = 404, description = "Teacher or course not found"),
        (status = 409, description = "Course already assigned to the teacher"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_course_to_teacher(
    State(state): State<AppState>,
    Path((teacher_id, course_id)): Path<(TeacherId, CourseId)>,
) -> Result<StatusCode> {
    positive_id(teacher_id)?;
    positive_id(course_id)?;
    state.services.teachers.add_course(teacher_id, course_id).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    post,
    path = "/teachers/{id}/courses/name/{course_name}",
    tag = "teachers",
    summary = "Assign a course to a teacher by course name",
    params(
        ("id" = i32, Path, description = "Teacher ID"),
        ("course_name" = String, Path, description = "Course name"),
    ),
    responses(
        (status = 201, description = "Course assigned"),
        (status = 404, description = "Teacher or course not found"),
        (status = 409, description = "Course already assigned to the teacher"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_course_to_teacher_by_name(
    State(state): State<AppState>,
    Path((teacher_id, course_name)): Path<(TeacherId, String)>,
) -> Result<StatusCode> {
    positive_id(teacher_id)?;
    not_blank(&course_name, "Course name should not be blank")?;
    state.services.teachers.add_course_by_name(teacher_id, &course_name).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/teachers/{id}/courses/{course_id}",
    tag = "teachers",
    summary = "Remove a course from a teacher",
    params(
        ("id" = i32, Path, description = "Teacher ID"),
        ("course_id" = i32, Path, description = "Course ID"),
    ),
    responses(
        (status = 204, description = "Course removed"),
        (status = 404, description = "Teacher or course not found"),
        (status = 409, description = "Course is not assigned to the teacher"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn remove_course_from_teacher(
    State(state): State<AppState>,
    Path((teacher_id, course_id)): Path<(TeacherId, CourseId)>,
) -> Result<StatusCode> {
    positive_id(teacher_id)?;
    positive_id(course_id)?;
    state.services.teachers.remove_course(teacher_id, course_id).await?;
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
    async fn test_create_and_list_teachers(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app
            .post("/api/teachers")
            .json(&json!({ "first_name": "Ada", "last_name": "Lovelace" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let teacher: TeacherResponse = response.json();
        assert_eq!(teacher.last_name, "Lovelace");

        let page: PaginatedResponse<TeacherResponse> = app.get("/api/teachers").await.json();
        assert_eq!(page.data, vec![teacher]);

        let response = app
            .post("/api/teachers")
            .json(&json!({ "first_name": "Ada", "last_name": "" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("LastName should not be blank");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_assign_course_by_name(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let teacher = create_test_teacher(&pool, "teacher_1").await;
        create_test_course(&pool, "course_1").await;

        app.post(&format!("/api/teachers/{}/courses/name/course_1", teacher.id))
            .await
            .assert_status(StatusCode::CREATED);
        app.post(&format!("/api/teachers/{}/courses/name/course_1", teacher.id))
            .await
            .assert_status(StatusCode::CONFLICT);

        let page: PaginatedResponse<CourseResponse> =
            app.get(&format!("/api/teachers/{}/courses", teacher.id)).await.json();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.data[0].name, "course_1");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_remove_unassigned_course(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let teacher = create_test_teacher(&pool, "teacher_1").await;
        let course = create_test_course(&pool, "course_1").await;

        let response = app
            .delete(&format!("/api/teachers/{}/courses/{}", teacher.id, course.id))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        response.assert_text(format!(
            "Teacher {} is not associated with Course {}",
            teacher.id, course.id
        ));

        app.get("/api/teachers/77").await.assert_status(StatusCode::NOT_FOUND);
    }
}
