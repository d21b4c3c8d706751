use crate::api::models::{
    pagination::{PaginatedResponse, Pagination},
    students::{StudentCreate, StudentResponse, StudentUpdate},
    validation::positive_id,
};
use crate::errors::Result;
use crate::types::StudentId;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    summary = "List students",
    params(Pagination),
    responses(
        (status = 200, description = "Paginated list of students", body = PaginatedResponse<StudentResponse>),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_students(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<StudentResponse>>> {
    let (skip, limit) = pagination.params();
    let page = state.services.students.find_all(skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    summary = "Create student",
    request_body = StudentCreate,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Group not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_student(
    State(state): State<AppState>,
    Json(request): Json<StudentCreate>,
) -> Result<(StatusCode, Json<StudentResponse>)> {
    request.validate()?;
    let student = state.services.students.create(&request).await?;
    Ok((StatusCode::CREATED, Json(student.into())))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    summary = "Get student",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = StudentResponse),
        (status = 404, description = "Student not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_student(State(state): State<AppState>, Path(id): Path<StudentId>) -> Result<Json<StudentResponse>> {
    positive_id(id)?;
    let student = state.services.students.find_by_id(id).await?;
    Ok(Json(student.into()))
}

#[utoipa::path(
    patch,
    path = "/students/{id}",
    tag = "students",
    summary = "Update student",
    params(("id" = i32, Path, description = "Student ID")),
    request_body = StudentUpdate,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Student or group not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    Json(request): Json<StudentUpdate>,
) -> Result<Json<StudentResponse>> {
    positive_id(id)?;
    request.validate()?;
    let student = state.services.students.update(id, &request).await?;
    Ok(Json(student.into()))
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    summary = "Delete student",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_student(State(state): State<AppState>, Path(id): Path<StudentId>) -> Result<StatusCode> {
    positive_id(id)?;
    state.services.students.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::models::students::StudentResponse;
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_student_lifecycle(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let program = create_test_training_program(&pool, "trainingProgram_1").await;
        create_test_group(&pool, "group_1", program.id).await;
        let g2 = create_test_group(&pool, "group_2", program.id).await;

        let response = app
            .post("/api/students")
            .json(&json!({ "first_name": "Grace", "last_name": "Hopper", "group_description": "group_1" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let student: StudentResponse = response.json();
        assert_eq!(student.group_description, "group_1");

        let response = app
            .patch(&format!("/api/students/{}", student.id))
            .json(&json!({ "group_description": "group_2" }))
            .await;
        response.assert_status_ok();
        let updated: StudentResponse = response.json();
        assert_eq!(updated.group_id, g2.id);
        assert_eq!(updated.last_name, "Hopper");

        app.delete(&format!("/api/students/{}", student.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        app.delete(&format!("/api/students/{}", student.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_student_in_unknown_group(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app
            .post("/api/students")
            .json(&json!({ "first_name": "Grace", "last_name": "Hopper", "group_description": "nowhere" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_text("Group nowhere not found");

        let response = app
            .post("/api/students")
            .json(&json!({ "first_name": "", "last_name": "Hopper", "group_description": "nowhere" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("FirstName should not be blank");
    }
}
