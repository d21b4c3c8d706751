use crate::api::models::{
    lecture_halls::{LectureHallCreate, LectureHallResponse, LectureHallUpdate},
    pagination::{PaginatedResponse, Pagination},
    validation::positive_id,
};
use crate::errors::Result;
use crate::types::LectureHallId;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

#[utoipa::path(
    get,
    path = "/lecture-halls",
    tag = "lecture-halls",
    summary = "List lecture halls",
    params(Pagination),
    responses(
        (status = 200, description = "Paginated list of lecture halls", body = PaginatedResponse<LectureHallResponse>),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_lecture_halls(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<LectureHallResponse>>> {
    let (skip, limit) = pagination.params();
    let page = state.services.lecture_halls.find_all(skip, limit).await?;
    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/lecture-halls",
    tag = "lecture-halls",
    summary = "Create lecture hall",
    request_body = LectureHallCreate,
    responses(
        (status = 201, description = "Lecture hall created", body = LectureHallResponse),
        (status = 400, description = "Invalid request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_lecture_hall(
    State(state): State<AppState>,
    Json(request): Json<LectureHallCreate>,
) -> Result<(StatusCode, Json<LectureHallResponse>)> {
    request.validate()?;
    let hall = state.services.lecture_halls.create(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(hall.into())))
}

#[utoipa::path(
    get,
    path = "/lecture-halls/{id}",
    tag = "lecture-halls",
    summary = "Get lecture hall",
    params(("id" = i32, Path, description = "Lecture hall ID")),
    responses(
        (status = 200, description = "Lecture hall details", body = LectureHallResponse),
        (status = 404, description = "Lecture hall not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_lecture_hall(
    State(state): State<AppState>,
    Path(id): Path<LectureHallId>,
) -> Result<Json<LectureHallResponse>> {
    positive_id(id)?;
    let hall = state.services.lecture_halls.find_by_id(id).await?;
    Ok(Json(hall.into()))
}

#[utoipa::path(
    patch,
    path = "/lecture-halls/{id}",
    tag = "lecture-halls",
    summary = "Update lecture hall",
    params(("id" = i32, Path, description = "Lecture hall ID")),
    request_body = LectureHallUpdate,
    responses(
        (status = 200, description = "Lecture hall updated", body = LectureHallResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Lecture hall not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_lecture_hall(
    State(state): State<AppState>,
    Path(id): Path<LectureHallId>,
    Json(request): Json<LectureHallUpdate>,
) -> Result<Json<LectureHallResponse>> {
    positive_id(id)?;
    request.validate()?;
    let hall = state.services.lecture_halls.update(id, &request.into()).await?;
    Ok(Json(hall.into()))
}

#[utoipa::path(
    delete,
    path = "/lecture-halls/{id}",
    tag = "lecture-halls",
    summary = "Delete lecture hall",
    params(("id" = i32, Path, description = "Lecture hall ID")),
    responses(
        (status = 204, description = "Lecture hall deleted"),
        (status = 404, description = "Lecture hall not found"),
        (status = 409, description = "Lecture hall still has scheduled lessons"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_lecture_hall(State(state): State<AppState>, Path(id): Path<LectureHallId>) -> Result<StatusCode> {
    positive_id(id)?;
    state.services.lecture_halls.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::models::{lecture_halls::LectureHallResponse, pagination::PaginatedResponse};
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_lecture_hall_lifecycle(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app
            .post("/api/lecture-halls")
            .json(&json!({ "housing": 2, "floor": 3, "number": 301 }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let hall: LectureHallResponse = response.json();

        let response = app
            .patch(&format!("/api/lecture-halls/{}", hall.id))
            .json(&json!({ "number": 302 }))
            .await;
        response.assert_status_ok();
        let updated: LectureHallResponse = response.json();
        assert_eq!((updated.housing, updated.floor, updated.number), (2, 3, 302));

        let page: PaginatedResponse<LectureHallResponse> = app.get("/api/lecture-halls").await.json();
        assert_eq!(page.data, vec![updated]);

        app.delete(&format!("/api/lecture-halls/{}", hall.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_lecture_hall_validation(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app
            .post("/api/lecture-halls")
            .json(&json!({ "housing": 1, "floor": 0, "number": 1 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("Floor should be positive");

        let hall = create_test_lecture_hall(&pool, 1, 1, 1).await;
        let response = app
            .patch(&format!("/api/lecture-halls/{}", hall.id))
            .json(&json!({ "housing": -1 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("Housing should be positive");
    }
}
