//! # university: administration service for a university
//!
//! `university` keeps the records of a university (courses, teachers, training
//! programs, student groups, students and lecture halls) and the timetable of lessons
//! that ties them together. Everything is exposed as a JSON REST API under `/api`.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer
//! and uses PostgreSQL, through SQLx, for persistence.
//!
//! ### Request Flow
//!
//! A request to `/api/*` reaches a handler in [`api::handlers`], which checks the shape
//! of its input and calls one of the per-entity [`services`]. A service opens a
//! transaction, runs the repositories of [`db::handlers`] inside it and commits. Errors
//! from any layer converge on [`errors::Error`], which maps them to a status code and a
//! plain-text message.
//!
//! ### Associations
//!
//! Courses are linked to teachers and to training programs through two join tables.
//! Adding or removing a link always checks the left endpoint, then the right, then
//! performs a single conditional write; whether that write touched a row decides between
//! success and `409 Conflict`.
//!
//! ### Timetable search
//!
//! `GET /api/schedules/filter` accepts any of `groupDescription`, `teacherId`, `from` and
//! `to`. Each present value adds one bound predicate to a single query, so an empty
//! filter returns the whole timetable.
//!
//! ## Configuration
//!
//! See [`config`] for the YAML file and environment variables.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod services;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::handlers::{courses, groups, lecture_halls, schedules, students, teachers, training_programs},
    config::CorsOrigin,
    openapi::ApiDoc,
    services::Services,
};
use axum::{
    http::{self, HeaderValue},
    routing::{get, post},
    Router,
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, PgPool,
};
use std::{str::FromStr, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, instrument, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool.clone())
///     .config(config)
///     .services(Services::new(pool))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub services: Services,
}

/// Get the university database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to PostgreSQL with the configured pool settings and bring the schema up to date.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let settings = &config.database.pool;
    let connect_options = PgConnectOptions::from_str(&config.database.url)?.log_slow_statements(
        log::LevelFilter::Warn,
        Duration::from_millis(config.slow_statement_threshold_ms),
    );

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout())
        .idle_timeout(settings.idle_timeout())
        .max_lifetime(settings.max_lifetime())
        .connect_with(connect_options)
        .await?;

    migrator().run(&pool).await?;

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().trim_end_matches('/').parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PATCH,
            http::Method::DELETE,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_credentials(config.cors.allow_credentials)
        .expose_headers(vec![http::header::LOCATION]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Routes of the `/api` surface, relative to that prefix.
fn api_routes() -> Router<AppState> {
    Router::new()
        // Courses
        .route("/courses", get(courses::list_courses).post(courses::create_course))
        .route(
            "/courses/{id}",
            get(courses::get_course)
                .patch(courses::update_course)
                .delete(courses::delete_course),
        )
        .route("/courses/name/{name}", get(courses::get_course_by_name))
        .route("/courses/{id}/teachers", get(courses::get_course_teachers))
        .route(
            "/courses/{id}/teachers/{teacher_id}",
            post(courses::add_teacher_to_course).delete(courses::remove_teacher_from_course),
        )
        .route("/courses/{id}/training-programs", get(courses::get_course_training_programs))
        .route(
            "/courses/{id}/training-programs/{program_id}",
            post(courses::add_training_program_to_course).delete(courses::remove_training_program_from_course),
        )
        .route(
            "/courses/{id}/training-programs/speciality/{speciality}",
            post(courses::add_training_program_to_course_by_speciality),
        )
        // Teachers
        .route("/teachers", get(teachers::list_teachers).post(teachers::create_teacher))
        .route(
            "/teachers/{id}",
            get(teachers::get_teacher)
                .patch(teachers::update_teacher)
                .delete(teachers::delete_teacher),
        )
        .route("/teachers/{id}/courses", get(teachers::get_teacher_courses))
        .route(
            "/teachers/{id}/courses/{course_id}",
            post(teachers::add_course_to_teacher).delete(teachers::remove_course_from_teacher),
        )
        .route(
            "/teachers/{id}/courses/name/{course_name}",
            post(teachers::add_course_to_teacher_by_name),
        )
        // Training programs
        .route(
            "/training-programs",
            get(training_programs::list_training_programs).post(training_programs::create_training_program),
        )
        .route(
            "/training-programs/{id}",
            get(training_programs::get_training_program)
                .patch(training_programs::update_training_program)
                .delete(training_programs::delete_training_program),
        )
        .route(
            "/training-programs/speciality/{speciality}",
            get(training_programs::get_training_program_by_speciality),
        )
        .route(
            "/training-programs/{id}/courses",
            get(training_programs::get_training_program_courses),
        )
        .route(
            "/training-programs/{id}/courses/{course_id}",
            post(training_programs::add_course_to_training_program)
                .delete(training_programs::remove_course_from_training_program),
        )
        .route(
            "/training-programs/{id}/courses/name/{course_name}",
            post(training_programs::add_course_to_training_program_by_name),
        )
        // Groups
        .route("/groups", get(groups::list_groups).post(groups::create_group))
        .route(
            "/groups/{id}",
            get(groups::get_group).patch(groups::update_group).delete(groups::delete_group),
        )
        .route("/groups/description/{description}", get(groups::get_group_by_description))
        .route("/groups/{id}/students", get(groups::get_group_students))
        .route("/groups/{id}/students/{student_id}", post(groups::add_student_to_group))
        // Students
        .route("/students", get(students::list_students).post(students::create_student))
        .route(
            "/students/{id}",
            get(students::get_student)
                .patch(students::update_student)
                .delete(students::delete_student),
        )
        // Lecture halls
        .route(
            "/lecture-halls",
            get(lecture_halls::list_lecture_halls).post(lecture_halls::create_lecture_hall),
        )
        .route(
            "/lecture-halls/{id}",
            get(lecture_halls::get_lecture_hall)
                .patch(lecture_halls::update_lecture_hall)
                .delete(lecture_halls::delete_lecture_hall),
        )
        // Schedules
        .route("/schedules", get(schedules::list_schedules).post(schedules::create_schedule))
        .route("/schedules/filter", get(schedules::search_schedules))
        .route(
            "/schedules/{id}",
            get(schedules::get_schedule)
                .patch(schedules::update_schedule)
                .delete(schedules::delete_schedule),
        )
}

/// Build the main application router with all endpoints and middleware.
///
/// - `/api/*` resource routes
/// - `/healthz`
/// - `/docs` (Scalar UI over the OpenAPI document)
/// - `/internal/metrics` when Prometheus metrics are enabled
/// - CORS and tracing layers
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api", api_routes().with_state(state.clone()))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;
    let mut router = router.layer(cors_layer);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns the router, the pool and the configuration.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database and runs migrations
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests finish, then the
///    pool is closed and telemetry flushed
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application on an existing pool, or connect one from the configuration.
    /// Migrations run in both cases.
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting university service with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => {
                migrator().run(&pool).await?;
                pool
            }
            None => setup_database(&config).await?,
        };

        let app_state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .services(Services::new(pool.clone()))
            .build();

        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "University service listening on http://{}, docs at http://localhost:{}/docs",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
