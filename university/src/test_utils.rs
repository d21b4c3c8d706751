//! Test fixtures: an application wired to the per-test database, and helpers that
//! insert rows directly through the repositories.

use crate::db::{
    handlers::{Courses, Groups, LectureHalls, Repository, Schedules, Students, Teachers, TrainingPrograms},
    models::{
        courses::{CourseCreateDBRequest, CourseDBResponse},
        groups::{GroupCreateDBRequest, GroupDBResponse},
        lecture_halls::{LectureHallCreateDBRequest, LectureHallDBResponse},
        schedules::{ScheduleCreateDBRequest, ScheduleDBResponse},
        students::{StudentCreateDBRequest, StudentDBResponse},
        teachers::{TeacherCreateDBRequest, TeacherDBResponse},
        training_programs::{TrainingProgramCreateDBRequest, TrainingProgramDBResponse},
    },
};
use crate::types::{GroupId, TrainingProgramId};
use axum_test::TestServer;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

pub async fn create_test_app(pool: PgPool) -> TestServer {
    let config = create_test_config();

    let app = crate::Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> crate::config::Config {
    crate::config::Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: None,
        database: crate::config::DatabaseConfig {
            // The pool is handed in by sqlx::test, so the url is never dialled
            url: "postgres://localhost/unused".to_string(),
            pool: crate::config::PoolSettings {
                max_connections: 1,
                min_connections: 0,
                ..Default::default()
            },
        },
        // Recorder is process-global; only the metrics test turns it on
        enable_metrics: false,
        ..Default::default()
    }
}

pub async fn create_test_course(pool: &PgPool, name: &str) -> CourseDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Courses::new(&mut conn)
        .create(&CourseCreateDBRequest {
            name: name.to_string(),
            hours: 36,
        })
        .await
        .expect("Failed to create test course")
}

pub async fn create_test_teacher(pool: &PgPool, first_name: &str) -> TeacherDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Teachers::new(&mut conn)
        .create(&TeacherCreateDBRequest {
            first_name: first_name.to_string(),
            last_name: format!("{first_name}_lastName"),
        })
        .await
        .expect("Failed to create test teacher")
}

pub async fn create_test_training_program(pool: &PgPool, speciality: &str) -> TrainingProgramDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    TrainingPrograms::new(&mut conn)
        .create(&TrainingProgramCreateDBRequest {
            speciality: speciality.to_string(),
        })
        .await
        .expect("Failed to create test training program")
}

pub async fn create_test_group(pool: &PgPool, description: &str, training_program_id: TrainingProgramId) -> GroupDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Groups::new(&mut conn)
        .create(&GroupCreateDBRequest {
            description: description.to_string(),
            training_program_id,
        })
        .await
        .expect("Failed to create test group")
}

pub async fn create_test_student(pool: &PgPool, first_name: &str, group_id: GroupId) -> StudentDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Students::new(&mut conn)
        .create(&StudentCreateDBRequest {
            first_name: first_name.to_string(),
            last_name: format!("{first_name}_lastName"),
            group_id,
        })
        .await
        .expect("Failed to create test student")
}

pub async fn create_test_lecture_hall(pool: &PgPool, housing: i32, floor: i32, number: i32) -> LectureHallDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    LectureHalls::new(&mut conn)
        .create(&LectureHallCreateDBRequest { housing, floor, number })
        .await
        .expect("Failed to create test lecture hall")
}

/// Everything inserted by [`seed_timetable`], in insertion order.
pub struct Timetable {
    pub courses: Vec<CourseDBResponse>,
    pub teachers: Vec<TeacherDBResponse>,
    pub training_programs: Vec<TrainingProgramDBResponse>,
    pub groups: Vec<GroupDBResponse>,
    pub lecture_halls: Vec<LectureHallDBResponse>,
    pub schedules: Vec<ScheduleDBResponse>,
}

/// Three of everything, suffixed `_1` to `_3`. Lesson `i` is held on day `i` of month `i`
/// of 2020 at `i:i`, and links hall, group, teacher and course number `i`.
pub async fn seed_timetable(pool: &PgPool) -> Timetable {
    let mut timetable = Timetable {
        courses: Vec::new(),
        teachers: Vec::new(),
        training_programs: Vec::new(),
        groups: Vec::new(),
        lecture_halls: Vec::new(),
        schedules: Vec::new(),
    };

    for i in 1..=3u32 {
        let n = i as i32;
        let course = create_test_course(pool, &format!("course_{i}")).await;
        let teacher = create_test_teacher(pool, &format!("teacher_{i}")).await;
        let program = create_test_training_program(pool, &format!("trainingProgram_{i}")).await;
        let group = create_test_group(pool, &format!("group_{i}"), program.id).await;
        let hall = create_test_lecture_hall(pool, n, n, n).await;

        let request = ScheduleCreateDBRequest::builder()
            .lesson_date(NaiveDate::from_ymd_opt(2020, i, i).expect("valid date"))
            .lesson_time(NaiveTime::from_hms_opt(i, i, 0).expect("valid time"))
            .lecture_hall_id(hall.id)
            .group_id(group.id)
            .teacher_id(teacher.id)
            .course_id(course.id)
            .build();
        let mut conn = pool.acquire().await.expect("Failed to acquire connection");
        let lesson = Schedules::new(&mut conn)
            .create(&request)
            .await
            .expect("Failed to create test lesson");

        timetable.courses.push(course);
        timetable.teachers.push(teacher);
        timetable.training_programs.push(program);
        timetable.groups.push(group);
        timetable.lecture_halls.push(hall);
        timetable.schedules.push(lesson);
    }

    timetable
}
