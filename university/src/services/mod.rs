//! Application services: the boundary-facing sequencing of store lookups, association
//! mutations and searches.
//!
//! Every public operation runs inside one transaction opened with `pool.begin()`. The
//! transaction is committed only once the whole sequence has succeeded; an early return
//! through `?` drops it, which rolls everything back. Absence is reported as
//! [`crate::db::errors::DbError::NotFound`] naming the kind and the key that was looked up.

pub mod courses;
pub mod groups;
pub mod lecture_halls;
pub mod schedules;
pub mod students;
pub mod teachers;
pub mod training_programs;

pub use courses::CourseService;
pub use groups::GroupService;
pub use lecture_halls::LectureHallService;
pub use schedules::ScheduleService;
pub use students::StudentService;
pub use teachers::TeacherService;
pub use training_programs::TrainingProgramService;

use sqlx::PgPool;

/// One page of a paged listing, with the total number of rows across all pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub skip: i64,
    pub limit: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: i64, skip: i64, limit: i64) -> Self {
        Self {
            items,
            total_count,
            skip,
            limit,
        }
    }
}

/// All services over one shared connection pool
#[derive(Clone)]
pub struct Services {
    pub courses: CourseService,
    pub teachers: TeacherService,
    pub training_programs: TrainingProgramService,
    pub groups: GroupService,
    pub students: StudentService,
    pub lecture_halls: LectureHallService,
    pub schedules: ScheduleService,
}

impl Services {
    pub fn new(db: PgPool) -> Self {
        Self {
            courses: CourseService::new(db.clone()),
            teachers: TeacherService::new(db.clone()),
            training_programs: TrainingProgramService::new(db.clone()),
            groups: GroupService::new(db.clone()),
            students: StudentService::new(db.clone()),
            lecture_halls: LectureHallService::new(db.clone()),
            schedules: ScheduleService::new(db),
        }
    }
}
