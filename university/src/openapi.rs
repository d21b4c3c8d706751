//! OpenAPI documentation for the `/api` surface.

use crate::api::handlers::{courses, groups, lecture_halls, schedules, students, teachers, training_programs};
use crate::api::models::{
    courses::{CourseCreate, CourseResponse, CourseUpdate},
    groups::{GroupCreate, GroupResponse, GroupUpdate},
    lecture_halls::{LectureHallCreate, LectureHallResponse, LectureHallUpdate},
    pagination::PaginatedResponse,
    schedules::{ScheduleCreate, ScheduleGroupResponse, ScheduleResponse, ScheduleUpdate},
    students::{StudentCreate, StudentResponse, StudentUpdate},
    teachers::{TeacherCreate, TeacherResponse, TeacherUpdate},
    training_programs::{TrainingProgramCreate, TrainingProgramResponse, TrainingProgramUpdate},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/api", description = "University administration API")
    ),
    paths(
        courses::list_courses,
        courses::create_course,
        courses::get_course,
        courses::get_course_by_name,
        courses::update_course,
        courses::delete_course,
        courses::get_course_teachers,
        courses::add_teacher_to_course,
        courses::remove_teacher_from_course,
        courses::get_course_training_programs,
        courses::add_training_program_to_course,
        courses::add_training_program_to_course_by_speciality,
        courses::remove_training_program_from_course,
        teachers::list_teachers,
        teachers::create_teacher,
        teachers::get_teacher,
        teachers::update_teacher,
        teachers::delete_teacher,
        teachers::get_teacher_courses,
        teachers::add_course_to_teacher,
        teachers::add_course_to_teacher_by_name,
        teachers::remove_course_from_teacher,
        training_programs::list_training_programs,
        training_programs::create_training_program,
        training_programs::get_training_program,
        training_programs::get_training_program_by_speciality,
        training_programs::update_training_program,
        training_programs::delete_training_program,
        training_programs::get_training_program_courses,
        training_programs::add_course_to_training_program,
        training_programs::add_course_to_training_program_by_name,
        training_programs::remove_course_from_training_program,
        groups::list_groups,
        groups::create_group,
        groups::get_group,
        groups::get_group_by_description,
        groups::update_group,
        groups::delete_group,
        groups::get_group_students,
        groups::add_student_to_group,
        students::list_students,
        students::create_student,
        students::get_student,
        students::update_student,
        students::delete_student,
        lecture_halls::list_lecture_halls,
        lecture_halls::create_lecture_hall,
        lecture_halls::get_lecture_hall,
        lecture_halls::update_lecture_hall,
        lecture_halls::delete_lecture_hall,
        schedules::list_schedules,
        schedules::search_schedules,
        schedules::create_schedule,
        schedules::get_schedule,
        schedules::update_schedule,
        schedules::delete_schedule,
    ),
    components(
        schemas(
            CourseCreate, CourseUpdate, CourseResponse,
            TeacherCreate, TeacherUpdate, TeacherResponse,
            TrainingProgramCreate, TrainingProgramUpdate, TrainingProgramResponse,
            GroupCreate, GroupUpdate, GroupResponse,
            StudentCreate, StudentUpdate, StudentResponse,
            LectureHallCreate, LectureHallUpdate, LectureHallResponse,
            ScheduleCreate, ScheduleUpdate, ScheduleGroupResponse, ScheduleResponse,
            PaginatedResponse<CourseResponse>,
            PaginatedResponse<TeacherResponse>,
            PaginatedResponse<TrainingProgramResponse>,
            PaginatedResponse<GroupResponse>,
            PaginatedResponse<StudentResponse>,
            PaginatedResponse<LectureHallResponse>,
            PaginatedResponse<ScheduleResponse>,
        )
    ),
    tags(
        (name = "courses", description = "Courses and their teacher and training program associations"),
        (name = "teachers", description = "Teachers and the courses they teach"),
        (name = "training-programs", description = "Training programs and the courses they include"),
        (name = "groups", description = "Student groups"),
        (name = "students", description = "Students"),
        (name = "lecture-halls", description = "Lecture halls, addressed by housing, floor and number"),
        (name = "schedules", description = "The timetable. `GET /schedules/filter` searches it by group, teacher and date range."),
    ),
    info(
        title = "University API",
        version = "1.0.0",
        description = "Administration of a university's courses, teachers, training programs, groups, students, lecture halls and timetable.

## Errors

Failures are returned as plain text with a matching status code:

- `400` for malformed input, e.g. `Id should be positive` or a lesson dated in the past
- `404` when a referenced entity does not exist, e.g. `Teacher with id 99 not found`
- `409` when an association already exists or does not exist, or when a natural key is taken"
    )
)]
pub struct ApiDoc;
