use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::course;
use crate::entities::sea_orm_active_enums::Department;
use crate::repositories::course_repository::CourseFields;
use crate::services::course_service::CourseChanges;
use crate::utils::pagination::{default_page, default_page_size};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub academic_year: Uuid,

    pub professor: Option<Uuid>,

    #[schema(example = "Compilers")]
    pub title: String,

    #[schema(example = "CS401")]
    pub code: String,

    #[schema(example = 4, minimum = 1, maximum = 4)]
    pub level: i32,

    #[schema(example = 1, minimum = 1, maximum = 2)]
    pub semester: i32,

    #[schema(example = 3, minimum = 0, maximum = 4)]
    pub credit_hours: i32,

    /// Only allowed when `level` is above 2.
    pub department: Option<Department>,
}

impl From<CreateCourseRequest> for CourseFields {
    fn from(req: CreateCourseRequest) -> Self {
        CourseFields {
            academic_year_id: req.academic_year,
            professor_id: req.professor,
            title: req.title,
            code: req.code,
            level: req.level,
            semester: req.semester,
            credit_hours: req.credit_hours,
            department: req.department,
        }
    }
}

/// Absent fields are left unchanged. `professor` and `department` may be set
/// to `null` to clear them.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    pub academic_year: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub professor: Option<Option<Uuid>>,
    pub title: Option<String>,
    pub code: Option<String>,
    pub level: Option<i32>,
    pub semester: Option<i32>,
    pub credit_hours: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Department>)]
    pub department: Option<Option<Department>>,
}

impl From<UpdateCourseRequest> for CourseChanges {
    fn from(req: UpdateCourseRequest) -> Self {
        CourseChanges {
            academic_year_id: req.academic_year,
            professor_id: req.professor,
            title: req.title,
            code: req.code,
            level: req.level,
            semester: req.semester,
            credit_hours: req.credit_hours,
            department: req.department,
        }
    }
}

/// Present-but-null becomes `Some(None)`; absence stays `None` via `default`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub academic_year: Uuid,
    pub professor: Option<Uuid>,
    pub title: String,
    pub code: String,
    pub level: i32,
    pub semester: i32,
    pub credit_hours: i32,
    pub department: Option<Department>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<course::Model> for CourseResponse {
    fn from(course: course::Model) -> Self {
        CourseResponse {
            id: course.id,
            academic_year: course.academic_year_id,
            professor: course.professor_id,
            title: course.title,
            code: course.code,
            level: course.level,
            semester: course.semester,
            credit_hours: course.credit_hours,
            department: course.department,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CourseQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub academic_year: Option<Uuid>,
    pub level: Option<i32>,
    pub semester: Option<i32>,
    pub department: Option<Department>,
    /// Matches title or code.
    pub search: Option<String>,
    /// `created_at`, `title`, `credit_hours` or `department`, prefixed with `-` for descending.
    pub ordering: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_clears_and_absence_keeps() {
        let cleared: UpdateCourseRequest =
            serde_json::from_str(r#"{"department": null, "title": "Compilers"}"#).unwrap();
        assert_eq!(cleared.department, Some(None));
        assert_eq!(cleared.professor, None);

        let set: UpdateCourseRequest = serde_json::from_str(r#"{"department": "AI"}"#).unwrap();
        assert_eq!(set.department, Some(Some(Department::ArtificialIntelligence)));
    }
}
