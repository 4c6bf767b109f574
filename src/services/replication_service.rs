use chrono::{Datelike, NaiveDate};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::academic_year;
use crate::entities::sea_orm_active_enums::AcademicYearStatus;
use crate::repositories::course_repository::CourseFields;
use crate::repositories::{
    AcademicYearRepository, AttachmentRepository, CourseFileRepository, CourseRepository,
    ElementRepository, PointerRepository, StandardRepository,
};
use crate::services::access::{Identity, require_admin};
use crate::services::error::{ServiceError, map_db_error};
use crate::services::validation::{MAX_COURSE_CODE_LEN, validate_year_dates};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CopiedCounts {
    pub standards: u64,
    pub pointers: u64,
    pub elements: u64,
    pub attachments: u64,
    pub courses: u64,
    pub course_files: u64,
}

#[derive(Debug, Clone)]
pub struct NewYear {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: AcademicYearStatus,
}

#[derive(Debug, Clone)]
pub struct ReplicationOutcome {
    pub academic_year: academic_year::Model,
    pub source: academic_year::Model,
    pub copied: CopiedCounts,
}

pub struct ReplicationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReplicationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a year holding the shape of the latest existing year. When
    /// there is nothing to copy from, the new year is still kept and the call
    /// fails with `NotFound`. Otherwise the year and its copied structure
    /// commit together.
    pub async fn create_new_year(
        &self,
        identity: &Identity,
        input: NewYear,
    ) -> Result<ReplicationOutcome, ServiceError> {
        require_admin(identity)?;
        validate_year_dates(input.start_date, input.end_date)?;

        let source = AcademicYearRepository::new(self.db)
            .find_latest()
            .await
            .map_err(map_db_error)?;

        let Some(source) = source else {
            let new_year = AcademicYearRepository::new(self.db)
                .create(input.status, input.start_date, input.end_date)
                .await
                .map_err(map_db_error)?;
            tracing::warn!(academic_year_id = %new_year.id, "No source year to copy structure from");
            return Err(ServiceError::not_found(
                "No existing academic year found to copy from.",
            ));
        };

        check_replicated_codes(self.db, &source, input.start_date).await?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let new_year = AcademicYearRepository::new(&txn)
            .create(input.status, input.start_date, input.end_date)
            .await
            .map_err(map_db_error)?;
        let mut copied = copy_standards(&txn, &source, &new_year).await.map_err(map_db_error)?;
        let courses = copy_courses(&txn, &source, &new_year).await.map_err(map_db_error)?;
        copied.courses = courses.courses;
        copied.course_files = courses.course_files;
        txn.commit().await.map_err(map_db_error)?;

        tracing::info!(
            source_year_id = %source.id,
            academic_year_id = %new_year.id,
            standards = copied.standards,
            pointers = copied.pointers,
            elements = copied.elements,
            attachments = copied.attachments,
            courses = copied.courses,
            course_files = copied.course_files,
            "Academic year structure replicated"
        );

        Ok(ReplicationOutcome {
            academic_year: new_year,
            source,
            copied,
        })
    }
}

/// Standards, pointers and elements keep their titles; attachments become
/// empty placeholders. Assignees, files and shares are not carried over.
async fn copy_standards<C: ConnectionTrait>(
    db: &C,
    source: &academic_year::Model,
    target: &academic_year::Model,
) -> Result<CopiedCounts, sea_orm::DbErr> {
    let standards = StandardRepository::new(db);
    let pointers = PointerRepository::new(db);
    let elements = ElementRepository::new(db);
    let attachments = AttachmentRepository::new(db);
    let mut copied = CopiedCounts::default();

    for source_standard in standards.find_by_year(source.id).await? {
        let new_standard = standards
            .create(target.id, source_standard.title.clone(), source_standard.r#type)
            .await?;
        copied.standards += 1;

        for source_pointer in pointers.find_by_standards(&[source_standard.id]).await? {
            let new_pointer = pointers
                .create(new_standard.id, source_pointer.title.clone())
                .await?;
            copied.pointers += 1;

            for source_element in elements.find_by_pointers(&[source_pointer.id]).await? {
                let new_element = elements
                    .create(new_pointer.id, source_element.title.clone())
                    .await?;
                copied.elements += 1;

                for source_attachment in attachments.find_by_elements(&[source_element.id]).await? {
                    attachments
                        .create(new_element.id, source_attachment.title.clone())
                        .await?;
                    copied.attachments += 1;
                }
            }
        }
    }

    Ok(copied)
}

/// Courses keep their professor; codes get the new start year appended.
/// Course files are copied by title only.
async fn copy_courses<C: ConnectionTrait>(
    db: &C,
    source: &academic_year::Model,
    target: &academic_year::Model,
) -> Result<CopiedCounts, sea_orm::DbErr> {
    let courses = CourseRepository::new(db);
    let course_files = CourseFileRepository::new(db);
    let mut copied = CopiedCounts::default();

    for source_course in courses.find_by_year(source.id).await? {
        let mut fields = CourseFields::from(&source_course);
        fields.academic_year_id = target.id;
        fields.code = replicated_code(&source_course.code, target.start_date);
        let new_course = courses.create(fields).await?;
        copied.courses += 1;

        for source_file in course_files.find_by_courses(&[source_course.id]).await? {
            course_files
                .create(new_course.id, source_file.title.clone())
                .await?;
            copied.course_files += 1;
        }
    }

    Ok(copied)
}

/// Every copied course code must still fit its column once suffixed.
async fn check_replicated_codes(
    db: &DatabaseConnection,
    source: &academic_year::Model,
    start_date: NaiveDate,
) -> Result<(), ServiceError> {
    let courses = CourseRepository::new(db)
        .find_by_year(source.id)
        .await
        .map_err(map_db_error)?;
    for course in courses {
        let code = replicated_code(&course.code, start_date);
        if code.chars().count() > MAX_COURSE_CODE_LEN {
            return Err(ServiceError::validation(format!(
                "Course code '{}' would exceed {MAX_COURSE_CODE_LEN} characters when copied as '{code}'.",
                course.code
            )));
        }
    }
    Ok(())
}

pub fn replicated_code(code: &str, start_date: NaiveDate) -> String {
    format!("{code}_{}", start_date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_gets_start_year_suffix() {
        let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert_eq!(replicated_code("CS101", start), "CS101_2025");
    }
}
