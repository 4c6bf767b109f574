//! Courses and their course files.

use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::Department;
use crate::entities::{course, course_file};
use crate::repositories::course_repository::CourseFields;
use crate::repositories::{
    AcademicYearRepository, CourseFileFilter, CourseFileRepository, CourseFilter,
    CourseRepository, OwnershipCascade,
};
use crate::services::access::{Identity, require_admin};
use crate::services::error::{ServiceError, map_db_error};
use crate::services::ensure_users_exist;
use crate::services::validation::{self, require_title};
use crate::utils::file_store::FileStore;
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

/// Partial course input. `department` and `professor_id` distinguish
/// "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Default)]
pub struct CourseChanges {
    pub academic_year_id: Option<Uuid>,
    pub professor_id: Option<Option<Uuid>>,
    pub title: Option<String>,
    pub code: Option<String>,
    pub level: Option<i32>,
    pub semester: Option<i32>,
    pub credit_hours: Option<i32>,
    pub department: Option<Option<Department>>,
}

pub struct CourseService<'a> {
    db: &'a DatabaseConnection,
    files: &'a FileStore,
}

impl<'a> CourseService<'a> {
    pub fn new(db: &'a DatabaseConnection, files: &'a FileStore) -> Self {
        Self { db, files }
    }

    pub async fn list_courses(
        &self,
        filter: &CourseFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<Paginated<course::Model>, ServiceError> {
        let (courses, total) = CourseRepository::new(self.db)
            .find_page(filter, page, ordering)
            .await
            .map_err(map_db_error)?;
        Ok(Paginated::new(courses, total, page))
    }

    pub async fn get_course(&self, id: Uuid) -> Result<course::Model, ServiceError> {
        CourseRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("Course not found."))
    }

    pub async fn create_course(
        &self,
        identity: &Identity,
        mut fields: CourseFields,
    ) -> Result<course::Model, ServiceError> {
        require_admin(identity)?;
        self.check_fields(&mut fields).await?;
        let course = CourseRepository::new(self.db)
            .create(fields)
            .await
            .map_err(map_db_error)?;
        tracing::info!(course_id = %course.id, code = %course.code, "Course created");
        Ok(course)
    }

    pub async fn update_course(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: CourseChanges,
    ) -> Result<course::Model, ServiceError> {
        require_admin(identity)?;
        let course = self.get_course(id).await?;

        let mut fields = CourseFields::from(&course);
        if let Some(academic_year_id) = changes.academic_year_id {
            fields.academic_year_id = academic_year_id;
        }
        if let Some(professor_id) = changes.professor_id {
            fields.professor_id = professor_id;
        }
        if let Some(title) = changes.title {
            fields.title = title;
        }
        if let Some(code) = changes.code {
            fields.code = code;
        }
        if let Some(level) = changes.level {
            fields.level = level;
        }
        if let Some(semester) = changes.semester {
            fields.semester = semester;
        }
        if let Some(credit_hours) = changes.credit_hours {
            fields.credit_hours = credit_hours;
        }
        if let Some(department) = changes.department {
            fields.department = department;
        }

        self.check_fields(&mut fields).await?;
        CourseRepository::new(self.db)
            .update(course, fields)
            .await
            .map_err(map_db_error)
    }

    pub async fn delete_course(&self, identity: &Identity, id: Uuid) -> Result<(), ServiceError> {
        require_admin(identity)?;
        self.get_course(id).await?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let paths = OwnershipCascade::new(&txn)
            .delete_courses(&[id])
            .await
            .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        self.files.delete_all(paths).await;
        tracing::info!(course_id = %id, "Course deleted");
        Ok(())
    }

    pub async fn list_course_files(
        &self,
        filter: &CourseFileFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<Paginated<course_file::Model>, ServiceError> {
        let (files, total) = CourseFileRepository::new(self.db)
            .find_page(filter, page, ordering)
            .await
            .map_err(map_db_error)?;
        Ok(Paginated::new(files, total, page))
    }

    pub async fn get_course_file(&self, id: Uuid) -> Result<course_file::Model, ServiceError> {
        CourseFileRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("Course file not found."))
    }

    pub async fn create_course_file(
        &self,
        identity: &Identity,
        course_id: Uuid,
        title: &str,
    ) -> Result<course_file::Model, ServiceError> {
        require_admin(identity)?;
        let title = require_title("Title", title)?;
        self.ensure_course(course_id).await?;
        CourseFileRepository::new(self.db)
            .create(course_id, title)
            .await
            .map_err(map_db_error)
    }

    pub async fn update_course_file(
        &self,
        identity: &Identity,
        id: Uuid,
        course_id: Option<Uuid>,
        title: Option<&str>,
    ) -> Result<course_file::Model, ServiceError> {
        require_admin(identity)?;
        let file = self.get_course_file(id).await?;
        let title = title.map(|t| require_title("Title", t)).transpose()?;
        if let Some(course_id) = course_id {
            self.ensure_course(course_id).await?;
        }
        CourseFileRepository::new(self.db)
            .update(file, course_id, title)
            .await
            .map_err(map_db_error)
    }

    pub async fn delete_course_file(&self, identity: &Identity, id: Uuid) -> Result<(), ServiceError> {
        require_admin(identity)?;
        self.get_course_file(id).await?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let paths = OwnershipCascade::new(&txn)
            .delete_course_files(&[id])
            .await
            .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        self.files.delete_all(paths).await;
        Ok(())
    }

    async fn check_fields(&self, fields: &mut CourseFields) -> Result<(), ServiceError> {
        fields.title = fields.title.trim().to_string();
        fields.code = fields.code.trim().to_string();
        validation::validate_course(&validation::CourseFields {
            title: &fields.title,
            code: &fields.code,
            level: fields.level,
            semester: fields.semester,
            credit_hours: fields.credit_hours,
            department: fields.department,
        })?;

        AcademicYearRepository::new(self.db)
            .find_by_id(fields.academic_year_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::validation("Academic year does not exist."))?;

        if let Some(professor_id) = fields.professor_id {
            ensure_users_exist(self.db, &[professor_id]).await?;
        }
        Ok(())
    }

    async fn ensure_course(&self, id: Uuid) -> Result<(), ServiceError> {
        CourseRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| ServiceError::validation("Course does not exist."))
    }
}
