use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::entities::{course, course_attachment};
use crate::repositories::{
    CourseAttachmentFilter, CourseAttachmentRepository, CourseFileRepository, CourseRepository,
};
use crate::services::access::{Identity, may_manage_course};
use crate::services::attachment_service::{DownloadedFile, UploadedFile};
use crate::services::error::{ServiceError, map_db_error};
use crate::utils::file_store::FileStore;
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

const COURSE_ATTACHMENT_PREFIX: &str = "course_attachments";

pub struct CourseAttachmentService<'a> {
    db: &'a DatabaseConnection,
    files: &'a FileStore,
}

impl<'a> CourseAttachmentService<'a> {
    pub fn new(db: &'a DatabaseConnection, files: &'a FileStore) -> Self {
        Self { db, files }
    }

    pub async fn list(
        &self,
        filter: &CourseAttachmentFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<Paginated<course_attachment::Model>, ServiceError> {
        let (attachments, total) = CourseAttachmentRepository::new(self.db)
            .find_page(filter, page, ordering)
            .await
            .map_err(map_db_error)?;
        Ok(Paginated::new(attachments, total, page))
    }

    pub async fn get(&self, id: Uuid) -> Result<course_attachment::Model, ServiceError> {
        CourseAttachmentRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("Course attachment not found."))
    }

    /// Professor of the owning course or an admin. The blob is written first
    /// and removed again if the insert fails.
    pub async fn create(
        &self,
        identity: &Identity,
        course_file_id: Option<Uuid>,
        upload: Option<UploadedFile>,
    ) -> Result<course_attachment::Model, ServiceError> {
        let course_file_id =
            course_file_id.ok_or_else(|| ServiceError::validation("Course file is required."))?;
        let upload = upload
            .filter(|u| !u.bytes.is_empty())
            .ok_or_else(|| ServiceError::validation("No file provided."))?;

        let course = self.owning_course(course_file_id).await?;
        self.authorize(identity, &course)?;

        let path = self
            .files
            .save(COURSE_ATTACHMENT_PREFIX, &upload.file_name, &upload.bytes)
            .await?;

        match CourseAttachmentRepository::new(self.db)
            .create(course_file_id, path.clone(), upload.file_name.clone())
            .await
        {
            Ok(attachment) => {
                tracing::info!(
                    course_attachment_id = %attachment.id,
                    %course_file_id,
                    uploaded_by = %identity.user_id,
                    "Course attachment uploaded"
                );
                Ok(attachment)
            }
            Err(e) => {
                self.files.delete_all([&path]).await;
                Err(map_db_error(e))
            }
        }
    }

    pub async fn delete(&self, identity: &Identity, id: Uuid) -> Result<(), ServiceError> {
        let attachment = self.get(id).await?;
        let course = self.owning_course(attachment.course_file_id).await?;
        self.authorize(identity, &course)?;

        CourseAttachmentRepository::new(self.db)
            .delete(id)
            .await
            .map_err(map_db_error)?;
        self.files.delete_all([&attachment.file]).await;
        tracing::info!(course_attachment_id = %id, "Course attachment deleted");
        Ok(())
    }

    pub async fn download(&self, identity: &Identity, id: Uuid) -> Result<DownloadedFile, ServiceError> {
        let attachment = self.get(id).await?;
        let course = self.owning_course(attachment.course_file_id).await?;
        if !may_manage_course(identity, &course) {
            return Err(ServiceError::permission(
                "You do not have permission to download this file.",
            ));
        }

        let bytes = self.files.read(&attachment.file).await?;
        Ok(DownloadedFile {
            file_name: attachment.file_name,
            bytes,
        })
    }

    fn authorize(&self, identity: &Identity, course: &course::Model) -> Result<(), ServiceError> {
        if may_manage_course(identity, course) {
            Ok(())
        } else {
            Err(ServiceError::permission(
                "Only the course professor or an admin can manage course attachments.",
            ))
        }
    }

    async fn owning_course(&self, course_file_id: Uuid) -> Result<course::Model, ServiceError> {
        let course_file = CourseFileRepository::new(self.db)
            .find_by_id(course_file_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::validation("Course file does not exist."))?;
        CourseRepository::new(self.db)
            .find_by_id(course_file.course_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("Course not found."))
    }
}
