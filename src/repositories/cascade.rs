//! Ownership-directed deletes. Every owned row is removed children-first;
//! the foreign keys do not cascade on their own.
//!
//! Each method returns the blob paths that belonged to deleted rows so the
//! caller can remove them from the file store once the transaction commits.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::entities::{
    academic_year, attachment, attachment_share, course, course_attachment, course_file, element,
    pointer, request, standard, standard_assignee, user,
};

pub struct OwnershipCascade<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OwnershipCascade<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn delete_academic_year(&self, id: Uuid) -> Result<Vec<String>, DbErr> {
        let standard_ids: Vec<Uuid> = standard::Entity::find()
            .select_only()
            .column(standard::Column::Id)
            .filter(standard::Column::AcademicYearId.eq(id))
            .into_tuple()
            .all(self.db)
            .await?;
        let course_ids: Vec<Uuid> = course::Entity::find()
            .select_only()
            .column(course::Column::Id)
            .filter(course::Column::AcademicYearId.eq(id))
            .into_tuple()
            .all(self.db)
            .await?;

        let mut paths = self.delete_standards(&standard_ids).await?;
        paths.extend(self.delete_courses(&course_ids).await?);

        academic_year::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(paths)
    }

    pub async fn delete_standards(&self, ids: &[Uuid]) -> Result<Vec<String>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let pointer_ids: Vec<Uuid> = pointer::Entity::find()
            .select_only()
            .column(pointer::Column::Id)
            .filter(pointer::Column::StandardId.is_in(ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;
        let paths = self.delete_pointers(&pointer_ids).await?;

        standard_assignee::Entity::delete_many()
            .filter(standard_assignee::Column::StandardId.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;
        standard::Entity::delete_many()
            .filter(standard::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;
        Ok(paths)
    }

    pub async fn delete_pointers(&self, ids: &[Uuid]) -> Result<Vec<String>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let element_ids: Vec<Uuid> = element::Entity::find()
            .select_only()
            .column(element::Column::Id)
            .filter(element::Column::PointerId.is_in(ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;
        let paths = self.delete_elements(&element_ids).await?;

        pointer::Entity::delete_many()
            .filter(pointer::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;
        Ok(paths)
    }

    pub async fn delete_elements(&self, ids: &[Uuid]) -> Result<Vec<String>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let attachment_ids: Vec<Uuid> = attachment::Entity::find()
            .select_only()
            .column(attachment::Column::Id)
            .filter(attachment::Column::ElementId.is_in(ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;
        let paths = self.delete_attachments(&attachment_ids).await?;

        element::Entity::delete_many()
            .filter(element::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;
        Ok(paths)
    }

    /// Removes the attachments with their requests and shares.
    pub async fn delete_attachments(&self, ids: &[Uuid]) -> Result<Vec<String>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let files: Vec<Option<String>> = attachment::Entity::find()
            .select_only()
            .column(attachment::Column::File)
            .filter(attachment::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;

        request::Entity::delete_many()
            .filter(request::Column::MadeOnId.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;
        attachment_share::Entity::delete_many()
            .filter(attachment_share::Column::AttachmentId.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;
        attachment::Entity::delete_many()
            .filter(attachment::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;

        Ok(files
            .into_iter()
            .flatten()
            .filter(|path| !path.is_empty())
            .collect())
    }

    pub async fn delete_courses(&self, ids: &[Uuid]) -> Result<Vec<String>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let file_ids: Vec<Uuid> = course_file::Entity::find()
            .select_only()
            .column(course_file::Column::Id)
            .filter(course_file::Column::CourseId.is_in(ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;
        let paths = self.delete_course_files(&file_ids).await?;

        course::Entity::delete_many()
            .filter(course::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;
        Ok(paths)
    }

    pub async fn delete_course_files(&self, ids: &[Uuid]) -> Result<Vec<String>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let paths: Vec<String> = course_attachment::Entity::find()
            .select_only()
            .column(course_attachment::Column::File)
            .filter(course_attachment::Column::CourseFileId.is_in(ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;

        course_attachment::Entity::delete_many()
            .filter(course_attachment::Column::CourseFileId.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;
        course_file::Entity::delete_many()
            .filter(course_file::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;
        Ok(paths)
    }

    /// Drops the user's requests and memberships and detaches them from
    /// uploads and courses. Uploaded files stay in place.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), DbErr> {
        request::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(request::Column::RequesterId.eq(id))
                    .add(request::Column::ReceiverId.eq(id)),
            )
            .exec(self.db)
            .await?;
        standard_assignee::Entity::delete_many()
            .filter(standard_assignee::Column::UserId.eq(id))
            .exec(self.db)
            .await?;
        attachment_share::Entity::delete_many()
            .filter(attachment_share::Column::UserId.eq(id))
            .exec(self.db)
            .await?;
        attachment::Entity::update_many()
            .col_expr(attachment::Column::UploadedBy, Expr::value(Option::<Uuid>::None))
            .filter(attachment::Column::UploadedBy.eq(id))
            .exec(self.db)
            .await?;
        course::Entity::update_many()
            .col_expr(course::Column::ProfessorId, Expr::value(Option::<Uuid>::None))
            .filter(course::Column::ProfessorId.eq(id))
            .exec(self.db)
            .await?;
        user::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(())
    }
}
