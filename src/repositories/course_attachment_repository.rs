use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::course_attachment;
use crate::utils::pagination::{Ordering, PageRequest};

pub const COURSE_ATTACHMENT_ORDERING: &[&str] = &["created_at"];

#[derive(Debug, Default, Clone)]
pub struct CourseAttachmentFilter {
    pub course_file: Option<Uuid>,
}

pub struct CourseAttachmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CourseAttachmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<course_attachment::Model>, DbErr> {
        course_attachment::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn find_page(
        &self,
        filter: &CourseAttachmentFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<(Vec<course_attachment::Model>, u64), DbErr> {
        let mut query = course_attachment::Entity::find();
        if let Some(course_file) = filter.course_file {
            query = query.filter(course_attachment::Column::CourseFileId.eq(course_file));
        }

        let total = query.clone().count(self.db).await?;

        let attachments = query
            .order_by(course_attachment::Column::CreatedAt, ordering.order())
            .order_by_asc(course_attachment::Column::Id)
            .limit(page.page_size)
            .offset(page.offset())
            .all(self.db)
            .await?;

        Ok((attachments, total))
    }

    pub async fn create(
        &self,
        course_file_id: Uuid,
        file: String,
        file_name: String,
    ) -> Result<course_attachment::Model, DbErr> {
        let now = Utc::now().naive_utc();
        course_attachment::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_file_id: Set(course_file_id),
            file: Set(file),
            file_name: Set(file_name),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = course_attachment::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected)
    }
}
