use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{icontains, non_empty};
use crate::entities::{course_attachment, course_file};
use crate::utils::pagination::{Ordering, PageRequest};

pub const COURSE_FILE_ORDERING: &[&str] = &["created_at", "title"];

#[derive(Debug, Default, Clone)]
pub struct CourseFileFilter {
    pub course: Option<Uuid>,
    pub search: Option<String>,
}

pub struct CourseFileRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CourseFileRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<course_file::Model>, DbErr> {
        course_file::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_courses(&self, course_ids: &[Uuid]) -> Result<Vec<course_file::Model>, DbErr> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }
        course_file::Entity::find()
            .filter(course_file::Column::CourseId.is_in(course_ids.iter().copied()))
            .order_by_asc(course_file::Column::CreatedAt)
            .order_by_asc(course_file::Column::Id)
            .all(self.db)
            .await
    }

    /// Course files among `ids` that hold at least one attachment.
    pub async fn ids_with_attachments(&self, ids: &[Uuid]) -> Result<HashSet<Uuid>, DbErr> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let rows: Vec<Uuid> = course_attachment::Entity::find()
            .select_only()
            .column(course_attachment::Column::CourseFileId)
            .filter(course_attachment::Column::CourseFileId.is_in(ids.iter().copied()))
            .distinct()
            .into_tuple()
            .all(self.db)
            .await?;
        Ok(rows.into_iter().collect())
    }

    pub async fn find_page(
        &self,
        filter: &CourseFileFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<(Vec<course_file::Model>, u64), DbErr> {
        let mut query = course_file::Entity::find();
        if let Some(course) = filter.course {
            query = query.filter(course_file::Column::CourseId.eq(course));
        }
        if let Some(search) = non_empty(filter.search.as_deref()) {
            query = query.filter(icontains(course_file::Column::Title, search));
        }

        let total = query.clone().count(self.db).await?;

        let column = match ordering.field.as_str() {
            "title" => course_file::Column::Title,
            _ => course_file::Column::CreatedAt,
        };
        let files = query
            .order_by(column, ordering.order())
            .order_by_asc(course_file::Column::Id)
            .limit(page.page_size)
            .offset(page.offset())
            .all(self.db)
            .await?;

        Ok((files, total))
    }

    pub async fn create(&self, course_id: Uuid, title: String) -> Result<course_file::Model, DbErr> {
        let now = Utc::now().naive_utc();
        course_file::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course_id),
            title: Set(title),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        model: course_file::Model,
        course_id: Option<Uuid>,
        title: Option<String>,
    ) -> Result<course_file::Model, DbErr> {
        let mut active: course_file::ActiveModel = model.into();
        if let Some(course_id) = course_id {
            active.course_id = Set(course_id);
        }
        if let Some(title) = title {
            active.title = Set(title);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(self.db).await
    }
}
