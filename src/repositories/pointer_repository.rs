use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{icontains, non_empty};
use crate::entities::pointer;
use crate::utils::pagination::{Ordering, PageRequest};

pub const POINTER_ORDERING: &[&str] = &["created_at", "title"];

#[derive(Debug, Default, Clone)]
pub struct PointerFilter {
    pub standard: Option<Uuid>,
    pub search: Option<String>,
}

pub struct PointerRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PointerRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<pointer::Model>, DbErr> {
        pointer::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_standards(&self, standard_ids: &[Uuid]) -> Result<Vec<pointer::Model>, DbErr> {
        if standard_ids.is_empty() {
            return Ok(Vec::new());
        }
        pointer::Entity::find()
            .filter(pointer::Column::StandardId.is_in(standard_ids.iter().copied()))
            .order_by_asc(pointer::Column::CreatedAt)
            .order_by_asc(pointer::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find_page(
        &self,
        filter: &PointerFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<(Vec<pointer::Model>, u64), DbErr> {
        let mut query = pointer::Entity::find();
        if let Some(standard) = filter.standard {
            query = query.filter(pointer::Column::StandardId.eq(standard));
        }
        if let Some(search) = non_empty(filter.search.as_deref()) {
            query = query.filter(icontains(pointer::Column::Title, search));
        }

        let total = query.clone().count(self.db).await?;

        let column = match ordering.field.as_str() {
            "title" => pointer::Column::Title,
            _ => pointer::Column::CreatedAt,
        };
        let pointers = query
            .order_by(column, ordering.order())
            .order_by_asc(pointer::Column::Id)
            .limit(page.page_size)
            .offset(page.offset())
            .all(self.db)
            .await?;

        Ok((pointers, total))
    }

    pub async fn create(&self, standard_id: Uuid, title: String) -> Result<pointer::Model, DbErr> {
        let now = Utc::now().naive_utc();
        pointer::ActiveModel {
            id: Set(Uuid::new_v4()),
            standard_id: Set(standard_id),
            title: Set(title),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        model: pointer::Model,
        standard_id: Option<Uuid>,
        title: Option<String>,
    ) -> Result<pointer::Model, DbErr> {
        let mut active: pointer::ActiveModel = model.into();
        if let Some(standard_id) = standard_id {
            active.standard_id = Set(standard_id);
        }
        if let Some(title) = title {
            active.title = Set(title);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(self.db).await
    }
}
