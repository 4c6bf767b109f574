use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{icontains, non_empty};
use crate::entities::element;
use crate::utils::pagination::{Ordering, PageRequest};

pub const ELEMENT_ORDERING: &[&str] = &["created_at", "title"];

#[derive(Debug, Default, Clone)]
pub struct ElementFilter {
    pub pointer: Option<Uuid>,
    pub search: Option<String>,
}

pub struct ElementRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ElementRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<element::Model>, DbErr> {
        element::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_pointers(&self, pointer_ids: &[Uuid]) -> Result<Vec<element::Model>, DbErr> {
        if pointer_ids.is_empty() {
            return Ok(Vec::new());
        }
        element::Entity::find()
            .filter(element::Column::PointerId.is_in(pointer_ids.iter().copied()))
            .order_by_asc(element::Column::CreatedAt)
            .order_by_asc(element::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find_page(
        &self,
        filter: &ElementFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<(Vec<element::Model>, u64), DbErr> {
        let mut query = element::Entity::find();
        if let Some(pointer) = filter.pointer {
            query = query.filter(element::Column::PointerId.eq(pointer));
        }
        if let Some(search) = non_empty(filter.search.as_deref()) {
            query = query.filter(icontains(element::Column::Title, search));
        }

        let total = query.clone().count(self.db).await?;

        let column = match ordering.field.as_str() {
            "title" => element::Column::Title,
            _ => element::Column::CreatedAt,
        };
        let elements = query
            .order_by(column, ordering.order())
            .order_by_asc(element::Column::Id)
            .limit(page.page_size)
            .offset(page.offset())
            .all(self.db)
            .await?;

        Ok((elements, total))
    }

    pub async fn create(&self, pointer_id: Uuid, title: String) -> Result<element::Model, DbErr> {
        let now = Utc::now().naive_utc();
        element::ActiveModel {
            id: Set(Uuid::new_v4()),
            pointer_id: Set(pointer_id),
            title: Set(title),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        model: element::Model,
        pointer_id: Option<Uuid>,
        title: Option<String>,
    ) -> Result<element::Model, DbErr> {
        let mut active: element::ActiveModel = model.into();
        if let Some(pointer_id) = pointer_id {
            active.pointer_id = Set(pointer_id);
        }
        if let Some(title) = title {
            active.title = Set(title);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(self.db).await
    }
}
