use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use sea_orm::sea_query::JoinType;
use uuid::Uuid;

use super::{icontains, non_empty};
use crate::entities::sea_orm_active_enums::StandardType;
use crate::entities::{element, pointer, standard, standard_assignee};
use crate::utils::pagination::{Ordering, PageRequest};

pub const STANDARD_ORDERING: &[&str] = &["created_at", "title"];

#[derive(Debug, Default, Clone)]
pub struct StandardFilter {
    pub standard_type: Option<StandardType>,
    pub academic_year: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Default)]
pub struct StandardUpdate {
    pub academic_year_id: Option<Uuid>,
    pub title: Option<String>,
    pub standard_type: Option<StandardType>,
}

pub struct StandardRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> StandardRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<standard::Model>, DbErr> {
        standard::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_year(&self, academic_year_id: Uuid) -> Result<Vec<standard::Model>, DbErr> {
        standard::Entity::find()
            .filter(standard::Column::AcademicYearId.eq(academic_year_id))
            .order_by_asc(standard::Column::CreatedAt)
            .order_by_asc(standard::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find_page(
        &self,
        filter: &StandardFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<(Vec<standard::Model>, u64), DbErr> {
        let mut query = standard::Entity::find();
        if let Some(standard_type) = filter.standard_type {
            query = query.filter(standard::Column::Type.eq(standard_type));
        }
        if let Some(academic_year) = filter.academic_year {
            query = query.filter(standard::Column::AcademicYearId.eq(academic_year));
        }
        if let Some(search) = non_empty(filter.search.as_deref()) {
            query = query.filter(icontains(standard::Column::Title, search));
        }

        let total = query.clone().count(self.db).await?;

        let column = match ordering.field.as_str() {
            "title" => standard::Column::Title,
            _ => standard::Column::CreatedAt,
        };
        let standards = query
            .order_by(column, ordering.order())
            .order_by_asc(standard::Column::Id)
            .limit(page.page_size)
            .offset(page.offset())
            .all(self.db)
            .await?;

        Ok((standards, total))
    }

    pub async fn create(
        &self,
        academic_year_id: Uuid,
        title: String,
        standard_type: StandardType,
    ) -> Result<standard::Model, DbErr> {
        let now = Utc::now().naive_utc();
        standard::ActiveModel {
            id: Set(Uuid::new_v4()),
            academic_year_id: Set(academic_year_id),
            title: Set(title),
            r#type: Set(standard_type),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        model: standard::Model,
        update: StandardUpdate,
    ) -> Result<standard::Model, DbErr> {
        let mut active: standard::ActiveModel = model.into();
        if let Some(academic_year_id) = update.academic_year_id {
            active.academic_year_id = Set(academic_year_id);
        }
        if let Some(title) = update.title {
            active.title = Set(title);
        }
        if let Some(standard_type) = update.standard_type {
            active.r#type = Set(standard_type);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(self.db).await
    }

    pub async fn assignee_ids(&self, standard_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        standard_assignee::Entity::find()
            .select_only()
            .column(standard_assignee::Column::UserId)
            .filter(standard_assignee::Column::StandardId.eq(standard_id))
            .into_tuple()
            .all(self.db)
            .await
    }

    pub async fn assignee_ids_for(
        &self,
        standard_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, DbErr> {
        let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if standard_ids.is_empty() {
            return Ok(map);
        }
        let rows = standard_assignee::Entity::find()
            .filter(standard_assignee::Column::StandardId.is_in(standard_ids.iter().copied()))
            .all(self.db)
            .await?;
        for row in rows {
            map.entry(row.standard_id).or_default().push(row.user_id);
        }
        Ok(map)
    }

    /// Replaces the assignee set.
    pub async fn set_assignees(&self, standard_id: Uuid, user_ids: &[Uuid]) -> Result<(), DbErr> {
        standard_assignee::Entity::delete_many()
            .filter(standard_assignee::Column::StandardId.eq(standard_id))
            .exec(self.db)
            .await?;

        let mut unique = user_ids.to_vec();
        unique.sort();
        unique.dedup();
        if unique.is_empty() {
            return Ok(());
        }

        standard_assignee::Entity::insert_many(unique.into_iter().map(|user_id| {
            standard_assignee::ActiveModel {
                standard_id: Set(standard_id),
                user_id: Set(user_id),
            }
        }))
        .exec_without_returning(self.db)
        .await?;
        Ok(())
    }

    /// Whether `user_id` is assigned to the standard owning `element_id`.
    pub async fn is_assigned_to_element_standard(
        &self,
        element_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DbErr> {
        let count = standard_assignee::Entity::find()
            .join(JoinType::InnerJoin, standard_assignee::Relation::Standard.def())
            .join(JoinType::InnerJoin, standard::Relation::Pointer.def())
            .join(JoinType::InnerJoin, pointer::Relation::Element.def())
            .filter(element::Column::Id.eq(element_id))
            .filter(standard_assignee::Column::UserId.eq(user_id))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }
}
