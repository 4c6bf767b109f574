use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::academic_year;
use crate::entities::sea_orm_active_enums::AcademicYearStatus;
use crate::utils::pagination::{Ordering, PageRequest};

pub const ACADEMIC_YEAR_ORDERING: &[&str] = &["start_date", "end_date", "created_at"];

#[derive(Debug, Default, Clone)]
pub struct AcademicYearFilter {
    pub status: Option<AcademicYearStatus>,
}

#[derive(Debug, Default)]
pub struct AcademicYearUpdate {
    pub status: Option<AcademicYearStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub struct AcademicYearRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AcademicYearRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<academic_year::Model>, DbErr> {
        academic_year::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn find_page(
        &self,
        filter: &AcademicYearFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<(Vec<academic_year::Model>, u64), DbErr> {
        let mut query = academic_year::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(academic_year::Column::Status.eq(status));
        }

        let total = query.clone().count(self.db).await?;

        let column = match ordering.field.as_str() {
            "start_date" => academic_year::Column::StartDate,
            "end_date" => academic_year::Column::EndDate,
            _ => academic_year::Column::CreatedAt,
        };
        let years = query
            .order_by(column, ordering.order())
            .order_by_asc(academic_year::Column::Id)
            .limit(page.page_size)
            .offset(page.offset())
            .all(self.db)
            .await?;

        Ok((years, total))
    }

    /// Most recent year by start date. Ties go to the most recently created row.
    pub async fn find_latest(&self) -> Result<Option<academic_year::Model>, DbErr> {
        academic_year::Entity::find()
            .order_by_desc(academic_year::Column::StartDate)
            .order_by_desc(academic_year::Column::CreatedAt)
            .one(self.db)
            .await
    }

    pub async fn create(
        &self,
        status: AcademicYearStatus,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<academic_year::Model, DbErr> {
        let now = Utc::now().naive_utc();
        academic_year::ActiveModel {
            id: Set(Uuid::new_v4()),
            status: Set(status),
            start_date: Set(start_date),
            end_date: Set(end_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        model: academic_year::Model,
        update: AcademicYearUpdate,
    ) -> Result<academic_year::Model, DbErr> {
        let mut active: academic_year::ActiveModel = model.into();
        if let Some(status) = update.status {
            active.status = Set(status);
        }
        if let Some(start_date) = update.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = update.end_date {
            active.end_date = Set(end_date);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(self.db).await
    }
}
