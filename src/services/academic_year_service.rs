use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::entities::academic_year;
use crate::entities::sea_orm_active_enums::AcademicYearStatus;
use crate::repositories::academic_year_repository::AcademicYearUpdate;
use crate::repositories::{AcademicYearFilter, AcademicYearRepository, OwnershipCascade};
use crate::services::access::{Identity, require_admin};
use crate::services::error::{ServiceError, map_db_error};
use crate::services::validation::validate_year_dates;
use crate::utils::file_store::FileStore;
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub struct AcademicYearService<'a> {
    db: &'a DatabaseConnection,
    files: &'a FileStore,
}

impl<'a> AcademicYearService<'a> {
    pub fn new(db: &'a DatabaseConnection, files: &'a FileStore) -> Self {
        Self { db, files }
    }

    pub async fn list(
        &self,
        filter: &AcademicYearFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<Paginated<academic_year::Model>, ServiceError> {
        let (years, total) = AcademicYearRepository::new(self.db)
            .find_page(filter, page, ordering)
            .await
            .map_err(map_db_error)?;
        Ok(Paginated::new(years, total, page))
    }

    pub async fn get(&self, id: Uuid) -> Result<academic_year::Model, ServiceError> {
        AcademicYearRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("Academic year not found."))
    }

    pub async fn create(
        &self,
        identity: &Identity,
        status: AcademicYearStatus,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<academic_year::Model, ServiceError> {
        require_admin(identity)?;
        validate_year_dates(start_date, end_date)?;
        let year = AcademicYearRepository::new(self.db)
            .create(status, start_date, end_date)
            .await
            .map_err(map_db_error)?;
        tracing::info!(academic_year_id = %year.id, "Academic year created");
        Ok(year)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        update: AcademicYearUpdate,
    ) -> Result<academic_year::Model, ServiceError> {
        require_admin(identity)?;
        let year = self.get(id).await?;
        validate_year_dates(
            update.start_date.unwrap_or(year.start_date),
            update.end_date.unwrap_or(year.end_date),
        )?;
        AcademicYearRepository::new(self.db)
            .update(year, update)
            .await
            .map_err(map_db_error)
    }

    /// Deletes the year with every standard and course it owns.
    pub async fn delete(&self, identity: &Identity, id: Uuid) -> Result<(), ServiceError> {
        require_admin(identity)?;
        self.get(id).await?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let paths = OwnershipCascade::new(&txn)
            .delete_academic_year(id)
            .await
            .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        self.files.delete_all(paths).await;
        tracing::info!(academic_year_id = %id, "Academic year deleted");
        Ok(())
    }
}
