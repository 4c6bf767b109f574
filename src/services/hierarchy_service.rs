//! Standards, pointers and elements. Reads are open to any caller, writes
//! are admin-only.

use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::StandardType;
use crate::entities::{element, pointer, standard};
use crate::repositories::standard_repository::StandardUpdate;
use crate::repositories::{
    AcademicYearRepository, ElementFilter, ElementRepository, OwnershipCascade, PointerFilter,
    PointerRepository, StandardFilter, StandardRepository,
};
use crate::services::access::{Identity, require_admin};
use crate::services::ensure_users_exist;
use crate::services::error::{ServiceError, map_db_error};
use crate::services::validation::require_title;
use crate::utils::file_store::FileStore;
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

#[derive(Debug, Clone)]
pub struct StandardRecord {
    pub standard: standard::Model,
    pub assigned_to: Vec<Uuid>,
}

pub struct NewStandard {
    pub academic_year_id: Uuid,
    pub title: String,
    pub standard_type: StandardType,
    pub assigned_to_ids: Vec<Uuid>,
}

#[derive(Default)]
pub struct StandardChanges {
    pub academic_year_id: Option<Uuid>,
    pub title: Option<String>,
    pub standard_type: Option<StandardType>,
    pub assigned_to_ids: Option<Vec<Uuid>>,
}

pub struct HierarchyService<'a> {
    db: &'a DatabaseConnection,
    files: &'a FileStore,
}

impl<'a> HierarchyService<'a> {
    pub fn new(db: &'a DatabaseConnection, files: &'a FileStore) -> Self {
        Self { db, files }
    }

    pub async fn list_standards(
        &self,
        filter: &StandardFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<Paginated<StandardRecord>, ServiceError> {
        let repo = StandardRepository::new(self.db);
        let (standards, total) = repo
            .find_page(filter, page, ordering)
            .await
            .map_err(map_db_error)?;
        let ids: Vec<Uuid> = standards.iter().map(|s| s.id).collect();
        let mut assignees = repo.assignee_ids_for(&ids).await.map_err(map_db_error)?;

        let records = standards
            .into_iter()
            .map(|standard| StandardRecord {
                assigned_to: assignees.remove(&standard.id).unwrap_or_default(),
                standard,
            })
            .collect();
        Ok(Paginated::new(records, total, page))
    }

    pub async fn get_standard(&self, id: Uuid) -> Result<StandardRecord, ServiceError> {
        let standard = self.find_standard(id).await?;
        self.standard_record(standard).await
    }

    pub async fn create_standard(
        &self,
        identity: &Identity,
        input: NewStandard,
    ) -> Result<StandardRecord, ServiceError> {
        require_admin(identity)?;
        let title = require_title("Title", &input.title)?;
        self.ensure_year(input.academic_year_id).await?;
        ensure_users_exist(self.db, &input.assigned_to_ids).await?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let repo = StandardRepository::new(&txn);
        let standard = repo
            .create(input.academic_year_id, title, input.standard_type)
            .await
            .map_err(map_db_error)?;
        repo.set_assignees(standard.id, &input.assigned_to_ids)
            .await
            .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        tracing::info!(standard_id = %standard.id, "Standard created");
        self.standard_record(standard).await
    }

    pub async fn update_standard(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: StandardChanges,
    ) -> Result<StandardRecord, ServiceError> {
        require_admin(identity)?;
        let standard = self.find_standard(id).await?;
        let title = changes
            .title
            .as_deref()
            .map(|t| require_title("Title", t))
            .transpose()?;
        if let Some(year_id) = changes.academic_year_id {
            self.ensure_year(year_id).await?;
        }
        if let Some(ids) = &changes.assigned_to_ids {
            ensure_users_exist(self.db, ids).await?;
        }

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let repo = StandardRepository::new(&txn);
        let standard = repo
            .update(
                standard,
                StandardUpdate {
                    academic_year_id: changes.academic_year_id,
                    title,
                    standard_type: changes.standard_type,
                },
            )
            .await
            .map_err(map_db_error)?;
        if let Some(ids) = &changes.assigned_to_ids {
            repo.set_assignees(standard.id, ids)
                .await
                .map_err(map_db_error)?;
        }
        txn.commit().await.map_err(map_db_error)?;

        self.standard_record(standard).await
    }

    pub async fn delete_standard(&self, identity: &Identity, id: Uuid) -> Result<(), ServiceError> {
        require_admin(identity)?;
        self.find_standard(id).await?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let paths = OwnershipCascade::new(&txn)
            .delete_standards(&[id])
            .await
            .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        self.files.delete_all(paths).await;
        tracing::info!(standard_id = %id, "Standard deleted");
        Ok(())
    }

    pub async fn list_pointers(
        &self,
        filter: &PointerFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<Paginated<pointer::Model>, ServiceError> {
        let (pointers, total) = PointerRepository::new(self.db)
            .find_page(filter, page, ordering)
            .await
            .map_err(map_db_error)?;
        Ok(Paginated::new(pointers, total, page))
    }

    pub async fn get_pointer(&self, id: Uuid) -> Result<pointer::Model, ServiceError> {
        PointerRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("Pointer not found."))
    }

    pub async fn create_pointer(
        &self,
        identity: &Identity,
        standard_id: Uuid,
        title: &str,
    ) -> Result<pointer::Model, ServiceError> {
        require_admin(identity)?;
        let title = require_title("Title", title)?;
        self.ensure_standard(standard_id).await?;
        PointerRepository::new(self.db)
            .create(standard_id, title)
            .await
            .map_err(map_db_error)
    }

    pub async fn update_pointer(
        &self,
        identity: &Identity,
        id: Uuid,
        standard_id: Option<Uuid>,
        title: Option<&str>,
    ) -> Result<pointer::Model, ServiceError> {
        require_admin(identity)?;
        let pointer = self.get_pointer(id).await?;
        let title = title.map(|t| require_title("Title", t)).transpose()?;
        if let Some(standard_id) = standard_id {
            self.ensure_standard(standard_id).await?;
        }
        PointerRepository::new(self.db)
            .update(pointer, standard_id, title)
            .await
            .map_err(map_db_error)
    }

    pub async fn delete_pointer(&self, identity: &Identity, id: Uuid) -> Result<(), ServiceError> {
        require_admin(identity)?;
        self.get_pointer(id).await?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let paths = OwnershipCascade::new(&txn)
            .delete_pointers(&[id])
            .await
            .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        self.files.delete_all(paths).await;
        Ok(())
    }

    pub async fn list_elements(
        &self,
        filter: &ElementFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<Paginated<element::Model>, ServiceError> {
        let (elements, total) = ElementRepository::new(self.db)
            .find_page(filter, page, ordering)
            .await
            .map_err(map_db_error)?;
        Ok(Paginated::new(elements, total, page))
    }

    pub async fn get_element(&self, id: Uuid) -> Result<element::Model, ServiceError> {
        ElementRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("Element not found."))
    }

    pub async fn create_element(
        &self,
        identity: &Identity,
        pointer_id: Uuid,
        title: &str,
    ) -> Result<element::Model, ServiceError> {
        require_admin(identity)?;
        let title = require_title("Title", title)?;
        self.ensure_pointer(pointer_id).await?;
        ElementRepository::new(self.db)
            .create(pointer_id, title)
            .await
            .map_err(map_db_error)
    }

    pub async fn update_element(
        &self,
        identity: &Identity,
        id: Uuid,
        pointer_id: Option<Uuid>,
        title: Option<&str>,
    ) -> Result<element::Model, ServiceError> {
        require_admin(identity)?;
        let element = self.get_element(id).await?;
        let title = title.map(|t| require_title("Title", t)).transpose()?;
        if let Some(pointer_id) = pointer_id {
            self.ensure_pointer(pointer_id).await?;
        }
        ElementRepository::new(self.db)
            .update(element, pointer_id, title)
            .await
            .map_err(map_db_error)
    }

    pub async fn delete_element(&self, identity: &Identity, id: Uuid) -> Result<(), ServiceError> {
        require_admin(identity)?;
        self.get_element(id).await?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let paths = OwnershipCascade::new(&txn)
            .delete_elements(&[id])
            .await
            .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        self.files.delete_all(paths).await;
        Ok(())
    }

    async fn find_standard(&self, id: Uuid) -> Result<standard::Model, ServiceError> {
        StandardRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("Standard not found."))
    }

    async fn standard_record(&self, standard: standard::Model) -> Result<StandardRecord, ServiceError> {
        let assigned_to = StandardRepository::new(self.db)
            .assignee_ids(standard.id)
            .await
            .map_err(map_db_error)?;
        Ok(StandardRecord {
            standard,
            assigned_to,
        })
    }

    async fn ensure_year(&self, id: Uuid) -> Result<(), ServiceError> {
        AcademicYearRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| ServiceError::validation("Academic year does not exist."))
    }

    async fn ensure_standard(&self, id: Uuid) -> Result<(), ServiceError> {
        StandardRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| ServiceError::validation("Standard does not exist."))
    }

    async fn ensure_pointer(&self, id: Uuid) -> Result<(), ServiceError> {
        PointerRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| ServiceError::validation("Pointer does not exist."))
    }
}
