use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::entities::attachment;
use crate::repositories::attachment_repository::StoredFile;
use crate::repositories::{
    AttachmentFilter, AttachmentRepository, ElementRepository, OwnershipCascade,
};
use crate::services::access::{
    AttachmentAction, AttachmentGrants, Identity, authorize_attachment, require_admin,
};
use crate::services::ensure_users_exist;
use crate::services::error::{ServiceError, map_db_error};
use crate::services::validation::{MAX_TITLE_LEN, check_length};
use crate::utils::file_store::FileStore;
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

const ATTACHMENT_PREFIX: &str = "attachments";

#[derive(Debug, Clone)]
pub struct AttachmentRecord {
    pub attachment: attachment::Model,
    pub shared_with: Vec<Uuid>,
}

/// File part of a multipart upload.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct DownloadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct NewAttachment {
    pub element_id: Uuid,
    pub title: String,
    pub shared_with_ids: Vec<Uuid>,
}

#[derive(Default)]
pub struct AttachmentChanges {
    pub element_id: Option<Uuid>,
    pub title: Option<String>,
    pub shared_with_ids: Option<Vec<Uuid>>,
}

pub struct AttachmentService<'a> {
    db: &'a DatabaseConnection,
    files: &'a FileStore,
}

impl<'a> AttachmentService<'a> {
    pub fn new(db: &'a DatabaseConnection, files: &'a FileStore) -> Self {
        Self { db, files }
    }

    pub async fn list(
        &self,
        filter: &AttachmentFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<Paginated<AttachmentRecord>, ServiceError> {
        let repo = AttachmentRepository::new(self.db);
        let (attachments, total) = repo
            .find_page(filter, page, ordering)
            .await
            .map_err(map_db_error)?;

        let ids: Vec<Uuid> = attachments.iter().map(|a| a.id).collect();
        let mut shares = repo.shared_with_ids_for(&ids).await.map_err(map_db_error)?;
        let records = attachments
            .into_iter()
            .map(|attachment| AttachmentRecord {
                shared_with: shares.remove(&attachment.id).unwrap_or_default(),
                attachment,
            })
            .collect();

        Ok(Paginated::new(records, total, page))
    }

    pub async fn get(&self, attachment_id: Uuid) -> Result<AttachmentRecord, ServiceError> {
        let attachment = self.find(attachment_id).await?;
        self.record(attachment).await
    }

    pub async fn create(
        &self,
        identity: &Identity,
        input: NewAttachment,
    ) -> Result<AttachmentRecord, ServiceError> {
        require_admin(identity)?;
        let title = input.title.trim().to_string();
        check_length("Title", &title, MAX_TITLE_LEN)?;
        self.ensure_element(input.element_id).await?;
        ensure_users_exist(self.db, &input.shared_with_ids).await?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let repo = AttachmentRepository::new(&txn);
        let attachment = repo
            .create(input.element_id, title)
            .await
            .map_err(map_db_error)?;
        repo.set_shared_with(attachment.id, &input.shared_with_ids)
            .await
            .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        self.record(attachment).await
    }

    pub async fn update(
        &self,
        identity: &Identity,
        attachment_id: Uuid,
        changes: AttachmentChanges,
    ) -> Result<AttachmentRecord, ServiceError> {
        require_admin(identity)?;
        let title = changes.title.map(|t| t.trim().to_string());
        if let Some(title) = &title {
            check_length("Title", title, MAX_TITLE_LEN)?;
        }
        let attachment = self.find(attachment_id).await?;
        if let Some(element_id) = changes.element_id {
            self.ensure_element(element_id).await?;
        }
        if let Some(ids) = &changes.shared_with_ids {
            ensure_users_exist(self.db, ids).await?;
        }

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let repo = AttachmentRepository::new(&txn);
        let attachment = repo
            .update(
                attachment,
                changes.element_id,
                title,
            )
            .await
            .map_err(map_db_error)?;
        if let Some(ids) = &changes.shared_with_ids {
            repo.set_shared_with(attachment.id, ids)
                .await
                .map_err(map_db_error)?;
        }
        txn.commit().await.map_err(map_db_error)?;

        self.record(attachment).await
    }

    pub async fn delete(&self, identity: &Identity, attachment_id: Uuid) -> Result<(), ServiceError> {
        require_admin(identity)?;
        self.find(attachment_id).await?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let paths = OwnershipCascade::new(&txn)
            .delete_attachments(&[attachment_id])
            .await
            .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        self.files.delete_all(paths).await;
        tracing::info!(%attachment_id, "Attachment deleted");
        Ok(())
    }

    /// Checks run in order: file present in the request, attachment exists,
    /// slot still empty, caller allowed. The blob is written before the
    /// record and removed again if the record cannot take it.
    pub async fn upload(
        &self,
        identity: &Identity,
        attachment_id: Uuid,
        upload: Option<UploadedFile>,
    ) -> Result<AttachmentRecord, ServiceError> {
        let upload = upload
            .filter(|u| !u.bytes.is_empty())
            .ok_or_else(|| ServiceError::validation("No file provided."))?;

        let attachment = self.find(attachment_id).await?;
        if attachment.has_file() {
            return Err(ServiceError::conflict("Attachment already has a file."));
        }

        let grants = AttachmentGrants::load(self.db, identity, &attachment)
            .await
            .map_err(map_db_error)?;
        authorize_attachment(identity, grants, AttachmentAction::Upload)?;

        let path = self
            .files
            .save(ATTACHMENT_PREFIX, &upload.file_name, &upload.bytes)
            .await?;

        self.store_in_empty_slot(identity, attachment_id, &path, &upload.file_name)
            .await?;

        tracing::info!(
            %attachment_id,
            uploaded_by = %identity.user_id,
            file_name = %upload.file_name,
            size = upload.bytes.len(),
            "Attachment file uploaded"
        );
        self.get(attachment_id).await
    }

    /// Detaches the file and uploader; the record and its shares stay.
    pub async fn remove(&self, identity: &Identity, attachment_id: Uuid) -> Result<(), ServiceError> {
        let attachment = self.find(attachment_id).await?;
        let grants = AttachmentGrants::load(self.db, identity, &attachment)
            .await
            .map_err(map_db_error)?;
        authorize_attachment(identity, grants, AttachmentAction::Remove)?;

        let Some(path) = attachment.file.clone().filter(|p| !p.is_empty()) else {
            return Ok(());
        };

        let cleared = AttachmentRepository::new(self.db)
            .clear_file(attachment_id, &path)
            .await
            .map_err(map_db_error)?;
        if cleared > 0 {
            self.files.delete_all([&path]).await;
            tracing::info!(%attachment_id, removed_by = %identity.user_id, "Attachment file removed");
        }
        Ok(())
    }

    /// Capability is checked before the file, so callers without access
    /// never learn whether a file exists.
    pub async fn download(
        &self,
        identity: &Identity,
        attachment_id: Uuid,
    ) -> Result<DownloadedFile, ServiceError> {
        let attachment = self.find(attachment_id).await?;
        let grants = AttachmentGrants::load(self.db, identity, &attachment)
            .await
            .map_err(map_db_error)?;
        authorize_attachment(identity, grants, AttachmentAction::Download)?;

        let path = attachment
            .file
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ServiceError::not_found("No file attached."))?;
        let bytes = self.files.read(path).await?;

        let file_name = attachment
            .file_name
            .clone()
            .unwrap_or_else(|| stored_base_name(path));
        Ok(DownloadedFile { file_name, bytes })
    }

    /// Writes the stored blob into the slot if it is still empty. A lost race
    /// or a failed write removes the blob again.
    async fn store_in_empty_slot(
        &self,
        identity: &Identity,
        attachment_id: Uuid,
        path: &str,
        file_name: &str,
    ) -> Result<(), ServiceError> {
        let written = AttachmentRepository::new(self.db)
            .attach_file_if_empty(
                attachment_id,
                StoredFile {
                    path,
                    file_name,
                    uploaded_by: identity.user_id,
                    uploaded_at: Utc::now().naive_utc(),
                },
            )
            .await;

        match written {
            Ok(0) => {
                self.files.delete_all([path]).await;
                tracing::warn!(%attachment_id, "Upload lost to a concurrent upload");
                Err(ServiceError::conflict("Attachment already has a file."))
            }
            Err(e) => {
                self.files.delete_all([path]).await;
                Err(map_db_error(e))
            }
            Ok(_) => Ok(()),
        }
    }

    async fn find(&self, attachment_id: Uuid) -> Result<attachment::Model, ServiceError> {
        AttachmentRepository::new(self.db)
            .find_by_id(attachment_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("Attachment not found."))
    }

    async fn record(&self, attachment: attachment::Model) -> Result<AttachmentRecord, ServiceError> {
        let shared_with = AttachmentRepository::new(self.db)
            .shared_with_ids(attachment.id)
            .await
            .map_err(map_db_error)?;
        Ok(AttachmentRecord {
            attachment,
            shared_with,
        })
    }

    async fn ensure_element(&self, element_id: Uuid) -> Result<(), ServiceError> {
        ElementRepository::new(self.db)
            .find_by_id(element_id)
            .await
            .map_err(map_db_error)?
            .map(|_| ())
            .ok_or_else(|| ServiceError::validation("Element does not exist."))
    }
}

/// Stored names carry a `<uuid>_` prefix; strip it for the download name.
fn stored_base_name(path: &str) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    match base.split_once('_') {
        Some((prefix, rest)) if prefix.len() == 32 && !rest.is_empty() => rest.to_string(),
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::RoleEnum;
    use crate::services::error::ServiceErrorKind;
    use crate::services::test_support::{TempFiles, empty_attachment, migrated_db, user};

    #[tokio::test]
    async fn losing_an_upload_race_discards_the_late_blob() {
        let db = migrated_db().await;
        let files = TempFiles::new().await;
        let professor = user(&db, "Professor1", RoleEnum::Professor).await;
        let attachment = empty_attachment(&db).await;
        let service = AttachmentService::new(&db, &files.store);

        let winner = files.store.save(ATTACHMENT_PREFIX, "a.pdf", b"first").await.unwrap();
        service
            .store_in_empty_slot(&professor, attachment.id, &winner, "a.pdf")
            .await
            .unwrap();

        let late = files.store.save(ATTACHMENT_PREFIX, "b.pdf", b"second").await.unwrap();
        let written = AttachmentRepository::new(&db)
            .attach_file_if_empty(
                attachment.id,
                StoredFile {
                    path: &late,
                    file_name: "b.pdf",
                    uploaded_by: professor.user_id,
                    uploaded_at: Utc::now().naive_utc(),
                },
            )
            .await
            .unwrap();
        assert_eq!(written, 0);

        let err = service
            .store_in_empty_slot(&professor, attachment.id, &late, "b.pdf")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ServiceErrorKind::Conflict);
        assert_eq!(err.message(), "Attachment already has a file.");

        assert_eq!(
            files.store.read(&late).await.unwrap_err().kind(),
            ServiceErrorKind::NotFound
        );
        assert_eq!(files.store.read(&winner).await.unwrap(), b"first");
        let stored = service.get(attachment.id).await.unwrap().attachment;
        assert_eq!(stored.file.as_deref(), Some(winner.as_str()));
        assert_eq!(stored.file_name.as_deref(), Some("a.pdf"));
    }

    #[test]
    fn stored_name_drops_uuid_prefix() {
        assert_eq!(
            stored_base_name("attachments/0123456789abcdef0123456789abcdef_syllabus.pdf"),
            "syllabus.pdf"
        );
        assert_eq!(stored_base_name("attachments/plain.pdf"), "plain.pdf");
    }
}
