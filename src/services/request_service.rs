use std::collections::HashMap;

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::RequestStatus;
use crate::entities::{attachment, request, user};
use crate::repositories::{AttachmentRepository, RequestFilter, RequestRepository, UserRepository};
use crate::services::access::{Identity, RequestAction, may_act_on_request, may_view_request, require_admin};
use crate::services::error::{ServiceError, map_db_error};
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

/// A request with the users it names, and optionally the attachment it targets.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub request: request::Model,
    pub requester: Option<user::Model>,
    pub receiver: Option<user::Model>,
    pub made_on: Option<attachment::Model>,
}

pub struct RequestService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RequestService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Non-admins only see requests they made or received.
    pub async fn list(
        &self,
        identity: &Identity,
        mut filter: RequestFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<Paginated<RequestRecord>, ServiceError> {
        if !identity.is_admin() {
            filter.involving = Some(identity.user_id);
        }

        let (requests, total) = RequestRepository::new(self.db)
            .find_page(&filter, page, ordering)
            .await
            .map_err(map_db_error)?;

        let mut user_ids: Vec<Uuid> = requests
            .iter()
            .flat_map(|r| [r.requester_id, r.receiver_id])
            .collect();
        user_ids.sort();
        user_ids.dedup();
        let users: HashMap<Uuid, user::Model> = UserRepository::new(self.db)
            .find_by_ids(&user_ids)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let records = requests
            .into_iter()
            .map(|request| RequestRecord {
                requester: users.get(&request.requester_id).cloned(),
                receiver: users.get(&request.receiver_id).cloned(),
                made_on: None,
                request,
            })
            .collect();

        Ok(Paginated::new(records, total, page))
    }

    pub async fn get(&self, identity: &Identity, request_id: Uuid) -> Result<RequestRecord, ServiceError> {
        let request = self.find_visible(identity, request_id).await?;
        self.record(request, true).await
    }

    /// The receiver is always the uploader of the targeted attachment.
    pub async fn create(&self, identity: &Identity, made_on_id: Uuid) -> Result<RequestRecord, ServiceError> {
        let attachment = AttachmentRepository::new(self.db)
            .find_by_id(made_on_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::validation("Attachment does not exist."))?;

        if !attachment.has_file() {
            return Err(ServiceError::validation("Attachment must have a file."));
        }
        let receiver_id = attachment
            .uploaded_by
            .ok_or_else(|| ServiceError::validation("Attachment must have an uploader."))?;

        let request = RequestRepository::new(self.db)
            .create(identity.user_id, receiver_id, attachment.id)
            .await
            .map_err(map_db_error)?;

        tracing::info!(
            request_id = %request.id,
            requester_id = %request.requester_id,
            receiver_id = %request.receiver_id,
            attachment_id = %attachment.id,
            "Access request created"
        );
        self.record(request, false).await
    }

    pub async fn approve(&self, identity: &Identity, request_id: Uuid) -> Result<RequestRecord, ServiceError> {
        self.transition(identity, request_id, RequestAction::Approve).await
    }

    pub async fn reject(&self, identity: &Identity, request_id: Uuid) -> Result<RequestRecord, ServiceError> {
        self.transition(identity, request_id, RequestAction::Reject).await
    }

    pub async fn cancel(&self, identity: &Identity, request_id: Uuid) -> Result<RequestRecord, ServiceError> {
        self.transition(identity, request_id, RequestAction::Cancel).await
    }

    /// Admin status edit. Goes through the same guarded transition, so
    /// terminal requests stay immutable.
    pub async fn set_status(
        &self,
        identity: &Identity,
        request_id: Uuid,
        status: RequestStatus,
    ) -> Result<RequestRecord, ServiceError> {
        require_admin(identity)?;
        let action = match status {
            RequestStatus::Approved => RequestAction::Approve,
            RequestStatus::Rejected => RequestAction::Reject,
            RequestStatus::Canceled => RequestAction::Cancel,
            RequestStatus::Pending => {
                let request = self.find_visible(identity, request_id).await?;
                if request.status != RequestStatus::Pending {
                    return Err(ServiceError::conflict(format!(
                        "Cannot change a request with status '{}'.",
                        request.status.label()
                    )));
                }
                return self.record(request, false).await;
            }
        };
        self.transition(identity, request_id, action).await
    }

    pub async fn delete(&self, identity: &Identity, request_id: Uuid) -> Result<(), ServiceError> {
        require_admin(identity)?;
        let deleted = RequestRepository::new(self.db)
            .delete(request_id)
            .await
            .map_err(map_db_error)?;
        if deleted == 0 {
            return Err(ServiceError::not_found("Request not found."));
        }
        tracing::info!(%request_id, "Request deleted");
        Ok(())
    }

    /// Pending → terminal, at most once. The status write and, for approval,
    /// the share insert commit together.
    async fn transition(
        &self,
        identity: &Identity,
        request_id: Uuid,
        action: RequestAction,
    ) -> Result<RequestRecord, ServiceError> {
        let txn = self.db.begin().await.map_err(map_db_error)?;
        let requests = RequestRepository::new(&txn);

        let request = requests
            .find_by_id(request_id)
            .await
            .map_err(map_db_error)?
            .filter(|r| may_view_request(identity, r))
            .ok_or_else(|| ServiceError::not_found("Request not found."))?;

        if !may_act_on_request(identity, &request, action) {
            return Err(ServiceError::permission(format!(
                "You do not have permission to {} this request.",
                action.verb()
            )));
        }
        if request.status.is_terminal() {
            return Err(not_pending(action, request.status));
        }

        apply_transition(&txn, request_id, action).await?;

        if action == RequestAction::Approve {
            AttachmentRepository::new(&txn)
                .add_share(request.made_on_id, request.requester_id)
                .await
                .map_err(map_db_error)?;
        }

        let updated = requests
            .find_by_id(request_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("Request not found."))?;
        txn.commit().await.map_err(map_db_error)?;

        tracing::info!(
            %request_id,
            actor_id = %identity.user_id,
            status = ?updated.status,
            "Request {}",
            updated.status.label().to_lowercase()
        );
        self.record(updated, false).await
    }

    async fn find_visible(&self, identity: &Identity, request_id: Uuid) -> Result<request::Model, ServiceError> {
        RequestRepository::new(self.db)
            .find_by_id(request_id)
            .await
            .map_err(map_db_error)?
            .filter(|r| may_view_request(identity, r))
            .ok_or_else(|| ServiceError::not_found("Request not found."))
    }

    async fn record(&self, request: request::Model, with_attachment: bool) -> Result<RequestRecord, ServiceError> {
        let users = UserRepository::new(self.db);
        let requester = users.find_by_id(request.requester_id).await.map_err(map_db_error)?;
        let receiver = users.find_by_id(request.receiver_id).await.map_err(map_db_error)?;
        let made_on = if with_attachment {
            AttachmentRepository::new(self.db)
                .find_by_id(request.made_on_id)
                .await
                .map_err(map_db_error)?
        } else {
            None
        };

        Ok(RequestRecord {
            request,
            requester,
            receiver,
            made_on,
        })
    }
}

fn target_status(action: RequestAction) -> RequestStatus {
    match action {
        RequestAction::Approve => RequestStatus::Approved,
        RequestAction::Reject => RequestStatus::Rejected,
        RequestAction::Cancel => RequestStatus::Canceled,
    }
}

/// Guarded pending → terminal write. When another transition got there
/// first, the error names the status it left behind.
async fn apply_transition<C: ConnectionTrait>(
    db: &C,
    request_id: Uuid,
    action: RequestAction,
) -> Result<(), ServiceError> {
    let requests = RequestRepository::new(db);
    let written = requests
        .transition_from_pending(request_id, target_status(action))
        .await
        .map_err(map_db_error)?;
    if written > 0 {
        return Ok(());
    }

    let current = requests
        .find_by_id(request_id)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| ServiceError::not_found("Request not found."))?;
    tracing::warn!(
        %request_id,
        status = ?current.status,
        "Request transition lost to a concurrent one"
    );
    Err(not_pending(action, current.status))
}

fn not_pending(action: RequestAction, status: RequestStatus) -> ServiceError {
    ServiceError::conflict(format!(
        "Cannot {} a request with status '{}'.",
        action.verb(),
        status.label()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::RoleEnum;
    use crate::services::error::ServiceErrorKind;
    use crate::services::test_support::{empty_attachment, migrated_db, user};

    #[tokio::test]
    async fn losing_a_transition_race_names_the_winning_status() {
        let db = migrated_db().await;
        let ta = user(&db, "TA1", RoleEnum::Ta).await;
        let professor = user(&db, "Professor1", RoleEnum::Professor).await;
        let attachment = empty_attachment(&db).await;
        let requests = RequestRepository::new(&db);
        let request = requests
            .create(ta.user_id, professor.user_id, attachment.id)
            .await
            .unwrap();

        let first = requests
            .transition_from_pending(request.id, RequestStatus::Approved)
            .await
            .unwrap();
        assert_eq!(first, 1);
        let second = requests
            .transition_from_pending(request.id, RequestStatus::Canceled)
            .await
            .unwrap();
        assert_eq!(second, 0);

        let err = apply_transition(&db, request.id, RequestAction::Cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ServiceErrorKind::Conflict);
        assert_eq!(err.message(), "Cannot cancel a request with status 'Approved'.");

        let stored = requests.find_by_id(request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Approved);
    }

    #[tokio::test]
    async fn transition_of_a_vanished_request_is_not_found() {
        let db = migrated_db().await;
        let err = apply_transition(&db, Uuid::new_v4(), RequestAction::Approve)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ServiceErrorKind::NotFound);
    }
}
