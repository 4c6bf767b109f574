use sea_orm::{ConnectionTrait, DbErr};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::{attachment, course, request};
use crate::repositories::{AttachmentRepository, StandardRepository};
use crate::services::error::ServiceError;

/// Authenticated caller, passed explicitly to every service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: RoleEnum,
}

impl Identity {
    pub fn new(user_id: Uuid, role: RoleEnum) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == RoleEnum::Admin
    }
}

pub fn require_admin(identity: &Identity) -> Result<(), ServiceError> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::permission(
            "You do not have permission to perform this action.",
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    AssignedToStandard,
    SharedWithAttachment,
    Administrator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentAction {
    Upload,
    Remove,
    Download,
}

impl AttachmentAction {
    /// Capabilities that authorize the action; any one of them suffices.
    pub fn granted_by(&self) -> &'static [Capability] {
        match self {
            AttachmentAction::Upload | AttachmentAction::Remove => {
                &[Capability::AssignedToStandard, Capability::Administrator]
            }
            AttachmentAction::Download => &[
                Capability::AssignedToStandard,
                Capability::SharedWithAttachment,
                Capability::Administrator,
            ],
        }
    }

    pub fn denied_message(&self) -> &'static str {
        match self {
            AttachmentAction::Upload | AttachmentAction::Remove => {
                "You are not assigned to this standard."
            }
            AttachmentAction::Download => "You do not have permission to download this file.",
        }
    }
}

/// Membership facts about one caller and one attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachmentGrants {
    pub assigned_to_standard: bool,
    pub shared_with_attachment: bool,
}

impl AttachmentGrants {
    pub async fn load<C>(
        db: &C,
        identity: &Identity,
        attachment: &attachment::Model,
    ) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let assigned_to_standard = StandardRepository::new(db)
            .is_assigned_to_element_standard(attachment.element_id, identity.user_id)
            .await?;
        let shared_with_attachment = AttachmentRepository::new(db)
            .is_shared_with(attachment.id, identity.user_id)
            .await?;

        Ok(Self {
            assigned_to_standard,
            shared_with_attachment,
        })
    }
}

pub fn capabilities(identity: &Identity, grants: AttachmentGrants) -> Vec<Capability> {
    let mut held = Vec::with_capacity(3);
    if grants.assigned_to_standard {
        held.push(Capability::AssignedToStandard);
    }
    if grants.shared_with_attachment {
        held.push(Capability::SharedWithAttachment);
    }
    if identity.is_admin() {
        held.push(Capability::Administrator);
    }
    held
}

pub fn is_permitted(identity: &Identity, grants: AttachmentGrants, action: AttachmentAction) -> bool {
    let held = capabilities(identity, grants);
    action.granted_by().iter().any(|cap| held.contains(cap))
}

pub fn authorize_attachment(
    identity: &Identity,
    grants: AttachmentGrants,
    action: AttachmentAction,
) -> Result<(), ServiceError> {
    if is_permitted(identity, grants, action) {
        Ok(())
    } else {
        Err(ServiceError::permission(action.denied_message()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Approve,
    Reject,
    Cancel,
}

impl RequestAction {
    pub fn verb(&self) -> &'static str {
        match self {
            RequestAction::Approve => "approve",
            RequestAction::Reject => "reject",
            RequestAction::Cancel => "cancel",
        }
    }
}

/// Approve/reject belong to the receiver, cancel to the requester. Admins may do all three.
pub fn may_act_on_request(identity: &Identity, request: &request::Model, action: RequestAction) -> bool {
    if identity.is_admin() {
        return true;
    }
    match action {
        RequestAction::Approve | RequestAction::Reject => request.receiver_id == identity.user_id,
        RequestAction::Cancel => request.requester_id == identity.user_id,
    }
}

pub fn may_view_request(identity: &Identity, request: &request::Model) -> bool {
    identity.is_admin()
        || request.requester_id == identity.user_id
        || request.receiver_id == identity.user_id
}

/// Course attachments are managed by the course professor or an admin.
pub fn may_manage_course(identity: &Identity, course: &course::Model) -> bool {
    identity.is_admin() || course.professor_id == Some(identity.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::RequestStatus;

    fn identity(role: RoleEnum) -> Identity {
        Identity::new(Uuid::new_v4(), role)
    }

    #[test]
    fn admin_holds_every_right_without_membership() {
        let admin = identity(RoleEnum::Admin);
        for action in [
            AttachmentAction::Upload,
            AttachmentAction::Remove,
            AttachmentAction::Download,
        ] {
            assert!(is_permitted(&admin, AttachmentGrants::default(), action));
        }
    }

    #[test]
    fn shared_with_grants_download_only() {
        let ta = identity(RoleEnum::Ta);
        let grants = AttachmentGrants {
            assigned_to_standard: false,
            shared_with_attachment: true,
        };
        assert!(is_permitted(&ta, grants, AttachmentAction::Download));
        assert!(!is_permitted(&ta, grants, AttachmentAction::Upload));
        assert!(!is_permitted(&ta, grants, AttachmentAction::Remove));
    }

    #[test]
    fn assignee_may_upload_remove_and_download() {
        let professor = identity(RoleEnum::Professor);
        let grants = AttachmentGrants {
            assigned_to_standard: true,
            shared_with_attachment: false,
        };
        assert!(is_permitted(&professor, grants, AttachmentAction::Upload));
        assert!(is_permitted(&professor, grants, AttachmentAction::Remove));
        assert!(is_permitted(&professor, grants, AttachmentAction::Download));
    }

    #[test]
    fn stranger_is_denied_with_action_message() {
        let supervisor = identity(RoleEnum::Supervisor);
        let err =
            authorize_attachment(&supervisor, AttachmentGrants::default(), AttachmentAction::Download)
                .unwrap_err();
        assert_eq!(err.message(), "You do not have permission to download this file.");
    }

    #[test]
    fn request_actions_follow_roles_in_request() {
        let requester = identity(RoleEnum::Ta);
        let receiver = identity(RoleEnum::Professor);
        let now = chrono::Utc::now().naive_utc();
        let request = request::Model {
            id: Uuid::new_v4(),
            requester_id: requester.user_id,
            receiver_id: receiver.user_id,
            made_on_id: Uuid::new_v4(),
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        assert!(may_act_on_request(&receiver, &request, RequestAction::Approve));
        assert!(!may_act_on_request(&requester, &request, RequestAction::Approve));
        assert!(may_act_on_request(&requester, &request, RequestAction::Cancel));
        assert!(!may_act_on_request(&receiver, &request, RequestAction::Cancel));
        assert!(may_act_on_request(&identity(RoleEnum::Admin), &request, RequestAction::Reject));
        assert!(!may_view_request(&identity(RoleEnum::Ta), &request));
    }
}
