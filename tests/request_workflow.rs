mod common;

use common::{TestContext, setup};
use qau_api::entities::sea_orm_active_enums::{RequestStatus, RoleEnum};
use qau_api::repositories::RequestFilter;
use qau_api::repositories::request_repository::REQUEST_ORDERING;
use qau_api::services::access::Identity;
use qau_api::services::error::ServiceErrorKind;
use qau_api::services::request_service::{RequestRecord, RequestService};
use qau_api::utils::pagination::{Ordering, PageRequest};
use uuid::Uuid;

struct Scenario {
    ctx: TestContext,
    admin: Identity,
    professor: Identity,
    ta: Identity,
    attachment_id: Uuid,
}

/// Professor assigned to a standard has uploaded a syllabus; a TA wants it.
async fn scenario() -> Scenario {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let (_, professor) = ctx.user("Professor1", RoleEnum::Professor).await;
    let (_, ta) = ctx.user("TA1", RoleEnum::Ta).await;
    let year = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;
    let branch = ctx.branch(&admin, &year, "Teaching", vec![professor.user_id]).await;
    ctx.upload(&professor, branch.attachment.id, b"%PDF-1.4 syllabus").await;

    Scenario {
        ctx,
        admin,
        professor,
        ta,
        attachment_id: branch.attachment.id,
    }
}

async fn open_request(s: &Scenario) -> RequestRecord {
    RequestService::new(&s.ctx.db)
        .create(&s.ta, s.attachment_id)
        .await
        .expect("create request")
}

#[tokio::test]
async fn request_targets_the_uploader() {
    let s = scenario().await;
    let record = open_request(&s).await;

    assert_eq!(record.request.requester_id, s.ta.user_id);
    assert_eq!(record.request.receiver_id, s.professor.user_id);
    assert_eq!(record.request.status, RequestStatus::Pending);
    assert_eq!(record.requester.map(|u| u.username).as_deref(), Some("TA1"));
}

#[tokio::test]
async fn approval_shares_the_attachment_once() {
    let s = scenario().await;
    let request = open_request(&s).await.request;
    let requests = RequestService::new(&s.ctx.db);

    let approved = requests.approve(&s.professor, request.id).await.unwrap();
    assert_eq!(approved.request.status, RequestStatus::Approved);

    let attachment = s.ctx.attachments().get(s.attachment_id).await.unwrap();
    assert_eq!(attachment.shared_with, vec![s.ta.user_id]);

    let err = requests.approve(&s.professor, request.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Conflict);
    assert_eq!(err.message(), "Cannot approve a request with status 'Approved'.");

    let err = requests.cancel(&s.ta, request.id).await.unwrap_err();
    assert_eq!(err.message(), "Cannot cancel a request with status 'Approved'.");
}

#[tokio::test]
async fn rejection_grants_nothing() {
    let s = scenario().await;
    let request = open_request(&s).await.request;

    let rejected = RequestService::new(&s.ctx.db)
        .reject(&s.professor, request.id)
        .await
        .unwrap();
    assert_eq!(rejected.request.status, RequestStatus::Rejected);

    let attachment = s.ctx.attachments().get(s.attachment_id).await.unwrap();
    assert!(attachment.shared_with.is_empty());
}

#[tokio::test]
async fn only_the_receiver_decides_and_only_the_requester_cancels() {
    let s = scenario().await;
    let request = open_request(&s).await.request;
    let requests = RequestService::new(&s.ctx.db);

    let err = requests.approve(&s.ta, request.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Permission);
    assert_eq!(err.message(), "You do not have permission to approve this request.");

    let err = requests.cancel(&s.professor, request.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Permission);

    let canceled = requests.cancel(&s.ta, request.id).await.unwrap();
    assert_eq!(canceled.request.status, RequestStatus::Canceled);
}

#[tokio::test]
async fn unrelated_users_cannot_see_requests() {
    let s = scenario().await;
    let request = open_request(&s).await.request;
    let (_, outsider) = s.ctx.user("TA2", RoleEnum::Ta).await;
    let requests = RequestService::new(&s.ctx.db);

    let err = requests.get(&outsider, request.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
    let err = requests.approve(&outsider, request.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);

    let ordering = Ordering::parse(None, REQUEST_ORDERING, "-created_at").unwrap();
    let mine = requests
        .list(&outsider, RequestFilter::default(), PageRequest::default(), &ordering)
        .await
        .unwrap();
    assert_eq!(mine.count, 0);

    let all = requests
        .list(&s.admin, RequestFilter::default(), PageRequest::default(), &ordering)
        .await
        .unwrap();
    assert_eq!(all.count, 1);
    assert!(requests.get(&s.admin, request.id).await.unwrap().made_on.is_some());
}

#[tokio::test]
async fn cannot_request_an_empty_attachment() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let (_, ta) = ctx.user("TA1", RoleEnum::Ta).await;
    let year = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;
    let branch = ctx.branch(&admin, &year, "Research", Vec::new()).await;

    let err = RequestService::new(&ctx.db)
        .create(&ta, branch.attachment.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Validation);
    assert_eq!(err.message(), "Attachment must have a file.");

    let err = RequestService::new(&ctx.db)
        .create(&ta, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Attachment does not exist.");
}

#[tokio::test]
async fn admin_status_edit_respects_terminal_states() {
    let s = scenario().await;
    let request = open_request(&s).await.request;
    let requests = RequestService::new(&s.ctx.db);

    let err = requests
        .set_status(&s.professor, request.id, RequestStatus::Approved)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Permission);

    let approved = requests
        .set_status(&s.admin, request.id, RequestStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.request.status, RequestStatus::Approved);

    let err = requests
        .set_status(&s.admin, request.id, RequestStatus::Pending)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Conflict);

    let err = requests.delete(&s.professor, request.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Permission);
    requests.delete(&s.admin, request.id).await.unwrap();
    let err = requests.delete(&s.admin, request.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
}
