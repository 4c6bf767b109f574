mod common;

use common::{file, setup};
use qau_api::entities::sea_orm_active_enums::{RoleEnum, StandardType};
use qau_api::repositories::AttachmentFilter;
use qau_api::repositories::attachment_repository::ATTACHMENT_ORDERING;
use qau_api::repositories::course_repository::CourseFields;
use qau_api::services::course_attachment_service::CourseAttachmentService;
use qau_api::services::course_service::CourseService;
use qau_api::services::error::ServiceErrorKind;
use qau_api::services::request_service::RequestService;
use qau_api::utils::pagination::{MAX_PAGE, Ordering, PageRequest};

#[tokio::test]
async fn syllabus_reaches_a_ta_through_an_approved_request() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let (_, professor) = ctx.user("Professor1", RoleEnum::Professor).await;
    let (_, ta) = ctx.user("TA1", RoleEnum::Ta).await;
    let (_, bystander) = ctx.user("TA2", RoleEnum::Ta).await;
    let year = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;
    let branch = ctx.branch(&admin, &year, "Teaching", vec![professor.user_id]).await;
    assert_eq!(branch.standard.standard.r#type, StandardType::Academic);

    let uploaded = ctx.upload(&professor, branch.attachment.id, b"week 1: ownership").await;
    assert_eq!(uploaded.attachment.uploaded_by, Some(professor.user_id));
    assert_eq!(uploaded.attachment.file_name.as_deref(), Some("syllabus.pdf"));

    let attachments = ctx.attachments();
    let err = attachments.download(&ta, branch.attachment.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Permission);
    assert_eq!(err.message(), "You do not have permission to download this file.");

    let requests = RequestService::new(&ctx.db);
    let request = requests.create(&ta, branch.attachment.id).await.unwrap().request;
    requests.approve(&professor, request.id).await.unwrap();

    let downloaded = attachments.download(&ta, branch.attachment.id).await.unwrap();
    assert_eq!(downloaded.file_name, "syllabus.pdf");
    assert_eq!(downloaded.bytes, b"week 1: ownership");

    let err = attachments.download(&bystander, branch.attachment.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Permission);
    let shared = attachments.get(branch.attachment.id).await.unwrap().shared_with;
    assert_eq!(shared, vec![ta.user_id]);
}

#[tokio::test]
async fn only_assignees_and_admins_upload() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let (_, professor) = ctx.user("Professor1", RoleEnum::Professor).await;
    let (_, supervisor) = ctx.user("Supervisor1", RoleEnum::Supervisor).await;
    let year = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;
    let branch = ctx.branch(&admin, &year, "Teaching", vec![professor.user_id]).await;
    let attachments = ctx.attachments();

    let err = attachments
        .upload(&supervisor, branch.attachment.id, Some(file("plan.pdf", b"x")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Permission);
    assert_eq!(err.message(), "You are not assigned to this standard.");

    let err = attachments
        .upload(&professor, branch.attachment.id, Some(file("plan.pdf", b"")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Validation);
    assert_eq!(err.message(), "No file provided.");

    let err = attachments
        .upload(&professor, branch.attachment.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Validation);

    ctx.upload(&admin, branch.attachment.id, b"admin copy").await;
    let err = attachments
        .upload(&professor, branch.attachment.id, Some(file("plan.pdf", b"second")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Conflict);
    assert_eq!(err.message(), "Attachment already has a file.");
}

#[tokio::test]
async fn remove_clears_the_slot_and_the_blob() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let (_, professor) = ctx.user("Professor1", RoleEnum::Professor).await;
    let year = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;
    let branch = ctx.branch(&admin, &year, "Teaching", vec![professor.user_id]).await;
    let attachments = ctx.attachments();

    let uploaded = ctx.upload(&professor, branch.attachment.id, b"draft").await;
    let stored = uploaded.attachment.file.clone().expect("stored path");
    assert!(ctx.files.read(&stored).await.is_ok());

    attachments.remove(&professor, branch.attachment.id).await.unwrap();
    let cleared = attachments.get(branch.attachment.id).await.unwrap().attachment;
    assert!(!cleared.has_file());
    assert_eq!(cleared.uploaded_by, None);
    assert_eq!(
        ctx.files.read(&stored).await.unwrap_err().kind(),
        ServiceErrorKind::NotFound
    );

    // nothing left to remove is still a success
    attachments.remove(&professor, branch.attachment.id).await.unwrap();

    let err = attachments.download(&professor, branch.attachment.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);

    // the slot accepts a fresh upload again
    ctx.upload(&professor, branch.attachment.id, b"final").await;
}

#[tokio::test]
async fn missing_blob_is_not_found() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let year = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;
    let branch = ctx.branch(&admin, &year, "Teaching", Vec::new()).await;

    let uploaded = ctx.upload(&admin, branch.attachment.id, b"gone soon").await;
    let stored = uploaded.attachment.file.expect("stored path");
    ctx.files.delete(&stored).await.unwrap();

    let err = ctx
        .attachments()
        .download(&admin, branch.attachment.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
}

#[tokio::test]
async fn course_attachments_belong_to_the_course_professor() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let (_, professor) = ctx.user("Professor1", RoleEnum::Professor).await;
    let (_, other) = ctx.user("Professor2", RoleEnum::Professor).await;
    let year = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;

    let courses = CourseService::new(&ctx.db, &ctx.files);
    let course = courses
        .create_course(
            &admin,
            CourseFields {
                academic_year_id: year.id,
                professor_id: Some(professor.user_id),
                title: "Systems Programming".to_string(),
                code: "CS301".to_string(),
                level: 3,
                semester: 1,
                credit_hours: 3,
                department: None,
            },
        )
        .await
        .unwrap();
    let course_file = courses.create_course_file(&admin, course.id, "Lectures").await.unwrap();

    let service = CourseAttachmentService::new(&ctx.db, &ctx.files);
    let err = service
        .create(&other, Some(course_file.id), Some(file("l1.pdf", b"slides")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Permission);

    let err = service
        .create(&professor, None, Some(file("l1.pdf", b"slides")))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Course file is required.");

    let created = service
        .create(&professor, Some(course_file.id), Some(file("l1.pdf", b"slides")))
        .await
        .unwrap();
    assert_eq!(created.course_file_id, course_file.id);

    let err = service.download(&other, created.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Permission);
    let downloaded = service.download(&admin, created.id).await.unwrap();
    assert_eq!(downloaded.bytes, b"slides");
}

#[tokio::test]
async fn listing_far_past_the_end_is_empty() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let year = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;
    ctx.branch(&admin, &year, "Teaching", Vec::new()).await;

    let ordering = Ordering::parse(None, ATTACHMENT_ORDERING, "-created_at").unwrap();
    let page = ctx
        .attachments()
        .list(
            &AttachmentFilter::default(),
            PageRequest::new(u64::MAX, 50),
            &ordering,
        )
        .await
        .unwrap();
    assert_eq!(page.count, 1);
    assert!(page.results.is_empty());
    assert_eq!(page.page, MAX_PAGE);
}
