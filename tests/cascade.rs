mod common;

use common::{Branch, TestContext, file, setup};
use qau_api::entities::sea_orm_active_enums::RoleEnum;
use qau_api::entities::{
    academic_year, attachment, attachment_share, course, course_attachment, course_file, element,
    pointer, request, standard, standard_assignee,
};
use qau_api::repositories::course_repository::CourseFields;
use qau_api::services::academic_year_service::AcademicYearService;
use qau_api::services::access::Identity;
use qau_api::services::course_attachment_service::CourseAttachmentService;
use qau_api::services::course_service::CourseService;
use qau_api::services::error::ServiceErrorKind;
use qau_api::services::request_service::RequestService;
use qau_api::services::user_service::UserService;
use sea_orm::{EntityTrait, PaginatorTrait};

/// A year holding one uploaded and shared attachment, one pending request,
/// and a course with an uploaded course attachment.
struct Populated {
    ctx: TestContext,
    admin: Identity,
    professor: Identity,
    ta: Identity,
    year: academic_year::Model,
    branch: Branch,
    attachment_blob: String,
    course: course::Model,
    course_blob: String,
}

async fn populated() -> Populated {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let (_, professor) = ctx.user("Professor1", RoleEnum::Professor).await;
    let (_, ta) = ctx.user("TA1", RoleEnum::Ta).await;
    let (_, other_ta) = ctx.user("TA2", RoleEnum::Ta).await;
    let year = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;
    let branch = ctx.branch(&admin, &year, "Teaching", vec![professor.user_id]).await;

    let uploaded = ctx.upload(&professor, branch.attachment.id, b"syllabus").await;
    let attachment_blob = uploaded.attachment.file.expect("stored path");

    let requests = RequestService::new(&ctx.db);
    let approved = requests.create(&ta, branch.attachment.id).await.unwrap().request;
    requests.approve(&professor, approved.id).await.unwrap();
    requests.create(&other_ta, branch.attachment.id).await.unwrap();

    let courses = CourseService::new(&ctx.db, &ctx.files);
    let course = courses
        .create_course(
            &admin,
            CourseFields {
                academic_year_id: year.id,
                professor_id: Some(professor.user_id),
                title: "Operating Systems".to_string(),
                code: "CS302".to_string(),
                level: 3,
                semester: 2,
                credit_hours: 3,
                department: None,
            },
        )
        .await
        .unwrap();
    let course_file = courses.create_course_file(&admin, course.id, "Labs").await.unwrap();
    let course_blob = CourseAttachmentService::new(&ctx.db, &ctx.files)
        .create(&professor, Some(course_file.id), Some(file("lab1.pdf", b"lab")))
        .await
        .unwrap()
        .file;

    Populated {
        ctx,
        admin,
        professor,
        ta,
        year,
        branch,
        attachment_blob,
        course,
        course_blob,
    }
}

#[tokio::test]
async fn deleting_a_year_removes_everything_it_owns() {
    let p = populated().await;
    let db = &p.ctx.db;

    AcademicYearService::new(db, &p.ctx.files)
        .delete(&p.admin, p.year.id)
        .await
        .unwrap();

    assert_eq!(standard::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(pointer::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(element::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(attachment::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(standard_assignee::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(attachment_share::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(request::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(course::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(course_file::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(course_attachment::Entity::find().count(db).await.unwrap(), 0);

    let err = p.ctx.attachments().get(p.branch.attachment.id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);

    for blob in [&p.attachment_blob, &p.course_blob] {
        let err = p.ctx.files.read(blob).await.unwrap_err();
        assert_eq!(err.kind(), ServiceErrorKind::NotFound);
    }
}

#[tokio::test]
async fn deleting_a_standard_leaves_sibling_years_alone() {
    let p = populated().await;
    let next = p.ctx.year(&p.admin, (2025, 9, 1), (2026, 6, 30)).await;
    let kept = p.ctx.branch(&p.admin, &next, "Research", Vec::new()).await;

    p.ctx
        .hierarchy()
        .delete_standard(&p.admin, p.branch.standard.standard.id)
        .await
        .unwrap();

    assert!(p.ctx.attachments().get(kept.attachment.id).await.is_ok());
    assert_eq!(attachment::Entity::find().count(&p.ctx.db).await.unwrap(), 1);
    assert_eq!(request::Entity::find().count(&p.ctx.db).await.unwrap(), 0);
    assert!(p.ctx.files.read(&p.attachment_blob).await.is_err());
    // courses belong to the year, not the standard
    assert!(p.ctx.files.read(&p.course_blob).await.is_ok());
}

#[tokio::test]
async fn deleting_a_user_detaches_them_but_keeps_files() {
    let p = populated().await;
    let db = &p.ctx.db;
    let users = UserService::new(db);

    users.delete(&p.admin, p.professor.user_id).await.unwrap();

    let attachment = p.ctx.attachments().get(p.branch.attachment.id).await.unwrap();
    assert_eq!(attachment.attachment.uploaded_by, None);
    assert!(attachment.attachment.has_file());
    assert_eq!(attachment.shared_with, vec![p.ta.user_id]);
    assert!(p.ctx.files.read(&p.attachment_blob).await.is_ok());

    let course = CourseService::new(db, &p.ctx.files)
        .get_course(p.course.id)
        .await
        .unwrap();
    assert_eq!(course.professor_id, None);

    // the professor received both requests
    assert_eq!(request::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(standard_assignee::Entity::find().count(db).await.unwrap(), 0);

    let err = RequestService::new(db)
        .create(&p.ta, p.branch.attachment.id)
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Attachment must have an uploader.");

    users.delete(&p.admin, p.ta.user_id).await.unwrap();
    assert_eq!(attachment_share::Entity::find().count(db).await.unwrap(), 0);

    let err = users.get(&p.admin, p.ta.user_id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
}
