mod common;

use common::{date, setup};
use qau_api::entities::sea_orm_active_enums::{AcademicYearStatus, RoleEnum};
use qau_api::repositories::course_repository::CourseFields;
use qau_api::repositories::academic_year_repository::ACADEMIC_YEAR_ORDERING;
use qau_api::repositories::{AcademicYearFilter, AcademicYearRepository};
use qau_api::services::attachment_service::NewAttachment;
use qau_api::services::course_service::CourseService;
use qau_api::services::error::ServiceErrorKind;
use qau_api::services::replication_service::{CopiedCounts, NewYear, ReplicationService};
use qau_api::services::structure_service::StructureService;
use qau_api::utils::pagination::{Ordering, PageRequest};

fn next_year() -> NewYear {
    NewYear {
        start_date: date((2025, 9, 1)),
        end_date: date((2026, 6, 30)),
        status: AcademicYearStatus::Active,
    }
}

#[tokio::test]
async fn first_year_is_kept_even_without_a_source() {
    let ctx = setup().await;
    let admin = ctx.admin().await;

    let err = ReplicationService::new(&ctx.db)
        .create_new_year(&admin, next_year())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
    assert_eq!(err.message(), "No existing academic year found to copy from.");

    let ordering = Ordering::parse(None, ACADEMIC_YEAR_ORDERING, "-start_date").unwrap();
    let (years, total) = AcademicYearRepository::new(&ctx.db)
        .find_page(&AcademicYearFilter::default(), PageRequest::default(), &ordering)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(years[0].start_date, date((2025, 9, 1)));
}

#[tokio::test]
async fn only_admins_start_a_new_year() {
    let ctx = setup().await;
    let (_, professor) = ctx.user("Professor1", RoleEnum::Professor).await;

    let err = ReplicationService::new(&ctx.db)
        .create_new_year(&professor, next_year())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Permission);
}

#[tokio::test]
async fn structure_is_copied_without_files_or_people() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let (_, professor) = ctx.user("Professor1", RoleEnum::Professor).await;
    let (_, ta) = ctx.user("TA1", RoleEnum::Ta).await;
    let source = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;

    let teaching = ctx.branch(&admin, &source, "Teaching", vec![professor.user_id]).await;
    ctx.branch(&admin, &source, "Research", Vec::new()).await;
    ctx.upload(&professor, teaching.attachment.id, b"syllabus").await;
    ctx.attachments()
        .create(
            &admin,
            NewAttachment {
                element_id: teaching.element.id,
                title: "Exam".to_string(),
                shared_with_ids: vec![ta.user_id],
            },
        )
        .await
        .unwrap();

    let courses = CourseService::new(&ctx.db, &ctx.files);
    let course = courses
        .create_course(
            &admin,
            CourseFields {
                academic_year_id: source.id,
                professor_id: Some(professor.user_id),
                title: "Compilers".to_string(),
                code: "CS401".to_string(),
                level: 4,
                semester: 2,
                credit_hours: 3,
                department: None,
            },
        )
        .await
        .unwrap();
    courses.create_course_file(&admin, course.id, "Lectures").await.unwrap();
    courses.create_course_file(&admin, course.id, "Exams").await.unwrap();

    let outcome = ReplicationService::new(&ctx.db)
        .create_new_year(&admin, next_year())
        .await
        .unwrap();

    assert_eq!(outcome.source.id, source.id);
    assert_eq!(
        outcome.copied,
        CopiedCounts {
            standards: 2,
            pointers: 2,
            elements: 2,
            attachments: 3,
            courses: 1,
            course_files: 2,
        }
    );

    let structure = StructureService::new(&ctx.db)
        .structure(outcome.academic_year.id)
        .await
        .unwrap();
    let leaves: Vec<_> = structure
        .standards
        .iter()
        .flat_map(|s| &s.pointers)
        .flat_map(|p| &p.elements)
        .flat_map(|e| &e.attachments)
        .collect();
    assert_eq!(leaves.len(), 3);
    assert!(leaves.iter().all(|leaf| !leaf.has_file));

    let copied_course = &structure.courses[0];
    assert_eq!(copied_course.code, "CS401_2025");
    assert_eq!(copied_course.course_files.len(), 2);

    let copied = courses.get_course(copied_course.id).await.unwrap();
    assert_eq!(copied.professor_id, Some(professor.user_id));
    assert_eq!(copied.academic_year_id, outcome.academic_year.id);

    for standard in &structure.standards {
        let record = ctx.hierarchy().get_standard(standard.id).await.unwrap();
        assert!(record.assigned_to.is_empty());
    }
    for leaf in leaves {
        let record = ctx.attachments().get(leaf.id).await.unwrap();
        assert!(record.shared_with.is_empty());
        assert_eq!(record.attachment.uploaded_by, None);
    }
}

#[tokio::test]
async fn overlong_copied_code_fails_before_anything_is_written() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let source = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;
    ctx.branch(&admin, &source, "Teaching", Vec::new()).await;

    // fits today, but not once `_2025` is appended
    let code = "X".repeat(46);
    CourseService::new(&ctx.db, &ctx.files)
        .create_course(
            &admin,
            CourseFields {
                academic_year_id: source.id,
                professor_id: None,
                title: "Capstone".to_string(),
                code: code.clone(),
                level: 4,
                semester: 1,
                credit_hours: 4,
                department: None,
            },
        )
        .await
        .unwrap();

    let err = ReplicationService::new(&ctx.db)
        .create_new_year(&admin, next_year())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Validation);
    assert!(err.message().contains(&code), "{}", err.message());

    let ordering = Ordering::parse(None, ACADEMIC_YEAR_ORDERING, "-start_date").unwrap();
    let (years, total) = AcademicYearRepository::new(&ctx.db)
        .find_page(&AcademicYearFilter::default(), PageRequest::default(), &ordering)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(years[0].id, source.id);
}

#[tokio::test]
async fn course_codes_are_bounded_on_create() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let year = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;

    let err = CourseService::new(&ctx.db, &ctx.files)
        .create_course(
            &admin,
            CourseFields {
                academic_year_id: year.id,
                professor_id: None,
                title: "Capstone".to_string(),
                code: "X".repeat(51),
                level: 4,
                semester: 1,
                credit_hours: 4,
                department: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Validation);
    assert_eq!(err.message(), "Code may not exceed 50 characters.");
}
