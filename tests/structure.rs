mod common;

use common::setup;
use qau_api::entities::sea_orm_active_enums::RoleEnum;
use qau_api::services::error::ServiceErrorKind;
use qau_api::services::structure_service::StructureService;
use uuid::Uuid;

#[tokio::test]
async fn nests_the_hierarchy_and_flags_files() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let (_, professor) = ctx.user("Professor1", RoleEnum::Professor).await;
    let year = ctx.year(&admin, (2024, 9, 1), (2025, 6, 30)).await;
    let other_year = ctx.year(&admin, (2023, 9, 1), (2024, 6, 30)).await;

    let filled = ctx.branch(&admin, &year, "Teaching", vec![professor.user_id]).await;
    let empty = ctx.branch(&admin, &year, "Research", Vec::new()).await;
    ctx.branch(&admin, &other_year, "Outreach", Vec::new()).await;
    ctx.upload(&professor, filled.attachment.id, b"syllabus").await;

    let structure = StructureService::new(&ctx.db).structure(year.id).await.unwrap();
    assert_eq!(structure.academic_year.id, year.id);
    assert_eq!(structure.standards.len(), 2);
    assert!(structure.courses.is_empty());

    let leaf = |standard_id: Uuid| {
        let standard = structure
            .standards
            .iter()
            .find(|s| s.id == standard_id)
            .expect("standard in structure");
        assert_eq!(standard.pointers.len(), 1);
        assert_eq!(standard.pointers[0].elements.len(), 1);
        let attachments = &standard.pointers[0].elements[0].attachments;
        assert_eq!(attachments.len(), 1);
        (attachments[0].id, attachments[0].has_file)
    };
    assert_eq!(leaf(filled.standard.standard.id), (filled.attachment.id, true));
    assert_eq!(leaf(empty.standard.standard.id), (empty.attachment.id, false));

    let json = serde_json::to_value(&structure).unwrap();
    let node = &json["standards"][0]["pointers"][0]["elements"][0]["attachments"][0];
    let keys: Vec<&str> = node.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 3);
    for key in ["id", "title", "has_file"] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert!(json["standards"][0].get("type").is_some());
}

#[tokio::test]
async fn unknown_year_is_not_found() {
    let ctx = setup().await;
    let err = StructureService::new(&ctx.db)
        .structure(Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
}
