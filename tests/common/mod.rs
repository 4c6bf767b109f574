#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use qau_api::entities::sea_orm_active_enums::{AcademicYearStatus, RoleEnum, StandardType};
use qau_api::entities::{academic_year, attachment, element, pointer, user};
use qau_api::repositories::UserRepository;
use qau_api::repositories::user_repository::NewUser;
use qau_api::services::academic_year_service::AcademicYearService;
use qau_api::services::access::Identity;
use qau_api::services::attachment_service::{
    AttachmentRecord, AttachmentService, NewAttachment, UploadedFile,
};
use qau_api::services::hierarchy_service::{HierarchyService, NewStandard, StandardRecord};
use qau_api::utils::file_store::FileStore;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Migrated in-memory database plus a private media root.
pub struct TestContext {
    pub db: DatabaseConnection,
    pub files: FileStore,
    media_root: PathBuf,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.media_root);
    }
}

pub async fn setup() -> TestContext {
    // one connection so every query sees the same in-memory database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    let media_root = std::env::temp_dir().join(format!("qau-media-{}", Uuid::new_v4().simple()));
    let files = FileStore::new(&media_root);
    files.ensure_root().await.expect("create media root");

    TestContext {
        db,
        files,
        media_root,
    }
}

impl TestContext {
    pub fn hierarchy(&self) -> HierarchyService<'_> {
        HierarchyService::new(&self.db, &self.files)
    }

    pub fn attachments(&self) -> AttachmentService<'_> {
        AttachmentService::new(&self.db, &self.files)
    }

    /// Inserts a user directly; the password hash is not a real bcrypt hash.
    pub async fn user(&self, username: &str, role: RoleEnum) -> (user::Model, Identity) {
        let user = UserRepository::new(&self.db)
            .create(NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username.to_lowercase()),
                first_name: username.to_string(),
                last_name: String::new(),
                password_hash: "not-a-hash".to_string(),
                role,
            })
            .await
            .expect("insert user");
        let identity = Identity::new(user.id, role);
        (user, identity)
    }

    pub async fn admin(&self) -> Identity {
        self.user("Admin1", RoleEnum::Admin).await.1
    }

    pub async fn year(
        &self,
        admin: &Identity,
        start: (i32, u32, u32),
        end: (i32, u32, u32),
    ) -> academic_year::Model {
        AcademicYearService::new(&self.db, &self.files)
            .create(admin, AcademicYearStatus::Active, date(start), date(end))
            .await
            .expect("create academic year")
    }

    /// One standard with one pointer, one element and one empty attachment.
    pub async fn branch(
        &self,
        admin: &Identity,
        year: &academic_year::Model,
        title: &str,
        assigned_to: Vec<Uuid>,
    ) -> Branch {
        let hierarchy = self.hierarchy();
        let standard = hierarchy
            .create_standard(
                admin,
                NewStandard {
                    academic_year_id: year.id,
                    title: title.to_string(),
                    standard_type: StandardType::Academic,
                    assigned_to_ids: assigned_to,
                },
            )
            .await
            .expect("create standard");
        let pointer = hierarchy
            .create_pointer(admin, standard.standard.id, &format!("{title} pointer"))
            .await
            .expect("create pointer");
        let element = hierarchy
            .create_element(admin, pointer.id, &format!("{title} element"))
            .await
            .expect("create element");
        let attachment = self
            .attachments()
            .create(
                admin,
                NewAttachment {
                    element_id: element.id,
                    title: "Syllabus".to_string(),
                    shared_with_ids: Vec::new(),
                },
            )
            .await
            .expect("create attachment");

        Branch {
            standard,
            pointer,
            element,
            attachment: attachment.attachment,
        }
    }

    pub async fn upload(&self, identity: &Identity, attachment_id: Uuid, body: &[u8]) -> AttachmentRecord {
        self.attachments()
            .upload(identity, attachment_id, Some(file("syllabus.pdf", body)))
            .await
            .expect("upload file")
    }
}

pub struct Branch {
    pub standard: StandardRecord,
    pub pointer: pointer::Model,
    pub element: element::Model,
    pub attachment: attachment::Model,
}

pub fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn file(name: &str, body: &[u8]) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        bytes: body.to_vec(),
    }
}
