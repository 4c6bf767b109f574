use std::path::PathBuf;

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

use crate::entities::attachment;
use crate::entities::sea_orm_active_enums::{AcademicYearStatus, RoleEnum, StandardType};
use crate::repositories::user_repository::NewUser;
use crate::repositories::{
    AcademicYearRepository, AttachmentRepository, ElementRepository, PointerRepository,
    StandardRepository, UserRepository,
};
use crate::services::access::Identity;
use crate::utils::file_store::FileStore;

pub async fn migrated_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// File store in a fresh temp directory, removed on drop.
pub struct TempFiles {
    pub store: FileStore,
    root: PathBuf,
}

impl TempFiles {
    pub async fn new() -> Self {
        let root = std::env::temp_dir().join(format!("qau-unit-{}", Uuid::new_v4().simple()));
        let store = FileStore::new(&root);
        store.ensure_root().await.expect("create media root");
        Self { store, root }
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub async fn user(db: &DatabaseConnection, username: &str, role: RoleEnum) -> Identity {
    let user = UserRepository::new(db)
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
    Identity::new(user.id, role)
}

/// Year, standard, pointer and element leading to one empty attachment.
pub async fn empty_attachment(db: &DatabaseConnection) -> attachment::Model {
    let year = AcademicYearRepository::new(db)
        .create(
            AcademicYearStatus::Active,
            NaiveDate::from_ymd_opt(2024, 9, 1).expect("date"),
            NaiveDate::from_ymd_opt(2025, 6, 30).expect("date"),
        )
        .await
        .expect("insert year");
    let standard = StandardRepository::new(db)
        .create(year.id, "Teaching".to_string(), StandardType::Academic)
        .await
        .expect("insert standard");
    let pointer = PointerRepository::new(db)
        .create(standard.id, "Curriculum".to_string())
        .await
        .expect("insert pointer");
    let element = ElementRepository::new(db)
        .create(pointer.id, "Syllabi".to_string())
        .await
        .expect("insert element");
    AttachmentRepository::new(db)
        .create(element.id, "Syllabus".to_string())
        .await
        .expect("insert attachment")
}
