use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;

use crate::config::APP_CONFIG;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::repositories::UserRepository;
use crate::services::user_service::{UserInput, UserService};

const SEED_PASSWORD: &str = "password123";

/// Named accounts per role created by `seed_users`.
const SEED_ACCOUNTS: &[(&str, RoleEnum, usize)] = &[
    ("Admin", RoleEnum::Admin, 5),
    ("Professor", RoleEnum::Professor, 5),
    ("Supervisor", RoleEnum::Supervisor, 5),
    ("TA", RoleEnum::Ta, 10),
];

/// Creates the configured admin account unless its email is already taken.
pub async fn initialize_admin_user(db: &DatabaseConnection) -> Result<()> {
    let created = ensure_user(
        db,
        UserInput {
            username: APP_CONFIG.admin_username.clone(),
            email: APP_CONFIG.admin_email.clone(),
            first_name: "System".to_string(),
            last_name: "Administrator".to_string(),
            password: APP_CONFIG.admin_password.clone(),
            role: RoleEnum::Admin,
        },
    )
    .await?;

    if created {
        tracing::info!(email = %APP_CONFIG.admin_email, "Admin user created");
    } else {
        tracing::info!("Admin user already exists, skipping initialization");
    }
    Ok(())
}

/// Development accounts: Admin1-5, Professor1-5, Supervisor1-5 and TA1-10,
/// each `<name lowercased>@example.com`. Returns how many were created.
pub async fn seed_users(db: &DatabaseConnection) -> Result<usize> {
    let mut created = 0;
    for (prefix, role, count) in SEED_ACCOUNTS {
        for n in 1..=*count {
            let username = format!("{prefix}{n}");
            let input = UserInput {
                email: format!("{}@example.com", username.to_lowercase()),
                first_name: (*prefix).to_string(),
                last_name: n.to_string(),
                password: SEED_PASSWORD.to_string(),
                role: *role,
                username,
            };
            if ensure_user(db, input).await? {
                created += 1;
            }
        }
    }
    Ok(created)
}

async fn ensure_user(db: &DatabaseConnection, input: UserInput) -> Result<bool> {
    let existing = UserRepository::new(db)
        .find_by_email(&input.email)
        .await
        .context("Failed to look up user by email")?;
    if existing.is_some() {
        return Ok(false);
    }

    let email = input.email.clone();
    UserService::new(db)
        .provision(input)
        .await
        .with_context(|| format!("Failed to create user {email}"))?;
    Ok(true)
}
