mod common;

use common::setup;
use qau_api::entities::sea_orm_active_enums::RoleEnum;
use qau_api::services::access::Identity;
use qau_api::services::auth_service::AuthService;
use qau_api::services::error::ServiceErrorKind;
use qau_api::services::user_service::{UserChanges, UserInput, UserService};
use qau_api::utils::jwt::JwtManager;

const SECRET: &str = "integration-test-secret";

async fn provision(ctx: &common::TestContext) -> Identity {
    let user = UserService::new(&ctx.db)
        .provision(UserInput {
            username: "Professor1".to_string(),
            email: "Professor1@Example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "password123".to_string(),
            role: RoleEnum::Professor,
        })
        .await
        .unwrap();
    assert_eq!(user.email, "professor1@example.com");
    Identity::new(user.id, user.role)
}

#[tokio::test]
async fn login_issues_a_token_for_the_user() {
    let ctx = setup().await;
    let professor = provision(&ctx).await;
    let jwt = JwtManager::new(SECRET);

    let token = AuthService::new(&ctx.db, &jwt, 3600)
        .login("professor1@example.com", "password123")
        .await
        .unwrap();
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.user_id, professor.user_id);

    let claims = jwt.decode_jwt(&token.access_token).unwrap();
    assert_eq!(claims.identity().unwrap(), professor);
    assert_eq!(claims.username, "Professor1");

    let me = UserService::new(&ctx.db).me(&professor).await.unwrap();
    assert!(me.last_login.is_some());
}

#[tokio::test]
async fn bad_credentials_and_inactive_accounts_are_rejected_alike() {
    let ctx = setup().await;
    let professor = provision(&ctx).await;
    let admin = ctx.admin().await;
    let jwt = JwtManager::new(SECRET);
    let auth = AuthService::new(&ctx.db, &jwt, 3600);

    let wrong = auth
        .login("professor1@example.com", "not-the-password")
        .await
        .unwrap_err();
    assert_eq!(wrong.kind(), ServiceErrorKind::Unauthorized);

    let unknown = auth.login("nobody@example.com", "password123").await.unwrap_err();
    assert_eq!(unknown.message(), wrong.message());

    UserService::new(&ctx.db)
        .update(
            &admin,
            professor.user_id,
            UserChanges {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let inactive = auth
        .login("professor1@example.com", "password123")
        .await
        .unwrap_err();
    assert_eq!(inactive.message(), wrong.message());
}

#[tokio::test]
async fn emails_are_unique_and_admins_cannot_delete_themselves() {
    let ctx = setup().await;
    provision(&ctx).await;
    let admin = ctx.admin().await;
    let users = UserService::new(&ctx.db);

    let err = users
        .create(
            &admin,
            UserInput {
                username: "Professor9".to_string(),
                email: "professor1@example.com".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                password: "password123".to_string(),
                role: RoleEnum::Professor,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Conflict);

    let err = users.delete(&admin, admin.user_id).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Validation);
}
