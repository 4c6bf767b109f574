mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use clap::Parser;
use http_body_util::BodyExt;
use qau_api::app::create_app;
use qau_api::config::{self, Config};
use qau_api::entities::sea_orm_active_enums::RoleEnum;
use qau_api::entities::user;
use qau_api::extractor::JWT_MANAGER;
use qau_api::static_service::{DATABASE_CONNECTION, FILE_STORE};
use serde_json::Value;
use tower::ServiceExt;

use common::TestContext;

const BOUNDARY: &str = "qau-test-boundary";

/// Routes read process-wide state, so everything runs against one context.
async fn install(ctx: &TestContext) -> Router {
    let settings = Config::parse_from([
        "qau_api",
        "--database-url",
        "sqlite::memory:",
        "--jwt-secret",
        "router-test-secret",
        "--admin-email",
        "admin@example.com",
        "--admin-password",
        "password123",
        "--app-env",
        "test",
    ]);
    assert!(config::install(settings));
    assert!(DATABASE_CONNECTION.set(ctx.db.clone()).is_ok());
    assert!(FILE_STORE.set(ctx.files.clone()).is_ok());
    create_app()
}

fn bearer(user: &user::Model) -> String {
    let token = JWT_MANAGER
        .create_jwt(user.id, &user.username, user.role, 3600)
        .unwrap();
    format!("Bearer {token}")
}

fn multipart(file_name: &str, body: &[u8]) -> Body {
    let mut payload = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
    )
    .into_bytes();
    payload.extend_from_slice(body);
    payload.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Body::from(payload)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

fn json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn attachment_endpoints_over_http() {
    let ctx = common::setup().await;
    let app = install(&ctx).await;

    let admin = ctx.admin().await;
    let (professor, _) = ctx.user("Professor1", RoleEnum::Professor).await;
    let (ta, _) = ctx.user("TA1", RoleEnum::Ta).await;
    let year = ctx.year(&admin, (2025, 9, 1), (2026, 6, 30)).await;
    let branch = ctx.branch(&admin, &year, "Teaching", vec![professor.id]).await;
    let attachment_id = branch.attachment.id;

    // no bearer token
    let (status, _, body) = send(
        &app,
        Request::get("/api/v1/attachments").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        json(&body)["detail"],
        "Authentication credentials were not provided."
    );

    // unknown account
    let (status, _, _) = send(
        &app,
        Request::post("/api/v1/token")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"email":"nobody@example.com","password":"password123"}"#,
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let upload = || {
        Request::post(format!("/api/v1/attachments/{attachment_id}/upload"))
            .header(header::AUTHORIZATION, bearer(&professor))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(multipart("syllabus.pdf", b"%PDF-1.7 week one"))
            .unwrap()
    };

    let (status, _, body) = send(&app, upload()).await;
    assert_eq!(status, StatusCode::OK);
    let stored = json(&body);
    assert_eq!(stored["has_file"], true);
    assert_eq!(stored["file_name"], "syllabus.pdf");
    assert_eq!(stored["uploaded_by"], professor.id.to_string());

    let (status, _, body) = send(&app, upload()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["detail"], "Attachment already has a file.");

    let download = |caller: &user::Model| {
        Request::get(format!("/api/v1/attachments/{attachment_id}/download"))
            .header(header::AUTHORIZATION, bearer(caller))
            .body(Body::empty())
            .unwrap()
    };

    let (status, headers, body) = send(&app, download(&professor)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_TYPE].to_str().unwrap(),
        "application/octet-stream"
    );
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains("filename=\"syllabus.pdf\""));
    assert_eq!(body, b"%PDF-1.7 week one");

    let (status, _, body) = send(&app, download(&ta)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json(&body)["code"], "PERMISSION_DENIED");
}
