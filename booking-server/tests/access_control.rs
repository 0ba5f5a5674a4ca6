//! 认证、角色 / 权限、导航、个人资料、同步状态

mod common;

use common::*;
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_is_public_and_api_requires_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = app.send("GET", "/api/services", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send("GET", "/api/services", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new().await;

    let (status_a, body_a) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": CLIENT, "password": "wrong-password" })),
        )
        .await;
    let (status_b, body_b) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_a, status_b);
    assert_eq!(body_a["code"], body_b["code"]);
}

#[tokio::test]
async fn session_restores_role_and_profile() {
    let app = TestApp::new().await;
    let token = app.login(PRO).await;

    let (status, session) = app.get("/api/auth/session", &token).await;
    assert_eq!(status, StatusCode::OK, "{}", session);
    assert_eq!(session["session"]["role"], "professional");
    assert!(session["user"]["professional_id"].is_i64());
}

#[tokio::test]
async fn catalog_management_needs_permissions() {
    let app = TestApp::new().await;
    let lucia = app.login(CLIENT).await;
    let carmen = app.login(PRO).await;
    let diego = app.login(PRO2).await;

    // Carmen 有 products:manage，Diego 没有
    let (status, _) = app.get("/api/products", &carmen).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/products", &diego).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get("/api/products", &lucia).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, low) = app.get("/api/products/low-stock", &carmen).await;
    assert_eq!(status, StatusCode::OK);
    assert!(low.as_array().unwrap().iter().any(|p| p["name"] == "Shampoo"));

    let (status, _) = app
        .post(
            "/api/services",
            &lucia,
            json!({ "name": "Facial", "price": "30.00", "duration_minutes": 60 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 客户只能访问客户接口
    let (status, _) = app.get("/api/dashboard", &lucia).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get("/api/users", &carmen).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get("/api/audit", &lucia).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn navigation_follows_role_and_permissions() {
    let app = TestApp::new().await;

    let keys = |body: &serde_json::Value| -> Vec<String> {
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|i| i["key"].as_str().map(str::to_string))
            .collect()
    };

    let (status, client_nav) = app
        .get("/api/navigation", &app.login(CLIENT).await)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(client_nav["role"], "client");
    assert_eq!(client_nav["unread"], 0);
    let client_keys = keys(&client_nav);
    assert!(client_keys.contains(&"book".to_string()));
    assert!(!client_keys.contains(&"dashboard".to_string()));

    let (_, pro_nav) = app.get("/api/navigation", &app.login(PRO).await).await;
    let pro_keys = keys(&pro_nav);
    assert!(pro_keys.contains(&"dashboard".to_string()));
    assert!(pro_keys.contains(&"products".to_string()));
    assert!(!pro_keys.contains(&"book".to_string()));
    assert!(!pro_keys.contains(&"users".to_string()));

    let (_, admin_nav) = app.get("/api/navigation", &app.login(ADMIN).await).await;
    let admin_keys = keys(&admin_nav);
    assert!(admin_keys.contains(&"users".to_string()));
    assert!(admin_keys.contains(&"audit".to_string()));
}

#[tokio::test]
async fn admin_cannot_deactivate_self_but_can_deactivate_others() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN).await;

    let admin_id = app.id_by_name("/api/users", &admin, "Admin").await;
    let marco_id = app.id_by_name("/api/users", &admin, "Marco Rossi").await;

    let (status, _) = app
        .put(&format!("/api/users/{}", admin_id), &admin, json!({ "is_active": false }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, marco) = app
        .put(&format!("/api/users/{}", marco_id), &admin, json!({ "is_active": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marco["is_active"], false);

    // 停用后无法登录
    let (status, err) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": CLIENT2, "password": DEMO_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["code"], 1007);

    // 密码错误时不暴露账号状态
    let (status, err) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": CLIENT2, "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err["code"], 1002);
}

#[tokio::test]
async fn preferences_update_is_partial_and_persisted() {
    let app = TestApp::new().await;
    let token = app.login(CLIENT).await;

    let (status, prefs) = app
        .put(
            "/api/profile/preferences",
            &token,
            json!({ "sound_notifications": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["sound_notifications"], false);
    assert_eq!(prefs["email_notifications"], true);

    let (_, profile) = app.get("/api/profile", &token).await;
    assert_eq!(profile["preferences"], prefs);
}

#[tokio::test]
async fn password_change_requires_current_password() {
    let app = TestApp::new().await;
    let token = app.login(CLIENT).await;

    let (status, _) = app
        .put(
            "/api/profile/password",
            &token,
            json!({ "current_password": "wrong", "new_password": "new-password-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .put(
            "/api/profile/password",
            &token,
            json!({ "current_password": DEMO_PASSWORD, "new_password": "short" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            "/api/profile/password",
            &token,
            json!({ "current_password": DEMO_PASSWORD, "new_password": "new-password-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": CLIENT, "password": "new-password-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn resource_writes_bump_sync_versions() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN).await;

    let (_, before) = app.get("/api/sync/status", &admin).await;
    assert_eq!(before["versions"]["service"], serde_json::Value::Null);

    let haircut = app.id_by_name("/api/services", &admin, "Haircut").await;
    let (status, updated) = app
        .put(
            &format!("/api/services/{}", haircut),
            &admin,
            json!({ "price": "27.50" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);

    let (status, after) = app.get("/api/sync/status", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["epoch"], before["epoch"]);
    assert_eq!(after["versions"]["service"], 1);
}

#[tokio::test]
async fn audit_chain_verifies() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN).await;
    let _ = app
        .send("POST", "/api/auth/login", None, Some(json!({"email": CLIENT, "password": "wrong"})))
        .await;

    // 审计 worker 异步落盘
    let mut total = 0;
    for _ in 0..50 {
        let (status, verification) = app.get("/api/audit/verify", &admin).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verification["chain_intact"], true);
        total = verification["total_entries"].as_u64().unwrap_or(0);
        if total >= 2 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(total >= 2, "expected login audit entries, got {}", total);
}
