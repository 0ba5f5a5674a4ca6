//! 管理接口：服务校验与删除规则、库存、排班校验、账号创建、工作台区间

mod common;

use chrono::{Days, Weekday};
use common::*;
use http::StatusCode;
use serde_json::{Value, json};

fn service_payload(name: &str) -> Value {
    json!({
        "name": name,
        "price": "30.00",
        "duration_minutes": 60,
        "commission": "40",
    })
}

#[tokio::test]
async fn service_validation_bounds() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN).await;

    let mut too_short = service_payload("Facial");
    too_short["duration_minutes"] = json!(4);
    let mut too_long = service_payload("Facial");
    too_long["duration_minutes"] = json!(481);
    let mut commission = service_payload("Facial");
    commission["commission"] = json!("100.5");
    let mut negative_price = service_payload("Facial");
    negative_price["price"] = json!("-1");
    let mut loyalty = service_payload("Facial");
    loyalty["loyalty"] = json!({ "enabled": true, "points_per_visit": 5, "visits_for_reward": 0 });

    for bad in [too_short, too_long, commission, negative_price, loyalty] {
        let (status, body) = app.post("/api/services", &admin, bad.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} -> {}", bad, body);
    }

    let mut edge = service_payload("Facial");
    edge["duration_minutes"] = json!(480);
    edge["commission"] = json!("100");
    let (status, created) = app.post("/api/services", &admin, edge).await;
    assert_eq!(status, StatusCode::OK, "{}", created);
    assert_eq!(created["duration_minutes"], 480);

    let (status, _) = app
        .put(
            &format!("/api/services/{}", created["id"]),
            &admin,
            json!({ "duration_minutes": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .put(
            &format!("/api/services/{}", created["id"]),
            &admin,
            json!({ "commission": "-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn service_with_live_appointment_cannot_be_deleted() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN).await;
    let lucia = app.login(CLIENT).await;
    let carmen = app.id_by_name("/api/professionals", &lucia, "Carmen Ruiz").await;
    let coloring = app.id_by_name("/api/services", &lucia, "Hair coloring").await;

    let (status, booked) = app
        .post(
            "/api/appointments",
            &lucia,
            json!({
                "professional_id": carmen,
                "service_id": coloring,
                "date": next(Weekday::Thu),
                "time": "11:00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", booked);

    let uri = format!("/api/services/{}", coloring);
    let (status, err) = app.delete(&uri, &admin).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], 4003);

    // 取消后可以删除
    let (status, _) = app
        .post(&format!("/api/appointments/{}/cancel", booked["id"]), &lucia, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&uri, &admin).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&uri, &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sole_offered_service_cannot_be_deleted() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN).await;
    let diego = app.id_by_name("/api/professionals", &admin, "Diego Martín").await;
    let beard = app.id_by_name("/api/services", &admin, "Beard trim").await;
    let haircut = app.id_by_name("/api/services", &admin, "Haircut").await;

    let (status, _) = app
        .put(
            &format!("/api/professionals/{}", diego),
            &admin,
            json!({ "services": [beard] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = app
        .delete(&format!("/api/services/{}", beard), &admin)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], 4003);

    // Diego 仍然只提供 Beard trim
    let lucia = app.login(CLIENT).await;
    let (status, err) = app
        .post(
            "/api/appointments",
            &lucia,
            json!({
                "professional_id": diego,
                "service_id": haircut,
                "date": next(Weekday::Tue),
                "time": "10:00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 4004);
}

#[tokio::test]
async fn stock_adjustment_and_low_stock_listing() {
    let app = TestApp::new().await;
    let carmen = app.login(PRO).await;
    let shampoo = app.id_by_name("/api/products", &carmen, "Shampoo").await;
    let uri = format!("/api/products/{}/stock", shampoo);

    let low_names = |body: &Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["name"].as_str().map(str::to_string))
            .collect()
    };

    let (_, low) = app.get("/api/products/low-stock", &carmen).await;
    assert!(low_names(&low).contains(&"Shampoo".to_string()));
    assert!(!low_names(&low).contains(&"Hair wax".to_string()));

    // 库存不能为负
    let (status, err) = app.post(&uri, &carmen, json!({ "delta": -3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 4102);

    let (status, _) = app.post(&uri, &carmen, json!({ "delta": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, restocked) = app.post(&uri, &carmen, json!({ "delta": 10 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restocked["stock"], 12);

    let (_, low) = app.get("/api/products/low-stock", &carmen).await;
    assert!(!low_names(&low).contains(&"Shampoo".to_string()));

    let (status, sold) = app.post(&uri, &carmen, json!({ "delta": -12 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sold["stock"], 0);
    let (_, low) = app.get("/api/products/low-stock", &carmen).await;
    assert!(low_names(&low).contains(&"Shampoo".to_string()));
}

#[tokio::test]
async fn weekly_schedule_is_validated() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN).await;
    let carmen = app.login(PRO).await;

    let (status, schedule) = app.get("/api/professionals/me/schedule", &carmen).await;
    assert_eq!(status, StatusCode::OK);

    let mut reversed = schedule.clone();
    reversed["monday"]["start"] = json!("18:00");
    reversed["monday"]["end"] = json!("09:00");
    let (status, err) = app
        .put("/api/professionals/me/schedule", &carmen, reversed)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 5003);

    let mut no_branch = schedule.clone();
    no_branch["sunday"] = json!({ "start": "10:00", "end": "14:00", "branch_id": null, "active": true });
    let (status, err) = app
        .put("/api/professionals/me/schedule", &carmen, no_branch)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 5003);

    // 新门店停业后不能排班
    let (status, branch) = app
        .post(
            "/api/branches",
            &admin,
            json!({ "name": "Sur", "address": "Plaza Sur 3", "phone": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", branch);
    let (status, _) = app
        .put(
            &format!("/api/branches/{}", branch["id"]),
            &admin,
            json!({ "is_active": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let mut closed_branch = schedule.clone();
    closed_branch["sunday"] =
        json!({ "start": "10:00", "end": "14:00", "branch_id": branch["id"], "active": true });
    let (status, err) = app
        .put("/api/professionals/me/schedule", &carmen, closed_branch)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 5102);

    // 原排班未被修改
    let (_, unchanged) = app.get("/api/professionals/me/schedule", &carmen).await;
    assert_eq!(unchanged, schedule);
}

#[tokio::test]
async fn dashboard_range_is_capped() {
    let app = TestApp::new().await;
    let carmen = app.login(PRO).await;
    let from = next(Weekday::Mon);

    let uri = |days: u64| {
        format!(
            "/api/dashboard/range?from={}&to={}",
            from,
            from + Days::new(days)
        )
    };

    let (status, list) = app.get(&uri(92), &carmen).await;
    assert_eq!(status, StatusCode::OK, "{}", list);
    assert!(list.is_array());

    let (status, _) = app.get(&uri(93), &carmen).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get(
            &format!("/api/dashboard/range?from={}&to={}", from + Days::new(1), from),
            &carmen,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_creates_accounts() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN).await;
    let carmen = app.login(PRO).await;

    let payload = json!({
        "name": "Paula Vega",
        "email": "Paula@Salon.local",
        "phone": "+34 600 000 000",
        "password": "paula-secret-1",
        "role": "professional",
        "permissions": ["products:manage"],
    });

    let (status, _) = app.post("/api/users", &carmen, payload.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut weak = payload.clone();
    weak["password"] = json!("short");
    let (status, _) = app.post("/api/users", &admin, weak).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = app.post("/api/users", &admin, payload.clone()).await;
    assert_eq!(status, StatusCode::OK, "{}", created);
    assert_eq!(created["email"], "paula@salon.local");
    assert_eq!(created["role"], "professional");
    assert!(created.get("password_hash").is_none());

    let (status, err) = app.post("/api/users", &admin, payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], 7002);

    let (status, login) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "paula@salon.local", "password": "paula-secret-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", login);
    assert_eq!(login["session"]["role"], "professional");
}
