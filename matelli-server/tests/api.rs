//! Router-level tests: every request goes through the full middleware stack

use std::collections::BTreeMap;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use matelli_server::core::BackgroundTasks;
use matelli_server::services::InsightService;
use matelli_server::services::insight::ERROR_FALLBACK;
use matelli_server::{Config, ServerState, Store};

const PASS: &str = "test-pass";

struct TestApp {
    app: Router,
    _tasks: BackgroundTasks,
}

fn test_app() -> TestApp {
    let mut config = Config::with_overrides("/tmp/matelli-api-tests", 0);
    config.admin_passphrase = PASS.to_string();
    config.chat_phone = "5511958877900".to_string();
    config.chat_base_url = "https://wa.me".to_string();

    let store = Store::open_in_memory().unwrap();
    let insight = InsightService::new(None, Duration::from_secs(1));
    let state = ServerState::new(config, store, insight);
    let tasks = state.start_background_tasks();
    TestApp {
        app: matelli_server::api::build_app(&state),
        _tasks: tasks,
    }
}

impl TestApp {
    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn admin_get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::get(uri)
                .header("x-admin-passphrase", PASS)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn post(&self, uri: &str, body: Value, admin: bool) -> (StatusCode, Value) {
        let mut builder = Request::post(uri).header("content-type", "application/json");
        if admin {
            builder = builder.header("x-admin-passphrase", PASS);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    async fn seed_default_menu(&self) {
        let (status, report) = self.post("/api/meals/seed/default", json!(null), true).await;
        assert_eq!(status, StatusCode::OK, "{report}");
        assert_eq!(report["written"], 11);
    }

    /// Poll the shopping list until `done` holds
    async fn wait_for_view(&self, done: impl Fn(&Value) -> bool) -> Value {
        for _ in 0..200 {
            let (_, view) = self.admin_get("/api/shopping-list").await;
            if done(&view) {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("shopping list never reached the expected state");
    }
}

/// Same five dishes every day: b1, s1, l2, de1, d1
fn full_kit() -> Value {
    let day = json!({
        "Café da Manhã": "b1",
        "Vitamina de Frutas": "s1",
        "Almoço": "l2",
        "Sobremesa": "de1",
        "Jantar": "d1",
    });
    let selection: BTreeMap<_, _> = ["Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado", "Domingo"]
        .into_iter()
        .map(|d| (d.to_string(), day.clone()))
        .collect();
    json!({ "type": "kit", "selection": selection })
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["meals"], 0);
}

#[tokio::test]
async fn test_admin_gate() {
    let app = test_app();

    let (status, body) = app.get("/api/orders").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, body) = app
        .send(
            Request::get("/api/orders")
                .header("x-admin-passphrase", "wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);

    let (status, body) = app.admin_get("/api/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    // catalog reads stay public
    let (status, _) = app.get("/api/meals").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login() {
    let app = test_app();
    let (status, body) = app.post("/api/auth/login", json!({ "passphrase": PASS }), false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);

    let (status, _) = app.post("/api/auth/login", json!({ "passphrase": "nope" }), false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_meal_crud() {
    let app = test_app();
    let meal = json!({
        "id": "x1",
        "name": "Escondidinho",
        "category": "Jantar",
        "price": 26.5,
        "ingredients": { "Mandioca": "200g" }
    });

    let (status, _) = app.post("/api/meals", meal.clone(), false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, saved) = app.post("/api/meals", meal, true).await;
    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(saved["price"], 26.5);

    let (status, body) = app
        .post("/api/meals", json!({ "id": "x2", "name": " ", "category": "Jantar", "price": 1.0 }), true)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, fetched) = app.get("/api/meals/x1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["ingredients"]["Mandioca"], "200g");

    let (status, _) = app
        .send(
            Request::delete("/api/meals/x1")
                .header("x-admin-passphrase", PASS)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/meals/x1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_seeded_catalog_is_sorted_by_name() {
    let app = test_app();
    app.seed_default_menu().await;

    let (_, meals) = app.get("/api/meals").await;
    let names: Vec<_> = meals
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names.len(), 11);
    assert_eq!(names, sorted);

    let (status, body) = app.post("/api/meals/seed", json!([]), true).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], 6101);
}

#[tokio::test]
async fn test_kit_checkout_to_purchase() {
    let app = test_app();
    app.seed_default_menu().await;

    let (status, placed) = app.post("/api/checkout", full_kit(), false).await;
    assert_eq!(status, StatusCode::OK, "{placed}");
    let order_id = placed["order"]["id"].as_str().unwrap().to_string();
    assert!(order_id.starts_with("MAT-"));
    assert_eq!(placed["order"]["status"], "aprovado");
    assert_eq!(placed["order"]["type"], "kit");
    // (18.90 + 14.90 + 34.90 + 12.00 + 22.50) * 7
    assert_eq!(placed["order"]["total"], 722.4);
    assert!(
        placed["chatLink"]
            .as_str()
            .unwrap()
            .starts_with("https://wa.me/5511958877900?text=")
    );
    assert!(placed["summary"].as_str().unwrap().contains("*SÁBADO:*"));

    let (status, fetched) = app.admin_get(&format!("/api/orders/{order_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["shoppingList"]["Salmão"].as_array().unwrap().len(), 7);

    let view = app
        .wait_for_view(|v| v["orderIds"].as_array().is_some_and(|ids| !ids.is_empty()))
        .await;
    assert_eq!(view["orderIds"], json!([order_id.clone()]));
    assert_eq!(view["items"]["Salmão"]["orderIds"], json!([order_id.clone()]));

    let (status, share) = app.admin_get("/api/shopping-list/share").await;
    assert_eq!(status, StatusCode::OK);
    assert!(share["text"].as_str().unwrap().contains(&order_id));

    let (status, moved) = app.post("/api/shopping-list/purchased", json!({}), true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved[0]["status"], "produzindo");

    app.wait_for_view(|v| v["orderIds"] == json!([])).await;
    let (_, listed) = app.admin_get("/api/orders?status=produzindo").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, body) = app.admin_get("/api/orders?status=perdido").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4005);
}

#[tokio::test]
async fn test_incomplete_kit_and_preview() {
    let app = test_app();
    app.seed_default_menu().await;
    let partial = json!({ "type": "kit", "selection": { "Segunda": { "Almoço": "l1" } } });

    let (status, body) = app.post("/api/checkout", partial.clone(), false).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 4003);

    let (status, preview) = app.post("/api/checkout/preview", partial, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["selectedSlots"], 1);
    assert_eq!(preview["total"], 28.9);

    let (_, orders) = app.admin_get("/api/orders").await;
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn test_menu_checkout() {
    let app = test_app();
    app.seed_default_menu().await;

    let (status, placed) = app
        .post(
            "/api/checkout",
            json!({ "type": "menu", "items": [{ "mealId": "s2", "quantity": 3 }] }),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{placed}");
    assert_eq!(placed["order"]["total"], 46.5);
    assert!(placed["summary"].as_str().unwrap().contains("- Tropical Mango x3 (R$ 46.50)"));

    let (status, body) = app
        .post("/api/checkout", json!({ "type": "menu", "items": [] }), false)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);
}

#[tokio::test]
async fn test_menu_checkout_rejects_huge_quantity() {
    let app = test_app();
    app.seed_default_menu().await;

    let (status, body) = app
        .post(
            "/api/checkout",
            json!({ "type": "menu", "items": [{ "mealId": "l2", "quantity": u32::MAX }] }),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8);

    let (_, orders) = app.admin_get("/api/orders").await;
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn test_qr_redirect_counts_visits() {
    let app = test_app();
    let uri = "/qrcodes/flyer/https%3A%2F%2Fmatelli.com.br%2Fmenu";

    for _ in 0..2 {
        let (status, page) = app
            .send(
                Request::get(uri)
                    .header("user-agent", "TestAgent/1.0")
                    .header("accept-language", "pt-BR,pt;q=0.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.as_str().unwrap().contains("https://matelli.com.br/menu"));
    }

    let (status, tracker) = app.admin_get("/api/qrcodes/flyer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracker["totalAccesses"], 2);
    assert_eq!(tracker["name"], "QR flyer");

    let (_, visits) = app.admin_get("/api/qrcodes/flyer/visits").await;
    let visits = visits.as_array().unwrap();
    assert_eq!(visits.len(), 2);
    assert_eq!(visits[0]["userAgent"], "TestAgent/1.0");
    assert_eq!(visits[0]["language"], "pt-BR");
}

#[tokio::test]
async fn test_qr_redirect_rejects_non_http_outlink() {
    let app = test_app();
    let (status, body) = app.get("/qrcodes/evil/javascript%3Aalert(1)").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7002);

    let (status, _) = app.admin_get("/api/qrcodes/evil").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_qr_admin_create_and_delete() {
    let app = test_app();
    let (status, created) = app
        .post("/api/qrcodes", json!({ "id": "box", "name": "Embalagem" }), true)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["totalAccesses"], 0);

    let (_, list) = app.admin_get("/api/qrcodes").await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(
            Request::delete("/api/qrcodes/box")
                .header("x-admin-passphrase", PASS)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.admin_get("/api/qrcodes/box/visits").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7001);
}

#[tokio::test]
async fn test_insight_falls_back_without_provider() {
    let app = test_app();
    let (status, body) = app
        .post(
            "/api/insight",
            json!({ "days": { "Segunda": ["Tapioca de Ovos e Queijo"] } }),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insight"], ERROR_FALLBACK);

    let (status, _) = app.post("/api/insight", json!({}), false).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
