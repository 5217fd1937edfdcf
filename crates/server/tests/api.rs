use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use intake::Intake;
use migration::MigratorTrait;
use server::{ServerState, router};

const ADMIN: (&str, &str) = ("root@example.com", "admin");
const ALICE: (&str, &str) = ("alice@example.com", "utente");

async fn engine() -> Arc<Engine> {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Arc::new(Engine::builder().database(db).build().await.unwrap())
}

async fn app() -> (Router, Arc<Engine>) {
    let engine = engine().await;
    let app = router(ServerState {
        engine: engine.clone(),
        intake: None,
    });
    (app, engine)
}

fn request(method: &str, uri: &str, caller: (&str, &str), body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-email", caller.0)
        .header("x-user-role", caller.1);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let (app, _engine) = app().await;

    let request = Request::builder()
        .uri("/api/users/wallet/find")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn find_falls_back_to_caller() {
    let (app, engine) = app().await;
    engine
        .create_if_absent("alice@example.com", 30.0, true)
        .await
        .unwrap();

    let (status, body) = send(&app, request("GET", "/api/users/wallet/find", ALICE, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "email": "alice@example.com", "balance": 30.0, "isEnable": true })
    );
}

#[tokio::test]
async fn find_other_wallet_is_forbidden_unless_admin() {
    let (app, engine) = app().await;
    engine
        .create_if_absent("bob@example.com", 10.0, true)
        .await
        .unwrap();

    let uri = "/api/users/wallet/find?email=bob@example.com";
    let (status, _) = send(&app, request("GET", uri, ALICE, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, request("GET", uri, ADMIN, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 10.0);
}

#[tokio::test]
async fn find_missing_wallet_is_not_found() {
    let (app, _engine) = app().await;

    let (status, body) = send(&app, request("GET", "/api/users/wallet/find", ALICE, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("alice@example.com"));
}

#[tokio::test]
async fn add_ignores_balance_of_non_admin_and_is_idempotent() {
    let (app, _engine) = app().await;
    let payload = json!({ "email": "alice@example.com", "balance": 1000.0 });

    let (status, body) = send(
        &app,
        request("POST", "/api/users/wallet/add", ALICE, Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["balance"], 0.0);
    assert_eq!(body["isEnable"], true);

    let (status, body) = send(
        &app,
        request("POST", "/api/users/wallet/add", ADMIN, Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 0.0);
}

#[tokio::test]
async fn add_accepts_query_parameters() {
    let (app, _engine) = app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/users/wallet/add?email=bob@example.com&balance=40",
            ADMIN,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "email": "bob@example.com", "balance": 40.0, "isEnable": true })
    );

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/users/wallet/add?email=alice@example.com&balance=40",
            ALICE,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["balance"], 0.0);

    let (status, _) = send(
        &app,
        request("POST", "/api/users/wallet/add", ALICE, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_operations() {
    let (app, engine) = app().await;
    engine
        .create_if_absent("alice@example.com", 30.0, true)
        .await
        .unwrap();

    let (status, _) = send(
        &app,
        request(
            "PUT",
            "/api/users/wallet/update/balance?email=alice@example.com&balance=75",
            ALICE,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/api/users/wallet/update/balance?email=alice@example.com&balance=75",
            ADMIN,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 75.0);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/api/users/wallet/update/enable?email=alice@example.com&isEnable=false",
            ADMIN,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isEnable"], false);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/api/users/wallet/reset?email=alice@example.com",
            ADMIN,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 0.0);

    let (status, _) = send(
        &app,
        request(
            "PUT",
            "/api/users/wallet/reset?email=ghost@example.com",
            ADMIN,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        request("GET", "/api/users/wallet/findall", ADMIN, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wallets"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn transfer_reports_code() {
    let (app, engine) = app().await;
    engine
        .create_if_absent("alice@example.com", 150.0, true)
        .await
        .unwrap();
    engine
        .create_if_absent("bob@example.com", 50.0, true)
        .await
        .unwrap();
    let transfer = |id: &str, amount: f64| {
        json!({
            "id": id,
            "senderEmail": "alice@example.com",
            "receiverEmail": "bob@example.com",
            "amount": amount,
        })
    };

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/users/wallet/transfer",
            ALICE,
            Some(transfer("tx1", 100.0)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "tx1", "code": 200 }));

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/users/wallet/transfer",
            ALICE,
            Some(transfer("tx2", 100.0)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "response": "tx2", "code": 400 }));

    let bob = ("bob@example.com", "utente");
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/users/wallet/transfer",
            bob,
            Some(transfer("tx3", 10.0)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(engine.wallet("alice@example.com").await.unwrap().balance, 50.0);
    assert_eq!(engine.wallet("bob@example.com").await.unwrap().balance, 150.0);
}

#[tokio::test]
async fn bus_bridge_feeds_intake() {
    let engine = engine().await;
    let (intake, handle) = Intake::builder()
        .engine(engine.clone())
        .build()
        .unwrap();
    let queues = intake.queues().clone();
    tokio::spawn(intake.run());
    let app = router(ServerState {
        engine: engine.clone(),
        intake: Some(handle),
    });

    let uri = format!("/api/bus/{}", queues.user_data);
    let event = json!({ "email": "x@example.com", "role": "utente" });
    let (status, _) = send(&app, request("POST", &uri, ALICE, Some(event.clone()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, request("POST", &uri, ADMIN, Some(event))).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let wallet = engine.wallet("x@example.com").await.unwrap();
    assert_eq!(wallet.balance, 100.0);
    assert!(wallet.enabled);
}

#[tokio::test]
async fn bus_bridge_without_intake_is_unavailable() {
    let (app, _engine) = app().await;

    let (status, _) = send(
        &app,
        request("POST", "/api/bus/wallet.userData", ADMIN, Some(json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn bus_bridge_with_stopped_intake_is_unavailable() {
    let engine = engine().await;
    let (intake, handle) = Intake::builder()
        .engine(engine.clone())
        .build()
        .unwrap();
    drop(intake);
    let app = router(ServerState {
        engine,
        intake: Some(handle),
    });

    let (status, body) = send(
        &app,
        request("POST", "/api/bus/wallet.userData", ADMIN, Some(json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "intake is not running");
}
