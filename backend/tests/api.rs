use std::{sync::Arc, time::Duration};
use backend::{
    registry::ConnectionRegistry,
    service::VoteService,
    store::{MemoryStore, StoreError, TallyStore},
    LiveMessage, VoteOption, DEFAULT_OPTIONS,
};
use rocket::{get, routes, http::{ContentType, Status}, local::asynchronous::Client};
use serde_json::{json, Value};

async fn client() -> (Client, Arc<ConnectionRegistry>) {
    let store = MemoryStore::new();
    let titles: Vec<String> = DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect();
    store.seed(&titles).await.expect("seed");

    let registry = Arc::new(ConnectionRegistry::new(Duration::from_millis(50), 8));
    let service = VoteService::new(Arc::new(store), Arc::clone(&registry));
    let client = Client::tracked(backend::app(rocket::build(), service))
        .await
        .expect("valid rocket instance");
    (client, registry)
}

/// Store whose backing storage is gone.
struct UnavailableStore;

#[rocket::async_trait]
impl TallyStore for UnavailableStore {
    async fn list_options(&self) -> Result<Vec<VoteOption>, StoreError> {
        Err(StoreError::LockFailed)
    }

    async fn cast_vote(&self, _id: i64) -> Result<VoteOption, StoreError> {
        Err(StoreError::LockFailed)
    }

    async fn seed(&self, _titles: &[String]) -> Result<(), StoreError> {
        Err(StoreError::LockFailed)
    }
}

async fn cast(client: &Client, body: Value) -> (Status, Value) {
    let response = client
        .post("/api/votes/cast/")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
        .await;
    let status = response.status();
    let body = response.into_json::<Value>().await.expect("json body");
    (status, body)
}

async fn votes(client: &Client) -> Vec<VoteOption> {
    let response = client.get("/api/votes/").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    response.into_json().await.expect("option list")
}

#[rocket::async_test]
async fn test_list_seeded_options() {
    let (client, _) = client().await;

    let first = votes(&client).await;
    let titles: Vec<_> = first.iter().map(|o| (o.id, o.title.as_str(), o.votes)).collect();
    assert_eq!(titles, vec![(1, "Option A", 0), (2, "Option B", 0), (3, "Option C", 0)]);
    assert_eq!(votes(&client).await, first);
}

#[rocket::async_test]
async fn test_cast_vote_for_option_b() {
    let (client, _) = client().await;

    let (status, body) = cast(&client, json!({"name": "alice", "id": 2})).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({"id": 2, "title": "Option B", "votes": 1}));

    let counts: Vec<_> = votes(&client).await.iter().map(|o| o.votes).collect();
    assert_eq!(counts, vec![0, 1, 0]);
}

#[rocket::async_test]
async fn test_invalid_data_is_rejected() {
    let (client, registry) = client().await;
    let (conn, mut rx) = registry.open();
    registry.register(conn).await;

    for body in [
        json!({"name": "", "id": 1}),
        json!({"id": 1}),
        json!({"name": "bob"}),
        json!({"name": "bob", "id": 0}),
        json!({"name": "bob", "id": null}),
        json!({"name": "bob", "id": "two"}),
    ] {
        let (status, detail) = cast(&client, body).await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(detail, json!({"detail": "Invalid data"}));
    }

    let counts: Vec<_> = votes(&client).await.iter().map(|o| o.votes).collect();
    assert_eq!(counts, vec![0, 0, 0]);
    assert!(rx.try_recv().is_err());
}

#[rocket::async_test]
async fn test_malformed_body_is_invalid_data() {
    let (client, _) = client().await;

    let response = client
        .post("/api/votes/cast/")
        .header(ContentType::JSON)
        .body("{not json")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(response.into_json::<Value>().await, Some(json!({"detail": "Invalid data"})));
}

#[rocket::async_test]
async fn test_unknown_vote_id() {
    let (client, registry) = client().await;
    let (conn, mut rx) = registry.open();
    registry.register(conn).await;
    let before = votes(&client).await;

    let (status, body) = cast(&client, json!({"name": "bob", "id": 999})).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body, json!({"detail": "Invalid vote ID"}));
    assert_eq!(votes(&client).await, before);
    assert!(rx.try_recv().is_err());
}

#[rocket::async_test]
async fn test_cast_pushes_update_to_listeners() {
    let (client, registry) = client().await;
    let (conn, mut rx) = registry.open();
    registry.register(conn).await;

    let (status, _) = cast(&client, json!({"name": "alice", "id": 1})).await;
    assert_eq!(status, Status::Ok);

    let frame = rx.recv().await.expect("update frame");
    let message: LiveMessage = serde_json::from_str(&frame).expect("live message");
    assert_eq!(message, LiveMessage::update(votes(&client).await));
    assert!(rx.try_recv().is_err());
}

#[rocket::async_test]
async fn test_unknown_route_uses_detail_body() {
    let (client, _) = client().await;

    let response = client.get("/api/nothing-here").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(response.into_json::<Value>().await, Some(json!({"detail": "Not found"})));
}

#[rocket::async_test]
async fn test_storage_failure_is_internal_error() {
    let registry = Arc::new(ConnectionRegistry::new(Duration::from_millis(50), 8));
    let service = VoteService::new(Arc::new(UnavailableStore), Arc::clone(&registry));
    let client = Client::tracked(backend::app(rocket::build(), service))
        .await
        .expect("valid rocket instance");
    let (conn, mut rx) = registry.open();
    registry.register(conn).await;

    let (status, body) = cast(&client, json!({"name": "alice", "id": 1})).await;
    assert_eq!(status, Status::InternalServerError);
    assert_eq!(body, json!({"detail": "Internal server error"}));

    let response = client.get("/api/votes/").dispatch().await;
    assert_eq!(response.status(), Status::InternalServerError);
    assert_eq!(response.into_json::<Value>().await, Some(json!({"detail": "Internal server error"})));

    assert!(rx.try_recv().is_err());
}

#[get("/unprocessable")]
fn unprocessable() -> Status {
    Status::UnprocessableEntity
}

#[rocket::async_test]
async fn test_other_error_statuses_use_detail_body() {
    let store = MemoryStore::new();
    let registry = Arc::new(ConnectionRegistry::new(Duration::from_millis(50), 8));
    let service = VoteService::new(Arc::new(store), registry);
    let rocket = backend::app(rocket::build(), service).mount("/", routes![unprocessable]);
    let client = Client::tracked(rocket).await.expect("valid rocket instance");

    let response = client.get("/unprocessable").dispatch().await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
    assert_eq!(
        response.into_json::<Value>().await,
        Some(json!({"detail": "Unprocessable Entity"}))
    );
}
