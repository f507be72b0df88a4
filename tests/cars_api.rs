//! End-to-end tests of the REST surface over a real listener, backed by
//! the in-memory repository.

#![allow(clippy::panic, missing_docs)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::{Notify, oneshot};

use car_service::api;
use car_service::api::dto::CarResponse;
use car_service::app_state::AppState;
use car_service::domain::{Car, CarDraft};
use car_service::error::ServiceError;
use car_service::persistence::{CarRepository, InMemoryCarRepository};
use car_service::server;
use car_service::service::{CarCatalog, CarService};

fn in_memory_catalog() -> CarCatalog {
    let repository: Arc<dyn CarRepository> = Arc::new(InMemoryCarRepository::new());
    CarCatalog::new(repository)
}

/// Catalog whose paged listing stalls for `delay` before answering.
#[derive(Debug)]
struct SlowCatalog {
    inner: CarCatalog,
    delay: Duration,
    started: Arc<Notify>,
    finished: Arc<AtomicBool>,
}

impl SlowCatalog {
    fn new(delay: Duration) -> Self {
        Self {
            inner: in_memory_catalog(),
            delay,
            started: Arc::new(Notify::new()),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl CarService for SlowCatalog {
    async fn create_car(&self, draft: CarDraft) -> Result<Car, ServiceError> {
        self.inner.create_car(draft).await
    }
    async fn get_car(&self, id: i64) -> Result<Car, ServiceError> {
        self.inner.get_car(id).await
    }
    async fn get_car_by_name(&self, name: &str) -> Result<Car, ServiceError> {
        self.inner.get_car_by_name(name).await
    }
    async fn list_cars_by_brand(&self, brand: &str) -> Result<Vec<Car>, ServiceError> {
        self.inner.list_cars_by_brand(brand).await
    }
    async fn list_cars_by_price_range(
        &self,
        min: f64,
        max: f64,
    ) -> Result<Vec<Car>, ServiceError> {
        self.inner.list_cars_by_price_range(min, max).await
    }
    async fn list_cars(&self, page: i64, page_size: i64) -> Result<Vec<Car>, ServiceError> {
        self.started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        self.inner.list_cars(page, page_size).await
    }
    async fn update_car(&self, id: i64, draft: CarDraft) -> Result<Car, ServiceError> {
        self.inner.update_car(id, draft).await
    }
    async fn delete_car(&self, id: i64) -> Result<(), ServiceError> {
        self.inner.delete_car(id).await
    }
}

struct TestServer {
    base: String,
    client: Client,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(Arc::new(in_memory_catalog()), Duration::from_secs(5)).await
    }

    async fn spawn_with(service: Arc<dyn CarService>, request_timeout: Duration) -> Self {
        let app = api::build_app(AppState::new(service), request_timeout);

        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(server::run(listener, app, Duration::from_secs(1), async move {
            let _ = rx.await;
        }));

        Self {
            base: format!("http://{addr}"),
            client: Client::new(),
            _shutdown: tx,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn create(&self, body: &Value) -> reqwest::Response {
        let Ok(response) = self
            .client
            .post(self.url("/api/v1/cars"))
            .json(body)
            .send()
            .await
        else {
            panic!("POST /cars failed");
        };
        response
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        let Ok(response) = self.client.get(self.url(path)).send().await else {
            panic!("GET {path} failed");
        };
        response
    }
}

async fn car_body(response: reqwest::Response) -> CarResponse {
    let Ok(car) = response.json::<CarResponse>().await else {
        panic!("expected a car body");
    };
    car
}

async fn car_list(response: reqwest::Response) -> Vec<CarResponse> {
    let Ok(cars) = response.json::<Vec<CarResponse>>().await else {
        panic!("expected a car array");
    };
    cars
}

async fn error_body(response: reqwest::Response) -> Value {
    let Ok(body) = response.json::<Value>().await else {
        panic!("expected an error envelope");
    };
    assert_eq!(body.get("success"), Some(&json!(false)));
    assert!(body.get("message").and_then(Value::as_str).is_some());
    body
}

#[tokio::test]
async fn health_reports_ok() {
    let server = TestServer::spawn().await;
    let response = server.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let Ok(body) = response.json::<Value>().await else {
        panic!("health body");
    };
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn car_lifecycle_create_read_update_delete() {
    let server = TestServer::spawn().await;

    let response = server
        .create(&json!({
            "name": "Model S",
            "brand": "Tesla",
            "manufacturing_value": 79990.00,
            "description": "electric sedan"
        }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = car_body(response).await;
    assert!(created.id.get() > 0);
    assert_eq!(created.created_at, created.updated_at);

    let response = server
        .get(&format!("/api/v1/cars/{}", created.id))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = car_body(response).await;
    assert_eq!(fetched.name, "Model S");
    assert_eq!(fetched.brand, "Tesla");
    assert!((fetched.manufacturing_value - 79_990.0).abs() < f64::EPSILON);
    assert_eq!(fetched.description.as_deref(), Some("electric sedan"));

    tokio::time::sleep(Duration::from_millis(5)).await;
    let Ok(response) = server
        .client
        .put(server.url(&format!("/api/v1/cars/{}", created.id)))
        .json(&json!({
            "name": "Model S",
            "brand": "Tesla",
            "manufacturing_value": 85000
        }))
        .send()
        .await
    else {
        panic!("PUT failed");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let updated = car_body(response).await;
    assert!((updated.manufacturing_value - 85_000.0).abs() < f64::EPSILON);
    assert!(updated.updated_at > updated.created_at);
    assert_eq!(updated.description, None);

    let Ok(response) = server
        .client
        .delete(server.url(&format!("/api/v1/cars/{}", created.id)))
        .send()
        .await
    else {
        panic!("DELETE failed");
    };
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let Ok(bytes) = response.bytes().await else {
        panic!("DELETE body");
    };
    assert!(bytes.is_empty());

    let response = server
        .get(&format!("/api/v1/cars/{}", created.id))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = error_body(response).await;
    assert_eq!(body.get("error"), Some(&json!("not_found")));
}

#[tokio::test]
async fn boundary_value_is_rejected() {
    let server = TestServer::spawn().await;
    let response = server
        .create(&json!({
            "name": "Too Expensive",
            "brand": "Bugatti",
            "manufacturing_value": 15000000
        }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = error_body(response).await;
    assert_eq!(body.get("error"), Some(&json!("invalid_request")));
}

#[tokio::test]
async fn malformed_payload_uses_error_envelope() {
    let server = TestServer::spawn().await;
    let response = server.create(&json!({ "name": "No Brand" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    error_body(response).await;
}

#[tokio::test]
async fn duplicate_name_conflicts() {
    let server = TestServer::spawn().await;
    let body = json!({ "name": "Civic", "brand": "Honda", "manufacturing_value": 22000 });
    assert_eq!(server.create(&body).await.status(), StatusCode::CREATED);

    let response = server.create(&body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = error_body(response).await;
    assert_eq!(body.get("error"), Some(&json!("conflict")));
}

#[tokio::test]
async fn inverted_price_range_is_rejected() {
    let server = TestServer::spawn().await;
    let response = server
        .get("/api/v1/cars/price-range?startPrice=50000&finalPrice=10000")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    error_body(response).await;
}

#[tokio::test]
async fn non_numeric_price_bound_is_rejected() {
    let server = TestServer::spawn().await;
    let response = server
        .get("/api/v1/cars/price-range?startPrice=cheap&finalPrice=10000")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn price_range_includes_both_bounds() {
    let server = TestServer::spawn().await;
    for (name, value) in [("low", 10_000.0), ("high", 50_000.0), ("above", 50_001.0)] {
        let body = json!({ "name": name, "brand": "Acme", "manufacturing_value": value });
        assert_eq!(server.create(&body).await.status(), StatusCode::CREATED);
    }

    let response = server
        .get("/api/v1/cars/price-range?startPrice=10000&finalPrice=50000")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let names: Vec<String> = car_list(response)
        .await
        .into_iter()
        .map(|car| car.name)
        .collect();
    assert_eq!(names, vec!["low".to_string(), "high".to_string()]);
}

#[tokio::test]
async fn pagination_returns_ten_ten_five() {
    let server = TestServer::spawn().await;
    for i in 0..25 {
        let body = json!({ "name": format!("car-{i:02}"), "brand": "Acme", "manufacturing_value": 1000 });
        assert_eq!(server.create(&body).await.status(), StatusCode::CREATED);
    }

    let mut previous_last = 0;
    for (page, expected) in [(1, 10), (2, 10), (3, 5)] {
        let response = server
            .get(&format!("/api/v1/cars?page={page}&pageSize=10"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let cars = car_list(response).await;
        assert_eq!(cars.len(), expected);

        let ids: Vec<i64> = cars.iter().map(|car| car.id.get()).collect();
        assert!(ids.windows(2).all(|w| matches!(w, [a, b] if a < b)));
        assert!(ids.first().is_some_and(|first| *first > previous_last));
        previous_last = ids.last().copied().unwrap_or(previous_last);
    }

    let response = server.get("/api/v1/cars?page=zero&pageSize=1000").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(car_list(response).await.len(), 10);
}

#[tokio::test]
async fn deleted_cars_vanish_from_every_listing() {
    let server = TestServer::spawn().await;
    let response = server
        .create(&json!({ "name": "Beetle", "brand": "VW", "manufacturing_value": 9000 }))
        .await;
    let car = car_body(response).await;

    let Ok(response) = server
        .client
        .delete(server.url(&format!("/api/v1/cars/{}", car.id)))
        .send()
        .await
    else {
        panic!("DELETE failed");
    };
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        server.get("/api/v1/cars/name/Beetle").await.status(),
        StatusCode::NOT_FOUND
    );
    assert!(car_list(server.get("/api/v1/cars/brand/VW").await).await.is_empty());
    assert!(car_list(server.get("/api/v1/cars").await).await.is_empty());

    let Ok(response) = server
        .client
        .delete(server.url(&format!("/api/v1/cars/{}", car.id)))
        .send()
        .await
    else {
        panic!("second DELETE failed");
    };
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server
        .create(&json!({ "name": "Beetle", "brand": "VW", "manufacturing_value": 9500 }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let server = TestServer::spawn().await;
    for path in ["/api/v1/cars/abc", "/api/v1/cars/0", "/api/v1/cars/-3"] {
        let response = server.get(path).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
        error_body(response).await;
    }
}

#[tokio::test]
async fn missing_car_is_not_found() {
    let server = TestServer::spawn().await;
    assert_eq!(
        server.get("/api/v1/cars/9999").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        server.get("/api/v1/cars/name/Nothing").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn unknown_brand_lists_empty() {
    let server = TestServer::spawn().await;
    let response = server.get("/api/v1/cars/brand/Nobody").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(car_list(response).await.is_empty());
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let server = TestServer::spawn().await;
    let response = server.get("/api/v2/trucks").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    error_body(response).await;
}

#[tokio::test]
async fn server_stops_after_shutdown_signal() {
    let service: Arc<dyn CarService> = Arc::new(in_memory_catalog());
    let app = api::build_app(AppState::new(service), Duration::from_secs(5));
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server::run(listener, app, Duration::from_secs(1), async move {
        let _ = rx.await;
    }));
    let _ = tx.send(());

    let Ok(joined) = tokio::time::timeout(Duration::from_secs(5), handle).await else {
        panic!("server did not stop");
    };
    assert!(matches!(joined, Ok(Ok(()))));
}

#[tokio::test]
async fn slow_requests_time_out_with_408() {
    let slow = Arc::new(SlowCatalog::new(Duration::from_secs(10)));
    let finished = Arc::clone(&slow.finished);
    let server = TestServer::spawn_with(slow, Duration::from_millis(200)).await;

    let response = server.get("/api/v1/cars").await;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(!finished.load(Ordering::SeqCst));

    let health = server.get("/health").await;
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn requests_outliving_the_grace_period_are_aborted() {
    let slow = Arc::new(SlowCatalog::new(Duration::from_secs(30)));
    let started = Arc::clone(&slow.started);
    let finished = Arc::clone(&slow.finished);
    let app = api::build_app(AppState::new(slow), Duration::from_secs(60));

    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server::run(
        listener,
        app,
        Duration::from_millis(300),
        async move {
            let _ = rx.await;
        },
    ));

    let request = tokio::spawn(async move {
        Client::new()
            .get(format!("http://{addr}/api/v1/cars"))
            .send()
            .await
    });
    started.notified().await;
    let _ = tx.send(());

    let Ok(joined) = tokio::time::timeout(Duration::from_secs(5), handle).await else {
        panic!("server did not stop after the grace period");
    };
    assert!(matches!(joined, Ok(Ok(()))));

    let Ok(Ok(Ok(response))) = tokio::time::timeout(Duration::from_secs(5), request).await else {
        panic!("aborted request got no response");
    };
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = error_body(response).await;
    assert_eq!(body.get("error"), Some(&json!("unavailable")));
    assert!(!finished.load(Ordering::SeqCst));
}
