use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use labelpress_api::{
    app_router,
    config::AppConfig,
    db::{self, DbConfig},
    events::{self, EventSender},
    AppState,
};

/// Helper harness for spinning up an application backed by an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // A single pooled connection keeps the in-memory schema alive for the
        // lifetime of the harness.
        let db_config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&db_config)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let cfg = AppConfig::new(
            db_config.url.clone(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(
            event_rx,
            events::fanout_channel(),
        ));

        let state = AppState::new(std::sync::Arc::new(pool), cfg, event_sender);
        let router = app_router(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Register a client and return its id.
    pub async fn seed_client(&self, name: &str) -> Uuid {
        let response = self
            .request(
                Method::POST,
                "/api/v1/clients",
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(response.status(), 201, "seeding client should succeed");
        let body = read_json(response).await;
        body["data"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("client id in response")
    }

    /// Create an order with one line item and return the response payload.
    pub async fn seed_order(&self, client_id: Uuid, delivery_date: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/v1/orders",
                Some(json!({
                    "client_id": client_id,
                    "delivery_date": delivery_date,
                    "items": [{
                        "material": "PP white gloss",
                        "width": "50",
                        "height": "30",
                        "quantity": "1000",
                        "quantity_unit": "pcs",
                        "unit_price": "0.12",
                        "price_type": "per_1000",
                    }],
                })),
            )
            .await;
        assert_eq!(response.status(), 201, "seeding order should succeed");
        read_json(response).await
    }
}

/// Read a response body as JSON.
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body should be valid json")
}
