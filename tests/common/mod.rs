use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use petsit_rs::{
    config::ServerConfig, create_app, observability::Metrics,
    repositories::HttpBookingRepository, services::BookingService,
};
use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::MockServer;

static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build test client")
});

/// A running gateway wired to a wiremock booking backend
pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
    pub backend: MockServer,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let backend = MockServer::start().await;
        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));

        let repository = HttpBookingRepository::new(
            format!("{}/api", backend.uri()),
            Duration::from_secs(2),
            Some("test-token".to_string()),
        )
        .expect("Failed to build repository")
        .with_metrics(metrics.clone());

        let booking_service = Arc::new(BookingService::new_with_metrics(
            Arc::new(repository),
            metrics.clone(),
        ));

        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_seconds: 5,
            max_request_size: 1024 * 1024,
        };
        let app = create_app(metrics, booking_service, &server);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            client: CLIENT.clone(),
            base_url: format!("http://{}", addr),
            backend,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Booking document in the shape the backend returns
pub fn backend_booking(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "startDate": "2024-06-01T09:00",
        "endDate": "2024-06-01T11:00",
        "serviceType": "pet-sitting",
        "numberOfPets": 2,
        "petTypes": ["dog", "cat"],
        "notes": "Feed at noon",
        "totalAmount": 100,
        "status": status
    })
}

/// A complete, valid booking form
pub fn valid_form() -> Value {
    json!({
        "service_type": "pet-sitting",
        "date": "2024-06-01",
        "start_time": "09:00",
        "end_time": "11:00",
        "pets": [
            { "id": "pet-1", "name": "Rex", "species": "dog" },
            { "id": "pet-2", "species": "cat" }
        ],
        "notes": "Feed at noon"
    })
}
