use actix_web::{web, App, HttpResponse, HttpServer};
use prometheus::{Registry, TextEncoder};
use std::thread::JoinHandle;

// ============================================================================
// Metrics Exporter
// ============================================================================
//
// Serves the registry in Prometheus text format on `/metrics` and a
// liveness document on `/health`. Runs on its own actix system thread so
// the tokio runtime driving the update cycle stays untouched.
//
// ============================================================================

pub struct MetricsServer {
    registry: Registry,
    port: u16,
}

impl MetricsServer {
    pub fn new(registry: Registry, port: u16) -> Self {
        Self { registry, port }
    }

    /// Run the exporter on a dedicated thread until the process exits
    pub fn spawn(self) -> JoinHandle<()> {
        std::thread::spawn(move || {
            let port = self.port;
            if let Err(e) = actix_web::rt::System::new().block_on(self.serve()) {
                tracing::error!(port, error = %e, "Metrics exporter stopped");
            }
        })
    }

    async fn serve(self) -> std::io::Result<()> {
        tracing::info!(port = self.port, "Serving metrics on /metrics");

        let registry = web::Data::new(self.registry);
        HttpServer::new(move || {
            App::new()
                .app_data(registry.clone())
                .route("/metrics", web::get().to(scrape))
                .route("/health", web::get().to(health))
        })
        .workers(1)
        .bind(("0.0.0.0", self.port))?
        .run()
        .await
    }
}

/// Registry contents in Prometheus text exposition format
pub fn render(registry: &Registry) -> Result<String, prometheus::Error> {
    TextEncoder::new().encode_to_string(&registry.gather())
}

async fn scrape(registry: web::Data<Registry>) -> HttpResponse {
    match render(&registry) {
        Ok(body) => HttpResponse::Ok()
            .content_type(prometheus::TEXT_FORMAT)
            .body(body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            HttpResponse::InternalServerError().finish()
        }
    }
}

async fn health(registry: web::Data<Registry>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "market-tables",
        "metric_families": registry.gather().len(),
    }))
}
