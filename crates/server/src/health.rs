use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use catalogo_core::SharedCatalog;
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

#[derive(Clone)]
pub struct HealthState {
    catalog: SharedCatalog,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

pub fn router(catalog: SharedCatalog) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { catalog })
}

pub async fn spawn(bind_address: &str, port: u16, catalog: SharedCatalog) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(catalog)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state.catalog);
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "catalogo-server runtime initialized".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

// try_read keeps the probe non-blocking: a held write guard reports as
// degraded instead of stalling the health listener.
fn catalog_check(catalog: &SharedCatalog) -> HealthCheck {
    match catalog.try_read() {
        Ok(guard) => HealthCheck {
            status: "ready",
            detail: format!("catalog holds {} products", guard.len()),
        },
        Err(_) => HealthCheck {
            status: "degraded",
            detail: "catalog lock is held by a writer".to_string(),
        },
    }
}
