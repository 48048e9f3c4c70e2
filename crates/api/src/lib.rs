//! HTTP API server with observability for the booking core.
//!
//! Exposes REST endpoints for accounts, listings, bookings, reviews,
//! payments, and notifications, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use access::{AccessGate, InMemoryAttemptCounter};
use axum::Router;
use axum::routing::{get, patch, post};
use common::{Clock, SystemClock};
use metrics_exporter_prometheus::PrometheusHandle;
use services::{
    BookingService, CatalogService, ExpiryJanitor, NotificationDispatcher, PaymentService,
    PushRegistry, RatingService, SimulatedGateway,
};
use store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/auth/register", post(routes::auth::register::<S>))
        .route("/auth/login", post(routes::auth::login::<S>))
        .route("/admin/users/{id}", patch(routes::auth::set_account_active::<S>))
        .route("/admin/bookings/{id}/cancel", post(routes::bookings::force_cancel::<S>))
        .route("/services", post(routes::listings::create::<S>))
        .route("/services/{id}", get(routes::listings::get::<S>))
        .route("/services/{id}", patch(routes::listings::update::<S>))
        .route("/providers/{id}/services", get(routes::listings::for_provider::<S>))
        .route("/providers/{id}/profile", get(routes::reviews::profile::<S>))
        .route("/providers/{id}/reviews", get(routes::reviews::for_provider::<S>))
        .route("/bookings", post(routes::bookings::create::<S>))
        .route("/bookings", get(routes::bookings::list::<S>))
        .route("/bookings/{id}", get(routes::bookings::get::<S>))
        .route("/bookings/{id}/status", post(routes::bookings::transition::<S>))
        .route("/bookings/{id}/reviews", post(routes::reviews::create::<S>))
        .route("/bookings/{id}/payments", post(routes::payments::create::<S>))
        .route("/bookings/{id}/payments", get(routes::payments::history::<S>))
        .route("/earnings", get(routes::bookings::earnings::<S>))
        .route("/notifications", get(routes::notifications::list::<S>))
        .route("/notifications/stream", get(routes::push::stream::<S>))
        .route("/notifications/{id}/read", post(routes::notifications::mark_read::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the default application state: every service over one store, a
/// simulated payment gateway, and the expiry janitor (returned unstarted
/// so the caller decides whether to spawn its loop).
pub fn create_default_state<S: Store + Clone + 'static>(
    store: S,
    config: &Config,
) -> (Arc<AppState<S>>, ExpiryJanitor<S>, Arc<SimulatedGateway>) {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let dispatcher = Arc::new(NotificationDispatcher::new(
        store.clone(),
        PushRegistry::new(),
        clock.clone(),
    ));
    let bookings = Arc::new(BookingService::new(
        store.clone(),
        dispatcher.clone(),
        clock.clone(),
    ));
    let gateway = Arc::new(SimulatedGateway::new());
    let payments = PaymentService::new(
        store.clone(),
        gateway.clone(),
        dispatcher.clone(),
        clock.clone(),
    );
    let gate = AccessGate::new(
        store.clone(),
        Arc::new(InMemoryAttemptCounter::new()),
        config.rate_limit_policy(),
        clock.clone(),
    );
    let janitor = ExpiryJanitor::new(
        store.clone(),
        bookings.clone(),
        clock.clone(),
        config.janitor_config(),
    );

    let state = Arc::new(AppState {
        gate,
        bookings,
        catalog: CatalogService::new(store.clone(), clock.clone()),
        ratings: RatingService::new(store, clock),
        payments,
        dispatcher,
    });

    (state, janitor, gateway)
}
