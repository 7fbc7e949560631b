// src/lib.rs

use axum::{
    extract::State,
    http::HeaderValue,
    routing::{get, patch, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::{Map, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use config::CorsOrigins;
use services::{
    auth::AuthService, catalog::CatalogKind, catalog::CatalogService, dashboard::DashboardService,
    requisition_workflow::RequisitionWorkflow,
};

#[derive(Clone)]
pub struct AppState {
    pub requisitions: RequisitionWorkflow,
    pub auth: AuthService,
    pub catalog: CatalogService,
    pub dashboard: DashboardService,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            requisitions: RequisitionWorkflow::new(db.clone()),
            auth: AuthService::new(db.clone()),
            catalog: CatalogService::new(db.clone()),
            dashboard: DashboardService::new(db),
        }
    }
}

pub mod entities {
    pub mod prelude;
    pub mod catalog_records;
    pub mod requisitions;
    pub mod users;
}

pub mod services {
    pub mod auth;
    pub mod catalog;
    pub mod dashboard;
    pub mod requisition_workflow;
}

pub mod config;
pub mod models;
pub mod handlers;

/// Build the full API router
pub fn app_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(hello_catalog))
        .route(
            "/requisitions",
            get(handlers::requisition::list_requisitions).post(handlers::requisition::create_requisition),
        )
        .route("/requisitions/{id}", get(handlers::requisition::get_requisition))
        .route("/requisitions/{id}/approve_l2", patch(handlers::requisition::approve_l2))
        .route("/requisitions/{id}/decline_l2", patch(handlers::requisition::decline_l2))
        .route("/requisitions/{id}/approve_l3", patch(handlers::requisition::approve_l3))
        .route("/requisitions/{id}/decline_l3", patch(handlers::requisition::decline_l3))
        .route("/users/signup", post(handlers::user::signup))
        .route("/users/login", post(handlers::user::login))
        .route("/dashboard/summary", get(handlers::dashboard::get_summary));

    catalog_routes(router).with_state(state)
}

/// POST /<kind>, GET /<kind>/ids and GET /<kind>/count for every catalog kind
fn catalog_routes(mut router: Router<AppState>) -> Router<AppState> {
    for kind in CatalogKind::ALL {
        router = router
            .route(
                kind.path(),
                post(move |State(state): State<AppState>, Json(fields): Json<Map<String, Value>>| {
                    handlers::catalog::submit_record(state, kind, fields)
                }),
            )
            .route(
                &format!("{}/ids", kind.path()),
                get(move |State(state): State<AppState>| handlers::catalog::record_ids(state, kind)),
            )
            .route(
                &format!("{}/count", kind.path()),
                get(move |State(state): State<AppState>| handlers::catalog::record_count(state, kind)),
            );
    }
    router
}

/// CORS layer for the configured origins
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origins {
        CorsOrigins::Any => layer.allow_origin(Any),
        CorsOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(values))
        }
    }
}

/// Router with the HTTP middleware stack applied
pub fn app(state: AppState, origins: &CorsOrigins) -> Router {
    app_router(state)
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http())
}

async fn hello_catalog() -> &'static str {
    "Seismic data catalog backend"
}
