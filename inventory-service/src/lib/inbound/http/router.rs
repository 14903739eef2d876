use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::auth::login;
use super::handlers::auth::logout;
use super::handlers::auth::refresh;
use super::handlers::distros::create_distro;
use super::handlers::resources::create_resource;
use super::handlers::resources::delete_resource;
use super::handlers::resources::get_resource;
use super::handlers::resources::list_resources;
use super::handlers::resources::patch_resource;
use super::handlers::resources::replace_resource;
use super::handlers::resources::Distros;
use super::handlers::resources::OsImages;
use super::middleware::authenticate;
use super::middleware::authenticate_without_account;
use crate::inventory::ports::InventoryServicePort;
use crate::session::ports::SessionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<dyn SessionServicePort>,
    pub inventory_service: Arc<dyn InventoryServicePort>,
}

pub fn create_router(
    session_service: Arc<dyn SessionServicePort>,
    inventory_service: Arc<dyn InventoryServicePort>,
) -> Router {
    let state = AppState {
        session_service,
        inventory_service,
    };

    let public_routes = Router::new().route("/auth/login", post(login));

    // Logout must work for stale tokens without re-verification.
    let token_routes = Router::new()
        .route("/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_without_account,
        ));

    let protected_routes = Router::new()
        .route("/auth/refresh", post(refresh))
        .route(
            "/osimages",
            get(list_resources::<OsImages>).post(create_resource::<OsImages>),
        )
        .route(
            "/osimages/:name",
            get(get_resource::<OsImages>)
                .put(replace_resource::<OsImages>)
                .patch(patch_resource::<OsImages>)
                .delete(delete_resource::<OsImages>),
        )
        .route(
            "/distros",
            get(list_resources::<Distros>).post(create_distro),
        )
        .route(
            "/distros/:name",
            get(get_resource::<Distros>).delete(delete_resource::<Distros>),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(token_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
