//! Route definitions for the Crop Advisor platform

use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::{
    handlers,
    middleware::{admin_middleware, auth_middleware, optional_auth_middleware},
    AppState,
};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Accounts
        .nest("/auth", auth_routes(state.clone()))
        // Crop recommendations (recommend is public, the rest need a token)
        .nest("/crops", crop_routes(state))
        // Farming assistant (public)
        .nest("/farm-ai", farm_ai_routes())
        // Name-based price lookups (public)
        .nest("/prices", price_routes())
        // CEDA reference data and ID-based search (public, never cached)
        .nest("/ceda", ceda_routes())
        // Model service status passthrough
        .route("/ml/status", get(handlers::ml_status))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh));

    let protected = Router::new()
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/users", get(handlers::list_users))
        .route("/users/:id", axum::routing::delete(handlers::delete_user))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected).merge(admin)
}

/// Crop recommendation routes
fn crop_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/recommend", post(handlers::recommend_crop))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    let admin = Router::new()
        .route("/admin/all", get(handlers::list_all_recommendations))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let protected = Router::new()
        .route("/history", get(handlers::recommendation_history))
        .route(
            "/:id",
            get(handlers::get_recommendation).delete(handlers::delete_recommendation),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(admin).merge(protected)
}

/// Farming assistant routes
fn farm_ai_routes() -> Router<AppState> {
    Router::new()
        .route("/test", get(handlers::assistant_test))
        .route("/quick-test", get(handlers::assistant_quick_test))
        .route("/text", post(handlers::text_query))
        .route("/disease", post(handlers::disease_detection))
        .route("/translate", post(handlers::translate_text))
}

/// Price lookup routes
fn price_routes() -> Router<AppState> {
    Router::new()
        .route("/current", get(handlers::current_price))
        .route("/history", get(handlers::price_history))
}

/// CEDA routes; responses must not be cached by intermediaries
fn ceda_routes() -> Router<AppState> {
    Router::new()
        .route("/commodities", get(handlers::list_commodities))
        .route("/geographies", get(handlers::list_geographies))
        .route("/markets", post(handlers::list_markets))
        .route("/prices", post(handlers::search_prices_by_ids))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
}
