pub mod health;
pub mod ui;

use axum::{routing::get, Router};

use crate::credentials::handlers as credential_handlers;
use crate::promo::handlers as promo_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/credential",
            get(credential_handlers::handle_credential_status)
                .put(credential_handlers::handle_set_credential),
        )
        .route(
            "/api/v1/promos",
            get(promo_handlers::handle_list_promos)
                .post(promo_handlers::handle_generate_promos)
                .delete(promo_handlers::handle_clear_promos),
        )
        .with_state(state)
}
