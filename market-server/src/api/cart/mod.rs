//! Cart API module

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/", delete(handler::clear))
        .route("/items", post(handler::add))
        .route("/items/{product_id}", delete(handler::remove))
}
