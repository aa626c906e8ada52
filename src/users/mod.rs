use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(handlers::get_users))
        .route("/api/users/signup", post(handlers::signup))
        .route("/api/users/login", post(handlers::login))
}
