use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod repo;
pub(crate) mod validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::me_routes())
        .merge(handlers::user_routes())
}
