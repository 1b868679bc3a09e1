pub mod health;
pub mod waitlist;

use axum::Router;

use crate::adapters::http::app_state::AppState;

/// Routes mounted under `/api`.
pub fn api_router() -> Router<AppState> {
    waitlist::router()
}
