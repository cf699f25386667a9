use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
pub mod services;
pub mod sms;

pub fn router() -> Router<AppState> {
    handlers::phone_routes()
}
