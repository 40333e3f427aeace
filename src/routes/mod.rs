use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cars;
pub mod dashboard;
pub mod doc;
pub mod extract;
pub mod health;
pub mod params;
pub mod parts;
pub mod users;
pub mod work_orders;

// Page routes without state; it is provided at the top level.
pub fn create_app_router() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(auth::router())
        .merge(cars::router())
        .merge(parts::router())
        .merge(users::router())
        .merge(work_orders::router())
}
