use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::Dashboard,
    error::AppResult,
    middleware::auth::CurrentUser,
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Role specific dashboard", body = ApiResponse<Dashboard>),
        (status = 401, description = "Not logged in"),
    ),
    security(("session" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Dashboard>>> {
    let resp = dashboard_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}
