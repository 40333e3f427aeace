use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::post,
};

use crate::{
    dto::auth::{LoginForm, LoginResponse},
    error::AppResult,
    middleware::auth::{clear_session_cookie, session_cookie},
    response::{ApiResponse, Meta},
    routes::extract::Form,
    services::auth_service::login_user,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login and start a session", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Form(payload): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    let resp = login_user(&state, payload).await?;
    let cookie = resp
        .data
        .as_ref()
        .map(|data| session_cookie(&data.token, state.session.ttl_hours))
        .unwrap_or_else(clear_session_cookie);
    Ok(([(header::SET_COOKIE, cookie)], Json(resp)))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "End the session")),
    tag = "Auth"
)]
pub async fn logout() -> impl IntoResponse {
    let body = ApiResponse::success("Logged out", serde_json::Value::Null, Some(Meta::empty()))
        .redirect_to("/auth/login");
    ([(header::SET_COOKIE, clear_session_cookie())], Json(body))
}
