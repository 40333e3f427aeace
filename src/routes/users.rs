use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::users::{CreateUserForm, UserList, UserListQuery},
    error::AppResult,
    middleware::auth::CurrentUser,
    models::User,
    response::ApiResponse,
    routes::{
        extract::{Form, Query},
        params::ListQuery,
    },
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/users/", get(list_users).post(create_user))
}

#[utoipa::path(
    get,
    path = "/users/",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("role" = Option<String>, Query, description = "Filter by role"),
    ),
    responses(
        (status = 200, description = "All users (manager only)", body = ApiResponse<UserList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("session" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
    Query(filter): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = user_service::list_users(&state, &user, query, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/users/",
    request_body(content = CreateUserForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Create a user (manager only)", body = ApiResponse<User>),
        (status = 400, description = "Invalid form or duplicate username"),
        (status = 403, description = "Forbidden"),
    ),
    security(("session" = [])),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(payload): Form<CreateUserForm>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::create_user(&state, &user, payload).await?;
    Ok(Json(resp))
}
