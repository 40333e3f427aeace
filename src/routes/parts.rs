use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::parts::{CreatePartForm, LowStockQuery, PartList, RestockForm},
    error::AppResult,
    middleware::auth::CurrentUser,
    models::Part,
    response::ApiResponse,
    routes::{
        extract::{Form, Path, Query},
        params::ListQuery,
    },
    services::part_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parts/", get(list_parts).post(add_part))
        .route("/parts/low-stock", get(list_low_stock))
        .route("/parts/{id}/restock", post(restock))
}

#[utoipa::path(
    get,
    path = "/parts/",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses((status = 200, description = "Inventory", body = ApiResponse<PartList>)),
    security(("session" = [])),
    tag = "Parts"
)]
pub async fn list_parts(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<PartList>>> {
    let resp = part_service::list_parts(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/parts/",
    request_body(content = CreatePartForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Add a part", body = ApiResponse<Part>),
        (status = 400, description = "Invalid form"),
        (status = 403, description = "Forbidden"),
    ),
    security(("session" = [])),
    tag = "Parts"
)]
pub async fn add_part(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(payload): Form<CreatePartForm>,
) -> AppResult<Json<ApiResponse<Part>>> {
    let resp = part_service::add_part(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/parts/low-stock",
    params(
        ("threshold" = Option<i32>, Query, description = "Stock threshold, default 5"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Parts at or below the threshold", body = ApiResponse<PartList>),
        (status = 403, description = "Forbidden")
    ),
    security(("session" = [])),
    tag = "Parts"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<ApiResponse<PartList>>> {
    let resp = part_service::list_low_stock(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/parts/{id}/restock",
    params(("id" = i32, Path, description = "Part ID")),
    request_body(content = RestockForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Add stock", body = ApiResponse<Part>),
        (status = 400, description = "Invalid quantity"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("session" = [])),
    tag = "Parts"
)]
pub async fn restock(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Form(payload): Form<RestockForm>,
) -> AppResult<Json<ApiResponse<Part>>> {
    let resp = part_service::restock(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
