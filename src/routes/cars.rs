use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::cars::{CarDetail, CarList, RegisterCarForm},
    error::AppResult,
    middleware::auth::CurrentUser,
    models::Car,
    response::ApiResponse,
    routes::{
        extract::{Form, Path, Query},
        params::ListQuery,
    },
    services::car_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars/", get(list_cars).post(register_car))
        .route("/cars/{id}", get(get_car))
}

#[utoipa::path(
    get,
    path = "/cars/",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Cars visible to the caller", body = ApiResponse<CarList>),
        (status = 401, description = "Not logged in"),
    ),
    security(("session" = [])),
    tag = "Cars"
)]
pub async fn list_cars(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<CarList>>> {
    let resp = car_service::list_cars(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/cars/",
    request_body(content = RegisterCarForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Register a car or return the one with the same VIN", body = ApiResponse<Car>),
        (status = 400, description = "Invalid form"),
        (status = 403, description = "Forbidden"),
    ),
    security(("session" = [])),
    tag = "Cars"
)]
pub async fn register_car(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(payload): Form<RegisterCarForm>,
) -> AppResult<Json<ApiResponse<Car>>> {
    let resp = car_service::register_car(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/cars/{id}",
    params(("id" = i32, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car with its work orders", body = ApiResponse<CarDetail>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found"),
    ),
    security(("session" = [])),
    tag = "Cars"
)]
pub async fn get_car(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<CarDetail>>> {
    let resp = car_service::get_car(&state, &user, id).await?;
    Ok(Json(resp))
}
