use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::work_orders::{
        AssignMechanicForm, CompleteOrderForm, CompletedWorkOrder, CreateWorkOrderForm,
        UpdateStatusForm, WorkOrderDetail, WorkOrderList,
    },
    error::AppResult,
    middleware::auth::CurrentUser,
    models::WorkOrder,
    response::ApiResponse,
    routes::{
        extract::{Form, Path, Query},
        params::WorkOrderListQuery,
    },
    services::work_order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/work-orders/", get(list_work_orders).post(create_work_order))
        .route("/work-orders/assign/{id}", post(assign_mechanic))
        .route("/work-orders/status/{id}", post(update_status))
        .route("/work-orders/complete/{id}", post(complete_work_order))
        .route("/work-orders/view/{id}", get(get_work_order))
}

#[utoipa::path(
    get,
    path = "/work-orders/",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Work orders visible to the caller", body = ApiResponse<WorkOrderList>),
        (status = 400, description = "Unknown status filter"),
    ),
    security(("session" = [])),
    tag = "Work orders"
)]
pub async fn list_work_orders(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<WorkOrderListQuery>,
) -> AppResult<Json<ApiResponse<WorkOrderList>>> {
    let resp = work_order_service::list_work_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/work-orders/",
    request_body(content = CreateWorkOrderForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Open a work order (client only)", body = ApiResponse<WorkOrder>),
        (status = 400, description = "Invalid form"),
        (status = 403, description = "Forbidden"),
    ),
    security(("session" = [])),
    tag = "Work orders"
)]
pub async fn create_work_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(payload): Form<CreateWorkOrderForm>,
) -> AppResult<Json<ApiResponse<WorkOrder>>> {
    let resp = work_order_service::create_work_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/work-orders/assign/{id}",
    params(("id" = i32, Path, description = "Work order ID")),
    request_body(content = AssignMechanicForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Assign a mechanic (manager only)", body = ApiResponse<WorkOrder>),
        (status = 400, description = "Not a mechanic"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("session" = [])),
    tag = "Work orders"
)]
pub async fn assign_mechanic(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Form(payload): Form<AssignMechanicForm>,
) -> AppResult<Json<ApiResponse<WorkOrder>>> {
    let resp = work_order_service::assign_mechanic(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/work-orders/status/{id}",
    params(("id" = i32, Path, description = "Work order ID")),
    request_body(content = UpdateStatusForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Update status (manager only)", body = ApiResponse<WorkOrder>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("session" = [])),
    tag = "Work orders"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Form(payload): Form<UpdateStatusForm>,
) -> AppResult<Json<ApiResponse<WorkOrder>>> {
    let resp = work_order_service::update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/work-orders/complete/{id}",
    params(("id" = i32, Path, description = "Work order ID")),
    request_body(content = CompleteOrderForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Complete and consume parts (mechanic only)", body = ApiResponse<CompletedWorkOrder>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Insufficient stock"),
    ),
    security(("session" = [])),
    tag = "Work orders"
)]
pub async fn complete_work_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Form(payload): Form<CompleteOrderForm>,
) -> AppResult<Json<ApiResponse<CompletedWorkOrder>>> {
    let resp = work_order_service::complete_work_order(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/work-orders/view/{id}",
    params(("id" = i32, Path, description = "Work order ID")),
    responses(
        (status = 200, description = "Work order with car, people and parts used", body = ApiResponse<WorkOrderDetail>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("session" = [])),
    tag = "Work orders"
)]
pub async fn get_work_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<WorkOrderDetail>>> {
    let resp = work_order_service::get_work_order(&state, &user, id).await?;
    Ok(Json(resp))
}
