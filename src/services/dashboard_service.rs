use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    dto::dashboard::{Dashboard, StatusCount},
    entity::{
        Role, WorkOrderStatus,
        cars::{Column as CarCol, Entity as Cars},
        parts::{Column as PartCol, Entity as Parts},
        users::{Column as UserCol, Entity as Users},
        work_orders::{Column as OrderCol, Entity as WorkOrders},
    },
    error::AppResult,
    middleware::auth::CurrentUser,
    models::{Car, Part, WorkOrder},
    response::{ApiResponse, Meta},
    services::part_service::DEFAULT_LOW_STOCK_THRESHOLD,
    state::AppState,
};

const DASHBOARD_LIMIT: u64 = 10;

pub async fn dashboard(state: &AppState, user: &CurrentUser) -> AppResult<ApiResponse<Dashboard>> {
    let data = match user.role {
        Role::Manager => manager_dashboard(state).await?,
        Role::Mechanic => mechanic_dashboard(state, user.user_id).await?,
        Role::Client => client_dashboard(state, user.user_id).await?,
    };
    Ok(ApiResponse::success(
        format!("Welcome, {}", user.username),
        data,
        Some(Meta::empty()),
    ))
}

async fn manager_dashboard(state: &AppState) -> AppResult<Dashboard> {
    let mut orders_by_status = Vec::with_capacity(WorkOrderStatus::ALL.len());
    for status in WorkOrderStatus::ALL {
        let count = WorkOrders::find()
            .filter(OrderCol::Status.eq(status))
            .count(&state.orm)
            .await?;
        orders_by_status.push(StatusCount { status, count });
    }

    let unassigned_orders = WorkOrders::find()
        .filter(OrderCol::MechanicId.is_null())
        .filter(OrderCol::Status.is_not_in([WorkOrderStatus::Completed, WorkOrderStatus::Cancelled]))
        .count(&state.orm)
        .await?;

    let low_stock = Parts::find()
        .filter(PartCol::Quantity.lte(DEFAULT_LOW_STOCK_THRESHOLD))
        .order_by_asc(PartCol::Quantity)
        .limit(DASHBOARD_LIMIT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Part::from)
        .collect();

    let mechanics = Users::find()
        .filter(UserCol::Role.eq(Role::Mechanic))
        .count(&state.orm)
        .await?;
    let clients = Users::find()
        .filter(UserCol::Role.eq(Role::Client))
        .count(&state.orm)
        .await?;

    Ok(Dashboard::Manager {
        orders_by_status,
        unassigned_orders,
        low_stock,
        mechanics,
        clients,
    })
}

async fn mechanic_dashboard(state: &AppState, mechanic_id: i32) -> AppResult<Dashboard> {
    let assigned = WorkOrders::find()
        .filter(OrderCol::MechanicId.eq(mechanic_id))
        .filter(OrderCol::Status.is_not_in([WorkOrderStatus::Completed, WorkOrderStatus::Cancelled]))
        .order_by_asc(OrderCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(WorkOrder::from)
        .collect();

    let unassigned = WorkOrders::find()
        .filter(OrderCol::MechanicId.is_null())
        .filter(OrderCol::Status.eq(WorkOrderStatus::Pending))
        .order_by_asc(OrderCol::Id)
        .limit(DASHBOARD_LIMIT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(WorkOrder::from)
        .collect();

    Ok(Dashboard::Mechanic {
        assigned,
        unassigned,
    })
}

async fn client_dashboard(state: &AppState, client_id: i32) -> AppResult<Dashboard> {
    let cars = Cars::find()
        .filter(CarCol::OwnerId.eq(client_id))
        .order_by_desc(CarCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Car::from)
        .collect();

    let open_orders = WorkOrders::find()
        .filter(OrderCol::ClientId.eq(client_id))
        .order_by_desc(OrderCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter(|order| order.status.is_open())
        .map(WorkOrder::from)
        .collect();

    Ok(Dashboard::Client { cars, open_orders })
}
