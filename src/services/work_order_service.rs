use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;

use crate::{
    access::{Action, Grant, authorize},
    audit,
    dto::{
        cars::NewCar,
        work_orders::{
            AssignMechanicForm, CompleteOrderForm, CompletedWorkOrder, CreateWorkOrderForm,
            UpdateStatusForm, UsedPart, WorkOrderDetail, WorkOrderList,
        },
    },
    entity::{
        Role, WorkOrderStatus,
        cars::Entity as Cars,
        parts::Entity as Parts,
        users::Entity as Users,
        work_order_parts::{Column as LedgerCol, Entity as WorkOrderParts},
        work_orders::{self, ActiveModel as OrderActive, Column as OrderCol, Entity as WorkOrders},
    },
    error::{AppError, AppResult},
    middleware::auth::CurrentUser,
    models::{Car, Part, User, WorkOrder, WorkOrderPart},
    response::{ApiResponse, Meta},
    routes::params::{SortOrder, WorkOrderListQuery},
    services::{car_service::find_or_create_car, part_service, user_service::list_mechanics},
    state::AppState,
};

const LIST_PATH: &str = "/work-orders/";

/// Work orders a caller may see: everything for managers, assigned and
/// unassigned jobs for mechanics, own orders for clients.
fn visibility(user: &CurrentUser, grant: Grant) -> Condition {
    match (grant, user.role) {
        (Grant::All, _) => Condition::all(),
        (Grant::Own(id), Role::Mechanic) => Condition::any()
            .add(OrderCol::MechanicId.eq(id))
            .add(OrderCol::MechanicId.is_null()),
        (Grant::Own(id), _) => Condition::all().add(OrderCol::ClientId.eq(id)),
    }
}

fn can_see(user: &CurrentUser, grant: Grant, order: &work_orders::Model) -> bool {
    match (grant, user.role) {
        (Grant::All, _) => true,
        (Grant::Own(id), Role::Mechanic) => order.mechanic_id.is_none_or(|m| m == id),
        (Grant::Own(id), _) => order.client_id == id,
    }
}

pub async fn list_work_orders(
    state: &AppState,
    user: &CurrentUser,
    query: WorkOrderListQuery,
) -> AppResult<ApiResponse<WorkOrderList>> {
    let grant = authorize(user, Action::ViewWorkOrders)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all().add(visibility(user, grant));
    if let Some(status) = query.status()? {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = WorkOrders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::Id),
        SortOrder::Desc => finder.order_by_desc(OrderCol::Id),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(WorkOrder::from)
        .collect();

    Ok(ApiResponse::success(
        "Work orders",
        WorkOrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Client opens a work order, reusing the car with the same VIN when one exists.
pub async fn create_work_order(
    state: &AppState,
    user: &CurrentUser,
    payload: CreateWorkOrderForm,
) -> AppResult<ApiResponse<WorkOrder>> {
    authorize(user, Action::CreateWorkOrder)?;
    let new_order = payload.validate()?;

    let txn = state.orm.begin().await?;

    let (car, car_created) = find_or_create_car(
        &txn,
        NewCar {
            owner_id: Some(user.user_id),
            owner_name: Some(user.username.clone()),
            ..new_order.car
        },
    )
    .await?;

    let now = Utc::now();
    let order = OrderActive {
        id: NotSet,
        car_id: Set(car.id),
        client_id: Set(user.user_id),
        mechanic_id: Set(None),
        status: Set(WorkOrderStatus::Pending),
        description: Set(new_order.description),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        work_order_id = order.id,
        car_id = car.id,
        car_created,
        client_id = user.user_id,
        "work order created"
    );
    audit::record(
        &state.orm,
        user.user_id,
        "work_order_create",
        "work_orders",
        serde_json::json!({ "work_order_id": order.id, "car_id": car.id, "car_created": car_created }),
    )
    .await;

    Ok(ApiResponse::success(
        "Work order created successfully.",
        WorkOrder::from(order),
        Some(Meta::empty()),
    )
    .redirect_to(LIST_PATH))
}

/// Sets the mechanic and forces the order to `in_progress`, whatever its
/// previous status. Reassigning simply overwrites.
pub async fn assign_mechanic(
    state: &AppState,
    user: &CurrentUser,
    id: i32,
    payload: AssignMechanicForm,
) -> AppResult<ApiResponse<WorkOrder>> {
    authorize(user, Action::AssignMechanic)?;
    let mechanic_id = payload.validate()?;

    let txn = state.orm.begin().await?;

    let order = WorkOrders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mechanic = Users::find_by_id(mechanic_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if mechanic.role != Role::Mechanic {
        return Err(AppError::validation(format!(
            "User {} is not a mechanic",
            mechanic.username
        )));
    }

    let previous = order.status;
    let mut active: OrderActive = order.into();
    active.mechanic_id = Set(Some(mechanic.id));
    active.status = Set(WorkOrderStatus::InProgress);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        work_order_id = order.id,
        mechanic_id = mechanic.id,
        from = %previous,
        "mechanic assigned"
    );
    audit::record(
        &state.orm,
        user.user_id,
        "work_order_assign",
        "work_orders",
        serde_json::json!({ "work_order_id": order.id, "mechanic_id": mechanic.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Mechanic assigned successfully.",
        WorkOrder::from(order),
        Some(Meta::empty()),
    )
    .redirect_to(LIST_PATH))
}

pub async fn update_status(
    state: &AppState,
    user: &CurrentUser,
    id: i32,
    payload: UpdateStatusForm,
) -> AppResult<ApiResponse<WorkOrder>> {
    authorize(user, Action::UpdateStatus)?;
    let status = payload.validate()?;

    let txn = state.orm.begin().await?;
    let order = WorkOrders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let previous = order.status;
    let mut active: OrderActive = order.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(work_order_id = order.id, from = %previous, to = %status, "status updated");
    audit::record(
        &state.orm,
        user.user_id,
        "work_order_status",
        "work_orders",
        serde_json::json!({ "work_order_id": order.id, "from": previous, "to": status }),
    )
    .await;

    Ok(ApiResponse::success("Status updated.", WorkOrder::from(order), Some(Meta::empty()))
        .redirect_to(LIST_PATH))
}

/// Mechanic completion. When parts are used they are taken from stock and
/// recorded in the ledger in the same transaction as the status change; on
/// insufficient stock nothing is written.
pub async fn complete_work_order(
    state: &AppState,
    user: &CurrentUser,
    id: i32,
    payload: CompleteOrderForm,
) -> AppResult<ApiResponse<CompletedWorkOrder>> {
    authorize(user, Action::CompleteOrder)?;
    let usage = payload.validate()?;

    let txn = state.orm.begin().await?;
    let order = WorkOrders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let ledger_entry = match usage {
        Some(usage) => Some(part_service::consume(&txn, order.id, usage).await?),
        None => None,
    };

    let previous = order.status;
    let mut active: OrderActive = order.into();
    active.status = Set(WorkOrderStatus::Completed);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        work_order_id = order.id,
        mechanic_id = user.user_id,
        from = %previous,
        parts_used = ledger_entry.as_ref().map(|e| e.quantity_used).unwrap_or(0),
        "work order completed"
    );
    audit::record(
        &state.orm,
        user.user_id,
        "work_order_complete",
        "work_orders",
        serde_json::json!({
            "work_order_id": order.id,
            "part_id": ledger_entry.as_ref().map(|e| e.part_id),
            "quantity_used": ledger_entry.as_ref().map(|e| e.quantity_used),
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Work order completed.",
        CompletedWorkOrder {
            order: order.into(),
            ledger_entry: ledger_entry.map(WorkOrderPart::from),
        },
        Some(Meta::empty()),
    )
    .redirect_to(LIST_PATH))
}

pub async fn get_work_order(
    state: &AppState,
    user: &CurrentUser,
    id: i32,
) -> AppResult<ApiResponse<WorkOrderDetail>> {
    let grant = authorize(user, Action::ViewWorkOrders)?;
    let order = WorkOrders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if !can_see(user, grant, &order) {
        return Err(Action::ViewWorkOrders.denied());
    }

    let car = Cars::find_by_id(order.car_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let client = Users::find_by_id(order.client_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let mechanic = match order.mechanic_id {
        Some(mechanic_id) => Users::find_by_id(mechanic_id).one(&state.orm).await?,
        None => None,
    };

    let parts_used = WorkOrderParts::find()
        .filter(LedgerCol::WorkOrderId.eq(order.id))
        .order_by_asc(LedgerCol::Id)
        .find_also_related(Parts)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter_map(|(entry, part)| {
            part.map(|part| UsedPart {
                entry: entry.into(),
                part: Part::from(part),
            })
        })
        .collect();

    let data = WorkOrderDetail {
        order: order.into(),
        car: Car::from(car),
        client: User::from(client),
        mechanic: mechanic.map(User::from),
        parts_used,
        mechanics: list_mechanics(&state.orm).await?,
    };
    Ok(ApiResponse::success("Work order", data, Some(Meta::empty())))
}
