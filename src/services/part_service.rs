use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;

use crate::{
    access::{Action, authorize},
    audit,
    dto::{
        parts::{CreatePartForm, LowStockQuery, PartList, RestockForm},
        work_orders::PartUsage,
    },
    entity::{
        parts::{ActiveModel as PartActive, Column as PartCol, Entity as Parts},
        work_order_parts::{self, ActiveModel as LedgerActive},
    },
    error::{AppError, AppResult},
    middleware::auth::CurrentUser,
    models::Part,
    response::{ApiResponse, Meta},
    routes::params::{ListQuery, SortOrder},
    state::AppState,
};

pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;

pub async fn list_parts(
    state: &AppState,
    user: &CurrentUser,
    query: ListQuery,
) -> AppResult<ApiResponse<PartList>> {
    authorize(user, Action::ViewParts)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Parts::find();
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(PartCol::Id),
        SortOrder::Desc => finder.order_by_desc(PartCol::Id),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Part::from)
        .collect();

    Ok(ApiResponse::success(
        "Parts",
        PartList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Adds a part at the given stock level. Part numbers are not deduplicated.
pub async fn add_part(
    state: &AppState,
    user: &CurrentUser,
    payload: CreatePartForm,
) -> AppResult<ApiResponse<Part>> {
    authorize(user, Action::ManageParts)?;
    let new_part = payload.validate()?;

    let part = PartActive {
        id: NotSet,
        part_number: Set(new_part.part_number),
        name: Set(new_part.name),
        description: Set(new_part.description),
        quantity: Set(new_part.quantity),
        unit_price: Set(new_part.unit_price),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(part_id = part.id, part_number = %part.part_number, quantity = part.quantity, "part added");
    audit::record(
        &state.orm,
        user.user_id,
        "part_create",
        "parts",
        serde_json::json!({ "part_id": part.id, "quantity": part.quantity }),
    )
    .await;

    Ok(ApiResponse::success("Part added.", Part::from(part), Some(Meta::empty())).redirect_to("/parts/"))
}

pub async fn restock(
    state: &AppState,
    user: &CurrentUser,
    id: i32,
    payload: RestockForm,
) -> AppResult<ApiResponse<Part>> {
    authorize(user, Action::ManageParts)?;
    let delta = payload.validate()?;

    let txn = state.orm.begin().await?;
    if Parts::find_by_id(id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound);
    }

    // The headroom filter keeps the sum inside the i32 column.
    let updated = Parts::update_many()
        .col_expr(PartCol::Quantity, Expr::col(PartCol::Quantity).add(delta))
        .filter(PartCol::Id.eq(id))
        .filter(PartCol::Quantity.lte(i32::MAX - delta))
        .exec(&txn)
        .await?;
    if updated.rows_affected == 0 {
        return Err(AppError::validation("quantity would exceed the maximum stock"));
    }
    let part = Parts::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    txn.commit().await?;

    tracing::info!(part_id = part.id, delta, quantity = part.quantity, "part restocked");
    audit::record(
        &state.orm,
        user.user_id,
        "part_restock",
        "parts",
        serde_json::json!({ "part_id": part.id, "delta": delta }),
    )
    .await;

    Ok(ApiResponse::success("Inventory updated.", Part::from(part), Some(Meta::empty()))
        .redirect_to("/parts/"))
}

pub async fn list_low_stock(
    state: &AppState,
    user: &CurrentUser,
    query: LowStockQuery,
) -> AppResult<ApiResponse<PartList>> {
    authorize(user, Action::ManageParts)?;
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let (page, limit, offset) = query.pagination().normalize();

    let finder = Parts::find()
        .filter(PartCol::Quantity.lte(threshold))
        .order_by_asc(PartCol::Quantity)
        .order_by_asc(PartCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Part::from)
        .collect();

    Ok(ApiResponse::success(
        "Low stock",
        PartList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Takes `usage.quantity` units of a part out of stock for a work order and
/// appends the ledger row. The check and the decrement are one conditional
/// UPDATE, so concurrent consumers can never drive the quantity below zero.
/// Must run inside the caller's transaction.
pub async fn consume<C: ConnectionTrait>(
    conn: &C,
    work_order_id: i32,
    usage: PartUsage,
) -> AppResult<work_order_parts::Model> {
    if usage.quantity <= 0 {
        return Err(AppError::validation("quantity_used must be greater than 0"));
    }

    let part = Parts::find_by_id(usage.part_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let updated = Parts::update_many()
        .col_expr(PartCol::Quantity, Expr::col(PartCol::Quantity).sub(usage.quantity))
        .filter(PartCol::Id.eq(part.id))
        .filter(PartCol::Quantity.gte(usage.quantity))
        .exec(conn)
        .await?;

    if updated.rows_affected == 0 {
        let available = Parts::find_by_id(part.id)
            .one(conn)
            .await?
            .map(|p| p.quantity)
            .unwrap_or(part.quantity);
        tracing::warn!(
            part_id = part.id,
            work_order_id,
            requested = usage.quantity,
            available,
            "insufficient stock"
        );
        return Err(AppError::InsufficientStock {
            part_id: part.id,
            requested: usage.quantity,
            available,
        });
    }

    let entry = LedgerActive {
        id: NotSet,
        work_order_id: Set(work_order_id),
        part_id: Set(part.id),
        quantity_used: Set(usage.quantity),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    Ok(entry)
}
