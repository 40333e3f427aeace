use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    access::{Action, Grant, authorize},
    audit,
    dto::cars::{CarDetail, CarList, NewCar, RegisterCarForm},
    entity::{
        Role,
        cars::{self, ActiveModel as CarActive, Column as CarCol, Entity as Cars},
        users::Entity as Users,
        work_orders::{Column as OrderCol, Entity as WorkOrders},
    },
    error::{AppError, AppResult},
    middleware::auth::CurrentUser,
    models::{Car, WorkOrder},
    response::{ApiResponse, Meta},
    routes::params::{ListQuery, SortOrder},
    services::user_service::list_mechanics,
    state::AppState,
};

/// Looks a car up by VIN and inserts it when absent. Cars without a VIN are
/// always inserted. Returns the car and whether it was created.
pub async fn find_or_create_car<C>(conn: &C, car: NewCar) -> AppResult<(cars::Model, bool)>
where
    C: ConnectionTrait + TransactionTrait,
{
    if let Some(vin) = car.vin.as_deref() {
        if let Some(existing) = find_by_vin(conn, vin).await? {
            return Ok((existing, false));
        }
    }

    let make = car
        .make
        .clone()
        .ok_or_else(|| AppError::validation("make is required"))?;
    let owner_name = car
        .owner_name
        .clone()
        .ok_or_else(|| AppError::validation("owner_name is required"))?;

    // Savepoint, so a unique violation leaves the outer transaction usable.
    let savepoint = conn.begin().await?;
    let inserted = CarActive {
        id: NotSet,
        vin: Set(car.vin.clone()),
        make: Set(make),
        model: Set(car.model.clone()),
        year: Set(car.year),
        owner_id: Set(car.owner_id),
        owner_name: Set(owner_name),
        owner_phone: Set(car.owner_phone.clone()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&savepoint)
    .await;

    match inserted {
        Ok(model) => {
            savepoint.commit().await?;
            Ok((model, true))
        }
        // Lost a race against another request registering the same VIN.
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            savepoint.rollback().await?;
            let vin = car.vin.as_deref().ok_or(AppError::OrmError(err))?;
            let existing = find_by_vin(conn, vin).await?.ok_or(AppError::NotFound)?;
            Ok((existing, false))
        }
        Err(err) => Err(err.into()),
    }
}

async fn find_by_vin<C: ConnectionTrait>(conn: &C, vin: &str) -> AppResult<Option<cars::Model>> {
    Ok(Cars::find().filter(CarCol::Vin.eq(vin)).one(conn).await?)
}

pub async fn list_cars(
    state: &AppState,
    user: &CurrentUser,
    query: ListQuery,
) -> AppResult<ApiResponse<CarList>> {
    let grant = authorize(user, Action::ViewCars)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Grant::Own(owner_id) = grant {
        condition = condition.add(CarCol::OwnerId.eq(owner_id));
    }

    let mut finder = Cars::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(CarCol::Id),
        SortOrder::Desc => finder.order_by_desc(CarCol::Id),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Car::from)
        .collect();

    Ok(ApiResponse::success(
        "Cars",
        CarList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_car(
    state: &AppState,
    user: &CurrentUser,
    id: i32,
) -> AppResult<ApiResponse<CarDetail>> {
    let grant = authorize(user, Action::ViewCars)?;
    let car = Cars::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Grant::Own(owner_id) = grant {
        if car.owner_id != Some(owner_id) {
            return Err(Action::ViewCars.denied());
        }
    }

    let work_orders = WorkOrders::find()
        .filter(OrderCol::CarId.eq(car.id))
        .order_by_desc(OrderCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(WorkOrder::from)
        .collect();

    let data = CarDetail {
        car: car.into(),
        work_orders,
        mechanics: list_mechanics(&state.orm).await?,
    };
    Ok(ApiResponse::success("Car", data, Some(Meta::empty())))
}

pub async fn register_car(
    state: &AppState,
    user: &CurrentUser,
    payload: RegisterCarForm,
) -> AppResult<ApiResponse<Car>> {
    authorize(user, Action::RegisterCar)?;
    let mut new_car = payload.validate()?;

    let txn = state.orm.begin().await?;

    if let Some(owner_id) = new_car.owner_id {
        let owner = Users::find_by_id(owner_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        if owner.role != Role::Client {
            return Err(AppError::validation("owner_id must reference a client"));
        }
        if new_car.owner_name.is_none() {
            new_car.owner_name = Some(owner.username);
        }
    }

    let (car, created) = find_or_create_car(&txn, new_car).await?;
    txn.commit().await?;

    let message = if created {
        tracing::info!(car_id = car.id, vin = ?car.vin, "car registered");
        audit::record(
            &state.orm,
            user.user_id,
            "car_register",
            "cars",
            serde_json::json!({ "car_id": car.id }),
        )
        .await;
        "Car registered."
    } else {
        "Car already registered."
    };

    let path = format!("/cars/{}", car.id);
    Ok(ApiResponse::success(message, Car::from(car), Some(Meta::empty())).redirect_to(path))
}
