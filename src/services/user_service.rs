use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    access::{Action, authorize},
    audit,
    dto::users::{CreateUserForm, UserList, UserListQuery},
    entity::{
        Role,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::CurrentUser,
    models::User,
    response::{ApiResponse, Meta},
    routes::params::{ListQuery, SortOrder},
    services::auth_service::hash_password,
    state::AppState,
};

pub async fn list_users(
    state: &AppState,
    user: &CurrentUser,
    query: ListQuery,
    filter: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    authorize(user, Action::ManageUsers)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(role) = filter.role()? {
        condition = condition.add(UserCol::Role.eq(role));
    }

    let mut finder = Users::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(UserCol::Id),
        SortOrder::Desc => finder.order_by_desc(UserCol::Id),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let data = UserList {
        items,
        roles: vec![Role::Manager, Role::Mechanic, Role::Client],
    };
    Ok(ApiResponse::success("Users", data, Some(Meta::new(page, limit, total))))
}

pub async fn create_user(
    state: &AppState,
    user: &CurrentUser,
    payload: CreateUserForm,
) -> AppResult<ApiResponse<User>> {
    authorize(user, Action::ManageUsers)?;
    let new_user = payload.validate()?;

    let exists = Users::find()
        .filter(UserCol::Username.eq(new_user.username.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::validation("Username already exists."));
    }

    let created = UserActive {
        id: NotSet,
        username: Set(new_user.username),
        password_hash: Set(hash_password(&new_user.password)?),
        role: Set(new_user.role),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            AppError::validation("Username already exists.")
        }
        _ => AppError::OrmError(err),
    })?;

    tracing::info!(user_id = created.id, role = %created.role, "user created");
    audit::record(
        &state.orm,
        user.user_id,
        "user_create",
        "users",
        serde_json::json!({ "user_id": created.id, "role": created.role }),
    )
    .await;

    Ok(ApiResponse::success("User created successfully.", User::from(created), Some(Meta::empty()))
        .redirect_to("/users/"))
}

pub async fn list_mechanics<C: sea_orm::ConnectionTrait>(conn: &C) -> AppResult<Vec<User>> {
    let mechanics = Users::find()
        .filter(UserCol::Role.eq(Role::Mechanic))
        .order_by_asc(UserCol::Username)
        .all(conn)
        .await?
        .into_iter()
        .map(User::from)
        .collect();
    Ok(mechanics)
}
